use eframe::egui::{self, RichText, Ui};
use log::debug;

use crate::notes::{Note, NotesClient};
use crate::util::truncate_chars;

use super::super::search::filter_notes;
use super::super::tasks::Pending;
use super::super::{ActiveView, ViewModel};
use super::editor::NoteEditor;

const SEARCH_DEBOUNCE_SECS: f64 = 0.3;

/// Server-side semantic search, issued once typing pauses.
#[derive(Default)]
pub(in crate::app) struct RemoteSearch {
    edited_at: Option<f64>,
    sent_query: String,
    task: Option<Pending<Vec<Note>>>,
    results: Vec<Note>,
    error: Option<String>,
}

impl RemoteSearch {
    pub(in crate::app) fn query_edited(&mut self, now: f64) {
        self.edited_at = Some(now);
    }

    fn is_due(&self, query: &str, now: f64) -> bool {
        self.task.is_none()
            && self
                .edited_at
                .is_some_and(|edited| now - edited >= SEARCH_DEBOUNCE_SECS)
            && query != self.sent_query
    }

    /// Returns `true` while a request is waiting or in flight.
    pub(in crate::app) fn update(
        &mut self,
        client: Option<&NotesClient>,
        query: &str,
        now: f64,
    ) -> bool {
        if let Some(task) = &self.task
            && let Some(result) = task.poll()
        {
            match result {
                Ok(results) => {
                    self.results = results;
                    self.error = None;
                }
                Err(message) => self.error = Some(message),
            }
            self.task = None;
        }

        let query = query.trim();
        let Some(client) = client else {
            return false;
        };
        if query.is_empty() {
            self.edited_at = None;
            self.sent_query.clear();
            self.results.clear();
            self.error = None;
            return self.task.is_some();
        }

        if self.is_due(query, now) {
            debug!("event=remote_search query={query:?}");
            let client = client.clone();
            let request = query.to_owned();
            self.task = Some(Pending::spawn(move || client.search_notes(&request)));
            self.sent_query = query.to_owned();
            self.edited_at = None;
        }

        self.edited_at.is_some() || self.task.is_some()
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_sidebar(&mut self, ui: &mut Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.view, ActiveView::Notes, "Notes");
            ui.selectable_value(&mut self.view, ActiveView::Graph, "Graph");
        });
        ui.separator();

        let search = ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Search notes")
                .desired_width(f32::INFINITY),
        );
        if search.changed() {
            self.remote_search.query_edited(now);
        }

        if self.source.client().is_some() && ui.button("New note").clicked() {
            self.editor = Some(NoteEditor::new_note());
            self.view = ActiveView::Notes;
        }

        let mut open = None;

        if !self.remote_search.results.is_empty() || self.remote_search.task.is_some() {
            ui.separator();
            ui.horizontal(|ui| {
                ui.label(RichText::new("Server matches").strong());
                if self.remote_search.task.is_some() {
                    ui.spinner();
                }
            });
            for note in &self.remote_search.results {
                if ui.link(note.title()).clicked() {
                    open = Some(note.id.clone());
                }
            }
        }
        if let Some(error) = &self.remote_search.error {
            ui.colored_label(ui.visuals().error_fg_color, error.as_str());
        }

        ui.separator();
        let filtered = filter_notes(&self.notes.notes, &self.search);
        ui.label(format!("{} of {} notes", filtered.len(), self.notes.notes.len()));

        egui::ScrollArea::vertical()
            .id_salt("note_list_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for note in filtered {
                    let selected = self.selected.as_deref() == Some(note.id.as_str());
                    if ui.selectable_label(selected, note.title()).clicked() {
                        open = Some(note.id.clone());
                    }
                    let preview = truncate_chars(note.content.trim(), 60);
                    if !preview.is_empty() {
                        ui.small(preview);
                    }
                    if !note.tags.is_empty() {
                        ui.small(
                            note.tags
                                .iter()
                                .map(|tag| format!("#{tag}"))
                                .collect::<Vec<_>>()
                                .join(" "),
                        );
                    }
                    ui.add_space(4.0);
                }
            });

        if let Some(id) = open {
            self.open_note(&id);
            self.view = ActiveView::Notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteSearch;

    #[test]
    fn search_waits_for_typing_pause() {
        let mut search = RemoteSearch::default();
        assert!(!search.is_due("graph", 10.0));

        search.query_edited(10.0);
        assert!(!search.is_due("graph", 10.1));
        assert!(search.is_due("graph", 10.3));
    }

    #[test]
    fn repeated_query_is_not_resent() {
        let mut search = RemoteSearch {
            sent_query: "graph".to_owned(),
            ..RemoteSearch::default()
        };
        search.query_edited(0.0);
        assert!(!search.is_due("graph", 1.0));
        assert!(search.is_due("graphs", 1.0));
    }

    #[test]
    fn read_only_source_never_searches() {
        let mut search = RemoteSearch::default();
        search.query_edited(0.0);
        assert!(!search.update(None, "graph", 5.0));
        assert!(search.task.is_none());
    }
}
