use eframe::egui::{self, RichText, Ui};

use crate::notes::{Note, NoteGraph, NoteSource};
use crate::util::short_id;

use super::super::ViewModel;
use super::super::tasks::Pending;
use super::actions::NoteAction;
use super::editor::NoteEditor;

struct DetailPayload {
    note: Note,
    linked: Vec<Note>,
    related: Vec<Note>,
}

/// The selected note plus its neighbours. Starts from the loaded graph and
/// is replaced by the server's view once the fetch lands.
pub(in crate::app) struct NoteDetail {
    note_id: String,
    note: Option<Note>,
    linked: Vec<Note>,
    related: Vec<Note>,
    task: Option<Pending<DetailPayload>>,
    error: Option<String>,
}

impl NoteDetail {
    pub(in crate::app) fn load(source: &NoteSource, notes: &NoteGraph, id: &str) -> Self {
        let linked = notes
            .linked_ids(id)
            .filter_map(|linked_id| notes.note(linked_id))
            .cloned()
            .collect();

        let task = source.client().cloned().map(|client| {
            let id = id.to_owned();
            Pending::spawn(move || {
                Ok(DetailPayload {
                    note: client.get_note(&id)?,
                    linked: client.linked_notes(&id)?,
                    related: client.related_notes(&id)?,
                })
            })
        });

        Self {
            note_id: id.to_owned(),
            note: notes.note(id).cloned(),
            linked,
            related: Vec::new(),
            task,
            error: None,
        }
    }

    /// Returns `true` while the fetch is still running.
    pub(in crate::app) fn poll(&mut self) -> bool {
        let Some(task) = &self.task else {
            return false;
        };
        let Some(result) = task.poll() else {
            return true;
        };

        match result {
            Ok(payload) => {
                self.note = Some(payload.note);
                self.linked = payload.linked;
                self.related = payload.related;
            }
            Err(message) => self.error = Some(message),
        }
        self.task = None;
        false
    }
}

impl ViewModel {
    pub(in crate::app) fn open_note(&mut self, id: &str) {
        self.selected = Some(id.to_owned());
        self.editor = None;
        self.detail = Some(NoteDetail::load(&self.source, &self.notes, id));
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(detail) = &self.detail else {
            ui.add_space(12.0);
            ui.label("Select a note from the list or the graph.");
            return;
        };

        let editable = self.source.client().is_some();
        let mut open = None;
        let mut action = None;
        let mut edit = None;

        let Some(note) = &detail.note else {
            if detail.task.is_some() {
                ui.spinner();
            } else {
                ui.label(format!("Note {} is no longer available.", detail.note_id));
            }
            if let Some(error) = &detail.error {
                ui.colored_label(ui.visuals().error_fg_color, error.as_str());
            }
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(note.title());
            if detail.task.is_some() {
                ui.spinner();
            }
        });
        ui.small(format!("id {}", note.id));
        if let Some(created) = &note.created_at {
            ui.small(format!("created {created}"));
        }
        if let Some(updated) = &note.updated_at {
            ui.small(format!("updated {updated}"));
        }
        if let Some(error) = &detail.error {
            ui.colored_label(ui.visuals().error_fg_color, error.as_str());
        }

        if !note.tags.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for tag in &note.tags {
                    ui.label(RichText::new(format!("#{tag}")).small().strong());
                }
            });
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(editable, egui::Button::new("Edit")).clicked() {
                edit = Some(NoteEditor::edit(note));
            }
            if ui.add_enabled(editable, egui::Button::new("Auto-link")).clicked() {
                action = Some(NoteAction::AutoLink(note.id.clone()));
            }
            if ui.add_enabled(editable, egui::Button::new("Delete")).clicked() {
                action = Some(NoteAction::Delete(note.id.clone()));
            }
        });

        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("note_detail_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(summary) = note.summary.as_deref().filter(|s| !s.trim().is_empty()) {
                    ui.label(RichText::new(summary).italics());
                    ui.add_space(6.0);
                }
                ui.label(note.content.as_str());

                ui.separator();
                ui.label(RichText::new(format!("Linked notes ({})", detail.linked.len())).strong());
                if detail.linked.is_empty() {
                    ui.label("No links yet.");
                }
                for linked in &detail.linked {
                    ui.horizontal(|ui| {
                        if ui
                            .link(linked.title())
                            .on_hover_text(short_id(&linked.id))
                            .clicked()
                        {
                            open = Some(linked.id.clone());
                        }
                        if editable && ui.small_button("Unlink").clicked() {
                            action = Some(NoteAction::Unlink {
                                source: note.id.clone(),
                                target: linked.id.clone(),
                            });
                        }
                    });
                }

                if editable {
                    ui.separator();
                    ui.label(RichText::new("Related notes").strong());
                    if detail.related.is_empty() && detail.task.is_none() {
                        ui.label("Nothing similar found.");
                    }
                    for related in &detail.related {
                        if ui.link(related.title()).clicked() {
                            open = Some(related.id.clone());
                        }
                    }
                }
            });

        if let Some(editor) = edit {
            self.editor = Some(editor);
        }
        if let Some(action) = action {
            self.submit(action);
        }
        if let Some(id) = open {
            self.open_note(&id);
        }
    }
}
