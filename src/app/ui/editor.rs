use eframe::egui::{self, Ui};

use crate::notes::{CreateNoteRequest, Note, UpdateNoteRequest};

use super::super::ViewModel;
use super::actions::NoteAction;

/// Draft state for creating a note or editing an existing one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct NoteEditor {
    target: Option<String>,
    content: String,
    tags: String,
}

impl NoteEditor {
    pub(in crate::app) fn new_note() -> Self {
        Self::default()
    }

    pub(in crate::app) fn edit(note: &Note) -> Self {
        Self {
            target: Some(note.id.clone()),
            content: note.content.clone(),
            tags: note.tags.join(", "),
        }
    }

    fn parsed_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
            if !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_owned());
            }
        }
        tags
    }

    fn can_save(&self) -> bool {
        !self.content.trim().is_empty()
    }

    fn to_action(&self) -> NoteAction {
        let content = self.content.trim().to_owned();
        let tags = self.parsed_tags();
        match &self.target {
            Some(id) => NoteAction::Update {
                id: id.clone(),
                request: UpdateNoteRequest {
                    content: Some(content),
                    summary: None,
                    tags: Some(tags),
                },
            },
            None => NoteAction::Create(CreateNoteRequest { content, tags }),
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_editor(&mut self, ui: &mut Ui) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        let mut save = None;
        let mut cancel = false;

        ui.heading(if editor.target.is_some() {
            "Edit note"
        } else {
            "New note"
        });
        ui.add_space(6.0);

        ui.label("Tags (comma separated)");
        ui.text_edit_singleline(&mut editor.tags);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(editor.can_save(), egui::Button::new("Save"))
                .clicked()
            {
                save = Some(editor.to_action());
            }
            if ui.button("Cancel").clicked() {
                cancel = true;
            }
        });
        ui.add_space(6.0);

        egui::ScrollArea::vertical()
            .id_salt("note_editor_scroll")
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut editor.content)
                        .desired_width(f32::INFINITY)
                        .desired_rows(18)
                        .hint_text("Write your note. The first line becomes its title."),
                );
            });

        if let Some(action) = save {
            self.submit(action);
            self.editor = None;
        } else if cancel {
            self.editor = None;
        }
    }
}
