use anyhow::Result;
use log::info;

use crate::notes::{CreateNoteRequest, NotesClient, UpdateNoteRequest};

use super::super::ViewModel;
use super::super::tasks::Pending;

/// A write against the notes API, issued from the detail panel or editor.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum NoteAction {
    Create(CreateNoteRequest),
    Update {
        id: String,
        request: UpdateNoteRequest,
    },
    Delete(String),
    AutoLink(String),
    Unlink {
        source: String,
        target: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum SelectAfter {
    Keep,
    Clear,
    Note(String),
}

/// Outcome of a finished write, applied on the UI thread.
#[derive(Clone, Debug)]
pub(in crate::app) struct Mutation {
    pub(in crate::app) message: String,
    pub(in crate::app) select: SelectAfter,
}

impl NoteAction {
    fn run(self, client: &NotesClient) -> Result<Mutation> {
        match self {
            Self::Create(request) => {
                let note = client.create_note(&request)?;
                Ok(Mutation {
                    message: format!("Created \"{}\"", note.title()),
                    select: SelectAfter::Note(note.id),
                })
            }
            Self::Update { id, request } => {
                let note = client.update_note(&id, &request)?;
                Ok(Mutation {
                    message: format!("Saved \"{}\"", note.title()),
                    select: SelectAfter::Note(note.id),
                })
            }
            Self::Delete(id) => {
                client.delete_note(&id)?;
                Ok(Mutation {
                    message: "Note deleted".to_owned(),
                    select: SelectAfter::Clear,
                })
            }
            Self::AutoLink(id) => {
                let linked = client.auto_link(&id)?;
                Ok(Mutation {
                    message: format!("Auto-linked {} note(s)", linked.len()),
                    select: SelectAfter::Keep,
                })
            }
            Self::Unlink { source, target } => {
                client.remove_link(&source, &target)?;
                Ok(Mutation {
                    message: "Link removed".to_owned(),
                    select: SelectAfter::Keep,
                })
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
            Self::AutoLink(_) => "auto_link",
            Self::Unlink { .. } => "unlink",
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn submit(&mut self, action: NoteAction) {
        let Some(client) = self.source.client().cloned() else {
            self.status = Some("Snapshot source is read-only".to_owned());
            return;
        };
        if self.mutation.is_some() {
            self.status = Some("Another change is still being saved".to_owned());
            return;
        }

        info!("event=note_action action={}", action.label());
        self.mutation = Some(Pending::spawn(move || action.run(&client)));
    }

    pub(in crate::app) fn apply_mutation(&mut self, result: Result<Mutation, String>) {
        match result {
            Ok(mutation) => {
                self.status = Some(mutation.message);
                match mutation.select {
                    SelectAfter::Keep => {}
                    SelectAfter::Clear => {
                        self.selected = None;
                        self.detail = None;
                    }
                    SelectAfter::Note(id) => self.selected = Some(id),
                }
                self.start_reload();
            }
            Err(message) => self.status = Some(message),
        }
    }
}
