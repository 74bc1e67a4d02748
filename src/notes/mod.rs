mod client;
mod collect;
mod model;
#[cfg(test)]
mod test_server;

pub use client::NotesClient;
pub use collect::NoteSource;
pub use model::{CreateNoteRequest, Note, NoteGraph, NoteLink, UpdateNoteRequest};
