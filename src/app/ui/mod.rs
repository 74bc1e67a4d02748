mod actions;
mod details;
mod editor;
mod panels;
mod sidebar;

pub(in crate::app) use actions::Mutation;
pub(in crate::app) use details::NoteDetail;
pub(in crate::app) use editor::NoteEditor;
pub(in crate::app) use sidebar::RemoteSearch;
