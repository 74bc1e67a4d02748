use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::util::truncate_chars;

const TITLE_MAX_CHARS: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Note {
    /// First non-empty content line without heading markers, falling back to
    /// the summary.
    pub fn title(&self) -> String {
        let heading = self
            .content
            .lines()
            .map(|line| line.trim().trim_start_matches('#').trim())
            .find(|line| !line.is_empty());

        let summary = self
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|summary| !summary.is_empty());

        match heading.or(summary) {
            Some(text) => truncate_chars(text, TITLE_MAX_CHARS),
            None => "Untitled note".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateNoteRequest {
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateNoteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLink {
    pub source: String,
    pub target: String,
}

impl NoteLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    fn undirected_key(&self) -> (&str, &str) {
        if self.source <= self.target {
            (&self.source, &self.target)
        } else {
            (&self.target, &self.source)
        }
    }
}

/// Notes in canonical order plus the links between them.
///
/// Links may still name notes that are not part of `notes`; consumers skip
/// those when they resolve endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NoteGraph {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub links: Vec<NoteLink>,
}

impl NoteGraph {
    pub fn new(notes: Vec<Note>, links: Vec<NoteLink>) -> Self {
        let mut seen_ids = HashSet::with_capacity(notes.len());
        let mut unique_notes = Vec::with_capacity(notes.len());
        for note in notes {
            if seen_ids.insert(note.id.clone()) {
                unique_notes.push(note);
            } else {
                warn!("event=duplicate_note_dropped id={}", note.id);
            }
        }

        let mut seen_links = HashSet::with_capacity(links.len());
        let mut unique_links = Vec::with_capacity(links.len());
        for link in links {
            if link.source == link.target {
                continue;
            }
            let (low, high) = link.undirected_key();
            if seen_links.insert((low.to_owned(), high.to_owned())) {
                unique_links.push(link);
            }
        }

        Self {
            notes: unique_notes,
            links: unique_links,
        }
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn linked_ids<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.links.iter().filter_map(move |link| {
            if link.source == id {
                Some(link.target.as_str())
            } else if link.target == id {
                Some(link.source.as_str())
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteGraph, NoteLink, UpdateNoteRequest};

    fn note(id: &str, content: &str) -> Note {
        Note {
            id: id.to_owned(),
            content: content.to_owned(),
            summary: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn note_deserializes_camel_case_with_missing_optionals() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "content": "# Heading\nbody",
            "tags": ["rust"],
            "createdAt": "2024-05-01T10:00:00"
        }))
        .expect("note should deserialize");

        assert_eq!(note.created_at.as_deref(), Some("2024-05-01T10:00:00"));
        assert_eq!(note.updated_at, None);
        assert_eq!(note.summary, None);
        assert_eq!(note.tags, vec!["rust".to_owned()]);
    }

    #[test]
    fn title_uses_first_content_line_without_heading_markers() {
        assert_eq!(note("a", "\n\n## Graph layouts\nmore").title(), "Graph layouts");
    }

    #[test]
    fn title_falls_back_to_summary_then_placeholder() {
        let mut with_summary = note("a", "   ");
        with_summary.summary = Some("Summary text".to_owned());
        assert_eq!(with_summary.title(), "Summary text");
        assert_eq!(note("b", "").title(), "Untitled note");
    }

    #[test]
    fn title_is_truncated() {
        let title = note("a", &"x".repeat(80)).title();
        assert!(title.ends_with('…'));
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let request = UpdateNoteRequest {
            tags: Some(vec!["a".to_owned()]),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(value, serde_json::json!({ "tags": ["a"] }));
    }

    #[test]
    fn graph_drops_duplicate_notes_and_links() {
        let graph = NoteGraph::new(
            vec![note("a", "first"), note("b", "b"), note("a", "second")],
            vec![
                NoteLink::new("a", "b"),
                NoteLink::new("b", "a"),
                NoteLink::new("a", "a"),
                NoteLink::new("a", "b"),
                NoteLink::new("a", "missing"),
            ],
        );

        assert_eq!(graph.notes.len(), 2);
        assert_eq!(graph.note("a").map(|note| note.content.as_str()), Some("first"));
        assert_eq!(
            graph.links,
            vec![NoteLink::new("a", "b"), NoteLink::new("a", "missing")]
        );
    }

    #[test]
    fn linked_ids_follow_both_directions() {
        let graph = NoteGraph::new(
            vec![note("a", ""), note("b", ""), note("c", "")],
            vec![NoteLink::new("a", "b"), NoteLink::new("c", "a")],
        );
        let linked = graph.linked_ids("a").collect::<Vec<_>>();
        assert_eq!(linked, vec!["b", "c"]);
    }
}
