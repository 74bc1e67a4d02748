use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use super::client::NotesClient;
use super::model::{Note, NoteGraph, NoteLink};

/// Where the note set comes from.
#[derive(Clone, Debug)]
pub enum NoteSource {
    Api(NotesClient),
    Snapshot(PathBuf),
}

impl NoteSource {
    pub fn load(&self) -> Result<NoteGraph> {
        match self {
            Self::Api(client) => collect_note_graph(client),
            Self::Snapshot(path) => load_snapshot(path),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Api(client) => client.base_url().to_owned(),
            Self::Snapshot(path) => format!("snapshot {}", path.display()),
        }
    }

    /// The API client, or `None` for read-only sources.
    pub fn client(&self) -> Option<&NotesClient> {
        match self {
            Self::Api(client) => Some(client),
            Self::Snapshot(_) => None,
        }
    }
}

pub fn collect_note_graph(client: &NotesClient) -> Result<NoteGraph> {
    let notes = client
        .list_notes()
        .with_context(|| format!("failed to list notes from {}", client.base_url()))?;

    let mut links = Vec::new();
    for note in &notes {
        match client.linked_notes(&note.id) {
            Ok(linked) => links.extend(links_from(note, &linked)),
            Err(error) => warn!("event=links_fetch_failed id={} error={error:#}", note.id),
        }
    }

    let graph = NoteGraph::new(notes, links);
    info!(
        "event=graph_loaded source=api notes={} links={}",
        graph.notes.len(),
        graph.links.len()
    );
    Ok(graph)
}

pub fn load_snapshot(path: &Path) -> Result<NoteGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let graph = parse_snapshot(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    info!(
        "event=graph_loaded source=snapshot notes={} links={}",
        graph.notes.len(),
        graph.links.len()
    );
    Ok(graph)
}

fn parse_snapshot(raw: &str) -> Result<NoteGraph> {
    let parsed: NoteGraph = serde_json::from_str(raw).context("invalid snapshot JSON")?;
    Ok(NoteGraph::new(parsed.notes, parsed.links))
}

fn links_from<'a>(note: &'a Note, linked: &'a [Note]) -> impl Iterator<Item = NoteLink> + 'a {
    linked
        .iter()
        .map(move |target| NoteLink::new(note.id.as_str(), target.id.as_str()))
}
