use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use log::{debug, warn};

use crate::notes::NoteGraph;
use crate::util::stable_pair;

use super::{GraphModel, Link, Node};

const RING_BASE_RADIUS: f32 = 60.0;
const RING_RADIUS_PER_SQRT_NODE: f32 = 40.0;
const JITTER: f32 = 20.0;

/// Projects the note set into layout space around `center`: nodes in note
/// order on a ring whose radius grows with the node count, nudged by a
/// per-id jitter so reloads keep a familiar shape.
pub(in crate::app) fn build_graph_model(notes: &NoteGraph, center: Vec2) -> GraphModel {
    let count = notes.notes.len();
    let ring_radius = RING_BASE_RADIUS + (count as f32).sqrt() * RING_RADIUS_PER_SQRT_NODE;

    let nodes = notes
        .notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let angle = (index as f32 / count.max(1) as f32) * TAU;
            let (jx, jy) = stable_pair(&note.id);
            let radial = vec2(angle.cos(), angle.sin()) * ring_radius;
            Node {
                id: note.id.clone(),
                title: note.title(),
                tags: note.tags.clone(),
                world_pos: center + radial + vec2(jx, jy) * JITTER,
                velocity: Vec2::ZERO,
            }
        })
        .collect::<Vec<_>>();

    let links = notes
        .links
        .iter()
        .map(|link| Link {
            source: link.source.clone(),
            target: link.target.clone(),
        })
        .collect::<Vec<_>>();

    let graph = GraphModel::new(nodes, links);
    let unresolved = graph
        .links
        .iter()
        .filter(|link| graph.resolve(link).is_none())
        .count();
    if unresolved > 0 {
        warn!("event=links_unresolved count={unresolved}");
    }
    debug!(
        "event=graph_mounted nodes={} links={}",
        graph.nodes.len(),
        graph.links.len()
    );

    graph
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::build_graph_model;
    use crate::notes::{Note, NoteGraph, NoteLink};

    fn note(id: &str, content: &str, tags: &[&str]) -> Note {
        Note {
            id: id.to_owned(),
            content: content.to_owned(),
            summary: None,
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn nodes_follow_note_order_with_titles_and_tags() {
        let notes = NoteGraph::new(
            vec![
                note("1", "# React Architecture", &["React"]),
                note("2", "Knowledge Graphs", &["AI"]),
            ],
            vec![NoteLink::new("1", "2"), NoteLink::new("2", "9")],
        );

        let graph = build_graph_model(&notes, vec2(300.0, 200.0));

        assert_eq!(graph.nodes[0].id, "1");
        assert_eq!(graph.nodes[0].title, "React Architecture");
        assert_eq!(graph.nodes[1].tags, vec!["AI".to_owned()]);
        assert_eq!(graph.links.len(), 2);
        assert_eq!(graph.resolve(&graph.links[1]), None);
    }

    #[test]
    fn initial_positions_are_distinct_and_at_rest() {
        let notes = NoteGraph::new(
            (0..8).map(|index| note(&index.to_string(), "", &[])).collect(),
            Vec::new(),
        );
        let center = vec2(300.0, 200.0);

        let graph = build_graph_model(&notes, center);

        for (index, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.velocity, vec2(0.0, 0.0));
            assert!((node.world_pos - center).length() > 50.0);
            for other in &graph.nodes[index + 1..] {
                assert!((node.world_pos - other.world_pos).length() > 1.0);
            }
        }
    }
}
