use std::collections::HashMap;

use eframe::egui::Vec2;

use super::physics::{PhysicsConfig, step_physics};

mod build;
mod interaction;
mod render;
mod view;

pub(in crate::app) use build::build_graph_model;
pub(in crate::app) use interaction::{DragState, PointerEvent, Viewport, pick_node};
#[cfg(test)]
pub(in crate::app) use render::recording;
pub(in crate::app) use render::{EguiSurface, Surface, render_frame};

/// One note projected into layout space.
#[derive(Clone, Debug)]
pub(in crate::app) struct Node {
    pub(in crate::app) id: String,
    pub(in crate::app) title: String,
    pub(in crate::app) tags: Vec<String>,
    pub(in crate::app) world_pos: Vec2,
    pub(in crate::app) velocity: Vec2,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct Link {
    pub(in crate::app) source: String,
    pub(in crate::app) target: String,
}

pub(in crate::app) struct GraphModel {
    pub(in crate::app) nodes: Vec<Node>,
    pub(in crate::app) links: Vec<Link>,
    index_by_id: HashMap<String, usize>,
}

impl GraphModel {
    /// Indexes `nodes` by id. Later duplicates of an id are not reachable
    /// through the index; callers are expected to pass unique ids.
    pub(in crate::app) fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.entry(node.id.clone()).or_insert(index);
        }

        Self {
            nodes,
            links,
            index_by_id,
        }
    }

    pub(in crate::app) fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Endpoint indices of `link`, or `None` when either end is unknown.
    pub(in crate::app) fn resolve(&self, link: &Link) -> Option<(usize, usize)> {
        Some((self.index_of(&link.source)?, self.index_of(&link.target)?))
    }

    pub(in crate::app) fn mean_speed(&self) -> f32 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.nodes.iter().map(|node| node.velocity.length()).sum::<f32>() / self.nodes.len() as f32
    }
}

/// View-local simulation context: everything one mounted graph view mutates.
pub(in crate::app) struct GraphSession {
    pub(in crate::app) graph: GraphModel,
    pub(in crate::app) viewport: Viewport,
    pub(in crate::app) drag: DragState,
    pub(in crate::app) physics: PhysicsConfig,
}

impl GraphSession {
    pub(in crate::app) fn new(graph: GraphModel, physics: PhysicsConfig) -> Self {
        Self {
            graph,
            viewport: Viewport::default(),
            drag: DragState::Idle,
            physics,
        }
    }

    /// Runs one kernel step pulling towards the middle of a canvas of
    /// `canvas_size`.
    pub(in crate::app) fn simulate(&mut self, canvas_size: Vec2) {
        step_physics(&mut self.graph, canvas_size * 0.5, self.drag.target(), &self.physics);
    }

    /// Feeds one pointer event to the interaction controller and returns the
    /// id of a node activated by a click.
    pub(in crate::app) fn handle_pointer(&mut self, event: PointerEvent) -> Option<String> {
        interaction::handle_pointer(&mut self.graph, &self.viewport, &mut self.drag, event)
    }
}

#[cfg(test)]
pub(in crate::app) mod test_support {
    use eframe::egui::{Vec2, vec2};

    use super::{GraphModel, Link, Node};

    pub(in crate::app) fn node(id: &str, x: f32, y: f32) -> Node {
        Node {
            id: id.to_owned(),
            title: format!("Note {id}"),
            tags: Vec::new(),
            world_pos: vec2(x, y),
            velocity: Vec2::ZERO,
        }
    }

    pub(in crate::app) fn link(source: &str, target: &str) -> Link {
        Link {
            source: source.to_owned(),
            target: target.to_owned(),
        }
    }

    pub(in crate::app) fn model(nodes: Vec<Node>, links: Vec<Link>) -> GraphModel {
        GraphModel::new(nodes, links)
    }
}
