mod forces;

use eframe::egui::Vec2;

use super::graph::GraphModel;
use forces::{centering_force, repulsion_between, spring_correction};

/// Force-layout constants. Exposed on the command line so a layout can be
/// tuned without a rebuild.
#[derive(Clone, Copy, Debug, PartialEq, clap::Args)]
pub struct PhysicsConfig {
    /// Pull towards the canvas center per unit of displacement.
    #[arg(long, default_value_t = 0.001)]
    pub center_strength: f32,
    /// Numerator of the inverse-square node repulsion.
    #[arg(long, default_value_t = 100.0)]
    pub repulsion_strength: f32,
    /// Nodes farther apart than this do not repel.
    #[arg(long, default_value_t = 150.0)]
    pub repulsion_radius: f32,
    /// Velocity multiplier applied every frame.
    #[arg(long, default_value_t = 0.9)]
    pub damping: f32,
    /// Distance at which a link spring is relaxed.
    #[arg(long, default_value_t = 100.0)]
    pub rest_length: f32,
    /// Spring correction per unit of deviation from the rest length.
    #[arg(long, default_value_t = 0.1)]
    pub spring_strength: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            center_strength: 0.001,
            repulsion_strength: 100.0,
            repulsion_radius: 150.0,
            damping: 0.9,
            rest_length: 100.0,
            spring_strength: 0.1,
        }
    }
}

/// Advances the layout by one frame.
///
/// Nodes are visited in canonical order and update in place, so a node sees
/// the positions already integrated for earlier nodes in the same frame. The
/// drag target keeps accumulating velocity but its position is left to the
/// pointer. Link springs are applied last and take effect on the next frame.
pub(in crate::app) fn step_physics(
    graph: &mut GraphModel,
    center: Vec2,
    drag_target: Option<usize>,
    config: &PhysicsConfig,
) {
    let node_count = graph.nodes.len();

    for index in 0..node_count {
        let position = graph.nodes[index].world_pos;
        let mut velocity = graph.nodes[index].velocity;

        velocity += centering_force(position, center, config);

        for (other_index, other) in graph.nodes.iter().enumerate() {
            if other_index != index {
                velocity += repulsion_between(position, other.world_pos, config);
            }
        }

        velocity *= config.damping;

        let node = &mut graph.nodes[index];
        node.velocity = velocity;
        if drag_target != Some(index) {
            node.world_pos += velocity;
        }
    }

    for link_index in 0..graph.links.len() {
        let Some((source, target)) = graph.resolve(&graph.links[link_index]) else {
            continue;
        };
        if source == target {
            continue;
        }

        let Some(correction) = spring_correction(
            graph.nodes[source].world_pos,
            graph.nodes[target].world_pos,
            config,
        ) else {
            continue;
        };

        graph.nodes[source].velocity += correction;
        graph.nodes[target].velocity -= correction;
    }
}
