use eframe::egui::{Pos2, Vec2, vec2};
use log::{debug, info};

use super::GraphModel;

/// Pointer distance from a node center that still grabs the node.
const PICK_RADIUS: f32 = 25.0;
/// Press-to-release travel below which a gesture counts as a click.
const CLICK_THRESHOLD: f32 = 5.0;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 5.0;
const FIT_PADDING: f32 = PICK_RADIUS + 30.0;

/// Pointer input in canvas-local screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum PointerEvent {
    Press(Pos2),
    Move(Pos2),
    Release(Pos2),
    /// The button went up somewhere the pointer position is unknown. Ends any
    /// drag without activating a node.
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Viewport {
    pub(in crate::app) zoom: f32,
    pub(in crate::app) pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub(in crate::app) fn screen_to_graph(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.pan) / self.zoom
    }

    pub(in crate::app) fn graph_to_screen(&self, graph: Vec2) -> Pos2 {
        (graph * self.zoom + self.pan).to_pos2()
    }

    /// Scales the zoom by `factor` while keeping the graph point under
    /// `anchor` in place.
    pub(in crate::app) fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let graph_anchor = self.screen_to_graph(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = anchor.to_vec2() - graph_anchor * self.zoom;
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Frames every node, with room for the circle and the title underneath.
    pub(in crate::app) fn fit_to_view(&mut self, graph: &GraphModel, canvas_size: Vec2) {
        let Some((min, max)) = bounds(graph) else {
            *self = Self::default();
            return;
        };

        let min = min - vec2(FIT_PADDING, FIT_PADDING);
        let max = max + vec2(FIT_PADDING, FIT_PADDING);
        let extent = (max - min).max(vec2(1.0, 1.0));

        self.zoom = (canvas_size.x / extent.x)
            .min(canvas_size.y / extent.y)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        let middle = (min + max) * 0.5;
        self.pan = canvas_size * 0.5 - middle * self.zoom;
    }
}

fn bounds(graph: &GraphModel) -> Option<(Vec2, Vec2)> {
    let mut positions = graph.nodes.iter().map(|node| node.world_pos);
    let first = positions.next()?;
    Some(positions.fold((first, first), |(min, max), position| {
        (min.min(position), max.max(position))
    }))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum DragState {
    #[default]
    Idle,
    Dragging {
        index: usize,
        press: Vec2,
    },
}

impl DragState {
    pub(in crate::app) fn target(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Dragging { index, .. } => Some(*index),
        }
    }
}

/// First node in canonical order whose center lies within the pick radius.
pub(in crate::app) fn pick_node(graph: &GraphModel, point: Vec2) -> Option<usize> {
    graph
        .nodes
        .iter()
        .position(|node| (node.world_pos - point).length() < PICK_RADIUS)
}

/// Applies one pointer event and returns the id of a node activated by a
/// click, if this event completed one.
pub(super) fn handle_pointer(
    graph: &mut GraphModel,
    viewport: &Viewport,
    drag: &mut DragState,
    event: PointerEvent,
) -> Option<String> {
    match (event, *drag) {
        (PointerEvent::Press(screen), DragState::Idle) => {
            let point = viewport.screen_to_graph(screen);
            if let Some(index) = pick_node(graph, point) {
                debug!("event=node_grabbed id={}", graph.nodes[index].id);
                *drag = DragState::Dragging {
                    index,
                    press: point,
                };
            }
            None
        }
        (PointerEvent::Move(screen), DragState::Dragging { index, .. }) => {
            if let Some(node) = graph.nodes.get_mut(index) {
                node.world_pos = viewport.screen_to_graph(screen);
                node.velocity = Vec2::ZERO;
            }
            None
        }
        (PointerEvent::Release(screen), DragState::Dragging { index, press }) => {
            *drag = DragState::Idle;
            let travel = (viewport.screen_to_graph(screen) - press).length();
            if travel >= CLICK_THRESHOLD {
                return None;
            }

            let id = graph.nodes.get(index)?.id.clone();
            info!("event=node_activated id={id}");
            Some(id)
        }
        (PointerEvent::Cancel, DragState::Dragging { index, .. }) => {
            *drag = DragState::Idle;
            debug!("event=drag_cancelled index={index}");
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Pos2, pos2, vec2};

    use super::{DragState, PointerEvent, Viewport, handle_pointer, pick_node};
    use crate::app::graph::test_support::{model, node};

    #[test]
    fn screen_graph_round_trip() {
        let points = [pos2(0.0, 0.0), pos2(123.5, -40.25), pos2(800.0, 600.0)];
        for zoom in [0.5, 1.0, 2.0] {
            for pan in [vec2(0.0, 0.0), vec2(37.0, -12.5), vec2(-250.0, 410.0)] {
                let viewport = Viewport { zoom, pan };
                for point in points {
                    let back = viewport.graph_to_screen(viewport.screen_to_graph(point));
                    assert!((back - point).length() < 1e-3, "{point:?} -> {back:?}");
                }
            }
        }
    }

    #[test]
    fn inverse_transform_matches_formula() {
        let viewport = Viewport {
            zoom: 2.0,
            pan: vec2(10.0, 20.0),
        };
        assert_eq!(viewport.screen_to_graph(pos2(30.0, 60.0)), vec2(10.0, 20.0));
    }

    #[test]
    fn pick_radius_boundary() {
        let graph = model(vec![node("a", 100.0, 100.0)], Vec::new());
        assert_eq!(pick_node(&graph, vec2(124.9, 100.0)), Some(0));
        assert_eq!(pick_node(&graph, vec2(125.1, 100.0)), None);
    }

    #[test]
    fn pick_prefers_first_node_in_order() {
        let graph = model(
            vec![node("a", 100.0, 100.0), node("b", 105.0, 100.0)],
            Vec::new(),
        );
        assert_eq!(pick_node(&graph, vec2(104.0, 100.0)), Some(0));
        assert_eq!(pick_node(&graph, vec2(128.0, 100.0)), Some(1));
    }

    fn gesture(release: Pos2) -> (Vec<String>, DragState) {
        let mut graph = model(vec![node("a", 100.0, 100.0)], Vec::new());
        let viewport = Viewport::default();
        let mut drag = DragState::Idle;
        let mut activated = Vec::new();

        for event in [
            PointerEvent::Press(pos2(100.0, 100.0)),
            PointerEvent::Move(release),
            PointerEvent::Release(release),
        ] {
            activated.extend(handle_pointer(&mut graph, &viewport, &mut drag, event));
        }
        (activated, drag)
    }

    #[test]
    fn short_gesture_is_a_click() {
        let (activated, drag) = gesture(pos2(103.0, 100.0));
        assert_eq!(activated, vec!["a".to_owned()]);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn long_gesture_is_a_drag() {
        let (activated, drag) = gesture(pos2(120.0, 100.0));
        assert!(activated.is_empty());
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn dragging_moves_node_and_zeroes_velocity() {
        let mut graph = model(vec![node("a", 100.0, 100.0)], Vec::new());
        graph.nodes[0].velocity = vec2(3.0, -2.0);
        let viewport = Viewport {
            zoom: 2.0,
            pan: vec2(10.0, 0.0),
        };
        let mut drag = DragState::Idle;

        let press = PointerEvent::Press(pos2(210.0, 200.0));
        handle_pointer(&mut graph, &viewport, &mut drag, press);
        assert_eq!(drag.target(), Some(0));
        let movement = PointerEvent::Move(pos2(410.0, 300.0));
        handle_pointer(&mut graph, &viewport, &mut drag, movement);

        assert_eq!(graph.nodes[0].world_pos, vec2(200.0, 150.0));
        assert_eq!(graph.nodes[0].velocity, vec2(0.0, 0.0));
    }

    #[test]
    fn press_on_empty_space_is_ignored() {
        let mut graph = model(vec![node("a", 100.0, 100.0)], Vec::new());
        let viewport = Viewport::default();
        let mut drag = DragState::Idle;

        let empty_spot = pos2(400.0, 400.0);
        handle_pointer(&mut graph, &viewport, &mut drag, PointerEvent::Press(empty_spot));
        let activated =
            handle_pointer(&mut graph, &viewport, &mut drag, PointerEvent::Release(empty_spot));

        assert_eq!(drag, DragState::Idle);
        assert_eq!(activated, None);
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut viewport = Viewport {
            zoom: 1.0,
            pan: vec2(15.0, -5.0),
        };
        let anchor = pos2(200.0, 120.0);
        let before = viewport.screen_to_graph(anchor);
        viewport.zoom_at(anchor, 1.2);
        let after = viewport.screen_to_graph(anchor);
        assert!((before - after).length() < 1e-3);
        assert!((viewport.zoom - 1.2).abs() < 1e-6);
    }

    #[test]
    fn cancel_ends_drag_without_activation() {
        let mut graph = model(vec![node("a", 100.0, 100.0)], Vec::new());
        let viewport = Viewport::default();
        let mut drag = DragState::Idle;

        let press = PointerEvent::Press(pos2(100.0, 100.0));
        handle_pointer(&mut graph, &viewport, &mut drag, press);
        let activated = handle_pointer(&mut graph, &viewport, &mut drag, PointerEvent::Cancel);
        assert_eq!(activated, None);
        assert_eq!(drag, DragState::Idle);

        let moved = PointerEvent::Move(pos2(300.0, 300.0));
        handle_pointer(&mut graph, &viewport, &mut drag, moved);
        assert_eq!(graph.nodes[0].world_pos, vec2(100.0, 100.0));
    }

    #[test]
    fn zoom_is_clamped_at_both_ends() {
        let anchor = pos2(320.0, 240.0);
        let mut viewport = Viewport {
            zoom: 1.0,
            pan: vec2(-40.0, 25.0),
        };
        let pinned = viewport.screen_to_graph(anchor);

        for _ in 0..30 {
            viewport.zoom_at(anchor, 1.2);
        }
        assert_eq!(viewport.zoom, 5.0);
        assert!((viewport.screen_to_graph(anchor) - pinned).length() < 0.05);

        for _ in 0..40 {
            viewport.zoom_at(anchor, 1.0 / 1.2);
        }
        assert_eq!(viewport.zoom, 0.1);
        assert!((viewport.screen_to_graph(anchor) - pinned).length() < 0.05);
    }

    #[test]
    fn fit_to_view_frames_all_nodes() {
        let graph = model(
            vec![node("a", -500.0, 0.0), node("b", 500.0, 200.0)],
            Vec::new(),
        );
        let canvas = vec2(800.0, 600.0);
        let mut viewport = Viewport::default();
        viewport.fit_to_view(&graph, canvas);

        for node in &graph.nodes {
            let screen = viewport.graph_to_screen(node.world_pos);
            assert!((0.0..=canvas.x).contains(&screen.x));
            assert!((0.0..=canvas.y).contains(&screen.y));
        }
        assert!(viewport.zoom < 1.0);
    }
}
