use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Response, Sense, Ui, Vec2, vec2};

use super::super::ViewModel;
use super::super::scheduler::{FrameLoop, FrameStatus};
use super::super::search::matching_nodes;
use super::{
    EguiSurface, GraphSession, PointerEvent, Surface, Viewport, build_graph_model, pick_node,
};

const BUTTON_ZOOM_STEP: f32 = 1.2;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let mut zoom_step = None;
        let mut fit = false;

        ui.horizontal(|ui| {
            ui.heading("Knowledge graph");
            ui.separator();
            if ui.button("Zoom in").clicked() {
                zoom_step = Some(BUTTON_ZOOM_STEP);
            }
            if ui.button("Zoom out").clicked() {
                zoom_step = Some(1.0 / BUTTON_ZOOM_STEP);
            }
            if ui.button("Fit").clicked() {
                fit = true;
            }
            ui.label("Drag nodes to move them, right-drag to pan, scroll to zoom.");
        });

        if self.notes.notes.is_empty() {
            self.deactivate_graph();
            ui.add_space(12.0);
            ui.label("No notes to draw yet.");
            return;
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if self.frame_loop.is_none() {
            self.mount_graph(ui.ctx(), rect.size());
        }
        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return;
        };

        if let Some(session) = frame_loop.session_mut() {
            if let Some(factor) = zoom_step {
                session
                    .viewport
                    .zoom_at((rect.size() * 0.5).to_pos2(), factor);
            }
            if fit {
                session.viewport.fit_to_view(&session.graph, rect.size());
            }
            handle_wheel_zoom(ui, rect, &response, &mut session.viewport);
            if response.dragged_by(egui::PointerButton::Secondary)
                || response.dragged_by(egui::PointerButton::Middle)
            {
                session.viewport.pan_by(response.drag_delta());
            }
        }

        for event in pointer_events(ui, rect, &response) {
            frame_loop.dispatch(event);
        }

        let matches = frame_loop.session_mut().and_then(|session| {
            matching_nodes(
                &mut self.search_match_cache,
                &session.graph,
                self.graph_revision,
                &self.search,
            )
        });

        let painter = ui.painter_at(rect);
        let mut surface = EguiSurface::new(painter.clone(), rect);
        let status = frame_loop.tick(Some(&mut surface as &mut dyn Surface), matches.as_deref());
        if status == FrameStatus::Running {
            ui.ctx().request_repaint();
        }

        let hovered = frame_loop.session_mut().and_then(|session| {
            let pointer = response.hover_pos()?;
            let point = session.viewport.screen_to_graph(local(rect, pointer));
            pick_node(&session.graph, point).map(|index| &session.graph.nodes[index])
        });
        if let Some(node) = hovered {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);

            let mut text = node.title.clone();
            if !node.tags.is_empty() {
                let tags = node
                    .tags
                    .iter()
                    .map(|tag| format!("#{tag}"))
                    .collect::<Vec<_>>();
                text.push('\n');
                text.push_str(&tags.join(" "));
            }
            painter.text(
                rect.min + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(225),
            );
        }
    }

    fn mount_graph(&mut self, ctx: &egui::Context, canvas_size: Vec2) {
        let graph = build_graph_model(&self.notes, canvas_size * 0.5);
        let session = GraphSession::new(graph, self.physics);
        let clicks = self.node_click_tx.clone();
        let ctx = ctx.clone();

        self.frame_loop = Some(FrameLoop::start(
            session,
            Box::new(move |id: &str| {
                if clicks.send(id.to_owned()).is_ok() {
                    ctx.request_repaint();
                }
            }),
        ));
    }
}

fn local(rect: Rect, screen: Pos2) -> Pos2 {
    (screen - rect.min).to_pos2()
}

fn handle_wheel_zoom(ui: &Ui, rect: Rect, response: &Response, viewport: &mut Viewport) {
    if !response.hovered() {
        return;
    }

    let scroll = ui.input(|input| input.raw_scroll_delta.y);
    if scroll.abs() <= f32::EPSILON {
        return;
    }

    let pointer = response.hover_pos().unwrap_or_else(|| rect.center());
    let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
    viewport.zoom_at(local(rect, pointer), zoom_factor);
}

/// Primary-button gestures on the canvas as canvas-local pointer events.
fn pointer_events(ui: &Ui, rect: Rect, response: &Response) -> Vec<PointerEvent> {
    let (position, pressed, moving, released) = ui.input(|input| {
        (
            input.pointer.interact_pos(),
            input.pointer.primary_pressed(),
            input.pointer.is_moving(),
            input.pointer.primary_released(),
        )
    });
    let gesture = PointerGesture {
        pressed: pressed && response.hovered(),
        moving,
        released,
    };
    gesture.events(position.map(|position| local(rect, position)))
}

#[derive(Clone, Copy, Debug, Default)]
struct PointerGesture {
    pressed: bool,
    moving: bool,
    released: bool,
}

impl PointerGesture {
    /// A release without a known position still has to end the drag.
    fn events(self, position: Option<Pos2>) -> Vec<PointerEvent> {
        let Some(position) = position else {
            return if self.released {
                vec![PointerEvent::Cancel]
            } else {
                Vec::new()
            };
        };

        let mut events = Vec::new();
        if self.pressed {
            events.push(PointerEvent::Press(position));
        }
        if self.moving {
            events.push(PointerEvent::Move(position));
        }
        if self.released {
            events.push(PointerEvent::Release(position));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::PointerGesture;
    use crate::app::graph::PointerEvent;

    #[test]
    fn press_move_release_keep_frame_order() {
        let gesture = PointerGesture {
            pressed: true,
            moving: true,
            released: true,
        };
        let at = pos2(12.0, 8.0);
        assert_eq!(
            gesture.events(Some(at)),
            vec![
                PointerEvent::Press(at),
                PointerEvent::Move(at),
                PointerEvent::Release(at),
            ]
        );
    }

    #[test]
    fn release_without_position_cancels_drag() {
        let released = PointerGesture {
            released: true,
            ..PointerGesture::default()
        };
        assert_eq!(released.events(None), vec![PointerEvent::Cancel]);

        let moving = PointerGesture {
            moving: true,
            ..PointerGesture::default()
        };
        assert!(moving.events(None).is_empty());
    }
}
