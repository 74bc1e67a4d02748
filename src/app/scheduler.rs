use std::collections::HashSet;

use log::{info, warn};

use super::graph::{GraphSession, PointerEvent, Surface, render_frame};

const SETTLED_MEAN_SPEED: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum FrameStatus {
    Running,
    Stopped,
}

type NodeClickCallback = Box<dyn FnMut(&str)>;

struct ActiveGraph {
    session: GraphSession,
    on_node_click: NodeClickCallback,
}

/// Handle for a mounted graph view's simulate/draw loop.
///
/// Holding the handle keeps the loop alive; `stop` or dropping it releases
/// the session and the click callback, after which ticks and pointer events
/// are ignored.
pub(in crate::app) struct FrameLoop {
    active: Option<ActiveGraph>,
    frames: u64,
    settled: bool,
}

impl FrameLoop {
    pub(in crate::app) fn start(session: GraphSession, on_node_click: NodeClickCallback) -> Self {
        info!(
            "event=frame_loop_started nodes={} links={}",
            session.graph.nodes.len(),
            session.graph.links.len()
        );
        Self {
            active: Some(ActiveGraph {
                session,
                on_node_click,
            }),
            frames: 0,
            settled: false,
        }
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub(in crate::app) fn frames(&self) -> u64 {
        self.frames
    }

    pub(in crate::app) fn session_mut(&mut self) -> Option<&mut GraphSession> {
        self.active.as_mut().map(|active| &mut active.session)
    }

    /// One kernel step followed by one paint. A missing surface means the
    /// view went away underneath us, so the loop stops instead.
    pub(in crate::app) fn tick(
        &mut self,
        surface: Option<&mut dyn Surface>,
        matches: Option<&HashSet<usize>>,
    ) -> FrameStatus {
        let Some(surface) = surface else {
            if self.is_running() {
                warn!("event=surface_missing frame={}", self.frames);
                self.stop();
            }
            return FrameStatus::Stopped;
        };
        let Some(active) = self.active.as_mut() else {
            return FrameStatus::Stopped;
        };

        active.session.simulate(surface.size());
        render_frame(
            surface,
            &active.session.graph,
            &active.session.viewport,
            matches,
        );
        self.frames += 1;

        let settled = active.session.graph.mean_speed() < SETTLED_MEAN_SPEED;
        if settled && !self.settled {
            info!("event=layout_settled frame={}", self.frames);
        }
        self.settled = settled;

        FrameStatus::Running
    }

    pub(in crate::app) fn dispatch(&mut self, event: PointerEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Some(id) = active.session.handle_pointer(event) {
            (active.on_node_click)(&id);
        }
    }

    pub(in crate::app) fn stop(&mut self) {
        if self.active.take().is_some() {
            info!("event=frame_loop_stopped frames={}", self.frames);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
