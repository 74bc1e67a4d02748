use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::util::short_id;

use super::{GraphModel, Viewport};

const NODE_RADIUS: f32 = 25.0;
const TITLE_OFFSET: f32 = 45.0;
const LINK_WIDTH: f32 = 2.0;
const BORDER_WIDTH: f32 = 2.0;
const ID_FONT_SIZE: f32 = 12.0;
const TITLE_FONT_SIZE: f32 = 14.0;

const BACKGROUND: Color32 = Color32::from_rgb(249, 250, 251);
const LINK_COLOR: Color32 = Color32::from_rgb(229, 231, 235);
const NODE_FILL: Color32 = Color32::from_rgb(59, 130, 246);
const NODE_BORDER: Color32 = Color32::from_rgb(29, 78, 216);
const MATCH_BORDER: Color32 = Color32::from_rgb(245, 158, 11);
const ID_COLOR: Color32 = Color32::WHITE;
const TITLE_COLOR: Color32 = Color32::from_rgb(55, 65, 81);

/// Immediate-mode drawing target in canvas-local screen coordinates.
pub(in crate::app) trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, border: Stroke);
    fn label(&mut self, at: Pos2, text: &str, size: f32, color: Color32);
}

/// Paints one complete frame: links, then node circles with their short id,
/// then titles. Links with an unknown endpoint are not drawn.
///
/// With `matches`, nodes outside the set are dimmed and matching nodes get an
/// accent border.
pub(in crate::app) fn render_frame(
    surface: &mut dyn Surface,
    graph: &GraphModel,
    viewport: &Viewport,
    matches: Option<&HashSet<usize>>,
) {
    surface.clear();

    let zoom = viewport.zoom;
    let link_stroke = Stroke::new(LINK_WIDTH * zoom, LINK_COLOR);
    for link in &graph.links {
        let Some((source, target)) = graph.resolve(link) else {
            continue;
        };
        surface.line(
            viewport.graph_to_screen(graph.nodes[source].world_pos),
            viewport.graph_to_screen(graph.nodes[target].world_pos),
            link_stroke,
        );
    }

    for (index, node) in graph.nodes.iter().enumerate() {
        let is_match = matches.map(|set| set.contains(&index));
        let (fill, border) = match is_match {
            Some(true) => (NODE_FILL, MATCH_BORDER),
            Some(false) => (dim(NODE_FILL), dim(NODE_BORDER)),
            None => (NODE_FILL, NODE_BORDER),
        };

        let center = viewport.graph_to_screen(node.world_pos);
        surface.circle(
            center,
            NODE_RADIUS * zoom,
            fill,
            Stroke::new(BORDER_WIDTH * zoom, border),
        );
        surface.label(center, short_id(&node.id), ID_FONT_SIZE * zoom, ID_COLOR);

        let title_color = if is_match == Some(false) {
            dim(TITLE_COLOR)
        } else {
            TITLE_COLOR
        };
        surface.label(
            center + vec2(0.0, TITLE_OFFSET * zoom),
            &node.title,
            TITLE_FONT_SIZE * zoom,
            title_color,
        );
    }
}

fn dim(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 70)
}

/// Surface backed by an egui painter clipped to the canvas rect.
pub(in crate::app) struct EguiSurface {
    painter: Painter,
    rect: Rect,
}

impl EguiSurface {
    pub(in crate::app) fn new(painter: Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, local: Pos2) -> Pos2 {
        self.rect.min + local.to_vec2()
    }
}

impl Surface for EguiSurface {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 0.0, BACKGROUND);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], stroke);
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, border: Stroke) {
        self.painter
            .circle(self.to_screen(center), radius, fill, border);
    }

    fn label(&mut self, at: Pos2, text: &str, size: f32, color: Color32) {
        if size < 4.0 {
            return;
        }
        self.painter.text(
            self.to_screen(at),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(size),
            color,
        );
    }
}

#[cfg(test)]
pub(in crate::app) mod recording {
    use eframe::egui::{Color32, Pos2, Stroke, Vec2, vec2};

    use super::Surface;

    #[derive(Clone, Debug, PartialEq)]
    pub(in crate::app) enum DrawCommand {
        Clear,
        Line(Pos2, Pos2),
        Circle(Pos2, f32, Color32),
        Label(Pos2, String),
    }

    pub(in crate::app) struct RecordingSurface {
        pub(in crate::app) commands: Vec<DrawCommand>,
    }

    impl RecordingSurface {
        pub(in crate::app) fn new() -> Self {
            Self {
                commands: Vec::new(),
            }
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Vec2 {
            vec2(600.0, 400.0)
        }

        fn clear(&mut self) {
            self.commands.push(DrawCommand::Clear);
        }

        fn line(&mut self, from: Pos2, to: Pos2, _stroke: Stroke) {
            self.commands.push(DrawCommand::Line(from, to));
        }

        fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, _border: Stroke) {
            self.commands.push(DrawCommand::Circle(center, radius, fill));
        }

        fn label(&mut self, at: Pos2, text: &str, _size: f32, _color: Color32) {
            self.commands.push(DrawCommand::Label(at, text.to_owned()));
        }
    }
}
