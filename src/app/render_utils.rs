use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};

pub(super) const CATEGORY_COLORS: [(&str, Color32); 3] = [
    ("low", Color32::from_rgb(0xA8, 0xBD, 0x63)),
    ("medium", Color32::from_rgb(0xFF, 0xD2, 0x6A)),
    ("high", Color32::from_rgb(0xD8, 0x4B, 0x2A)),
];

const UNKNOWN_CATEGORY_COLOR: Color32 = Color32::from_rgb(0x9A, 0xA5, 0xB1);
const CANVAS_MARGIN: f32 = 12.0;

pub(super) fn category_color(category: &str) -> Color32 {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category.trim()))
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_CATEGORY_COLOR)
}

/// Same hue, 30% darker; used for bubble outlines.
pub(super) fn darker(color: Color32) -> Color32 {
    const FACTOR: f32 = 0.7;
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * FACTOR) as u8,
        (color.g() as f32 * FACTOR) as u8,
        (color.b() as f32 * FACTOR) as u8,
        color.a(),
    )
}

pub(super) fn category_stroke(category: &str) -> Color32 {
    darker(category_color(category))
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, canvas: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
    painter.rect_filled(canvas, 4.0, Color32::from_rgb(27, 32, 40));
    painter.rect_stroke(
        canvas,
        4.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 120)),
        eframe::egui::StrokeKind::Inside,
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Maps chart coordinates into the panel: the whole chart is fitted into the
/// available rect, then user pan and zoom are applied around its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct CanvasTransform {
    origin: Pos2,
    scale: f32,
}

impl CanvasTransform {
    pub(super) fn fit(rect: Rect, bounds: Vec2, pan: Vec2, zoom: f32) -> Self {
        let usable = (rect.size() - Vec2::splat(CANVAS_MARGIN * 2.0)).max(Vec2::splat(1.0));
        let fit = if bounds.x > 0.0 && bounds.y > 0.0 {
            (usable.x / bounds.x).min(usable.y / bounds.y)
        } else {
            1.0
        };
        let scale = fit * zoom;
        let origin = rect.center() + pan - bounds * 0.5 * scale;
        Self { origin, scale }
    }

    pub(super) fn scale(self) -> f32 {
        self.scale
    }

    pub(super) fn to_screen(self, world: Vec2) -> Pos2 {
        self.origin + world * self.scale
    }

    pub(super) fn to_world(self, screen: Pos2) -> Vec2 {
        (screen - self.origin) / self.scale
    }

    pub(super) fn canvas_rect(self, bounds: Vec2) -> Rect {
        Rect::from_min_max(self.origin, self.to_screen(bounds))
    }
}
