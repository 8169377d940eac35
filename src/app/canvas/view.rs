use bubble_chart::util::truncate_label;
use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{
    CanvasTransform, category_color, category_stroke, circle_visible, draw_background,
};
use super::super::ui::tooltip_text;

const INLINE_NAME_MIN_RADIUS: f32 = 28.0;

impl ViewModel {
    fn update_screen_space(&mut self, transform: CanvasTransform) {
        let nodes = self.chart.nodes();
        let scratch = &mut self.view_scratch;

        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        scratch
            .screen_positions
            .reserve(nodes.len().saturating_sub(scratch.screen_positions.capacity()));
        scratch
            .screen_radii
            .reserve(nodes.len().saturating_sub(scratch.screen_radii.capacity()));
        for node in nodes {
            scratch
                .screen_positions
                .push(transform.to_screen(node.position));
            scratch
                .screen_radii
                .push((node.radius * transform.scale()).max(0.5));
        }
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_chart_zoom(ui, rect, &response);
        self.handle_chart_pan(&response);

        if self.chart.is_running() {
            self.chart.tick();
        }
        if self.chart.is_running() || response.dragged() {
            ui.ctx().request_repaint();
        }

        let bounds = self.chart.bounds();
        let transform = CanvasTransform::fit(rect, bounds, self.pan, self.zoom);
        draw_background(&painter, rect, transform.canvas_rect(bounds));

        self.update_screen_space(transform);
        let hovered = Self::hovered_index(
            ui,
            rect,
            &self.view_scratch.screen_positions,
            &self.view_scratch.screen_radii,
        );
        self.hovered = hovered
            .and_then(|index| self.chart.nodes().get(index))
            .map(|node| node.id.clone());

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let label_size = (16.0 * self.zoom.sqrt()).clamp(11.0, 26.0);
        for label in self.chart.group_labels() {
            painter.text(
                transform.to_screen(label.position()),
                Align2::CENTER_CENTER,
                &label.name,
                FontId::proportional(label_size),
                Color32::from_gray(225),
            );
        }

        // largest first, so smaller bubbles stay on top
        for (index, node) in self.chart.nodes().iter().enumerate() {
            let position = self.view_scratch.screen_positions[index];
            let radius = self.view_scratch.screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_hovered = hovered == Some(index);
            let stroke = if is_hovered {
                Stroke::new(2.5, Color32::BLACK)
            } else {
                Stroke::new(2.0, category_stroke(&node.category))
            };

            painter.circle_filled(position, radius, category_color(&node.category));
            painter.circle_stroke(position, radius, stroke);

            if radius >= INLINE_NAME_MIN_RADIUS {
                let max_chars = (radius / 4.5) as usize;
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    truncate_label(&node.name, max_chars),
                    FontId::proportional(12.0),
                    Color32::from_gray(30),
                );
            }
        }

        if let Some(index) = hovered
            && let Some(node) = self.chart.nodes().get(index)
        {
            let pointer = ui
                .input(|input| input.pointer.hover_pos())
                .unwrap_or(self.view_scratch.screen_positions[index]);
            let galley = painter.layout_no_wrap(
                tooltip_text(node),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
            let mut anchor = pointer + vec2(14.0, 14.0);
            if anchor.x + galley.size().x > rect.right() {
                anchor.x = pointer.x - 14.0 - galley.size().x;
            }
            if anchor.y + galley.size().y > rect.bottom() {
                anchor.y = pointer.y - 14.0 - galley.size().y;
            }

            let frame = Rect::from_min_size(anchor, galley.size()).expand(6.0);
            painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(10, 12, 16, 230));
            painter.galley(anchor, galley, Color32::from_gray(240));

            if response.clicked_by(egui::PointerButton::Primary) {
                tracing::info!(id = %node.id, name = %node.name, "bubble clicked");
            }
        }
    }
}
