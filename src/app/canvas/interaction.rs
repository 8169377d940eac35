use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::CanvasTransform;

impl ViewModel {
    pub(in crate::app) fn handle_chart_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let bounds = self.chart.bounds();
        let world_before =
            CanvasTransform::fit(rect, bounds, self.pan, self.zoom).to_world(pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.2, 8.0);

        // keep the chart point under the cursor fixed
        let zoomed = CanvasTransform::fit(rect, bounds, self.pan, self.zoom);
        self.pan += (zoomed.to_world(pointer) - world_before) * zoomed.scale();
    }

    pub(in crate::app) fn handle_chart_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Topmost bubble under the pointer. Bubbles are drawn in node order, so
    /// the last hit wins.
    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        screen_positions
            .iter()
            .zip(screen_radii)
            .rposition(|(position, radius)| position.distance(pointer) <= *radius)
    }
}
