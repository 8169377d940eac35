use std::path::Path;

use bubble_chart::chart::{BubbleChart, LayoutMode};
use eframe::egui::{self, Align, Context, Layout, Vec2};

use super::super::{ViewModel, ViewScratch};

impl ViewModel {
    pub(in crate::app) fn new(chart: BubbleChart, data_path: &Path) -> Self {
        let data_label = data_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| data_path.display().to_string());

        Self {
            chart,
            data_label,
            hovered: None,
            reload_error: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            view_scratch: ViewScratch::default(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("bubble-chart");
                    ui.separator();

                    let mode = self.chart.mode();
                    if ui
                        .selectable_label(mode == LayoutMode::Grouped, "All")
                        .clicked()
                    {
                        self.chart.set_mode("all");
                    }
                    if ui
                        .selectable_label(mode == LayoutMode::SplitByGroup, "Split by group")
                        .clicked()
                    {
                        self.chart.set_mode("split");
                    }

                    ui.separator();
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.pan = Vec2::ZERO;
                        self.zoom = 1.0;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_chart(ui));
    }

    pub(in crate::app) fn status_text(&self) -> String {
        let activity = if self.chart.is_running() {
            format!("alpha {:.3}", self.chart.alpha())
        } else {
            "settled".to_owned()
        };
        let mut text = format!(
            "{}  |  bubbles: {}  |  run #{}  |  {}",
            self.data_label,
            self.chart.nodes().len(),
            self.chart.generation(),
            activity
        );
        if let Some(error) = &self.reload_error {
            text.push_str("  |  reload failed: ");
            text.push_str(error);
        }
        text
    }
}
