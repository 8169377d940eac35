use bubble_chart::chart::BubbleNode;
use bubble_chart::util::format_thousands;
use eframe::egui::{self, RichText, Sense, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{CATEGORY_COLORS, category_color, category_stroke};

pub(in crate::app) fn detail_lines(node: &BubbleNode) -> [(&'static str, String); 4] {
    [
        ("Name", node.name.clone()),
        ("Value", format_thousands(node.value)),
        ("Group", node.group.clone()),
        ("Category", node.category.clone()),
    ]
}

pub(in crate::app) fn tooltip_text(node: &BubbleNode) -> String {
    detail_lines(node)
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&self, ui: &mut Ui) {
        ui.heading("Bubble Details");
        ui.add_space(6.0);

        match self
            .hovered
            .as_deref()
            .and_then(|id| self.chart.node(id))
        {
            Some(node) => {
                for (label, value) in detail_lines(node) {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("{label}:")).strong());
                        ui.label(value);
                    });
                }
                ui.small(format!("id {}", node.id));
            }
            None => {
                ui.label("Hover a bubble to see its details.");
            }
        }

        ui.separator();
        ui.label(RichText::new("Categories").strong());
        for (category, _) in CATEGORY_COLORS {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
                ui.painter()
                    .circle_filled(rect.center(), 6.0, category_color(category));
                ui.painter().circle_stroke(
                    rect.center(),
                    6.0,
                    egui::Stroke::new(1.0, category_stroke(category)),
                );
                ui.label(category);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Vec2;

    use super::*;

    fn node(value: f64) -> BubbleNode {
        BubbleNode {
            id: "19153".to_owned(),
            name: "Polk".to_owned(),
            value,
            category: "high".to_owned(),
            group: "14.0-21.0".to_owned(),
            radius: 40.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    #[test]
    fn tooltip_lists_the_record_fields() {
        insta::assert_snapshot!(tooltip_text(&node(1234567.0)), @r"
        Name: Polk
        Value: 1,234,567
        Group: 14.0-21.0
        Category: high
        ");
    }

    #[test]
    fn tooltip_keeps_fractional_values() {
        assert!(tooltip_text(&node(2500.75)).contains("Value: 2,500.75"));
    }
}
