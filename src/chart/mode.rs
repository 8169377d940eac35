use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use eframe::egui::{Vec2, vec2};
use serde::Serialize;

use crate::config::{ChartConfig, GroupAnchor};

/// Horizontal inset of the outermost derived group labels.
const LABEL_INSET: f32 = 160.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Every node is pulled toward the canvas center.
    #[default]
    Grouped,
    /// Each node is pulled toward the anchor of its group.
    SplitByGroup,
}

impl LayoutMode {
    /// `"split"` (or the older `"year"`) splits; any other name groups.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("split") || name.eq_ignore_ascii_case("year") {
            Self::SplitByGroup
        } else {
            Self::Grouped
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Grouped => "all",
            Self::SplitByGroup => "split",
        }
    }

    pub fn shows_labels(self) -> bool {
        matches!(self, Self::SplitByGroup)
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupLabel {
    pub name: String,
    pub x: f32,
    pub y: f32,
}

impl GroupLabel {
    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

/// Resolved target points for both modes.
#[derive(Clone, Debug)]
pub struct GroupLayout {
    center: Vec2,
    anchors: HashMap<String, Vec2>,
    labels: Vec<GroupLabel>,
}

impl GroupLayout {
    /// Uses the configured anchors when there are any, otherwise lays the
    /// distinct `groups` out left to right, numbered groups in numeric order.
    pub fn new<'a>(config: &ChartConfig, groups: impl IntoIterator<Item = &'a str>) -> Self {
        let mut groups = groups.into_iter().collect::<Vec<_>>();
        groups.sort_by(|a, b| compare_groups(a, b));
        groups.dedup();
        let anchors = if config.groups.is_empty() {
            derive_anchors(&groups, config)
        } else {
            for group in &groups {
                if !config.groups.iter().any(|anchor| anchor.name == *group) {
                    tracing::warn!(
                        group = *group,
                        "group has no anchor, its nodes will stay centered"
                    );
                }
            }
            config.groups.clone()
        };

        let labels = anchors
            .iter()
            .map(|anchor| {
                let label = anchor.label_position();
                GroupLabel {
                    name: anchor.name.clone(),
                    x: label.x,
                    y: label.y,
                }
            })
            .collect();

        Self {
            center: config.center(),
            anchors: anchors
                .iter()
                .map(|anchor| (anchor.name.clone(), anchor.center()))
                .collect(),
            labels,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Anchor of `group`, or the center when the group is unknown.
    pub fn anchor(&self, group: &str) -> Vec2 {
        self.anchors.get(group).copied().unwrap_or(self.center)
    }

    pub fn target(&self, mode: LayoutMode, group: &str) -> Vec2 {
        match mode {
            LayoutMode::Grouped => self.center,
            LayoutMode::SplitByGroup => self.anchor(group),
        }
    }

    pub fn labels(&self) -> &[GroupLabel] {
        &self.labels
    }
}

/// Leading number of a group name: `"7.0-13.9"` -> `7.0`, `"2009"` -> `2009`.
fn leading_number(name: &str) -> Option<f64> {
    let end = name
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(name.len());
    name[..end].parse().ok()
}

/// Groups starting with a number sort numerically (so `"7.0-13.9"` comes
/// before `"14.0-21.0"`) and ahead of the rest, which sort as plain text.
fn compare_groups(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn derive_anchors(groups: &[&str], config: &ChartConfig) -> Vec<GroupAnchor> {
    let width = config.width;
    let count = groups.len();

    groups
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let (center_x, label_x) = if count <= 1 {
                (width / 2.0, width / 2.0)
            } else {
                let fraction = index as f32 / (count - 1) as f32;
                (
                    width / 3.0 + fraction * width / 3.0,
                    LABEL_INSET + fraction * (width - 2.0 * LABEL_INSET),
                )
            };
            GroupAnchor::new(
                *name,
                [center_x, config.height / 2.0],
                [label_x, config.label_y],
            )
        })
        .collect()
}
