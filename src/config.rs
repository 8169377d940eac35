use std::path::Path;

use anyhow::{Context, Result, bail};
use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Everything that shapes a chart: canvas geometry, sizing, forces, cooling
/// and the split-mode anchors.
///
/// Every section has defaults, so a config file only needs the fields it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    /// `[min, max]` bubble radius in canvas units.
    pub radius_range: [f32; 2],
    /// Fraction of the remaining distance to the target covered per tick at
    /// `alpha == 1`.
    pub damper: f32,
    /// Extra attraction multiplier used while split into groups.
    pub split_pull: f32,
    pub forces: ForceConfig,
    pub alpha: AlphaSchedule,
    /// Split-mode anchors. When empty they are derived from the groups found
    /// in the data.
    pub groups: Vec<GroupAnchor>,
    /// Height of the group labels above the canvas top edge.
    pub label_y: f32,
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Charge of a node is `radius^2 / charge_divisor`.
    pub charge_divisor: f32,
    /// Pull toward the canvas center, scaled by alpha.
    pub gravity: f32,
    /// Velocity multiplier applied every tick.
    pub friction: f32,
    /// Barnes-Hut opening angle.
    pub theta: f32,
    pub max_speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaSchedule {
    pub start: f32,
    pub decay: f32,
    pub min: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupAnchor {
    pub name: String,
    pub center: [f32; 2],
    pub label: [f32; 2],
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 540.0,
            radius_range: [2.0, 85.0],
            damper: 0.102,
            split_pull: 1.1,
            forces: ForceConfig::default(),
            alpha: AlphaSchedule::default(),
            groups: Vec::new(),
            label_y: 40.0,
            seed: None,
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_divisor: 8.0,
            gravity: 0.01,
            friction: 0.9,
            theta: 0.72,
            max_speed: 40.0,
        }
    }
}

impl Default for AlphaSchedule {
    fn default() -> Self {
        Self {
            start: 1.0,
            decay: 0.99,
            min: 0.005,
        }
    }
}

impl GroupAnchor {
    pub fn new(name: impl Into<String>, center: [f32; 2], label: [f32; 2]) -> Self {
        Self {
            name: name.into(),
            center,
            label,
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.center[0], self.center[1])
    }

    pub fn label_position(&self) -> Vec2 {
        vec2(self.label[0], self.label[1])
    }
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid chart config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            bail!(
                "canvas must have a positive size, got {}x{}",
                self.width,
                self.height
            );
        }

        let [min_radius, max_radius] = self.radius_range;
        if !(min_radius >= 0.0 && max_radius >= min_radius) {
            bail!("radius range must satisfy 0 <= min <= max, got {min_radius}..{max_radius}");
        }

        if !(0.0..=1.0).contains(&self.forces.friction) {
            bail!("friction must be within 0..=1, got {}", self.forces.friction);
        }

        if !(self.alpha.decay > 0.0 && self.alpha.decay < 1.0) {
            bail!("alpha decay must be within 0..1, got {}", self.alpha.decay);
        }

        if self.forces.charge_divisor <= 0.0 {
            bail!(
                "charge divisor must be positive, got {}",
                self.forces.charge_divisor
            );
        }

        Ok(())
    }

    pub fn bounds(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{"width": 400, "forces": {"gravity": 0.0}}"#).unwrap();

        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, 540.0);
        assert_eq!(config.forces.gravity, 0.0);
        assert_eq!(config.forces.friction, 0.9);
        assert_eq!(config.alpha, AlphaSchedule::default());
        assert!(config.groups.is_empty());
    }

    #[test]
    fn anchors_parse_from_json() {
        let config: ChartConfig = serde_json::from_str(
            r#"{"groups": [{"name": "A", "center": [100, 100], "label": [100, 40]}]}"#,
        )
        .unwrap();

        assert_eq!(config.groups[0].center(), vec2(100.0, 100.0));
        assert_eq!(config.groups[0].label_position(), vec2(100.0, 40.0));
    }

    #[test]
    fn center_is_half_the_canvas() {
        assert_eq!(ChartConfig::default().center(), vec2(450.0, 270.0));
    }

    #[test]
    fn validation_rejects_inverted_radius_range() {
        let config = ChartConfig {
            radius_range: [10.0, 2.0],
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ChartConfig::default().validate().is_ok());
    }

    #[test]
    fn load_reports_the_path() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("chart.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = ChartConfig::load(&path).unwrap_err();
        assert!(format!("{error:#}").contains("chart.json"));
    }
}
