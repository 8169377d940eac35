//! The bubble layout engine.
//!
//! [`BubbleChart`] owns everything a running chart needs: the group layout,
//! the node set, the active [`LayoutMode`] and the cooling schedule. Callers
//! drive it one [`BubbleChart::tick`] at a time and read the nodes back.

mod mode;
mod node;
mod physics;
mod scale;
mod simulation;

use eframe::egui::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::ChartConfig;
use crate::records::{Record, RecordError, validate_records};

pub use mode::{GroupLabel, GroupLayout, LayoutMode};
pub use node::{BubbleNode, NodeSnapshot, create_nodes};
pub use scale::ValueScale;
pub use simulation::Simulation;

use physics::{PhysicsScratch, StepParams};

pub struct BubbleChart {
    config: ChartConfig,
    layout: GroupLayout,
    nodes: Vec<BubbleNode>,
    mode: LayoutMode,
    simulation: Simulation,
    scratch: PhysicsScratch,
    rng: StdRng,
}

/// Serializable state of the whole chart after some number of ticks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSnapshot {
    pub mode: LayoutMode,
    pub alpha: f32,
    pub generation: u64,
    pub ticks: usize,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeSnapshot>,
    pub labels: Vec<GroupLabel>,
}

impl BubbleChart {
    pub fn new(config: ChartConfig, records: &[Record]) -> Result<Self, RecordError> {
        validate_records(records)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (scale, layout, nodes) = build_nodes(&config, records, &mut rng);
        let simulation = Simulation::new(config.alpha);

        tracing::info!(
            nodes = nodes.len(),
            max_value = scale.domain_max(),
            "chart ready"
        );

        Ok(Self {
            config,
            layout,
            nodes,
            mode: LayoutMode::Grouped,
            simulation,
            scratch: PhysicsScratch::default(),
            rng,
        })
    }

    /// Replaces the node set. The chart goes back to the grouped layout and
    /// the previous run is abandoned.
    pub fn load(&mut self, records: &[Record]) -> Result<(), RecordError> {
        validate_records(records)?;

        let (scale, layout, nodes) = build_nodes(&self.config, records, &mut self.rng);
        self.layout = layout;
        self.nodes = nodes;
        self.mode = LayoutMode::Grouped;
        self.simulation.restart();

        tracing::info!(
            nodes = self.nodes.len(),
            max_value = scale.domain_max(),
            generation = self.simulation.generation(),
            "chart reloaded"
        );
        Ok(())
    }

    /// Switches by control name (`"all"`, `"split"`, ...).
    pub fn set_mode(&mut self, name: &str) {
        self.switch_mode(LayoutMode::from_name(name));
    }

    /// Switches the target points and reheats the layout, even when `mode`
    /// is already active.
    pub fn switch_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
        self.simulation.restart();
        tracing::info!(
            %mode,
            generation = self.simulation.generation(),
            "layout mode switched"
        );
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Runs one step. Returns `false` once the layout has settled; further
    /// calls leave the nodes alone.
    pub fn tick(&mut self) -> bool {
        let Some(alpha) = self.simulation.current() else {
            return false;
        };

        let params = StepParams {
            alpha,
            center: self.layout.center(),
            pull: self.pull(),
        };
        let layout = &self.layout;
        let mode = self.mode;
        physics::step(
            &mut self.nodes,
            params,
            &self.config.forces,
            |node| layout.target(mode, &node.group),
            &mut self.scratch,
        );

        self.simulation.advance()
    }

    /// Ticks until settled or `max_ticks` steps have run, returning the number
    /// of steps taken.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.simulation.is_running() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    pub fn nodes(&self) -> &[BubbleNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&BubbleNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Labels to draw; empty unless split by group.
    pub fn group_labels(&self) -> &[GroupLabel] {
        if self.mode.shows_labels() {
            self.layout.labels()
        } else {
            &[]
        }
    }

    /// Where `node` is being pulled in the current mode.
    pub fn target_of(&self, node: &BubbleNode) -> Vec2 {
        self.layout.target(self.mode, &node.group)
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    pub fn generation(&self) -> u64 {
        self.simulation.generation()
    }

    pub fn center(&self) -> Vec2 {
        self.layout.center()
    }

    pub fn bounds(&self) -> Vec2 {
        self.config.bounds()
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            mode: self.mode,
            alpha: self.simulation.alpha(),
            generation: self.simulation.generation(),
            ticks: self.simulation.ticks(),
            width: self.config.width,
            height: self.config.height,
            nodes: self.nodes.iter().map(BubbleNode::snapshot).collect(),
            labels: self.group_labels().to_vec(),
        }
    }

    fn pull(&self) -> f32 {
        match self.mode {
            LayoutMode::Grouped => self.config.damper,
            LayoutMode::SplitByGroup => self.config.damper * self.config.split_pull,
        }
    }
}

fn build_nodes(
    config: &ChartConfig,
    records: &[Record],
    rng: &mut StdRng,
) -> (ValueScale, GroupLayout, Vec<BubbleNode>) {
    let scale = ValueScale::fit(records.iter().map(|record| record.value), config.radius_range);
    let layout = GroupLayout::new(config, records.iter().map(|record| record.group.as_str()));
    let nodes = create_nodes(records, &scale, config.bounds(), rng);
    (scale, layout, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChartConfig {
        ChartConfig {
            seed: Some(42),
            ..ChartConfig::default()
        }
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("a", 300.0).with_category("high").with_group("x"),
            Record::new("b", 20.0).with_category("low").with_group("y"),
            Record::new("c", 120.0).with_category("medium").with_group("x"),
        ]
    }

    #[test]
    fn starts_grouped_and_hot() {
        let chart = BubbleChart::new(config(), &records()).unwrap();

        assert_eq!(chart.mode(), LayoutMode::Grouped);
        assert!(chart.is_running());
        assert_eq!(chart.alpha(), 1.0);
        assert_eq!(chart.nodes().len(), 3);
        assert_eq!(chart.nodes()[0].id, "a");
        assert!(chart.group_labels().is_empty());
    }

    #[test]
    fn duplicate_ids_fail_the_load() {
        let mut records = records();
        records.push(Record::new("a", 1.0).with_group("x"));
        assert!(matches!(
            BubbleChart::new(config(), &records),
            Err(RecordError::DuplicateId { .. })
        ));
    }

    #[test]
    fn every_mode_switch_restarts_the_run() {
        let mut chart = BubbleChart::new(config(), &records()).unwrap();
        chart.run(30);
        assert!(chart.alpha() < 1.0);

        chart.set_mode("split");
        assert_eq!(chart.mode(), LayoutMode::SplitByGroup);
        assert_eq!(chart.alpha(), 1.0);
        assert_eq!(chart.generation(), 1);
        assert_eq!(chart.group_labels().len(), 2);

        chart.run(10);
        chart.set_mode("split");
        assert_eq!(chart.alpha(), 1.0);
        assert_eq!(chart.generation(), 2);

        chart.set_mode("nonsense");
        assert_eq!(chart.mode(), LayoutMode::Grouped);
        assert!(chart.group_labels().is_empty());
    }

    #[test]
    fn settled_chart_stops_moving() {
        let mut chart = BubbleChart::new(config(), &records()).unwrap();
        let ticks = chart.run(usize::MAX);
        assert_eq!(ticks, 528);
        assert!(!chart.is_running());

        let before = chart.nodes().to_vec();
        assert!(!chart.tick());
        assert_eq!(chart.run(100), 0);
        assert_eq!(chart.nodes(), before.as_slice());
    }

    #[test]
    fn load_replaces_nodes_and_resets_mode() {
        let mut chart = BubbleChart::new(config(), &records()).unwrap();
        chart.set_mode("split");
        chart.run(600);

        chart
            .load(&[Record::new("z", 5.0).with_category("low").with_group("q")])
            .unwrap();
        assert_eq!(chart.mode(), LayoutMode::Grouped);
        assert!(chart.is_running());
        assert_eq!(chart.nodes().len(), 1);
        assert!(chart.node("a").is_none());
        assert_eq!(chart.node("z").unwrap().radius, 85.0);
    }

    #[test]
    fn failed_load_keeps_the_current_chart() {
        let mut chart = BubbleChart::new(config(), &records()).unwrap();
        let error = chart.load(&[Record::new("n", f64::NAN)]).unwrap_err();
        assert!(matches!(error, RecordError::MalformedValue { .. }));
        assert_eq!(chart.nodes().len(), 3);
    }

    #[test]
    fn empty_chart_still_cools() {
        let mut chart = BubbleChart::new(config(), &[]).unwrap();
        assert!(chart.nodes().is_empty());
        assert_eq!(chart.run(usize::MAX), 528);
        assert!(chart.snapshot().nodes.is_empty());
    }

    #[test]
    fn split_targets_follow_groups() {
        let mut chart = BubbleChart::new(config(), &records()).unwrap();
        let a = chart.node("a").unwrap().clone();
        assert_eq!(chart.target_of(&a), chart.center());

        chart.switch_mode(LayoutMode::SplitByGroup);
        let b = chart.node("b").unwrap().clone();
        assert!(chart.target_of(&a).x < chart.target_of(&b).x);
    }

    #[test]
    fn snapshot_serializes() {
        let mut chart = BubbleChart::new(config(), &records()).unwrap();
        chart.set_mode("split");
        chart.run(5);

        let value = serde_json::to_value(chart.snapshot()).unwrap();
        assert_eq!(value["mode"], "split_by_group");
        assert_eq!(value["ticks"], 5);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["labels"].as_array().unwrap().len(), 2);
        assert!(value["nodes"][0]["x"].is_number());
    }
}
