use eframe::egui::{Vec2, vec2};
use rand::Rng;
use serde::Serialize;

use crate::records::Record;

use super::scale::ValueScale;

/// One bubble: the record it was built from plus its simulation state.
#[derive(Clone, Debug, PartialEq)]
pub struct BubbleNode {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub category: String,
    pub group: String,
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Serializable view of a node at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub category: String,
    pub group: String,
    pub radius: f32,
    pub x: f32,
    pub y: f32,
}

impl BubbleNode {
    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            value: self.value,
            category: self.category.clone(),
            group: self.group.clone(),
            radius: self.radius,
            x: self.position.x,
            y: self.position.y,
        }
    }
}

/// Builds one node per record, scattered uniformly over `bounds`, and orders
/// them largest value first so smaller bubbles are drawn on top.
pub fn create_nodes<R: Rng>(
    records: &[Record],
    scale: &ValueScale,
    bounds: Vec2,
    rng: &mut R,
) -> Vec<BubbleNode> {
    let mut nodes = records
        .iter()
        .map(|record| BubbleNode {
            id: record.id.clone(),
            name: record.name.clone(),
            value: record.value,
            category: record.category.clone(),
            group: record.group.clone(),
            radius: scale.radius(record.value),
            position: vec2(
                random_coordinate(rng, bounds.x),
                random_coordinate(rng, bounds.y),
            ),
            velocity: Vec2::ZERO,
        })
        .collect::<Vec<_>>();

    nodes.sort_by(|a, b| b.value.total_cmp(&a.value));
    nodes
}

fn random_coordinate<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn records() -> Vec<Record> {
        [("a", 5.0), ("b", 90.0), ("c", 40.0), ("d", 90.0), ("e", 0.0)]
            .into_iter()
            .map(|(id, value)| {
                Record::new(id, value)
                    .with_category("medium")
                    .with_group("g")
            })
            .collect()
    }

    fn build(records: &[Record], seed: u64) -> Vec<BubbleNode> {
        let scale = ValueScale::fit(records.iter().map(|record| record.value), [2.0, 85.0]);
        let mut rng = StdRng::seed_from_u64(seed);
        create_nodes(records, &scale, vec2(900.0, 540.0), &mut rng)
    }

    #[test]
    fn one_node_per_record_sorted_descending() {
        let records = records();
        let nodes = build(&records, 7);

        assert_eq!(nodes.len(), records.len());
        for pair in nodes.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        // ties keep input order
        assert_eq!(nodes[0].id, "b");
        assert_eq!(nodes[1].id, "d");
    }

    #[test]
    fn ids_stay_distinct_and_fields_are_copied() {
        let records = records();
        let nodes = build(&records, 1);

        let ids = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), nodes.len());

        let c = nodes.iter().find(|node| node.id == "c").unwrap();
        assert_eq!(c.category, "medium");
        assert_eq!(c.group, "g");
        assert_eq!(c.value, 40.0);
        assert_eq!(c.velocity, Vec2::ZERO);
    }

    #[test]
    fn positions_start_inside_the_canvas() {
        for node in build(&records(), 99) {
            assert!((0.0..900.0).contains(&node.x()));
            assert!((0.0..540.0).contains(&node.y()));
            assert!(node.radius >= 2.0);
        }
    }

    #[test]
    fn radius_follows_value() {
        let nodes = build(&records(), 3);
        assert_eq!(nodes[0].radius, 85.0);
        assert_eq!(nodes.last().unwrap().radius, 2.0);
    }

    #[test]
    fn same_seed_same_layout() {
        let records = records();
        assert_eq!(build(&records, 11), build(&records, 11));
    }

    #[test]
    fn input_is_left_untouched() {
        let records = records();
        let before = records.clone();
        let _ = build(&records, 5);
        assert_eq!(records, before);
    }
}
