use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const MIN_DISTANCE_SQ: f32 = 1.0;

/// Unit direction pushing `from` away from `to` when they coincide. The pair
/// shares one axis, so `(a, b)` and `(b, a)` point opposite ways.
fn separation_direction(from: usize, to: usize) -> Vec2 {
    let (low, high) = (from.min(to), from.max(to));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if from <= to { direction } else { -direction }
}

/// Velocity kick on a point at `point` from `charge` sitting at `source`.
/// Falls off with distance; coincident points are split along a fixed
/// per-pair direction.
fn repulsion_between(
    point: Vec2,
    source: Vec2,
    charge: f32,
    alpha: f32,
    fallback: impl FnOnce() -> Vec2,
) -> Vec2 {
    let delta = point - source;
    let distance_sq = delta.length_sq();
    if distance_sq <= 0.000_001 {
        return fallback() * (alpha * charge);
    }

    delta * (alpha * charge / distance_sq.max(MIN_DISTANCE_SQ))
}

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    pub(super) alpha: f32,
    pub(super) theta: f32,
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: RepulsionParams,
    kick: &mut Vec2,
) {
    if node.charge <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *kick += repulsion_between(
                point,
                positions[other_index],
                charges[other_index],
                params.alpha,
                || separation_direction(index, other_index),
            );
        }
        return;
    }

    let delta = point - node.center_of_charge;
    let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    let can_approximate =
        !node.cell.contains(point) && (node.cell.side() / distance_sq.sqrt()) < params.theta;

    if can_approximate {
        *kick += delta * (params.alpha * node.charge / distance_sq);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, charges, params, kick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kicks(positions: &[Vec2], charges: &[f32], theta: f32) -> Vec<Vec2> {
        let tree = QuadNode::build(positions, charges).unwrap();
        (0..positions.len())
            .map(|index| {
                let mut kick = Vec2::ZERO;
                accumulate_repulsion_for_node(
                    &tree,
                    index,
                    positions,
                    charges,
                    RepulsionParams { alpha: 1.0, theta },
                    &mut kick,
                );
                kick
            })
            .collect()
    }

    #[test]
    fn pair_pushes_apart_along_the_axis() {
        let result = kicks(&[vec2(0.0, 0.0), vec2(10.0, 0.0)], &[50.0, 50.0], 0.72);

        assert!(result[0].x < 0.0);
        assert!(result[1].x > 0.0);
        assert!((result[0].x + 5.0).abs() < 1e-5);
        assert_eq!(result[0].y, 0.0);
    }

    #[test]
    fn larger_charge_pushes_harder() {
        let result = kicks(
            &[vec2(0.0, 0.0), vec2(20.0, 0.0), vec2(40.0, 0.0)],
            &[900.0, 1.0, 10.0],
            0.72,
        );
        // the big charge on the left dominates what its neighbours feel
        assert!(result[1].x > 0.0);
        assert!(result[2].x > 0.0);
        assert!(result[1].x > result[0].x.abs());
        assert!(result[2].x > result[0].x.abs());
    }

    #[test]
    fn coincident_points_still_separate() {
        let result = kicks(&[vec2(3.0, 3.0), vec2(3.0, 3.0)], &[8.0, 8.0], 0.72);
        assert!(result[0].length() > 0.0);
        assert!(result[1].length() > 0.0);
        // equal and opposite, so the pair does not drift as a whole
        assert!((result[0] + result[1]).length() < 1e-5);
    }

    #[test]
    fn separation_is_antisymmetric() {
        for (a, b) in [(0, 1), (2, 7), (5, 3), (11, 40)] {
            let forward = separation_direction(a, b);
            let backward = separation_direction(b, a);
            assert!((forward.length() - 1.0).abs() < 1e-5);
            assert!((forward + backward).length() < 1e-5);
        }
    }

    #[test]
    fn approximation_tracks_the_exact_sum() {
        let positions = (0..120)
            .map(|index| {
                let angle = index as f32 * 0.37;
                vec2(angle.cos() * (40.0 + index as f32), angle.sin() * (40.0 + index as f32))
            })
            .collect::<Vec<_>>();
        let charges = (0..120).map(|index| 1.0 + (index % 7) as f32).collect::<Vec<_>>();

        let exact = kicks(&positions, &charges, 0.0);
        let approximate = kicks(&positions, &charges, 0.72);

        let error = exact
            .iter()
            .zip(&approximate)
            .map(|(a, b)| (*a - *b).length())
            .sum::<f32>();
        let total = exact.iter().map(|kick| kick.length()).sum::<f32>();
        assert!(error / total < 0.1, "relative error {}", error / total);
    }
}
