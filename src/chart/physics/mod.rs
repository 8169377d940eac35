//! One simulation tick: charge repulsion, gravity, friction and the damped
//! pull toward each node's target point.

mod forces;
mod quadtree;

use eframe::egui::Vec2;

use crate::config::ForceConfig;

use super::node::BubbleNode;
use forces::{RepulsionParams, accumulate_repulsion_for_node};
use quadtree::QuadNode;

/// Per-tick inputs that change with time or mode.
#[derive(Clone, Copy, Debug)]
pub struct StepParams {
    pub alpha: f32,
    /// Gravity well, independent of the target points.
    pub center: Vec2,
    /// `damper * mode multiplier`.
    pub pull: f32,
}

/// Buffers reused between ticks.
#[derive(Default)]
pub struct PhysicsScratch {
    kicks: Vec<Vec2>,
    positions: Vec<Vec2>,
    charges: Vec<f32>,
}

pub fn node_charge(radius: f32, forces: &ForceConfig) -> f32 {
    radius * radius / forces.charge_divisor
}

/// Advances every node by one tick.
///
/// Forces read the positions as they were when the tick started, so the
/// result does not depend on node order. With `alpha <= 0` nothing changes.
pub fn step<F>(
    nodes: &mut [BubbleNode],
    params: StepParams,
    forces: &ForceConfig,
    target_for: F,
    scratch: &mut PhysicsScratch,
) where
    F: Fn(&BubbleNode) -> Vec2,
{
    let node_count = nodes.len();
    if node_count == 0 || params.alpha <= 0.0 {
        return;
    }

    scratch.kicks.clear();
    scratch.kicks.resize(node_count, Vec2::ZERO);
    scratch.positions.clear();
    scratch.charges.clear();
    scratch
        .positions
        .reserve(node_count.saturating_sub(scratch.positions.capacity()));
    scratch
        .charges
        .reserve(node_count.saturating_sub(scratch.charges.capacity()));
    for node in nodes.iter() {
        scratch.positions.push(node.position);
        scratch.charges.push(node_charge(node.radius, forces));
    }

    let kicks = &mut scratch.kicks;
    let positions = &scratch.positions;
    let charges = &scratch.charges;

    if node_count > 1
        && let Some(quadtree) = QuadNode::build(positions, charges)
    {
        let repulsion = RepulsionParams {
            alpha: params.alpha,
            theta: forces.theta,
        };
        for (index, kick) in kicks.iter_mut().enumerate() {
            accumulate_repulsion_for_node(&quadtree, index, positions, charges, repulsion, kick);
        }
    }

    let gravity = forces.gravity * params.alpha;
    let pull = params.pull * params.alpha;
    let max_speed = forces.max_speed.max(0.0);
    let max_speed_sq = max_speed * max_speed;

    for (index, node) in nodes.iter_mut().enumerate() {
        let start = positions[index];

        let mut velocity =
            (node.velocity + kicks[index] + (params.center - start) * gravity) * forces.friction;
        let speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= max_speed / speed_sq.sqrt();
        }

        let mut next = start + velocity;
        let target = target_for(&*node);
        next += (target - next) * pull;

        node.velocity = next - start;
        node.position = next;
    }
}
