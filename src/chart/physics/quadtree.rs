use eframe::egui::{Rect, Vec2, pos2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

/// Square region of the plane covered by one tree node.
#[derive(Clone, Copy, Debug)]
pub(super) struct Cell(Rect);

impl Cell {
    /// Smallest square around `points`, padded by one unit on every side.
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Rect::from_min_max(first.to_pos2(), first.to_pos2());
        for point in rest {
            rect.extend_with(point.to_pos2());
        }
        if !rect.is_finite() {
            return None;
        }

        let side = rect.width().max(rect.height()).max(1.0) + 2.0;
        Some(Self(Rect::from_center_size(rect.center(), Vec2::splat(side))))
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        self.0.contains(point.to_pos2())
    }

    pub(super) fn side(self) -> f32 {
        self.0.width()
    }

    /// Bit 0 set for the right half, bit 1 for the lower half.
    fn quadrant(self, point: Vec2) -> usize {
        let center = self.0.center();
        usize::from(point.x >= center.x) | (usize::from(point.y >= center.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let center = self.0.center();
        let min = pos2(
            if quadrant & 1 == 0 { self.0.min.x } else { center.x },
            if quadrant & 2 == 0 { self.0.min.y } else { center.y },
        );
        Self(Rect::from_min_size(min, self.0.size() * 0.5))
    }
}

/// Barnes-Hut node. `charge` sums every point below it and
/// `center_of_charge` is their charge-weighted centroid. Only leaves keep
/// point indices.
pub(super) struct QuadNode {
    pub(super) cell: Cell,
    pub(super) center_of_charge: Vec2,
    pub(super) charge: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

fn summarize(
    indices: &[usize],
    positions: &[Vec2],
    charges: &[f32],
    fallback: Vec2,
) -> (Vec2, f32) {
    let charge = indices.iter().map(|&index| charges[index]).sum::<f32>();
    if charge > 0.0 {
        let weighted = indices
            .iter()
            .fold(Vec2::ZERO, |sum, &index| sum + positions[index] * charges[index]);
        return (weighted / charge, charge);
    }

    if indices.is_empty() {
        return (fallback, 0.0);
    }
    let plain = indices
        .iter()
        .fold(Vec2::ZERO, |sum, &index| sum + positions[index]);
    (plain / indices.len() as f32, 0.0)
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], charges: &[f32]) -> Option<Self> {
        let cell = Cell::enclosing(positions)?;
        Some(Self::subdivide(
            cell,
            (0..positions.len()).collect(),
            positions,
            charges,
            0,
        ))
    }

    fn subdivide(
        cell: Cell,
        indices: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        depth: usize,
    ) -> Self {
        let (center_of_charge, charge) =
            summarize(&indices, positions, charges, cell.0.center().to_vec2());
        let mut node = Self {
            cell,
            center_of_charge,
            charge,
            indices,
            children: Default::default(),
        };
        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &node.indices {
            buckets[cell.quadrant(positions[index])].push(index);
        }
        // everything in one quadrant: splitting would only add depth
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                node.children[quadrant] = Some(Box::new(Self::subdivide(
                    cell.child(quadrant),
                    bucket,
                    positions,
                    charges,
                    depth + 1,
                )));
            }
        }
        node.indices = Vec::new();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}
