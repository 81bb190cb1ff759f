use glam::Vec3;

use super::primitive::BuildPrimitive;
use crate::{Axis, BoundingBox, EmissionCone};

/// Number of equal-width buckets the centroids get projected into when
/// looking for the best splitting plane.
pub(super) const BUCKETS: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Split {
    pub axis: Axis,
    pub bucket: usize,
    pub cost: f32,
}

/// Finds the (axis, bucket) pair with the cheapest estimated split of the
/// given range, or `None` when the centroids cannot be bucketed along any
/// axis.
///
/// The cost of a candidate split is the sum, over both sides, of
/// `energy * surface_area * cone_measure`, normalized by the parent's own
/// product so that costs stay comparable across axes.
pub(super) fn find_split(
    primitives: &[BuildPrimitive],
    centroid_bounds: &BoundingBox,
    node_bounds: &BoundingBox,
    node_cone: &EmissionCone,
    node_energy: f32,
) -> Option<Split> {
    let mut best: Option<Split> = None;

    let inv_total =
        1.0 / (node_energy * node_bounds.area() * node_cone.measure());

    let inv_total = if inv_total.is_finite() { inv_total } else { 1.0 };

    for axis in Axis::all() {
        if centroid_bounds.extent()[axis] <= 0.0 {
            continue;
        }

        let mut buckets = [Bucket::default(); BUCKETS];

        for primitive in primitives {
            let bucket = &mut buckets
                [bucket_index(primitive.center, centroid_bounds, axis)];

            bucket.count += 1;
            bucket.bounds += primitive.bounds;
            bucket.cone = bucket.cone.union(primitive.cone);
            bucket.energy += primitive.energy;
        }

        // ---

        let mut left = [Side::default(); BUCKETS - 1];
        let mut right = [Side::default(); BUCKETS - 1];

        let mut acc = Accumulator::default();

        for i in 0..(BUCKETS - 1) {
            acc.push(&buckets[i]);
            left[i] = acc.side();
        }

        let mut acc = Accumulator::default();

        for i in (1..BUCKETS).rev() {
            acc.push(&buckets[i]);
            right[i - 1] = acc.side();
        }

        // ---

        for (i, (left, right)) in left.iter().zip(&right).enumerate() {
            if left.count == 0 || right.count == 0 {
                continue;
            }

            let cost = (left.cost() + right.cost()) * inv_total;

            let is_current_bucket_better =
                best.map_or(true, |best| cost < best.cost);

            if is_current_bucket_better {
                best = Some(Split {
                    axis,
                    bucket: i,
                    cost,
                });
            }
        }
    }

    best
}

/// Bucket a centroid falls into along `axis`.
///
/// Shared between the bucketing pass above and the partition pass in the
/// builder, so both always agree on which side a primitive belongs to.
pub(super) fn bucket_index(
    center: Vec3,
    centroid_bounds: &BoundingBox,
    axis: Axis,
) -> usize {
    let offset = (center[axis] - centroid_bounds.min()[axis])
        / centroid_bounds.extent()[axis];

    ((offset * (BUCKETS as f32)) as usize).min(BUCKETS - 1)
}

#[derive(Clone, Copy, Debug, Default)]
struct Bucket {
    count: u32,
    bounds: BoundingBox,
    cone: EmissionCone,
    energy: f32,
}

/// Aggregate of everything at-or-before (or after) a split position.
#[derive(Clone, Copy, Debug, Default)]
struct Side {
    count: u32,
    area: f32,
    measure: f32,
    energy: f32,
}

impl Side {
    fn cost(&self) -> f32 {
        self.energy * self.area * self.measure
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    count: u32,
    bounds: BoundingBox,
    cone: EmissionCone,
    energy: f32,
}

impl Accumulator {
    fn push(&mut self, bucket: &Bucket) {
        self.count += bucket.count;
        self.bounds += bucket.bounds;
        self.cone = self.cone.union(bucket.cone);
        self.energy += bucket.energy;
    }

    fn side(&self) -> Side {
        Side {
            count: self.count,
            area: self.bounds.area(),
            measure: self.cone.measure(),
            energy: self.energy,
        }
    }
}
