use partition::partition;

use super::build_node::BuildNode;
use super::primitive::BuildPrimitive;
use super::{splitter, BuildOptions, BuildStats};
use crate::{BoundingBox, EmissionCone, Emitter};

/// Builds the temporary tree by recursive bisection, reordering
/// `primitives` in place and appending each leaf's emitters to `ordered`.
pub(super) fn run(
    primitives: &mut [BuildPrimitive],
    options: &BuildOptions,
    ordered: &mut Vec<Emitter>,
    stats: &mut BuildStats,
) -> BuildNode {
    build_range(primitives, options, ordered, stats, 1)
}

fn build_range(
    primitives: &mut [BuildPrimitive],
    options: &BuildOptions,
    ordered: &mut Vec<Emitter>,
    stats: &mut BuildStats,
    depth: usize,
) -> BuildNode {
    stats.total_nodes += 1;
    stats.max_depth = stats.max_depth.max(depth);

    let summary = Summary::over(primitives);

    if primitives.len() <= options.max_emitters_per_leaf {
        return leaf(primitives, summary, ordered, stats);
    }

    let centroid_bounds: BoundingBox =
        primitives.iter().map(|primitive| primitive.center).collect();

    // No axis can separate the centroids, so the leaf threshold has to give
    let Some(split) = splitter::find_split(
        primitives,
        &centroid_bounds,
        &summary.bounds,
        &summary.cone,
        summary.energy,
    ) else {
        return leaf(primitives, summary, ordered, stats);
    };

    let (left, right) = partition(primitives, |primitive| {
        splitter::bucket_index(primitive.center, &centroid_bounds, split.axis)
            <= split.bucket
    });

    if left.is_empty() || right.is_empty() {
        let whole = if left.is_empty() { right } else { left };

        return leaf(whole, summary, ordered, stats);
    }

    let left = build_range(left, options, ordered, stats, depth + 1);
    let right = build_range(right, options, ordered, stats, depth + 1);

    // Interior summaries derive from the children, so a parent is
    // guaranteed to contain whatever its subtrees report
    BuildNode::Internal {
        bounds: left.bounds() + right.bounds(),
        cone: left.cone().union(right.cone()),
        energy: left.energy() + right.energy(),
        energy_variance: summary.energy_variance,
        emitter_count: summary.count,
        split_axis: split.axis,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn leaf(
    primitives: &[BuildPrimitive],
    summary: Summary,
    ordered: &mut Vec<Emitter>,
    stats: &mut BuildStats,
) -> BuildNode {
    stats.leaf_count += 1;

    let first_emitter = ordered.len() as u32;

    ordered.extend(primitives.iter().map(|primitive| primitive.emitter));

    BuildNode::Leaf {
        bounds: summary.bounds,
        cone: summary.cone,
        energy: summary.energy,
        energy_variance: summary.energy_variance,
        first_emitter,
        emitter_count: summary.count,
    }
}

/// Aggregate summary of a range of primitives.
struct Summary {
    bounds: BoundingBox,
    cone: EmissionCone,
    energy: f32,
    energy_variance: f32,
    count: u32,
}

impl Summary {
    fn over(primitives: &[BuildPrimitive]) -> Self {
        let mut bounds = BoundingBox::default();
        let mut cone = EmissionCone::empty();
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;

        for primitive in primitives {
            bounds += primitive.bounds;
            cone = cone.union(primitive.cone);
            sum += primitive.energy as f64;
            sum_sq += (primitive.energy as f64) * (primitive.energy as f64);
        }

        let n = primitives.len() as f64;
        let mean = sum / n;

        // Population variance, E[x^2] - E[x]^2; the difference can dip
        // below zero in floating point
        let variance = (sum_sq / n - mean * mean).max(0.0);

        Self {
            bounds,
            cone,
            energy: sum as f32,
            energy_variance: variance as f32,
            count: primitives.len() as u32,
        }
    }
}
