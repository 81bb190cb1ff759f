mod build_node;
mod builder;
mod node;
mod primitive;
mod serializer;
mod splitter;

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};

pub use self::node::*;
use self::primitive::BuildPrimitive;
use crate::{BoundingBox, EmissionCone, Emitter, LightScene};

/// Importance index over a scene's emitters.
///
/// Built once per scene (re)build and immutable afterwards; a sampler walks
/// [`Self::nodes()`] top-down and resolves leaf entries through
/// [`Self::emitters()`]. There is no incremental update - when the scene's
/// emitters change, the tree is rebuilt wholesale.
#[derive(Debug)]
pub struct LightTree {
    emitters: Vec<Emitter>,
    nodes: Vec<CompactNode>,
    stats: BuildStats,
}

#[derive(Clone, Copy, Debug)]
pub struct BuildOptions {
    /// Maximum number of emitters a leaf may reference before the builder
    /// prefers to split further; ranges whose centroids all coincide still
    /// produce larger leaves. `1` forces one emitter per leaf.
    pub max_emitters_per_leaf: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_emitters_per_leaf: 1,
        }
    }
}

/// Diagnostics gathered while building; not needed for traversal.
#[derive(Clone, Debug, Default)]
pub struct BuildStats {
    pub total_nodes: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
    pub prepare_time: Duration,
    pub build_time: Duration,
    pub flatten_time: Duration,
}

impl LightTree {
    pub fn build(
        scene: &impl LightScene,
        emitters: &[Emitter],
        options: BuildOptions,
    ) -> Result<Self> {
        ensure!(
            !emitters.is_empty(),
            "cannot build a light tree without emitters"
        );

        ensure!(
            options.max_emitters_per_leaf >= 1,
            "max_emitters_per_leaf must be positive"
        );

        log::info!("Building light tree; emitters = {}", emitters.len());

        let (primitives, tt_prepare) = Self::measure(|| {
            emitters
                .iter()
                .map(|&emitter| BuildPrimitive::resolve(scene, emitter))
                .collect::<Result<Vec<_>>>()
        });

        let mut primitives = primitives?;
        let mut stats = BuildStats::default();
        let mut ordered = Vec::with_capacity(emitters.len());

        let (root, tt_build) = Self::measure(|| {
            builder::run(&mut primitives, &options, &mut ordered, &mut stats)
        });

        let (nodes, tt_flatten) =
            Self::measure(|| serializer::run(&root, stats.total_nodes));

        stats.prepare_time = tt_prepare;
        stats.build_time = tt_build;
        stats.flatten_time = tt_flatten;

        log::info!(
            "Light tree built; nodes = {}, leaves = {}, max-depth = {}, \
             tt-prepare = {:?}, tt-build = {:?}, tt-flatten = {:?}",
            stats.total_nodes,
            stats.leaf_count,
            stats.max_depth,
            stats.prepare_time,
            stats.build_time,
            stats.flatten_time,
        );

        Ok(Self {
            emitters: ordered,
            nodes,
            stats,
        })
    }

    /// Flattened nodes, root first; leaf entries index into
    /// [`Self::emitters()`].
    pub fn nodes(&self) -> &[CompactNode] {
        &self.nodes
    }

    /// The input emitters, reordered so that each leaf covers a contiguous
    /// run.
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.nodes[0].bounds()
    }

    pub fn cone(&self) -> EmissionCone {
        self.nodes[0].cone()
    }

    pub fn energy(&self) -> f32 {
        self.nodes[0].energy()
    }

    fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
        let tt = Instant::now();
        let val = f();

        (val, tt.elapsed())
    }
}
