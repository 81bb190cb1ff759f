use anyhow::{Context, Result};
use glam::Vec3;

use crate::{BoundingBox, EmissionCone, Emitter, LightScene};

/// Everything the builder needs to know about a single emitter, cached up
/// front so that partitioning never has to go back to the scene.
#[derive(Clone, Copy, Debug)]
pub(super) struct BuildPrimitive {
    pub emitter: Emitter,
    pub bounds: BoundingBox,
    pub cone: EmissionCone,
    pub center: Vec3,
    pub energy: f32,
}

impl BuildPrimitive {
    pub fn resolve(
        scene: &impl LightScene,
        emitter: Emitter,
    ) -> Result<Self> {
        let bounds = scene
            .emitter_bounds(emitter)
            .with_context(|| format!("cannot resolve bounds of {emitter:?}"))?;

        let cone = scene
            .emitter_cone(emitter)
            .with_context(|| format!("cannot resolve cone of {emitter:?}"))?;

        let energy = scene
            .emitter_energy(emitter)
            .with_context(|| format!("cannot resolve energy of {emitter:?}"))?;

        Ok(Self {
            emitter,
            bounds,
            cone,
            center: bounds.center(),
            energy,
        })
    }
}
