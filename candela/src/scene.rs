use anyhow::Result;

use crate::{BoundingBox, EmissionCone, Emitter};

/// Scene-side queries the builder uses to summarize each emitter.
///
/// Implemented by the renderer's scene graph; resolving an [`Emitter`]'s
/// object or lamp id against the caller's object and lamp lists happens
/// behind this trait. Each query may fail for a reference the scene cannot
/// resolve, which aborts the whole build.
pub trait LightScene {
    /// World-space bounds of the emitter.
    fn emitter_bounds(&self, emitter: Emitter) -> Result<BoundingBox>;

    /// Bound on the directions the emitter may emit toward.
    fn emitter_cone(&self, emitter: Emitter) -> Result<EmissionCone>;

    /// Total emitted energy of the emitter.
    fn emitter_energy(&self, emitter: Emitter) -> Result<f32>;
}
