use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{Axis, BoundingBox, EmissionCone};

/// Flattened, traversal-ready node of the light tree.
///
/// The first child of an internal node sits at the node's own index plus
/// one; `payload` carries the second child's index. For a leaf, `payload`
/// is the index of the node's first emitter in the reordered emitter array.
///
/// Bit 0 of `tag` discriminates the two kinds (`1` = leaf); for internal
/// nodes, bits 1..=2 carry the split axis.
///
/// The layout is fixed at 64 bytes and `Pod`, so the caller can ship the
/// node array to a device byte-wise.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CompactNode {
    bounds_min: Vec3,
    energy: f32,
    bounds_max: Vec3,
    energy_variance: f32,
    cone_axis: Vec3,
    theta_o: f32,
    theta_e: f32,
    payload: u32,
    emitter_count: u32,
    tag: u32,
}

const TAG_LEAF: u32 = 1;

const _: () = {
    assert!(std::mem::size_of::<CompactNode>() == 64);
    assert!(std::mem::align_of::<CompactNode>() == 4);
};

impl CompactNode {
    pub(super) fn internal(
        bounds: BoundingBox,
        cone: EmissionCone,
        energy: f32,
        energy_variance: f32,
        emitter_count: u32,
        split_axis: Axis,
        second_child: u32,
    ) -> Self {
        Self {
            bounds_min: bounds.min(),
            energy,
            bounds_max: bounds.max(),
            energy_variance,
            cone_axis: cone.axis(),
            theta_o: cone.theta_o(),
            theta_e: cone.theta_e(),
            payload: second_child,
            emitter_count,
            tag: (split_axis as u32) << 1,
        }
    }

    pub(super) fn leaf(
        bounds: BoundingBox,
        cone: EmissionCone,
        energy: f32,
        energy_variance: f32,
        emitter_count: u32,
        first_emitter: u32,
    ) -> Self {
        Self {
            bounds_min: bounds.min(),
            energy,
            bounds_max: bounds.max(),
            energy_variance,
            cone_axis: cone.axis(),
            theta_o: cone.theta_o(),
            theta_e: cone.theta_e(),
            payload: first_emitter,
            emitter_count,
            tag: TAG_LEAF,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.tag & 1 == TAG_LEAF
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.bounds_min, self.bounds_max)
    }

    pub fn cone(&self) -> EmissionCone {
        EmissionCone::new(self.cone_axis, self.theta_o, self.theta_e)
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn energy_variance(&self) -> f32 {
        self.energy_variance
    }

    pub fn emitter_count(&self) -> u32 {
        self.emitter_count
    }

    /// Split axis chosen while building; `None` for a leaf.
    pub fn split_axis(&self) -> Option<Axis> {
        if self.is_leaf() {
            return None;
        }

        Some(match self.tag >> 1 {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        })
    }

    /// Indices of both children, given the node's own index; `None` for a
    /// leaf.
    pub fn children(&self, own_index: u32) -> Option<(u32, u32)> {
        if self.is_leaf() {
            return None;
        }

        Some((own_index + 1, self.payload))
    }

    /// First index and count of the node's emitters in the reordered
    /// emitter array; `None` for an internal node.
    pub fn emitters(&self) -> Option<(u32, u32)> {
        if !self.is_leaf() {
            return None;
        }

        Some((self.payload, self.emitter_count))
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn layout() {
        assert_eq!(64, std::mem::size_of::<CompactNode>());
        assert_eq!(4, std::mem::align_of::<CompactNode>());
    }

    #[test]
    fn tagging() {
        let bounds = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let cone = EmissionCone::new(Vec3::Z, 0.5, 0.5);

        let leaf = CompactNode::leaf(bounds, cone, 1.0, 0.0, 3, 7);

        assert!(leaf.is_leaf());
        assert_eq!(Some((7, 3)), leaf.emitters());
        assert_eq!(None, leaf.children(0));
        assert_eq!(None, leaf.split_axis());

        let internal =
            CompactNode::internal(bounds, cone, 2.0, 0.5, 5, Axis::Y, 9);

        assert!(!internal.is_leaf());
        assert_eq!(Some((4, 9)), internal.children(3));
        assert_eq!(None, internal.emitters());
        assert_eq!(Some(Axis::Y), internal.split_axis());
    }

    #[test]
    fn roundtrips_bounds_and_cone() {
        let bounds = BoundingBox::new(vec3(-1.0, 0.0, 1.0), vec3(2.0, 3.0, 4.0));
        let cone = EmissionCone::new(Vec3::X, 0.25, 1.5);

        let target = CompactNode::leaf(bounds, cone, 1.0, 0.0, 1, 0);

        assert_eq!(bounds, target.bounds());
        assert_eq!(cone, target.cone());
    }
}
