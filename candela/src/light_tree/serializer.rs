use bytemuck::Zeroable;

use super::build_node::BuildNode;
use super::node::CompactNode;

/// Flattens the build tree depth-first into a contiguous node array.
///
/// A node's first child lands at the node's own index plus one; the second
/// child's index is only known once the left subtree has been emitted, so
/// internal nodes are pushed as placeholders and back-patched afterwards.
/// The output is a pure function of the tree's shape.
pub(super) fn run(root: &BuildNode, node_count: usize) -> Vec<CompactNode> {
    let mut out = Vec::with_capacity(node_count);

    run_ex(root, &mut out);

    out
}

fn run_ex(node: &BuildNode, out: &mut Vec<CompactNode>) -> u32 {
    let ptr = out.len() as u32;

    match node {
        BuildNode::Internal {
            bounds,
            cone,
            energy,
            energy_variance,
            emitter_count,
            split_axis,
            left,
            right,
        } => {
            out.push(CompactNode::zeroed());

            let _left_ptr = run_ex(left, out);
            let right_ptr = run_ex(right, out);

            out[ptr as usize] = CompactNode::internal(
                *bounds,
                *cone,
                *energy,
                *energy_variance,
                *emitter_count,
                *split_axis,
                right_ptr,
            );
        }

        BuildNode::Leaf {
            bounds,
            cone,
            energy,
            energy_variance,
            first_emitter,
            emitter_count,
        } => {
            out.push(CompactNode::leaf(
                *bounds,
                *cone,
                *energy,
                *energy_variance,
                *emitter_count,
                *first_emitter,
            ));
        }
    }

    ptr
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::{Axis, BoundingBox, EmissionCone};

    fn leaf(first_emitter: u32, emitter_count: u32) -> BuildNode {
        BuildNode::Leaf {
            bounds: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
            cone: EmissionCone::new(Vec3::Z, 0.5, 0.5),
            energy: 1.0,
            energy_variance: 0.0,
            first_emitter,
            emitter_count,
        }
    }

    fn internal(left: BuildNode, right: BuildNode) -> BuildNode {
        BuildNode::Internal {
            bounds: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
            cone: EmissionCone::new(Vec3::Z, 0.5, 0.5),
            energy: 2.0,
            energy_variance: 0.0,
            emitter_count: 2,
            split_axis: Axis::X,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn single_leaf() {
        let nodes = run(&leaf(0, 1), 1);

        assert_eq!(1, nodes.len());
        assert!(nodes[0].is_leaf());
        assert_eq!(Some((0, 1)), nodes[0].emitters());
    }

    #[test]
    fn left_child_follows_its_parent() {
        // ((a b) c)
        let root = internal(internal(leaf(0, 1), leaf(1, 1)), leaf(2, 1));
        let nodes = run(&root, 5);

        assert_eq!(5, nodes.len());

        let (left, right) = nodes[0].children(0).unwrap();

        assert_eq!(1, left);
        assert_eq!(4, right);

        let (left, right) = nodes[1].children(1).unwrap();

        assert_eq!(2, left);
        assert_eq!(3, right);

        assert_eq!(Some((0, 1)), nodes[2].emitters());
        assert_eq!(Some((1, 1)), nodes[3].emitters());
        assert_eq!(Some((2, 1)), nodes[4].emitters());
    }
}
