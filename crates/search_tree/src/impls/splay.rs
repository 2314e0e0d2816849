//! Splay strategy: every access moves the touched node to the root.

use crate::bst::{Bst, NodeId, Side};
use crate::policy::Balance;

/// Amortized balancing by move-to-root. Keeps no per-node metadata.
#[derive(Clone, Copy, Debug, Default)]
pub struct Splay;

/// Rotates `x` up until it is the root, using zig, zig-zig and zig-zag steps.
pub fn splay<K, M>(bst: &mut Bst<K, M>, x: NodeId) {
    while let Some(p) = bst.parent(x) {
        let x_side = bst.side_of(x).expect("non-root node has a side");
        let Some(g) = bst.parent(p) else {
            // zig
            bst.rotate_up(p, x_side);
            break;
        };
        let p_side = bst.side_of(p).expect("non-root node has a side");
        if p_side == x_side {
            // zig-zig: lift the parent first, then the node.
            bst.rotate_up(g, p_side);
            bst.rotate_up(p, x_side);
        } else {
            // zig-zag
            match p_side {
                Side::Left => bst.rotate_left_right(g),
                Side::Right => bst.rotate_right_left(g),
            };
        }
    }
}

impl Balance for Splay {
    type Meta = ();

    fn meta(&mut self) {}

    fn rebalance_insert<K: Ord>(&mut self, bst: &mut Bst<K, ()>, node: NodeId) {
        splay(bst, node);
    }

    fn rebalance_remove<K: Ord>(
        &mut self,
        bst: &mut Bst<K, ()>,
        parent: Option<NodeId>,
    ) -> crate::TreeResult<()> {
        if let Some(parent) = parent {
            splay(bst, parent);
        }
        Ok(())
    }

    fn access<K: Ord>(&mut self, bst: &mut Bst<K, ()>, node: NodeId) {
        splay(bst, node);
    }
}
