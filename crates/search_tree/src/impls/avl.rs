//! Height-balanced (AVL) strategy.

use crate::bst::{Bst, NodeId};
use crate::error::{TreeError, TreeResult};
use crate::policy::Balance;

/// Keeps the heights of every node's two subtrees within one of each other.
///
/// Node metadata is the height of the subtree rooted at the node, a leaf having height 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

/// Height of a possibly absent subtree; an absent subtree has height -1.
fn height<K>(bst: &Bst<K, usize>, link: Option<NodeId>) -> isize {
    link.map_or(-1, |id| *bst.meta(id) as isize)
}

fn recalc<K>(bst: &mut Bst<K, usize>, id: NodeId) {
    let hl = height(bst, bst.left(id));
    let hr = height(bst, bst.right(id));
    *bst.meta_mut(id) = (1 + hl.max(hr)) as usize;
}

fn balance_factor<K>(bst: &Bst<K, usize>, id: NodeId) -> isize {
    height(bst, bst.left(id)) - height(bst, bst.right(id))
}

/// Heights below the new subtree root are only stale one level down after a rotation.
fn recalc_rotated<K>(bst: &mut Bst<K, usize>, top: NodeId) {
    for child in [bst.left(top), bst.right(top)].into_iter().flatten() {
        recalc(bst, child);
    }
    recalc(bst, top);
}

/// Recomputes `id`'s height and rotates if it is out of balance. Returns the subtree root.
fn rebalance<K>(bst: &mut Bst<K, usize>, id: NodeId) -> NodeId {
    recalc(bst, id);
    let bf = balance_factor(bst, id);
    let top = if bf > 1 {
        let left = bst.left(id).expect("left-heavy node has a left child");
        if balance_factor(bst, left) >= 0 {
            bst.rotate_right(id)
        } else {
            bst.rotate_left_right(id)
        }
    } else if bf < -1 {
        let right = bst.right(id).expect("right-heavy node has a right child");
        if balance_factor(bst, right) <= 0 {
            bst.rotate_left(id)
        } else {
            bst.rotate_right_left(id)
        }
    } else {
        return id;
    };
    recalc_rotated(bst, top);
    debug_assert!(balance_factor(bst, top).abs() <= 1);
    top
}

impl Balance for Avl {
    type Meta = usize;

    fn meta(&mut self) -> usize {
        0
    }

    fn rebalance_insert<K: Ord>(&mut self, bst: &mut Bst<K, usize>, node: NodeId) {
        let mut cur = bst.parent(node);
        while let Some(id) = cur {
            let before = *bst.meta(id);
            let top = rebalance(bst, id);
            // One rotation restores the pre-insert height, and an unchanged height stops the
            // change from propagating further.
            if top != id || *bst.meta(top) == before {
                break;
            }
            cur = bst.parent(top);
        }
    }

    fn rebalance_remove<K: Ord>(
        &mut self,
        bst: &mut Bst<K, usize>,
        parent: Option<NodeId>,
    ) -> TreeResult<()> {
        let mut cur = parent;
        while let Some(id) = cur {
            let top = rebalance(bst, id);
            cur = bst.parent(top);
        }
        Ok(())
    }

    fn validate<K: Ord>(&self, bst: &Bst<K, usize>) -> TreeResult<()> {
        for id in bst.ids() {
            let hl = height(bst, bst.left(id));
            let hr = height(bst, bst.right(id));
            if *bst.meta(id) as isize != 1 + hl.max(hr) {
                return Err(TreeError::InvariantViolation("stale avl height"));
            }
            if (hl - hr).abs() > 1 {
                return Err(TreeError::InvariantViolation("avl balance factor out of range"));
            }
        }
        Ok(())
    }
}
