//! Red-black strategy.
//!
//! Every node is red or black; the root is black, a red node never has a red child, and every
//! path from a node down to a missing child passes through the same number of black nodes.

use crate::bst::{Bst, NodeId, Side};
use crate::error::{TreeError, TreeResult};
use crate::policy::Balance;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Keeps the red-black coloring invariants through recoloring and rotations.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedBlack;

/// Missing children count as black.
fn color<K>(bst: &Bst<K, Color>, link: Option<NodeId>) -> Color {
    link.map_or(Color::Black, |id| *bst.meta(id))
}

fn paint<K>(bst: &mut Bst<K, Color>, id: NodeId, color: Color) {
    *bst.meta_mut(id) = color;
}

impl RedBlack {
    /// Resolves a missing black node on the path through `x`, which hangs from `parent` on
    /// `side` (and may itself be absent).
    fn fix_double_black<K>(
        bst: &mut Bst<K, Color>,
        mut x: Option<NodeId>,
        mut parent: Option<NodeId>,
        mut side: Option<Side>,
    ) -> TreeResult<()> {
        const NO_SIBLING: TreeError =
            TreeError::InvariantViolation("double-black node has no sibling");

        while let (Some(p), Some(s)) = (parent, side) {
            if color(bst, x) == Color::Red {
                break;
            }
            let far_side = s.opposite();
            let mut w = bst.child(p, far_side).ok_or(NO_SIBLING)?;

            // Red sibling: rotate it above the parent so the new sibling is black.
            if color(bst, Some(w)) == Color::Red {
                paint(bst, w, Color::Black);
                paint(bst, p, Color::Red);
                bst.rotate_up(p, far_side);
                w = bst.child(p, far_side).ok_or(NO_SIBLING)?;
            }

            let near = bst.child(w, s);
            let far = bst.child(w, far_side);
            if color(bst, near) == Color::Black && color(bst, far) == Color::Black {
                // Push the deficiency up to the parent.
                paint(bst, w, Color::Red);
                x = Some(p);
                parent = bst.parent(p);
                side = bst.side_of(p);
                continue;
            }

            if color(bst, far) == Color::Black {
                // Near child red: turn it into the far-red shape.
                if let Some(near) = near {
                    paint(bst, near, Color::Black);
                }
                paint(bst, w, Color::Red);
                bst.rotate_up(w, s);
                w = bst.child(p, far_side).ok_or(NO_SIBLING)?;
            }

            let parent_color = *bst.meta(p);
            paint(bst, w, parent_color);
            paint(bst, p, Color::Black);
            if let Some(far) = bst.child(w, far_side) {
                paint(bst, far, Color::Black);
            }
            bst.rotate_up(p, far_side);
            x = bst.root();
            break;
        }

        if let Some(x) = x {
            paint(bst, x, Color::Black);
        }
        Ok(())
    }

    fn black_height<K>(bst: &Bst<K, Color>, link: Option<NodeId>) -> TreeResult<usize> {
        let Some(id) = link else {
            return Ok(0);
        };
        let own = *bst.meta(id);
        if own == Color::Red
            && (color(bst, bst.left(id)) == Color::Red || color(bst, bst.right(id)) == Color::Red)
        {
            return Err(TreeError::InvariantViolation("red node with a red child"));
        }
        let left = Self::black_height(bst, bst.left(id))?;
        let right = Self::black_height(bst, bst.right(id))?;
        if left != right {
            return Err(TreeError::InvariantViolation("unequal black heights"));
        }
        Ok(left + usize::from(own == Color::Black))
    }
}

impl Balance for RedBlack {
    type Meta = Color;

    fn meta(&mut self) -> Color {
        Color::Red
    }

    fn rebalance_insert<K: Ord>(&mut self, bst: &mut Bst<K, Color>, node: NodeId) {
        let mut x = node;
        while let Some(p) = bst.parent(x) {
            if color(bst, Some(p)) == Color::Black {
                break;
            }
            let Some(g) = bst.parent(p) else {
                // Red root; recolored below.
                break;
            };
            let p_side = bst.side_of(p).expect("parent of a grandchild has a side");
            let uncle = bst.child(g, p_side.opposite());

            if let Some(u) = uncle.filter(|&u| color(bst, Some(u)) == Color::Red) {
                paint(bst, p, Color::Black);
                paint(bst, u, Color::Black);
                paint(bst, g, Color::Red);
                x = g;
                continue;
            }

            let x_side = bst.side_of(x).expect("non-root node has a side");
            let top = match (p_side, x_side) {
                (Side::Left, Side::Left) => bst.rotate_right(g),
                (Side::Left, Side::Right) => bst.rotate_left_right(g),
                (Side::Right, Side::Right) => bst.rotate_left(g),
                (Side::Right, Side::Left) => bst.rotate_right_left(g),
            };
            paint(bst, top, Color::Black);
            paint(bst, g, Color::Red);
            break;
        }

        if let Some(root) = bst.root() {
            paint(bst, root, Color::Black);
        }
    }

    fn remove<K: Ord>(&mut self, bst: &mut Bst<K, Color>, node: NodeId) -> TreeResult<K> {
        let target = bst.transplant(node);
        let removed_color = *bst.meta(target);
        let child = bst.left(target).or(bst.right(target));
        let child_color = color(bst, child);
        if removed_color == Color::Red && child.is_some() {
            return Err(TreeError::InvariantViolation(
                "red node replaced by a black child",
            ));
        }

        let parent = bst.parent(target);
        let side = bst.side_of(target);
        let (key, child) = bst.splice(target)?;
        match (removed_color, child_color, child) {
            (Color::Red, _, _) => {}
            (Color::Black, Color::Red, Some(child)) => paint(bst, child, Color::Black),
            _ => Self::fix_double_black(bst, child, parent, side)?,
        }
        Ok(key)
    }

    fn validate<K: Ord>(&self, bst: &Bst<K, Color>) -> TreeResult<()> {
        if color(bst, bst.root()) != Color::Black {
            return Err(TreeError::InvariantViolation("red root"));
        }
        Self::black_height(bst, bst.root()).map(|_| ())
    }
}
