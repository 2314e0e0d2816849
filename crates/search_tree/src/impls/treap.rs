//! Treap strategy: a random priority per node, kept in max-heap order by rotations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bst::{Bst, NodeId, Side};
use crate::error::{TreeError, TreeResult};
use crate::policy::Balance;
use crate::tree::Tree;

const DEFAULT_SEED: u64 = 0x5EED_0ADE_2026;

/// Draws node priorities from `R`. A parent's priority is never below its children's.
#[derive(Clone, Debug)]
pub struct RandomPriority<R = StdRng> {
    rng: R,
}

impl RandomPriority<StdRng> {
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeds from the operating system; shapes differ between runs.
    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R> RandomPriority<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomPriority<StdRng> {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl<K> Tree<K, RandomPriority<StdRng>> {
    /// An empty treap whose shape is reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_balance(RandomPriority::with_seed(seed))
    }
}

impl<R: Rng> Balance for RandomPriority<R> {
    type Meta = u64;

    fn meta(&mut self) -> u64 {
        self.rng.random()
    }

    fn rebalance_insert<K: Ord>(&mut self, bst: &mut Bst<K, u64>, node: NodeId) {
        while let Some(parent) = bst.parent(node) {
            if bst.meta(node) <= bst.meta(parent) {
                break;
            }
            let side = bst.side_of(node).expect("non-root node has a side");
            bst.rotate_up(parent, side);
        }
    }

    fn remove<K: Ord>(&mut self, bst: &mut Bst<K, u64>, node: NodeId) -> TreeResult<K> {
        // Sink the node below its higher-priority child until it is a leaf.
        loop {
            let side = match (bst.left(node), bst.right(node)) {
                (None, None) => break,
                (Some(_), None) => Side::Left,
                (None, Some(_)) => Side::Right,
                (Some(l), Some(r)) => {
                    if bst.meta(l) >= bst.meta(r) {
                        Side::Left
                    } else {
                        Side::Right
                    }
                }
            };
            bst.rotate_up(node, side);
        }
        let (key, _) = bst.splice(node)?;
        Ok(key)
    }

    fn validate<K: Ord>(&self, bst: &Bst<K, u64>) -> TreeResult<()> {
        for id in bst.ids() {
            let priority = bst.meta(id);
            for child in [bst.left(id), bst.right(id)].into_iter().flatten() {
                if bst.meta(child) > priority {
                    return Err(TreeError::InvariantViolation("treap heap order violated"));
                }
            }
        }
        Ok(())
    }
}
