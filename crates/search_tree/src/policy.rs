use crate::bst::{Bst, NodeId};
use crate::error::TreeResult;

/// A balancing strategy plugged into [`crate::Tree`].
///
/// The container performs the raw BST work through [`Bst`] and calls these hooks so that each
/// strategy can restore its own invariant with the shared rotation primitives.
pub trait Balance {
    /// Per-node balance metadata.
    type Meta;

    /// Metadata for a freshly created node.
    fn meta(&mut self) -> Self::Meta;

    /// Restores the invariant after `node` was attached as a new leaf.
    fn rebalance_insert<K: Ord>(&mut self, bst: &mut Bst<K, Self::Meta>, node: NodeId);

    /// Restores the invariant after a node below `parent` was detached.
    fn rebalance_remove<K: Ord>(
        &mut self,
        _bst: &mut Bst<K, Self::Meta>,
        _parent: Option<NodeId>,
    ) -> TreeResult<()> {
        Ok(())
    }

    /// Removes `node`, which is known not to be the only node of the tree, and returns its key.
    fn remove<K: Ord>(&mut self, bst: &mut Bst<K, Self::Meta>, node: NodeId) -> TreeResult<K> {
        let removed = bst.remove_node(node)?;
        self.rebalance_remove(bst, removed.parent)?;
        Ok(removed.key)
    }

    /// Called with the node a search ended on.
    fn access<K: Ord>(&mut self, _bst: &mut Bst<K, Self::Meta>, _node: NodeId) {}

    /// Checks the strategy's own invariant.
    fn validate<K: Ord>(&self, _bst: &Bst<K, Self::Meta>) -> TreeResult<()> {
        Ok(())
    }
}

/// No balancing at all: a plain binary search tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbalanced;

impl Balance for Unbalanced {
    type Meta = ();

    fn meta(&mut self) {}

    fn rebalance_insert<K: Ord>(&mut self, _bst: &mut Bst<K, ()>, _node: NodeId) {}
}
