use std::fmt;

use crate::bst::{self, Bst};
use crate::error::{TreeError, TreeResult};
use crate::policy::Balance;

/// An ordered set of keys kept in a binary search tree balanced by the strategy `B`.
///
/// Lookups take `&mut self` because some strategies (splay trees) restructure on every access.
pub struct Tree<K, B: Balance> {
    bst: Bst<K, B::Meta>,
    balance: B,
}

impl<K, B: Balance + Default> Tree<K, B> {
    pub fn new() -> Self {
        Self::with_balance(B::default())
    }
}

impl<K, B: Balance> Tree<K, B> {
    /// Creates an empty tree driven by the given strategy value.
    pub fn with_balance(balance: B) -> Self {
        Self {
            bst: Bst::new(),
            balance,
        }
    }

    pub fn len(&self) -> usize {
        self.bst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bst.is_empty()
    }

    pub fn clear(&mut self) {
        self.bst.clear();
    }

    /// Read-only access to the underlying node structure.
    pub fn core(&self) -> &Bst<K, B::Meta> {
        &self.bst
    }

    pub fn balance(&self) -> &B {
        &self.balance
    }

    /// Height in edges of the longest root-to-leaf path, `None` for an empty tree.
    pub fn height(&self) -> Option<usize> {
        self.bst.height()
    }

    pub fn preorder(&self) -> Vec<&K> {
        self.bst.preorder()
    }

    pub fn inorder(&self) -> Vec<&K> {
        self.bst.inorder()
    }

    pub fn postorder(&self) -> Vec<&K> {
        self.bst.postorder()
    }

    pub fn breadth_first(&self) -> Vec<&K> {
        self.bst.breadth_first()
    }

    /// Lazily iterates over the keys in ascending order.
    pub fn iter(&self) -> bst::Iter<'_, K, B::Meta> {
        self.bst.iter()
    }

    pub fn min(&self) -> TreeResult<&K> {
        self.bst
            .first()
            .map(|id| self.bst.key(id))
            .ok_or(TreeError::Empty)
    }

    pub fn max(&self) -> TreeResult<&K> {
        self.bst
            .last()
            .map(|id| self.bst.key(id))
            .ok_or(TreeError::Empty)
    }
}

impl<K: Ord, B: Balance> Tree<K, B> {
    /// Inserts `key`, returning `false` (and leaving the tree untouched apart from access
    /// restructuring) if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        if let Some(existing) = self.bst.get(&key) {
            self.balance.access(&mut self.bst, existing);
            return false;
        }
        let meta = self.balance.meta();
        match self.bst.insert(key, meta) {
            Some(id) => {
                self.balance.rebalance_insert(&mut self.bst, id);
                true
            }
            None => false,
        }
    }

    pub fn find(&mut self, key: &K) -> Option<&K> {
        let at = self.bst.search(key)?;
        let found = self.bst.key(at) == key;
        self.balance.access(&mut self.bst, at);
        if found { Some(self.bst.key(at)) } else { None }
    }

    pub fn contains(&mut self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` and returns it.
    ///
    /// # Errors
    ///
    /// - [`TreeError::Empty`] if the tree is empty or `key` is its only key. The tree is left
    ///   unchanged; use [`Tree::clear`] or [`Tree::discard`] to empty it.
    /// - [`TreeError::KeyNotFound`] if `key` is absent.
    /// - [`TreeError::InvariantViolation`] if the strategy's fix-up reached an impossible state.
    pub fn remove(&mut self, key: &K) -> TreeResult<K> {
        let at = self.bst.search(key).ok_or(TreeError::Empty)?;
        if self.bst.key(at) != key {
            self.balance.access(&mut self.bst, at);
            return Err(TreeError::KeyNotFound);
        }
        if self.bst.len() == 1 {
            return Err(TreeError::Empty);
        }
        self.balance.remove(&mut self.bst, at)
    }

    /// Best-effort removal: returns whether `key` was removed, and empties a one-node tree
    /// holding it.
    pub fn discard(&mut self, key: &K) -> bool {
        match self.remove(key) {
            Ok(_) => true,
            Err(TreeError::Empty) if self.bst.get(key).is_some() => {
                self.clear();
                true
            }
            Err(err) => {
                debug_assert!(!matches!(err, TreeError::InvariantViolation(_)), "{}", err);
                false
            }
        }
    }

    /// The smallest key `>= key`.
    pub fn lower_bound(&self, key: &K) -> Option<&K> {
        self.bst.lower_bound(key).map(|id| self.bst.key(id))
    }

    /// Checks BST ordering, link consistency and the strategy's invariant.
    pub fn validate(&self) -> TreeResult<()> {
        self.bst.validate()?;
        self.balance.validate(&self.bst)
    }
}

impl<K, B: Balance + Default> Default for Tree<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, B> Clone for Tree<K, B>
where
    K: Clone,
    B: Balance + Clone,
    B::Meta: Clone,
{
    fn clone(&self) -> Self {
        Self {
            bst: self.bst.clone(),
            balance: self.balance.clone(),
        }
    }
}

impl<K: fmt::Debug, B: Balance> fmt::Debug for Tree<K, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord, B: Balance> Extend<K> for Tree<K, B> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, B: Balance + Default> FromIterator<K> for Tree<K, B> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, B: Balance> IntoIterator for &'a Tree<K, B> {
    type Item = &'a K;
    type IntoIter = bst::Iter<'a, K, B::Meta>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
