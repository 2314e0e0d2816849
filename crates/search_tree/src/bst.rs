//! The shared binary search tree core.
//!
//! Nodes live in an arena owned by [`Bst`]. Child links own their subtree, parent links are plain
//! indices used for walking back up, so no node can be reachable through two owners. Every
//! balancing strategy in [`crate::impls`] drives this core: it searches, attaches and detaches
//! nodes here and then restores its own invariant with the rotation primitives.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::mem;

use crate::error::{TreeError, TreeResult};

/// Index of a node inside a [`Bst`] arena.
///
/// Ids stay valid until the node they name is removed; a removed node's slot is reused by later
/// insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Which child link of its parent a node hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Debug)]
struct Node<K, M> {
    key: K,
    meta: M,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

/// Result of physically removing a node from the core.
#[derive(Debug, PartialEq, Eq)]
pub struct Removed<K> {
    /// The key that was removed from the tree.
    pub key: K,
    /// Parent of the node that was detached, i.e. where a fix-up pass should start.
    pub parent: Option<NodeId>,
}

/// An arena-backed binary search tree with per-node metadata `M`.
#[derive(Clone, Debug)]
pub struct Bst<K, M> {
    nodes: Vec<Option<Node<K, M>>>,
    free: Vec<usize>,
    root: Option<NodeId>,
    len: usize,
}

impl<K, M> Default for Bst<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, M> Bst<K, M> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    fn node(&self, id: NodeId) -> &Node<K, M> {
        self.nodes[id.0].as_ref().expect("node id refers to a live node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, M> {
        self.nodes[id.0].as_mut().expect("node id refers to a live node")
    }

    pub fn key(&self, id: NodeId) -> &K {
        &self.node(id).key
    }

    pub fn meta(&self, id: NodeId) -> &M {
        &self.node(id).meta
    }

    pub fn meta_mut(&mut self, id: NodeId) -> &mut M {
        &mut self.node_mut(id).meta
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    /// Returns the side of its parent that `id` hangs from, or `None` for the root.
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.parent(id)?;
        if self.left(parent) == Some(id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.left.is_none() && node.right.is_none()
    }

    fn alloc(&mut self, node: Node<K, M>) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, M> {
        let node = self.nodes[id.0].take().expect("released node is live");
        self.free.push(id.0);
        self.len -= 1;
        node
    }

    /// Makes `new` take the place of `old` under `parent` (or as the root).
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.left(p) == Some(old) {
                    self.node_mut(p).left = new;
                } else {
                    self.node_mut(p).right = new;
                }
            }
        }
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.node_mut(id).left = child,
            Side::Right => self.node_mut(id).right = child,
        }
        if let Some(child) = child {
            self.node_mut(child).parent = Some(id);
        }
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.left(id) {
            id = left;
        }
        id
    }

    /// Rightmost node of the subtree rooted at `id`.
    pub fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.right(id) {
            id = right;
        }
        id
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.minimum(root))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.maximum(root))
    }

    /// The node whose key would replace `id`'s on removal: the in-order successor inside the
    /// right subtree if there is one, else the in-order predecessor inside the left subtree.
    pub fn replacement(&self, id: NodeId) -> Option<NodeId> {
        match (self.left(id), self.right(id)) {
            (_, Some(right)) => Some(self.minimum(right)),
            (Some(left), None) => Some(self.maximum(left)),
            (None, None) => None,
        }
    }

    fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = (a.0.min(b.0), a.0.max(b.0));
        let (head, tail) = self.nodes.split_at_mut(hi);
        let x = head[lo].as_mut().expect("node id refers to a live node");
        let y = tail[0].as_mut().expect("node id refers to a live node");
        mem::swap(&mut x.key, &mut y.key);
    }

    /// Moves the key of a node with two children into the node that will be physically
    /// removed instead (its replacement) and returns that node. Nodes with at most one child
    /// are returned unchanged.
    pub fn transplant(&mut self, id: NodeId) -> NodeId {
        if self.left(id).is_none() || self.right(id).is_none() {
            return id;
        }
        let replacement = self.replacement(id).expect("a node with children has a replacement");
        self.swap_keys(id, replacement);
        replacement
    }

    /// Detaches a node with at most one child, splicing that child into its place. Returns the
    /// removed key and the child that moved up.
    pub fn splice(&mut self, id: NodeId) -> TreeResult<(K, Option<NodeId>)> {
        let (left, right, parent) = {
            let node = self.node(id);
            (node.left, node.right, node.parent)
        };
        if left.is_some() && right.is_some() {
            return Err(TreeError::InvariantViolation("spliced node has two children"));
        }
        let child = left.or(right);
        self.replace_child(parent, id, child);
        let node = self.release(id);
        Ok((node.key, child))
    }

    /// Removes the node `id` from the tree.
    ///
    /// A leaf is detached, a node with one child is spliced out and a node with two children
    /// takes its replacement's key before the replacement is removed instead. Removing the only
    /// node of the tree is refused with [`TreeError::Empty`]: there is no parent to resume from.
    pub fn remove_node(&mut self, id: NodeId) -> TreeResult<Removed<K>> {
        if self.root == Some(id) && self.is_leaf(id) {
            return Err(TreeError::Empty);
        }
        let target = self.transplant(id);
        let parent = self.parent(target);
        let (key, _) = self.splice(target)?;
        Ok(Removed { key, parent })
    }

    /// Rotates `id` down to the left, lifting its right child. Returns the new subtree root.
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y     ->     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    pub fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.right(x) else {
            return x;
        };
        let b = self.left(y);
        let parent = self.parent(x);
        self.set_child(x, Side::Right, b);
        self.replace_child(parent, x, Some(y));
        self.set_child(y, Side::Left, Some(x));
        y
    }

    /// Rotates `id` down to the right, lifting its left child. Returns the new subtree root.
    pub fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let Some(x) = self.left(y) else {
            return y;
        };
        let b = self.right(x);
        let parent = self.parent(y);
        self.set_child(y, Side::Left, b);
        self.replace_child(parent, y, Some(x));
        self.set_child(x, Side::Right, Some(y));
        x
    }

    /// Left rotation of the left child followed by a right rotation of `id`; lifts the left
    /// child's right child to the top.
    pub fn rotate_left_right(&mut self, id: NodeId) -> NodeId {
        if let Some(left) = self.left(id) {
            self.rotate_left(left);
        }
        self.rotate_right(id)
    }

    /// Right rotation of the right child followed by a left rotation of `id`; lifts the right
    /// child's left child to the top.
    pub fn rotate_right_left(&mut self, id: NodeId) -> NodeId {
        if let Some(right) = self.right(id) {
            self.rotate_right(right);
        }
        self.rotate_left(id)
    }

    /// Rotates `id` so that its child on `side` becomes the subtree root.
    pub fn rotate_up(&mut self, id: NodeId, side: Side) -> NodeId {
        match side {
            Side::Left => self.rotate_right(id),
            Side::Right => self.rotate_left(id),
        }
    }

    /// Number of edges on the longest downward path from `id`.
    pub fn subtree_height(&self, id: NodeId) -> usize {
        let mut height = 0;
        let mut level = vec![id];
        loop {
            let next: Vec<NodeId> = level
                .iter()
                .flat_map(|&n| [self.left(n), self.right(n)])
                .flatten()
                .collect();
            if next.is_empty() {
                return height;
            }
            height += 1;
            level = next;
        }
    }

    /// Height of the whole tree in edges (a single node has height 0), `None` when empty.
    pub fn height(&self) -> Option<usize> {
        self.root.map(|root| self.subtree_height(root))
    }

    /// Ids of all live nodes in preorder.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.right(id));
            stack.extend(self.left(id));
        }
        out
    }

    pub fn preorder(&self) -> Vec<&K> {
        self.ids().into_iter().map(|id| self.key(id)).collect()
    }

    pub fn inorder(&self) -> Vec<&K> {
        self.iter().collect()
    }

    pub fn postorder(&self) -> Vec<&K> {
        // Root-right-left preorder, reversed.
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(self.key(id));
            stack.extend(self.left(id));
            stack.extend(self.right(id));
        }
        out.reverse();
        out
    }

    pub fn breadth_first(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            out.push(self.key(id));
            queue.extend(self.left(id));
            queue.extend(self.right(id));
        }
        out
    }

    pub fn iter(&self) -> Iter<'_, K, M> {
        let mut iter = Iter {
            bst: self,
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left(self.root);
        iter
    }

    /// Checks BST ordering and that every parent index matches the child link pointing at it.
    pub fn validate(&self) -> TreeResult<()>
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(TreeError::InvariantViolation("empty tree with non-zero length"))
            };
        };
        if self.parent(root).is_some() {
            return Err(TreeError::InvariantViolation("root has a parent"));
        }

        let mut count = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            count += 1;
            for child in [self.left(id), self.right(id)].into_iter().flatten() {
                if self.parent(child) != Some(id) {
                    return Err(TreeError::InvariantViolation("stale parent link"));
                }
                stack.push(child);
            }
        }
        if count != self.len {
            return Err(TreeError::InvariantViolation("length does not match node count"));
        }

        let keys = self.inorder();
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TreeError::InvariantViolation("keys out of order"));
        }
        Ok(())
    }
}

impl<K: Ord, M> Bst<K, M> {
    /// Descends towards `key` and returns the node holding it, or the last node visited when
    /// the key is absent. Returns `None` only for an empty tree.
    pub fn search(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root?;
        loop {
            let next = match key.cmp(self.key(cur)) {
                Ordering::Less => self.left(cur),
                Ordering::Greater => self.right(cur),
                Ordering::Equal => return Some(cur),
            };
            match next {
                Some(next) => cur = next,
                None => return Some(cur),
            }
        }
    }

    /// The node holding exactly `key`, if any.
    pub fn get(&self, key: &K) -> Option<NodeId> {
        self.search(key).filter(|&id| self.key(id) == key)
    }

    /// Attaches a new node for `key` below the last node visited by [`Bst::search`]. Returns
    /// `None` without touching the tree when the key is already present.
    pub fn insert(&mut self, key: K, meta: M) -> Option<NodeId> {
        let (parent, side) = match self.search(&key) {
            None => (None, Side::Left),
            Some(at) => match key.cmp(self.key(at)) {
                Ordering::Equal => return None,
                Ordering::Less => (Some(at), Side::Left),
                Ordering::Greater => (Some(at), Side::Right),
            },
        };

        let id = self.alloc(Node {
            key,
            meta,
            left: None,
            right: None,
            parent,
        });
        match parent {
            None => self.root = Some(id),
            Some(parent) => self.set_child(parent, side, Some(id)),
        }
        Some(id)
    }

    /// Removes `key` by replacement. See [`Bst::remove_node`].
    pub fn remove(&mut self, key: &K) -> TreeResult<Removed<K>> {
        if self.is_empty() {
            return Err(TreeError::Empty);
        }
        let id = self.get(key).ok_or(TreeError::KeyNotFound)?;
        self.remove_node(id)
    }

    /// The node holding the smallest key `>= key`.
    pub fn lower_bound(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        let mut candidate = None;
        while let Some(id) = cur {
            match key.cmp(self.key(id)) {
                Ordering::Less | Ordering::Equal => {
                    candidate = Some(id);
                    cur = self.left(id);
                }
                Ordering::Greater => cur = self.right(id),
            }
        }
        candidate
    }
}

/// In-order iterator over the keys of a [`Bst`].
pub struct Iter<'a, K, M> {
    bst: &'a Bst<K, M>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K, M> Iter<'a, K, M> {
    fn push_left(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.stack.push(id);
            cur = self.bst.left(id);
        }
    }
}

impl<'a, K, M> Iterator for Iter<'a, K, M> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let bst = self.bst;
        let id = self.stack.pop()?;
        self.push_left(bst.right(id));
        self.remaining -= 1;
        Some(bst.key(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, M> ExactSizeIterator for Iter<'_, K, M> {}
