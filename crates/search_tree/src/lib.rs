//! Ordered sets backed by binary search trees with pluggable balancing.
//!
//! [`Bst`] is the shared core: search, insertion, removal by replacement and the rotation
//! primitives. [`Tree`] wraps it together with a [`Balance`] strategy that restores its own
//! invariant after every mutation:
//!
//! - [`Unbalanced`]: a plain BST.
//! - [`Avl`]: subtree heights differ by at most one.
//! - [`RedBlack`]: red-black coloring rules.
//! - [`Splay`]: every access moves the touched node to the root.
//! - [`RandomPriority`]: a treap, max-heap ordered on random priorities.
//!
//! ```
//! use search_tree::AvlTree;
//!
//! let mut tree: AvlTree<i32> = [44, 17, 78, 32, 50, 88, 48, 62, 54].into_iter().collect();
//! assert_eq!(tree.height(), Some(3));
//! assert_eq!(tree.remove(&50), Ok(50));
//! assert_eq!(tree.min(), Ok(&17));
//! ```

mod bst;
mod error;
mod policy;
mod tree;

pub mod impls;

pub use bst::{Bst, Iter, NodeId, Removed, Side};
pub use error::{TreeError, TreeResult};
pub use impls::{Avl, Color, RandomPriority, RedBlack, Splay};
pub use policy::{Balance, Unbalanced};
pub use tree::Tree;

use rand::rngs::StdRng;

pub type BstSet<K> = Tree<K, Unbalanced>;
pub type AvlTree<K> = Tree<K, Avl>;
pub type RedBlackTree<K> = Tree<K, RedBlack>;
pub type SplayTree<K> = Tree<K, Splay>;
pub type Treap<K, R = StdRng> = Tree<K, RandomPriority<R>>;
