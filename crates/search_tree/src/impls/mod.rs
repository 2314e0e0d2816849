pub mod avl;
pub mod rb;
pub mod splay;
pub mod treap;

pub use avl::Avl;
pub use rb::{Color, RedBlack};
pub use splay::Splay;
pub use treap::RandomPriority;
