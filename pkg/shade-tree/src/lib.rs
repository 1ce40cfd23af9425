#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! An append-only, fixed-depth incremental Merkle tree
//!
//! The tree only stores what it needs for the *next* insert: one node per level (the "frontier",
//! or filled subtrees), a table of empty-subtree hashes, and a short ring buffer of recent roots.
//! Leaves themselves are never stored, so a path for a leaf has to be rebuilt from the ordered
//! list of leaves (see [`MerklePath::from_leaves`]).
//!
//! ```rust
//! # use shade_tree::*;
//! let mut tree = IncrementalTree::<4>::new();
//! let empty_root = tree.last_root();
//!
//! let index = tree.insert(Element::new(123)).unwrap();
//! assert_eq!(index, 0);
//!
//! // both the old and the new root are still accepted
//! assert!(tree.is_known_root(empty_root));
//! assert!(tree.is_known_root(tree.last_root()));
//!
//! // a path rebuilt from the leaves hashes up to the same root
//! let path = MerklePath::<4>::from_leaves(&[Element::new(123)], 0).unwrap();
//! assert_eq!(path.compute_root(Element::new(123)), tree.last_root());
//! ```
//!
//! ## Layout
//!
//! Level 0 holds the leaves and level `DEPTH` holds the root. A node's index at level `l + 1` is
//! its index at level `l` shifted right by one, and bit `l` of a leaf's index says whether its
//! ancestor at level `l` is a right child.

mod error;
mod history;
mod path;
mod tree;
mod zeros;

pub use error::{Error, Result};
pub use history::{RootHistory, DEFAULT_ROOT_HISTORY};
pub use path::{root_of_leaves, MerklePath};
pub use shade_primitives::*;
pub use tree::IncrementalTree;
pub use zeros::{zero_hash, MAX_DEPTH};

/// The depth the pool is deployed with, giving 2^20 leaves
pub const DEFAULT_DEPTH: usize = 20;
