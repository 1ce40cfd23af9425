/// Errors produced by the tree and by path reconstruction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every leaf slot has been used
    #[error("the tree is full ({capacity} leaves)")]
    TreeFull {
        /// The number of leaves the tree can hold
        capacity: u64,
    },

    /// A path was requested for a leaf that doesn't exist
    #[error("no leaf at index {index}, the tree has {len} leaves")]
    IndexOutOfRange {
        /// The requested index
        index: u64,
        /// The number of leaves available
        len: u64,
    },

    /// More leaves were given than a tree of this depth can hold
    #[error("{len} leaves do not fit in a tree with capacity {capacity}")]
    LeafCountExceedsCapacity {
        /// The number of leaves given
        len: u64,
        /// The number of leaves the tree can hold
        capacity: u64,
    },
}

/// Alias for `Result<T, shade_tree::Error>`
pub type Result<T, E = Error> = core::result::Result<T, E>;
