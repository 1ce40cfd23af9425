use crate::{
    history::{RootHistory, DEFAULT_ROOT_HISTORY},
    poseidon, zeros, Element, Error, Result,
};

/// An append-only Merkle tree with `2^DEPTH` leaf slots that remembers its last `HISTORY` roots
///
/// Inserting costs `DEPTH` hashes and touches only the frontier: for each level, the most
/// recent left child ([`filled_subtree`][IncrementalTree::filled_subtree]). Anything to the right
/// of the newest leaf is empty, so its hash comes from the zero table.
///
/// ```rust
/// # use shade_tree::*;
/// let mut tree = IncrementalTree::<2>::new();
///
/// for i in 1..=4 {
///     tree.insert(Element::new(i)).unwrap();
/// }
///
/// let a = poseidon([Element::new(1), Element::new(2)]);
/// let b = poseidon([Element::new(3), Element::new(4)]);
/// assert_eq!(tree.last_root(), poseidon([a, b]));
///
/// // a depth 2 tree only has room for 4 leaves
/// assert_eq!(tree.insert(Element::new(5)), Err(Error::TreeFull { capacity: 4 }));
/// ```
#[derive(Debug, Clone)]
pub struct IncrementalTree<const DEPTH: usize, const HISTORY: usize = DEFAULT_ROOT_HISTORY> {
    filled_subtrees: [Element; DEPTH],
    /// `DEPTH + 1` entries, copied out of the process-wide cache
    zeros: Vec<Element>,
    roots: RootHistory<HISTORY>,
    next_index: u64,
}

impl<const DEPTH: usize, const HISTORY: usize> Default for IncrementalTree<DEPTH, HISTORY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize, const HISTORY: usize> IncrementalTree<DEPTH, HISTORY> {
    /// The number of leaves the tree can hold
    pub const CAPACITY: u64 = 1 << DEPTH;

    /// An empty tree, whose root is `zero_hash(DEPTH)`
    ///
    /// `DEPTH` above [`MAX_DEPTH`](crate::MAX_DEPTH) fails to compile.
    #[must_use]
    pub fn new() -> Self {
        let zeros = zeros::Depth::<DEPTH>::zeros().to_vec();
        let filled_subtrees = core::array::from_fn(|level| zeros[level]);
        let roots = RootHistory::new(zeros[DEPTH]);

        Self {
            filled_subtrees,
            zeros,
            roots,
            next_index: 0,
        }
    }

    /// Append a leaf, returning the index it was stored at
    ///
    /// Every new node is computed before any state is written, so an error leaves the tree
    /// untouched.
    ///
    /// ```rust
    /// # use shade_tree::*;
    /// let mut tree = IncrementalTree::<8>::new();
    ///
    /// assert_eq!(tree.insert(Element::new(10)).unwrap(), 0);
    /// assert_eq!(tree.insert(Element::new(20)).unwrap(), 1);
    /// assert_eq!(tree.next_index(), 2);
    /// ```
    pub fn insert(&mut self, leaf: Element) -> Result<u64> {
        let index = self.next_index;

        if index >= Self::CAPACITY {
            return Err(Error::TreeFull {
                capacity: Self::CAPACITY,
            });
        }

        let mut filled_subtrees = self.filled_subtrees;
        let mut current = leaf;

        for (level, filled) in filled_subtrees.iter_mut().enumerate() {
            current = match (index >> level) & 1 == 1 {
                false => {
                    *filled = current;
                    poseidon([current, self.zeros[level]])
                }
                true => poseidon([*filled, current]),
            };
        }

        self.filled_subtrees = filled_subtrees;
        self.roots.push(current);
        self.next_index = index + 1;

        tracing::trace!(index, root = %current, "inserted leaf");

        Ok(index)
    }

    /// Whether `root` is one of the last `HISTORY` roots of this tree
    ///
    /// [`Element::ZERO`] is never a known root
    #[inline]
    #[must_use]
    pub fn is_known_root(&self, root: Element) -> bool {
        self.roots.contains(root)
    }

    /// The root after the most recent insert
    #[inline]
    #[must_use]
    pub fn last_root(&self) -> Element {
        self.roots.latest()
    }

    /// The root of an empty subtree at `level`, or [`None`] if `level > DEPTH`
    #[inline]
    #[must_use]
    pub fn zero(&self, level: usize) -> Option<Element> {
        self.zeros.get(level).copied()
    }

    /// The frontier node at `level`, or [`None`] if `level >= DEPTH`
    ///
    /// For a level whose left slot hasn't been written yet, this is the zero hash for that level
    #[inline]
    #[must_use]
    pub fn filled_subtree(&self, level: usize) -> Option<Element> {
        self.filled_subtrees.get(level).copied()
    }

    /// The index the next leaf will be stored at (equivalently, the number of leaves)
    #[inline]
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Whether another insert would fail with [`Error::TreeFull`]
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.next_index >= Self::CAPACITY
    }

    /// The number of leaves the tree can hold
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u64 {
        Self::CAPACITY
    }

    /// The window of recent roots
    #[inline]
    #[must_use]
    pub fn root_history(&self) -> &RootHistory<HISTORY> {
        &self.roots
    }
}
