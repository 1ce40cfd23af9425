use std::sync::OnceLock;

use crate::{poseidon, Element};

/// The deepest tree this crate builds
///
/// Capacities are `u64`, so `2^DEPTH` leaves must fit in one.
pub const MAX_DEPTH: usize = 63;

/// The root of an empty subtree whose leaves are `level` levels below it
///
/// Defined recursively:
///  - `zero_hash(0) = Element::ZERO` (an empty leaf)
///  - `zero_hash(n) = poseidon([zero_hash(n - 1), zero_hash(n - 1)])`
///
/// Every level up to [`MAX_DEPTH`] is computed once per process, so this is always a table
/// lookup. Levels above [`MAX_DEPTH`] return `None`.
///
/// ```rust
/// # use shade_tree::*;
/// assert_eq!(zero_hash(0), Some(Element::ZERO));
/// assert_eq!(zero_hash(1), Some(poseidon([Element::ZERO, Element::ZERO])));
/// assert_eq!(zero_hash(MAX_DEPTH + 1), None);
/// ```
#[inline]
#[must_use]
pub fn zero_hash(level: usize) -> Option<Element> {
    zeros().get(level).copied()
}

/// Rejects depths the zero table does not cover, at compile time
pub(crate) struct Depth<const DEPTH: usize>;

impl<const DEPTH: usize> Depth<DEPTH> {
    const IN_RANGE: () = assert!(DEPTH <= MAX_DEPTH, "tree depth is above MAX_DEPTH");

    /// `zero_hash(0..=DEPTH)`
    pub(crate) fn zeros() -> &'static [Element] {
        #[allow(clippy::let_unit_value)]
        let () = Self::IN_RANGE;

        &zeros()[..=DEPTH]
    }
}

/// The cached table, indexed by level
fn zeros() -> &'static [Element] {
    static CACHE: OnceLock<Vec<Element>> = OnceLock::new();

    CACHE.get_or_init(|| {
        let mut zeros = Vec::with_capacity(MAX_DEPTH + 1);
        let mut current = Element::ZERO;
        zeros.push(current);

        for _ in 0..MAX_DEPTH {
            current = poseidon([current, current]);
            zeros.push(current);
        }

        zeros
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_level_hashes_the_one_below() {
        let table = zeros();

        for level in 1..=MAX_DEPTH {
            let below = table[level - 1];
            assert_eq!(table[level], poseidon([below, below]));
        }
    }

    #[test]
    fn table_stops_at_max_depth() {
        assert_eq!(zeros().len(), MAX_DEPTH + 1);
        assert!(zero_hash(MAX_DEPTH).is_some());
        assert_eq!(zero_hash(MAX_DEPTH + 1), None);
        assert_eq!(zero_hash(usize::MAX), None);
    }

    #[test]
    fn depth_slices_include_the_root_level() {
        assert_eq!(Depth::<0>::zeros(), &[Element::ZERO]);
        assert_eq!(Depth::<MAX_DEPTH>::zeros().len(), MAX_DEPTH + 1);
    }

    #[test]
    fn empty_roots_are_never_zero_above_the_leaves() {
        assert!(zeros()[1..].iter().all(|z| !z.is_zero()));
    }
}
