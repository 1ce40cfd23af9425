use crate::Element;

/// How many recent roots a tree accepts by default
pub const DEFAULT_ROOT_HISTORY: usize = 30;

/// A fixed-size ring buffer of the `K` most recent roots
///
/// A prover builds a proof against whatever root they saw, and other deposits may land before the
/// proof is submitted. Keeping a window of recent roots means those proofs still verify, while
/// roots older than the window become permanently unverifiable.
///
/// ```rust
/// # use shade_tree::*;
/// let mut history = RootHistory::<2>::new(Element::new(1));
///
/// history.push(Element::new(2));
/// assert!(history.contains(Element::new(1)));
///
/// // the ring only has room for 2 roots, so 1 is evicted
/// history.push(Element::new(3));
/// assert!(!history.contains(Element::new(1)));
/// assert_eq!(history.latest(), Element::new(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHistory<const K: usize> {
    roots: [Element; K],
    cursor: usize,
}

impl<const K: usize> RootHistory<K> {
    const NON_EMPTY: () = assert!(K > 0, "the root history must hold at least one root");

    /// Create a history whose only root is `initial`, stored in slot 0
    ///
    /// Unused slots hold [`Element::ZERO`], which [`RootHistory::contains`] never matches
    #[must_use]
    pub fn new(initial: Element) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;

        let mut roots = [Element::ZERO; K];
        roots[0] = initial;

        Self { roots, cursor: 0 }
    }

    /// Record a new root in the slot after the cursor, evicting the oldest root once the ring is
    /// full
    pub fn push(&mut self, root: Element) {
        let next = (self.cursor + 1) % K;
        self.roots[next] = root;
        self.cursor = next;
    }

    /// The most recently pushed root
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Element {
        self.roots[self.cursor]
    }

    /// Whether `root` is one of the last `K` roots
    ///
    /// Scans backwards from the cursor, so a recent root is found quickly. Zero is never a known
    /// root, even though empty slots contain it.
    #[must_use]
    pub fn contains(&self, root: Element) -> bool {
        if root.is_zero() {
            return false;
        }

        self.iter().any(|known| known == root)
    }

    /// The roots currently held, newest first
    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        (0..K)
            .map(move |offset| self.roots[(self.cursor + K - offset) % K])
            .filter(|root| !root.is_zero())
    }

    /// The slot holding the latest root
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The number of slots in the ring
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        K
    }
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn zero_is_never_known() {
        let history = RootHistory::<4>::new(Element::new(1));

        assert!(!history.contains(Element::ZERO));
        assert!(history.contains(Element::new(1)));
    }

    #[test]
    fn cursor_wraps() {
        let mut history = RootHistory::<3>::new(Element::new(1));

        for i in 2..=4 {
            history.push(Element::new(i));
        }

        // slots: [4, 2, 3], cursor on slot 0
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.latest(), Element::new(4));

        let newest_first: Vec<_> = history.iter().collect();
        assert_eq!(
            newest_first,
            [Element::new(4), Element::new(3), Element::new(2)]
        );
    }

    #[proptest]
    fn holds_exactly_the_last_k(#[strategy(1u64..100)] pushes: u64) {
        const K: usize = 5;
        let mut history = RootHistory::<K>::new(Element::new(1_000));

        for i in 1..=pushes {
            history.push(Element::new(i));
        }

        let oldest_kept = (pushes + 1).saturating_sub(K as u64);

        for i in 1..=pushes {
            assert_eq!(history.contains(Element::new(i)), i >= oldest_kept.max(1));
        }

        assert_eq!(history.contains(Element::new(1_000)), pushes < K as u64);
    }
}
