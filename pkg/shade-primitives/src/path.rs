use crate::{poseidon, Element};

/// Fold a leaf up to a root, one sibling per level
///
/// `siblings` yields `(sibling, is_right)` pairs in leaf-to-root order. `is_right` says which
/// side the *running node* is on at that level (i.e. the corresponding bit of the leaf index):
///  - `false`: the node is a left child, so the parent is `poseidon([node, sibling])`
///  - `true`: the node is a right child, so the parent is `poseidon([sibling, node])`
///
/// A tree of depth `D` has `D` siblings, and the root itself is not one of them.
///
/// ```text
///            root
///          /      \
///        A          B
///      /   \      /   \
///     0     1    2     3
/// ```
///
/// To show that `2` (index `0b10`) is in the tree:
/// ```rust
/// # use shade_primitives::*;
/// let a = poseidon([Element::new(0), Element::new(1)]);
/// let b = poseidon([Element::new(2), Element::new(3)]);
/// let root = poseidon([a, b]);
///
/// // bit 0 of the index is 0, bit 1 is 1
/// let siblings = [(Element::new(3), false), (a, true)];
///
/// assert_eq!(compute_merkle_root(Element::new(2), siblings), root);
/// assert_ne!(compute_merkle_root(Element::ZERO, siblings), root);
/// ```
pub fn compute_merkle_root<I: IntoIterator<Item = (Element, bool)>>(
    mut node: Element,
    siblings: I,
) -> Element {
    for (sibling, is_right) in siblings {
        node = match is_right {
            false => poseidon([node, sibling]),
            true => poseidon([sibling, node]),
        };
    }

    node
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use super::*;

    #[proptest]
    fn no_siblings_is_the_leaf(leaf: Element) {
        assert_eq!(compute_merkle_root(leaf, []), leaf);
    }

    #[proptest]
    fn side_matters(leaf: Element, sibling: Element) {
        let left = compute_merkle_root(leaf, [(sibling, false)]);
        let right = compute_merkle_root(leaf, [(sibling, true)]);

        assert_eq!(left, poseidon([leaf, sibling]));
        assert_eq!(right, poseidon([sibling, leaf]));
    }
}
