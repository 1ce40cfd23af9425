use borsh::{BorshDeserialize, BorshSerialize};

use crate::{compute_merkle_root, poseidon, zeros::Depth, Element, Error, Result};

/// The authentication path for one leaf of a depth-`DEPTH` tree
///
/// `path_elements[l]` is the sibling at level `l` (leaf level first), and `path_indices[l]` is bit
/// `l` of the leaf index: `true` when the running node is the right child at that level. These are
/// exactly the private inputs a withdrawal proof takes.
///
/// The tree itself keeps no leaves, so paths are rebuilt from the ordered list of deposited
/// commitments:
///
/// ```rust
/// # use shade_tree::*;
/// let leaves = [Element::new(1), Element::new(2), Element::new(3)];
/// let path = MerklePath::<8>::from_leaves(&leaves, 2).unwrap();
///
/// assert_eq!(path.path_indices[..2], [false, true]);
/// assert_eq!(path.path_elements[0], Element::ZERO);  // slot 3 is empty
/// assert_eq!(path.compute_root(Element::new(3)), root_of_leaves::<8>(&leaves).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MerklePath<const DEPTH: usize> {
    /// The sibling at each level, leaf level first
    pub path_elements: [Element; DEPTH],
    /// The side the running node is on at each level (`true` is right), leaf level first
    pub path_indices: [bool; DEPTH],
}

impl<const DEPTH: usize> MerklePath<DEPTH> {
    /// Build a path from siblings and the index of the leaf it authenticates
    ///
    /// Bits of `index` above `DEPTH` are ignored
    #[must_use]
    pub fn new(path_elements: [Element; DEPTH], index: u64) -> Self {
        let path_indices = core::array::from_fn(|level| (index >> level) & 1 == 1);

        Self {
            path_elements,
            path_indices,
        }
    }

    /// Rebuild the path for `leaves[index]` in the tree containing exactly `leaves`, in insertion
    /// order
    ///
    /// This hashes every node of the populated part of the tree, which is fine for a client
    /// preparing one withdrawal.
    pub fn from_leaves(leaves: &[Element], index: u64) -> Result<Self> {
        check_capacity::<DEPTH>(leaves)?;

        let len = leaves.len() as u64;
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        let zeros = Depth::<DEPTH>::zeros();
        let mut layer = leaves.to_vec();
        let mut position = index;
        let mut path_elements = [Element::ZERO; DEPTH];

        for (sibling, zero) in path_elements.iter_mut().zip(zeros) {
            let sibling_position = usize::try_from(position ^ 1).unwrap_or(usize::MAX);
            *sibling = layer.get(sibling_position).copied().unwrap_or(*zero);

            layer = parent_layer(&layer, *zero);
            position >>= 1;
        }

        Ok(Self::new(path_elements, index))
    }

    /// The root of the tree if `leaf` sits at the end of this path
    ///
    /// Uses the same ordering rule as the tree's insert, so a path taken from a tree with root `r`
    /// gives back `r` for the right leaf
    #[must_use]
    pub fn compute_root(&self, leaf: Element) -> Element {
        compute_merkle_root(
            leaf,
            self.path_elements
                .iter()
                .copied()
                .zip(self.path_indices.iter().copied()),
        )
    }

    /// The leaf index encoded by [`path_indices`][MerklePath::path_indices]
    #[must_use]
    pub fn leaf_index(&self) -> u64 {
        self.path_indices
            .iter()
            .enumerate()
            .filter(|(_, is_right)| **is_right)
            .fold(0, |index, (level, _)| index | (1u64 << level))
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::MerklePath;
    use crate::Element;

    /// The wire shape, which carries the leaf index alongside the siblings for readability
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Repr {
        leaf_index: u64,
        path_elements: Vec<Element>,
        path_indices: Vec<bool>,
    }

    impl<const DEPTH: usize> Serialize for MerklePath<DEPTH> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            Repr {
                leaf_index: self.leaf_index(),
                path_elements: self.path_elements.to_vec(),
                path_indices: self.path_indices.to_vec(),
            }
            .serialize(serializer)
        }
    }

    impl<'de, const DEPTH: usize> Deserialize<'de> for MerklePath<DEPTH> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = Repr::deserialize(deserializer)?;

            let path_elements = <[Element; DEPTH]>::try_from(repr.path_elements).map_err(|v| {
                D::Error::custom(format!("expected {DEPTH} path elements, got {}", v.len()))
            })?;
            let path_indices = <[bool; DEPTH]>::try_from(repr.path_indices).map_err(|v| {
                D::Error::custom(format!("expected {DEPTH} path indices, got {}", v.len()))
            })?;

            let path = MerklePath {
                path_elements,
                path_indices,
            };

            if path.leaf_index() != repr.leaf_index {
                return Err(D::Error::custom(format!(
                    "leaf index {} does not match the path indices",
                    repr.leaf_index
                )));
            }

            Ok(path)
        }
    }
}

/// The root of a depth-`DEPTH` tree holding `leaves` at indices `0..leaves.len()`, with every
/// other slot empty
///
/// This recomputes the whole populated part of the tree from scratch, without using a frontier
///
/// ```rust
/// # use shade_tree::*;
/// assert_eq!(root_of_leaves::<3>(&[]).ok(), zero_hash(3));
///
/// let one = poseidon([Element::new(1), Element::ZERO]);
/// assert_eq!(root_of_leaves::<1>(&[Element::new(1)]).unwrap(), one);
/// ```
pub fn root_of_leaves<const DEPTH: usize>(leaves: &[Element]) -> Result<Element> {
    check_capacity::<DEPTH>(leaves)?;

    let zeros = Depth::<DEPTH>::zeros();
    let mut layer = leaves.to_vec();

    for zero in &zeros[..DEPTH] {
        layer = parent_layer(&layer, *zero);
    }

    Ok(layer.first().copied().unwrap_or(zeros[DEPTH]))
}

fn check_capacity<const DEPTH: usize>(leaves: &[Element]) -> Result<()> {
    let capacity = u32::try_from(DEPTH)
        .ok()
        .and_then(|depth| 1u64.checked_shl(depth))
        .unwrap_or(u64::MAX);
    let len = leaves.len() as u64;

    match len > capacity {
        true => Err(Error::LeafCountExceedsCapacity { len, capacity }),
        false => Ok(()),
    }
}

/// Hash adjacent pairs, padding an odd tail with `zero`, the empty node of this layer
fn parent_layer(layer: &[Element], zero: Element) -> Vec<Element> {
    layer
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => poseidon([*left, *right]),
            [left] => poseidon([*left, zero]),
            _ => unreachable!("chunks(2) yields one or two elements"),
        })
        .collect()
}
