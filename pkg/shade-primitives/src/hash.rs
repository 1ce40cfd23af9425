use poseidon_circuit::poseidon::primitives::{ConstantLength, Hash, P128Pow5T3};

use crate::{Base, Element};

/// Hash a fixed number of elements with Poseidon over the BN254 scalar field
///
/// The arity is part of the domain (`ConstantLength<N>`), so `poseidon([a, b])` and
/// `poseidon([a, b, Element::ZERO])` are unrelated values. The pool uses two arities:
///  - 2 for tree nodes and nullifier hashes
///  - 3 for commitments
///
/// ```rust
/// # use shade_primitives::*;
/// let a = poseidon([Element::new(1), Element::new(2)]);
/// let b = poseidon([Element::new(1), Element::new(3)]);
/// let c = poseidon([Element::new(1), Element::new(2), Element::ZERO]);
///
/// assert_ne!(a, b);
/// assert_ne!(a, c);
/// ```
/// Order matters:
/// ```rust
/// # use shade_primitives::*;
/// let a = Element::new(1);
/// let b = Element::new(2);
///
/// assert_ne!(poseidon([a, b]), poseidon([b, a]));
/// ```
#[inline]
#[must_use]
pub fn poseidon<const N: usize>(elements: [Element; N]) -> Element {
    type H<const N: usize> = Hash<Base, P128Pow5T3<Base>, ConstantLength<N>, 3, 2>;

    let hash = H::<N>::init().hash(elements.map(Element::to_base));
    Element::from_base(hash)
}
