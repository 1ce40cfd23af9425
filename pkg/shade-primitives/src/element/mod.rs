use ethnum::U256;

mod arith;
mod convert;
mod field;
mod fmt;

#[cfg(feature = "borsh")]
mod borsh_impls;

#[cfg(feature = "rand")]
mod rand_impls;

#[cfg(feature = "serde")]
mod serde;

pub use convert::ParseElementError;

/// A value in the BN254 scalar field, stored as a 256-bit unsigned integer
///
/// The backing [`U256`] can hold any value in `0..2^256`, but only values strictly below
/// [`Element::MODULUS`] are *canonical*. Anything that crosses a trust boundary (public signals,
/// deposited commitments) should be checked with [`Element::is_canonical`] first: a non-canonical
/// value reduces to the same field element as a smaller one, which would let the same commitment
/// or nullifier hash be written two different ways.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Element(#[cfg_attr(feature = "serde", serde(with = "serde"))] pub(crate) U256);

impl Element {
    /// The additive identity
    pub const ZERO: Self = Self(U256::ZERO);

    /// The multiplicative identity
    pub const ONE: Self = Self(U256::ONE);

    /// Create a new [`Element`] from a u64
    #[inline]
    #[must_use]
    pub fn new(i: u64) -> Self {
        Self(U256::from(i))
    }

    /// Whether this element is zero
    ///
    /// Zero is reserved throughout the pool: it is the empty leaf, and it is never a valid
    /// commitment, root, nullifier hash or recipient
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// The underlying 256-bit integer
    #[inline]
    #[must_use]
    pub fn to_u256(self) -> U256 {
        self.0
    }

    /// Lowercase, zero-padded hex (64 characters, no `0x` prefix)
    #[inline]
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.to_be_bytes())
    }

    /// Whether the bit at `index` (0 is the least significant bit) is set
    #[inline]
    #[must_use]
    pub fn bit(self, index: u32) -> bool {
        (self.0 >> index) & U256::ONE == U256::ONE
    }

    /// The number of significant bits in this value
    ///
    /// ```rust
    /// # use shade_primitives::*;
    /// assert_eq!(Element::ZERO.bits(), 0);
    /// assert_eq!(Element::new(1).bits(), 1);
    /// assert_eq!(Element::new(255).bits(), 8);
    /// ```
    #[inline]
    #[must_use]
    pub fn bits(self) -> u32 {
        256 - self.0.leading_zeros()
    }
}

macro_rules! partial_eq_impl {
    ($int:ty) => {
        impl PartialEq<$int> for Element {
            fn eq(&self, other: &$int) -> bool {
                *self == Element::from(*other)
            }
        }
    };
}

partial_eq_impl!(bool);
partial_eq_impl!(u8);
partial_eq_impl!(u16);
partial_eq_impl!(u32);
partial_eq_impl!(u64);
partial_eq_impl!(u128);

#[cfg(any(test, feature = "proptest"))]
pub mod proptest {
    use super::Element;
    use ::proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};
    use ethnum::U256;

    /// Arbitrary *canonical* elements
    ///
    /// Non-canonical values are rejected at every boundary, so generating them only wastes cases
    impl Arbitrary for Element {
        type Strategy = Map<StrategyFor<[u8; 32]>, fn([u8; 32]) -> Self>;
        type Parameters = ();

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            any::<[u8; 32]>().prop_map(|array| {
                let mut element = Self(U256::from_be_bytes(array));
                element.canonicalize();
                element
            })
        }
    }
}
