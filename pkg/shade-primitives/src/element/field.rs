use ethnum::{uint, U256};
use ff::PrimeField;

use crate::{poseidon, Base, Element};

impl Element {
    /// The modulus of the BN254 scalar field
    pub const MODULUS: Element = Element(uint!(
        "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
    ));

    /// Hash this value (on the left) together with `other` (on the right)
    ///
    /// ```rust
    /// # use shade_primitives::*;
    /// let a = Element::new(1);
    /// let b = Element::new(2);
    ///
    /// assert_eq!(a.hashed_with(b), poseidon([a, b]));
    /// assert_ne!(a.hashed_with(b), b.hashed_with(a));
    /// ```
    #[inline]
    #[must_use = "this function doesn't modify self"]
    pub fn hashed_with(self, other: Element) -> Self {
        poseidon([self, other])
    }

    /// Convert this [`Element`] to the field representation used by the hash
    #[inline]
    #[must_use]
    pub fn to_base(self) -> Base {
        Base::from_raw(u8s_to_u64s(self.0.to_le_bytes()))
    }

    /// Create an [`Element`] from its field representation
    #[inline]
    #[must_use]
    pub fn from_base(base: Base) -> Element {
        Self(U256::from_le_bytes(base.to_repr()))
    }

    /// Reduce this value modulo [`Element::MODULUS`]
    #[inline]
    pub fn canonicalize(&mut self) {
        self.0 %= Self::MODULUS.0;
    }

    /// Whether this value is strictly below [`Element::MODULUS`]
    ///
    /// ```rust
    /// # use shade_primitives::*;
    /// assert!(Element::ZERO.is_canonical());
    /// assert!(!Element::MODULUS.is_canonical());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0 < Self::MODULUS.0
    }
}

impl From<Base> for Element {
    fn from(value: Base) -> Self {
        Element::from_base(value)
    }
}

impl From<Element> for Base {
    fn from(value: Element) -> Self {
        value.to_base()
    }
}

fn u8s_to_u64s(u8s: [u8; 32]) -> [u64; 4] {
    core::array::from_fn(|i| {
        let mut limb = [0; 8];
        limb.copy_from_slice(&u8s[i * 8..(i + 1) * 8]);
        u64::from_le_bytes(limb)
    })
}
