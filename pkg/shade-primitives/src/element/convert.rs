use core::num::TryFromIntError;
use std::str::FromStr;

use ethnum::U256;

use crate::Element;

macro_rules! from_int_impls {
    ($t:ty) => {
        impl From<$t> for Element {
            #[inline]
            fn from(value: $t) -> Self {
                Element(U256::from(value))
            }
        }

        impl TryFrom<Element> for $t {
            type Error = TryFromIntError;

            #[inline]
            fn try_from(value: Element) -> Result<Self, Self::Error> {
                <$t>::try_from(value.0)
            }
        }
    };
}

from_int_impls!(u8);
from_int_impls!(u16);
from_int_impls!(u32);
from_int_impls!(u64);
from_int_impls!(u128);

impl From<bool> for Element {
    #[inline]
    fn from(value: bool) -> Self {
        match value {
            false => Self::ZERO,
            true => Self::ONE,
        }
    }
}

impl From<U256> for Element {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Element> for U256 {
    fn from(value: Element) -> Self {
        value.0
    }
}

/// The error returned when a string is not a valid hex-encoded [`Element`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid element {input:?}: expected at most 64 hex digits, optionally prefixed with 0x")]
pub struct ParseElementError {
    input: String,
}

/// Parses hex, with or without a `0x` prefix
///
/// ```rust
/// # use shade_primitives::*;
/// let a: Element = "0x1f".parse().unwrap();
/// let b: Element = "1F".parse().unwrap();
///
/// assert_eq!(a, Element::new(31));
/// assert_eq!(a, b);
/// assert!("0xzz".parse::<Element>().is_err());
/// ```
impl FromStr for Element {
    type Err = ParseElementError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let error = || ParseElementError {
            input: s.to_owned(),
        };

        if digits.is_empty() || digits.len() > 64 {
            return Err(error());
        }

        U256::from_str_radix(digits, 16).map(Self).map_err(|_| error())
    }
}

impl Element {
    /// The big-endian bytes of this value
    ///
    /// ```rust
    /// # use shade_primitives::*;
    /// let mut expected = [0; 32];
    /// expected[31] = 1;
    ///
    /// assert_eq!(Element::ONE.to_be_bytes(), expected);
    /// ```
    #[inline]
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    /// The little-endian bytes of this value
    #[inline]
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 32] {
        self.0.to_le_bytes()
    }

    /// Read a value from big-endian bytes
    #[inline]
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_be_bytes(bytes))
    }

    /// Read a value from little-endian bytes
    #[inline]
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn from_str_accepts_both_prefixes() {
        assert_eq!(Element::from_str("0").unwrap(), Element::ZERO);
        assert_eq!(Element::from_str("0x0").unwrap(), Element::ZERO);
        assert_eq!(Element::from_str("0x1").unwrap(), Element::ONE);
        assert_eq!(Element::from_str("0xB").unwrap(), Element::from(11u64));
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!(Element::from_str("").is_err());
        assert!(Element::from_str("0x").is_err());
        assert!(Element::from_str("0xg1").is_err());
        assert!(Element::from_str(&"f".repeat(65)).is_err());
    }

    #[proptest]
    fn be_bytes_roundtrip(bytes: [u8; 32]) {
        assert_eq!(Element::from_be_bytes(bytes).to_be_bytes(), bytes);
    }

    #[proptest]
    fn u128_conversion(value: u128) {
        let element = Element::from(value);
        assert_eq!(u128::try_from(element).unwrap(), value);
    }
}
