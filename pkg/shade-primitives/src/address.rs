use std::{fmt, str::FromStr};

use crate::Element;

/// A 160-bit account address on the settlement layer
///
/// Addresses travel through the proof as a public signal, so they must round-trip through an
/// [`Element`]. Any element below 2^160 is a valid address.
///
/// ```rust
/// # use shade_primitives::*;
/// let address: Address = "0x00000000000000000000000000000000deadbeef".parse().unwrap();
/// let element = Element::from(address);
///
/// assert_eq!(element, Element::new(0xdead_beef));
/// assert_eq!(Address::try_from(element).unwrap(), address);
///
/// // anything wider than 160 bits is not an address
/// assert!(Address::try_from(Element::ONE << 160).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "borsh", derive(borsh::BorshSerialize, borsh::BorshDeserialize))]
pub struct Address(pub [u8; 20]);

/// The error produced when a value cannot be interpreted as an [`Address`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The element has bits set above bit 159
    #[error("{0} does not fit in 160 bits")]
    TooWide(Element),

    /// The string was not 40 hex digits
    #[error("invalid address {0:?}: expected 40 hex digits, optionally prefixed with 0x")]
    Parse(String),
}

impl Address {
    /// The number of bits in an address
    pub const BITS: u32 = 160;

    /// The all-zero address, which is never a valid recipient
    pub const ZERO: Self = Self([0; 20]);

    /// Whether this is the all-zero address
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<Address> for Element {
    fn from(address: Address) -> Self {
        let mut bytes = [0; 32];
        bytes[12..].copy_from_slice(&address.0);
        Element::from_be_bytes(bytes)
    }
}

impl TryFrom<Element> for Address {
    type Error = AddressError;

    fn try_from(element: Element) -> Result<Self, Self::Error> {
        if element.bits() > Self::BITS {
            return Err(AddressError::TooWide(element));
        }

        let bytes = element.to_be_bytes();
        let mut address = [0; 20];
        address.copy_from_slice(&bytes[12..]);
        Ok(Self(address))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| AddressError::Parse(s.to_owned()))?;
        let bytes = <[u8; 20]>::try_from(bytes).map_err(|_| AddressError::Parse(s.to_owned()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "proptest"))]
impl proptest::arbitrary::Arbitrary for Address {
    type Parameters = ();
    type Strategy = proptest::strategy::Map<
        proptest::arbitrary::StrategyFor<[u8; 20]>,
        fn([u8; 20]) -> Self,
    >;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        use proptest::strategy::Strategy;
        proptest::arbitrary::any::<[u8; 20]>().prop_map(Self)
    }
}
