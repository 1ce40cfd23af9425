use ethnum::U256;
use serde::{Deserialize, Deserializer, Serializer};

/// Elements are written as `0x`-prefixed, zero-padded hex strings
pub(super) fn serialize<S>(u: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(u.to_be_bytes())))
}

/// Accepts hex with or without the `0x` prefix, and with or without leading zeroes
pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<crate::Element>()
        .map(U256::from)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use test_strategy::proptest;

    use crate::Element;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Deposit {
        commitment: Element,
    }

    #[proptest]
    fn json_roundtrip(commitment: Element) {
        let value = serde_json::to_value(Deposit { commitment }).unwrap();
        let again: Deposit = serde_json::from_value(value).unwrap();

        assert_eq!(again.commitment, commitment);
    }

    #[test]
    fn short_hex_is_accepted() {
        let deposit: Deposit = serde_json::from_str(r#"{"commitment":"0x2a"}"#).unwrap();
        assert_eq!(deposit.commitment, Element::new(42));

        let json = serde_json::to_string(&deposit).unwrap();
        assert_eq!(
            json,
            r#"{"commitment":"0x000000000000000000000000000000000000000000000000000000000000002a"}"#
        );
    }

    #[test]
    fn bad_hex_is_rejected() {
        let result = serde_json::from_str::<Deposit>(r#"{"commitment":"0xnope"}"#);
        assert!(result.is_err());
    }
}
