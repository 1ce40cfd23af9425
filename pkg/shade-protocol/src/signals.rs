use serde::{Deserialize, Serialize};
use shade_primitives::{Address, Element};

use crate::Relation;

/// The number of public inputs a withdrawal proof has
pub const PUBLIC_SIGNAL_COUNT: usize = 5;

/// The protocol fee may be at most `amount / FEE_DIVISOR`
pub const FEE_DIVISOR: u128 = 100;

/// The largest protocol fee allowed on a withdrawal of `amount`
///
/// Division truncates, so amounts below 100 cannot carry a fee at all. The proof relation and the
/// vault both call this, so they can never disagree about rounding.
///
/// ```rust
/// # use shade_protocol::*;
/// assert_eq!(fee_cap(10_000), 100);
/// assert_eq!(fee_cap(199), 1);
/// assert_eq!(fee_cap(99), 0);
/// ```
#[inline]
#[must_use]
pub const fn fee_cap(amount: u128) -> u128 {
    amount / FEE_DIVISOR
}

/// The public inputs of a withdrawal proof
///
/// The order is fixed, since it is baked into the verifying key:
/// `[nullifier_hash, root, recipient, protocol_fee, amount]`
///
/// Every signal is carried as a raw [`Element`], exactly as the verifier sees it. Range checks
/// (canonical encoding, 160-bit recipients, u128 amounts) are done by whoever consumes them, via
/// the typed accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSignals {
    /// `poseidon([secret, nullifier])`
    pub nullifier_hash: Element,
    /// A recent root of the tree containing the commitment
    pub root: Element,
    /// Who receives `amount - protocol_fee`
    pub recipient: Element,
    /// The part of `amount` kept by the protocol
    pub protocol_fee: Element,
    /// The amount committed to at deposit time
    pub amount: Element,
}

impl PublicSignals {
    /// Build signals from typed values
    #[must_use]
    pub fn new(
        nullifier_hash: Element,
        root: Element,
        recipient: Address,
        protocol_fee: u128,
        amount: u128,
    ) -> Self {
        Self {
            nullifier_hash,
            root,
            recipient: Element::from(recipient),
            protocol_fee: Element::from(protocol_fee),
            amount: Element::from(amount),
        }
    }

    /// The signals in proof order
    #[must_use]
    pub fn to_array(&self) -> [Element; PUBLIC_SIGNAL_COUNT] {
        [
            self.nullifier_hash,
            self.root,
            self.recipient,
            self.protocol_fee,
            self.amount,
        ]
    }

    /// Read signals given in proof order
    ///
    /// ```rust
    /// # use shade_protocol::*;
    /// let raw = [1, 2, 3, 4, 5].map(Element::new);
    /// let signals = PublicSignals::from_array(raw);
    ///
    /// assert_eq!(signals.root, Element::new(2));
    /// assert_eq!(signals.amount, Element::new(5));
    /// assert_eq!(signals.to_array(), raw);
    /// ```
    #[must_use]
    pub fn from_array(
        [nullifier_hash, root, recipient, protocol_fee, amount]: [Element; PUBLIC_SIGNAL_COUNT],
    ) -> Self {
        Self {
            nullifier_hash,
            root,
            recipient,
            protocol_fee,
            amount,
        }
    }

    /// The first signal that is not a canonical field element, if any
    #[must_use]
    pub fn first_non_canonical(&self) -> Option<Element> {
        self.to_array().into_iter().find(|e| !e.is_canonical())
    }

    /// The recipient as an address, if it fits in 160 bits
    pub fn recipient_address(&self) -> Result<Address, Relation> {
        Address::try_from(self.recipient).map_err(|_| Relation::RecipientTooWide)
    }

    /// The amount, if it fits in a u128
    pub fn amount_value(&self) -> Result<u128, Relation> {
        u128::try_from(self.amount).map_err(|_| Relation::SignalOutOfRange(self.amount))
    }

    /// The protocol fee, if it fits in a u128
    pub fn fee_value(&self) -> Result<u128, Relation> {
        u128::try_from(self.protocol_fee).map_err(|_| Relation::SignalOutOfRange(self.protocol_fee))
    }

    /// Check the relations that only involve public signals
    ///
    /// That is: every signal is canonical, the amount is non-zero, the fee is within
    /// [`fee_cap`], and the recipient fits in 160 bits
    pub fn check_public_relations(&self) -> Result<(), Relation> {
        if let Some(element) = self.first_non_canonical() {
            return Err(Relation::SignalOutOfRange(element));
        }

        let amount = self.amount_value()?;
        if amount == 0 {
            return Err(Relation::ZeroAmount);
        }

        if self.fee_value()? > fee_cap(amount) {
            return Err(Relation::FeeAboveCap);
        }

        self.recipient_address()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use super::*;

    fn signals(fee: u128, amount: u128) -> PublicSignals {
        PublicSignals::new(Element::new(1), Element::new(2), Address([9; 20]), fee, amount)
    }

    #[proptest]
    fn array_order_is_stable(raw: [Element; 5]) {
        let signals = PublicSignals::from_array(raw);

        assert_eq!(signals.nullifier_hash, raw[0]);
        assert_eq!(signals.root, raw[1]);
        assert_eq!(signals.recipient, raw[2]);
        assert_eq!(signals.protocol_fee, raw[3]);
        assert_eq!(signals.amount, raw[4]);
        assert_eq!(signals.to_array(), raw);
    }

    #[proptest]
    fn fee_cap_truncates(amount: u128) {
        let cap = fee_cap(amount);

        assert!(cap * 100 <= amount);
        assert!(amount - cap * 100 < 100);

        if amount > 0 {
            assert_eq!(signals(cap, amount).check_public_relations(), Ok(()));
            assert_eq!(
                signals(cap + 1, amount).check_public_relations(),
                Err(Relation::FeeAboveCap)
            );
        }
    }

    #[test]
    fn public_relations() {
        assert_eq!(
            signals(0, 0).check_public_relations(),
            Err(Relation::ZeroAmount)
        );
        assert_eq!(
            signals(1, 99).check_public_relations(),
            Err(Relation::FeeAboveCap)
        );
        assert_eq!(signals(1, 100).check_public_relations(), Ok(()));

        let mut wide = signals(0, 100);
        wide.recipient = Element::ONE << 160;
        assert_eq!(
            wide.check_public_relations(),
            Err(Relation::RecipientTooWide)
        );

        let mut non_canonical = signals(0, 100);
        non_canonical.root = Element::MODULUS;
        assert_eq!(
            non_canonical.check_public_relations(),
            Err(Relation::SignalOutOfRange(Element::MODULUS))
        );

        let mut huge_amount = signals(0, 100);
        huge_amount.amount = Element::ONE << 200;
        assert_eq!(
            huge_amount.check_public_relations(),
            Err(Relation::SignalOutOfRange(Element::ONE << 200))
        );
    }

    #[test]
    fn json_uses_hex_strings() {
        let json = serde_json::to_value(signals(1, 100)).unwrap();

        assert_eq!(
            json["amount"],
            "0x0000000000000000000000000000000000000000000000000000000000000064"
        );
        assert!(json.get("nullifierHash").is_some());
        assert!(json.get("protocolFee").is_some());
    }
}
