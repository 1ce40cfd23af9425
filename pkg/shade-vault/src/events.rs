use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shade_primitives::{Address, Element};

/// A commitment was added to the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEvent {
    /// The new leaf
    pub commitment: Element,
    /// Where the leaf was inserted
    pub leaf_index: u64,
    /// The value that came with it
    pub amount: u128,
    /// When the deposit was accepted
    pub timestamp: DateTime<Utc>,
    /// Who made the deposit
    pub depositor: Address,
}

/// A note was spent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalEvent {
    /// The revealed nullifier hash
    pub nullifier_hash: Element,
    /// Who received `amount - fee`
    pub recipient: Address,
    /// The full amount of the note
    pub amount: u128,
    /// The protocol fee kept by the vault
    pub fee: u128,
    /// When the withdrawal was accepted
    pub timestamp: DateTime<Utc>,
}
