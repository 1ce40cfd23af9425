use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shade_primitives::{Address, Element};
use shade_tree::IncrementalTree;

use crate::{DepositEvent, WithdrawalEvent};

/// The operating mode of a vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// Deposits and withdrawals are accepted
    Active,
    /// Stopped by the owner
    Paused,
    /// Stopped by a delayed emergency request
    EmergencyPaused,
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::EmergencyPaused => "emergency paused",
        })
    }
}

/// A point-in-time copy of the vault's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStats {
    /// Accepted deposits
    pub deposit_count: u64,
    /// Accepted withdrawals
    pub withdrawal_count: u64,
    /// Every protocol fee ever charged
    pub total_fees: u128,
    /// Fees charged but not yet paid to the fee sink
    pub accrued_fees: u128,
    /// The index the next deposit will get
    pub next_index: u64,
    /// The current root of the tree
    pub last_root: Element,
    /// Value backing unspent notes
    pub balance: u128,
    /// The operating mode
    pub status: Status,
    /// When a pending emergency pause can be activated
    pub emergency_ready_at: Option<DateTime<Utc>>,
}

/// Everything a vault owns, guarded as one unit
#[derive(Debug, Clone)]
pub(crate) struct VaultState<const DEPTH: usize> {
    pub tree: IncrementalTree<DEPTH>,
    pub commitments: HashSet<Element>,
    pub nullifier_hashes: HashSet<Element>,
    pub status: Status,
    pub owner: Address,
    pub pending_owner: Option<Address>,
    pub emergency_requested_at: Option<DateTime<Utc>>,
    pub balance: u128,
    pub accrued_fees: u128,
    pub total_fees: u128,
    pub withdrawal_count: u64,
    pub deposits: Vec<DepositEvent>,
    pub withdrawals: Vec<WithdrawalEvent>,
}

impl<const DEPTH: usize> VaultState<DEPTH> {
    pub fn new(owner: Address) -> Self {
        Self {
            tree: IncrementalTree::new(),
            commitments: HashSet::new(),
            nullifier_hashes: HashSet::new(),
            status: Status::Active,
            owner,
            pending_owner: None,
            emergency_requested_at: None,
            balance: 0,
            accrued_fees: 0,
            total_fees: 0,
            withdrawal_count: 0,
            deposits: Vec::new(),
            withdrawals: Vec::new(),
        }
    }
}
