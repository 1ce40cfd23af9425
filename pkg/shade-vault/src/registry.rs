use serde::{Deserialize, Serialize};
use shade_primitives::{parameters, Address};

use crate::VaultConfig;

/// The public description of a vault instance, announced once when it is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDescriptor {
    /// The depth of the deposit tree
    pub depth: usize,
    /// How many recent roots withdrawals may refer to
    pub root_history: usize,
    /// The smallest accepted amount
    pub min_deposit: u128,
    /// The largest accepted amount
    pub max_deposit: u128,
    /// The chain notes are bound to
    pub chain_id: u64,
    /// Who administers the instance
    pub owner: Address,
    /// Identifies the hash parameters, see [`shade_primitives::HashParameters::fingerprint`]
    #[serde(with = "hex::serde")]
    pub hash_fingerprint: [u8; 32],
}

impl InstanceDescriptor {
    pub(crate) fn new(config: &VaultConfig, depth: usize, root_history: usize) -> Self {
        Self {
            depth,
            root_history,
            min_deposit: config.min_deposit,
            max_deposit: config.max_deposit,
            chain_id: config.chain_id,
            owner: config.owner,
            hash_fingerprint: parameters().fingerprint,
        }
    }
}

/// Receives the descriptor of new vault instances
///
/// The relation is one-way: a vault announces itself and never reads anything back.
pub trait RegistryNotifier: Send + Sync {
    /// Record a newly created instance
    fn register(&self, descriptor: &InstanceDescriptor);
}
