use chrono::{DateTime, Utc};
use shade_primitives::{Address, Element};

use crate::{settlement::SettlementError, Status};

/// A rejected vault operation
///
/// Every variant is returned before any state is committed, or after the partial effects have
/// been rolled back, so a rejected call never changes the vault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An argument or public signal is malformed or out of bounds
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The tree has no free leaf slots left
    #[error("the deposit tree is full ({capacity} leaves)")]
    CapacityExceeded {
        /// The number of leaves the tree holds
        capacity: u64,
    },

    /// This commitment has already been deposited
    #[error("commitment {0} has already been deposited")]
    DuplicateCommitment(Element),

    /// This nullifier hash has already been withdrawn
    #[error("nullifier hash {0} has already been spent")]
    NullifierAlreadySpent(Element),

    /// The root is not one of the recent roots of the tree
    #[error("root {0} is not a recent root")]
    UnknownRoot(Element),

    /// The verifier rejected the proof for these public signals
    #[error("the proof does not verify for these public signals")]
    ProofInvalid,

    /// The vault does not hold enough to pay this withdrawal
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The amount requested
        requested: u128,
        /// The amount held
        available: u128,
    },

    /// The operation needs a different vault state
    #[error("operation not allowed while the vault is {0}")]
    NotActive(Status),

    /// The caller does not hold the required capability
    #[error("{0} is not allowed to perform this operation")]
    Unauthorized(Address),

    /// An emergency pause was activated before its delay elapsed, or without a request
    #[error("emergency pause is not ready (ready at: {ready_at:?})")]
    EmergencyNotReady {
        /// When the pending request becomes activatable, if there is one
        ready_at: Option<DateTime<Utc>>,
    },

    /// The settlement layer refused a transfer
    #[error("settlement failed: {0}")]
    Settlement(#[from] SettlementError),
}

impl Error {
    /// Whether the same call could succeed later without changing its arguments
    ///
    /// A stale root, a failed transfer, a paused vault or a temporarily underfunded vault can all
    /// clear up on their own. A spent nullifier, a duplicate commitment or a full tree cannot.
    /// Note that a stale root becomes permanent once it leaves the root history, and a rejected
    /// proof is only fixed by generating a new proof.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UnknownRoot(_)
            | Self::InsufficientFunds { .. }
            | Self::NotActive(_)
            | Self::EmergencyNotReady { .. }
            | Self::Settlement(_) => true,

            Self::InvalidInput(_)
            | Self::CapacityExceeded { .. }
            | Self::DuplicateCommitment(_)
            | Self::NullifierAlreadySpent(_)
            | Self::ProofInvalid
            | Self::Unauthorized(_) => false,
        }
    }
}

/// The ways an input can be rejected before any state is touched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    /// Zero is reserved for empty leaves
    #[error("the commitment is zero")]
    ZeroCommitment,

    /// A value is not below the field modulus
    #[error("{0} is not a canonical field element")]
    NonCanonical(Element),

    /// The amount is outside the configured deposit bounds
    #[error("amount {amount} is outside [{min}, {max}]")]
    AmountOutOfRange {
        /// The rejected amount
        amount: Element,
        /// The smallest allowed amount
        min: u128,
        /// The largest allowed amount
        max: u128,
    },

    /// The recipient is the zero address
    #[error("the recipient is the zero address")]
    ZeroRecipient,

    /// The recipient does not fit in 160 bits
    #[error("recipient {0} does not fit in 160 bits")]
    RecipientOutOfRange(Element),

    /// The protocol fee is above `amount / 100`
    #[error("fee {fee} is above the cap of {cap}")]
    FeeAboveCap {
        /// The requested fee
        fee: Element,
        /// The largest fee allowed for this amount
        cap: u128,
    },

    /// Zero is never a valid nullifier hash
    #[error("the nullifier hash is zero")]
    ZeroNullifierHash,

    /// Zero is never a valid root
    #[error("the root is zero")]
    ZeroRoot,

    /// The proof bytes could not be decoded
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The new owner is the zero address
    #[error("the zero address cannot own the vault")]
    ZeroOwner,
}

/// Alias for `Result<T, shade_vault::Error>`
pub type Result<T, E = Error> = core::result::Result<T, E>;
