use shade_primitives::Element;

/// Errors produced when building notes or setting up a verifier
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A note part was zero or not a canonical field element
    #[error("invalid note: {0}")]
    InvalidNote(&'static str),

    /// A backup string could not be parsed
    #[error("malformed note string: {0}")]
    NoteFormat(String),

    /// The witness does not satisfy the statement
    #[error("relation not satisfied: {0}")]
    Relation(#[from] Relation),

    /// The verifying key could not be decoded, or has the wrong shape
    #[error("invalid verifying key: {0}")]
    VerifyingKey(String),

    /// A proof could not be decoded
    #[error("malformed proof: {0}")]
    ProofFormat(String),

    /// The verifying key was set up for a different Poseidon instance
    #[error("hash parameter mismatch: key expects {expected}, this build hashes with {actual}")]
    ParameterMismatch {
        /// The fingerprint the key was produced against, as hex
        expected: String,
        /// The fingerprint of [`shade_primitives::parameters`], as hex
        actual: String,
    },
}

/// Alias for `Result<T, shade_protocol::Error>`
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A relation of the withdrawal statement that a witness failed to satisfy
///
/// The commitment itself is never an input: it is always recomputed as
/// `poseidon([secret, nullifier, amount])` and then fed to the membership check, so a wrong
/// commitment shows up as [`Relation::Membership`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Relation {
    /// `nullifier_hash != poseidon([secret, nullifier])`
    #[error("the nullifier hash does not match the secret and nullifier")]
    NullifierHash,

    /// The path from the commitment does not reach `root`
    #[error("the commitment is not in the tree with the given root")]
    Membership,

    /// `amount == 0`
    #[error("the amount is zero")]
    ZeroAmount,

    /// `protocol_fee > amount / 100`
    #[error("the protocol fee is above the cap")]
    FeeAboveCap,

    /// `recipient >= 2^160`
    #[error("the recipient does not fit in 160 bits")]
    RecipientTooWide,

    /// `secret == 0` or `nullifier == 0`
    #[error("the secret and nullifier must be non-zero")]
    ZeroSecret,

    /// A public signal is not a canonical field element, or a numeric one does not fit in a u128
    #[error("public signal {0} is out of range")]
    SignalOutOfRange(Element),
}
