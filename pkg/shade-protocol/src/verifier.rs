use std::sync::Arc;

use crate::{PublicSignals, Result};

/// Something that can check a withdrawal proof against its public signals
///
/// The vault treats this as opaque: a proof either verifies for exactly these signals, or it
/// doesn't. Implementations must be deterministic and must not panic on malformed input.
pub trait Verifier: Send + Sync {
    /// The proof format this verifier accepts
    type Proof;

    /// Whether `proof` is valid for `signals`
    fn verify(&self, proof: &Self::Proof, signals: &PublicSignals) -> bool;

    /// Decode a proof from its wire encoding
    fn decode_proof(&self, bytes: &[u8]) -> Result<Self::Proof>;
}

impl<V: Verifier + ?Sized> Verifier for Arc<V> {
    type Proof = V::Proof;

    fn verify(&self, proof: &Self::Proof, signals: &PublicSignals) -> bool {
        (**self).verify(proof, signals)
    }

    fn decode_proof(&self, bytes: &[u8]) -> Result<Self::Proof> {
        (**self).decode_proof(bytes)
    }
}
