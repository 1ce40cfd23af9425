use borsh::{BorshDeserialize, BorshSerialize};
use shade_primitives::{poseidon, Element};
use shade_tree::MerklePath;

use crate::{Note, PublicSignals, Relation};

/// The private inputs of a withdrawal proof
///
/// Together with [`PublicSignals`], this is the full statement: "I know a `secret` and
/// `nullifier` such that `poseidon([secret, nullifier, amount])` sits at the end of `path` in the
/// tree with root `root`, and `poseidon([secret, nullifier])` is `nullifier_hash`"
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Witness<const DEPTH: usize> {
    /// The note's secret
    pub secret: Element,
    /// The note's nullifier
    pub nullifier: Element,
    /// The authentication path of the note's commitment
    pub path: MerklePath<DEPTH>,
}

impl<const DEPTH: usize> Witness<DEPTH> {
    /// The witness for withdrawing `note`, given its path in the tree
    #[must_use]
    pub fn new(note: &Note, path: MerklePath<DEPTH>) -> Self {
        Self {
            secret: note.secret(),
            nullifier: note.nullifier(),
            path,
        }
    }

    /// Evaluate the withdrawal statement natively
    ///
    /// Returns the first relation that does not hold. This is what a circuit enforces, evaluated
    /// in the clear, so it offers no privacy on its own.
    pub fn check_relations(&self, signals: &PublicSignals) -> Result<(), Relation> {
        signals.check_public_relations()?;

        if self.secret.is_zero() || self.nullifier.is_zero() {
            return Err(Relation::ZeroSecret);
        }

        if poseidon([self.secret, self.nullifier]) != signals.nullifier_hash {
            return Err(Relation::NullifierHash);
        }

        let commitment = poseidon([self.secret, self.nullifier, signals.amount]);
        if self.path.compute_root(commitment) != signals.root {
            return Err(Relation::Membership);
        }

        Ok(())
    }
}

/// A stand-in verifier whose "proof" is the witness itself
///
/// It checks exactly the relations a real circuit would, but reveals which deposit is being
/// withdrawn, so it only exists for tests and local simulation.
#[cfg(any(test, feature = "test-api"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct WitnessVerifier<const DEPTH: usize>;

#[cfg(any(test, feature = "test-api"))]
impl<const DEPTH: usize> crate::Verifier for WitnessVerifier<DEPTH> {
    type Proof = Witness<DEPTH>;

    fn verify(&self, proof: &Self::Proof, signals: &PublicSignals) -> bool {
        match proof.check_relations(signals) {
            Ok(()) => true,
            Err(relation) => {
                tracing::debug!(%relation, "witness rejected");
                false
            }
        }
    }

    fn decode_proof(&self, bytes: &[u8]) -> crate::Result<Self::Proof> {
        Witness::try_from_slice(bytes).map_err(|e| crate::Error::ProofFormat(e.to_string()))
    }
}
