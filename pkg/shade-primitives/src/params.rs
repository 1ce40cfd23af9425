use std::sync::OnceLock;

use ff::PrimeField;
use poseidon_circuit::poseidon::primitives::{P128Pow5T3, Spec};
use sha3::{Digest, Keccak256};

use crate::Base;

const WIDTH: usize = 3;
const RATE: usize = 2;

/// A description of the Poseidon instance used by [`poseidon`][crate::poseidon]
///
/// The off-chain tree, the proving circuit and the verifying key must all agree on these
/// parameters, otherwise every root a prover computes is silently different from the root the
/// vault stores. The [`fingerprint`][HashParameters::fingerprint] commits to the round constants
/// and MDS matrix as well as the shape, so a verifier can compare a single 32-byte value against
/// what it was set up with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashParameters {
    /// The permutation width (`t`)
    pub width: usize,
    /// The number of field elements absorbed per permutation
    pub rate: usize,
    /// The number of full rounds (`R_F`)
    pub full_rounds: usize,
    /// The number of partial rounds (`R_P`)
    pub partial_rounds: usize,
    /// Keccak-256 over the shape, round constants and MDS matrix
    #[cfg_attr(feature = "serde", serde(with = "hex::serde"))]
    pub fingerprint: [u8; 32],
}

/// The parameters of the Poseidon instance this crate hashes with
///
/// Computed once, on first use
///
/// ```rust
/// # use shade_primitives::*;
/// let params = parameters();
///
/// assert_eq!(params.width, 3);
/// assert_eq!(params.rate, 2);
/// assert_eq!(params, parameters());
/// ```
pub fn parameters() -> &'static HashParameters {
    static PARAMETERS: OnceLock<HashParameters> = OnceLock::new();

    PARAMETERS.get_or_init(|| {
        let full_rounds = <P128Pow5T3<Base> as Spec<Base, WIDTH, RATE>>::full_rounds();
        let partial_rounds = <P128Pow5T3<Base> as Spec<Base, WIDTH, RATE>>::partial_rounds();
        let (round_constants, mds, _) = <P128Pow5T3<Base> as Spec<Base, WIDTH, RATE>>::constants();

        let mut hasher = Keccak256::new();

        for shape in [WIDTH, RATE, full_rounds, partial_rounds] {
            hasher.update((shape as u64).to_be_bytes());
        }

        for round in &round_constants {
            for constant in round {
                hasher.update(constant.to_repr());
            }
        }

        for row in &mds {
            for entry in row {
                hasher.update(entry.to_repr());
            }
        }

        HashParameters {
            width: WIDTH,
            rate: RATE,
            full_rounds,
            partial_rounds,
            fingerprint: hasher.finalize().into(),
        }
    })
}

impl HashParameters {
    /// The fingerprint as lowercase hex
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_round_counts() {
        let params = parameters();

        assert_eq!(params.full_rounds, 8);
        assert_eq!(params.partial_rounds, 57);
    }

    #[test]
    fn fingerprint_is_stable() {
        let first = parameters().fingerprint;
        let second = parameters().fingerprint;

        assert_eq!(first, second);
        assert_ne!(first, [0; 32]);
        assert_eq!(parameters().fingerprint_hex().len(), 64);
    }
}
