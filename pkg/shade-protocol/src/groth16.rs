use ark_bn254::{Bn254, Fr};
use ark_ff::PrimeField;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use shade_primitives::{parameters, Element};

use crate::{Error, PublicSignals, Result, Verifier, PUBLIC_SIGNAL_COUNT};

/// A Groth16 proof over BN254
pub type Groth16Proof = Proof<Bn254>;

/// Verifies Groth16 withdrawal proofs against a verifying key from the trusted setup
///
/// The key is checked once, at construction:
///  - it must decode from its compressed canonical encoding
///  - it must have exactly [`PUBLIC_SIGNAL_COUNT`] public inputs
///  - it must have been produced for the same Poseidon instance this build hashes with
#[derive(Clone)]
pub struct Groth16Verifier {
    key: PreparedVerifyingKey<Bn254>,
}

impl core::fmt::Debug for Groth16Verifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Groth16Verifier")
            .field("public_inputs", &PUBLIC_SIGNAL_COUNT)
            .finish_non_exhaustive()
    }
}

impl Groth16Verifier {
    /// Load a compressed verifying key
    ///
    /// `hash_fingerprint` is the [`HashParameters::fingerprint`] recorded when the circuit was
    /// compiled
    ///
    /// [`HashParameters::fingerprint`]: shade_primitives::HashParameters::fingerprint
    pub fn new(verifying_key: &[u8], hash_fingerprint: [u8; 32]) -> Result<Self> {
        let actual = parameters().fingerprint;
        if actual != hash_fingerprint {
            return Err(Error::ParameterMismatch {
                expected: hex::encode(hash_fingerprint),
                actual: hex::encode(actual),
            });
        }

        let key = VerifyingKey::<Bn254>::deserialize_compressed(verifying_key)
            .map_err(|e| Error::VerifyingKey(e.to_string()))?;

        // one extra base point for the constant term
        let inputs = key.gamma_abc_g1.len().saturating_sub(1);
        if inputs != PUBLIC_SIGNAL_COUNT {
            return Err(Error::VerifyingKey(format!(
                "expected {PUBLIC_SIGNAL_COUNT} public inputs, the key has {inputs}"
            )));
        }

        Ok(Self {
            key: prepare_verifying_key(&key),
        })
    }
}

impl Verifier for Groth16Verifier {
    type Proof = Groth16Proof;

    fn verify(&self, proof: &Self::Proof, signals: &PublicSignals) -> bool {
        // a non-canonical signal would alias a smaller one once reduced
        if let Some(element) = signals.first_non_canonical() {
            tracing::debug!(%element, "non-canonical public signal");
            return false;
        }

        let inputs = signals.to_array().map(to_scalar);

        match Groth16::<Bn254>::verify_proof(&self.key, proof, &inputs) {
            Ok(valid) => valid,
            Err(error) => {
                tracing::debug!(?error, "groth16 verification failed");
                false
            }
        }
    }

    fn decode_proof(&self, bytes: &[u8]) -> Result<Self::Proof> {
        Groth16Proof::deserialize_compressed(bytes).map_err(|e| Error::ProofFormat(e.to_string()))
    }
}

fn to_scalar(element: Element) -> Fr {
    Fr::from_be_bytes_mod_order(&element.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_keep_their_value() {
        assert_eq!(to_scalar(Element::new(42)), Fr::from(42u64));
        assert_eq!(to_scalar(Element::ZERO), Fr::from(0u64));
    }

    #[test]
    fn modulus_matches_the_scalar_field() {
        // the modulus is odd, so clearing its lowest bit gives the largest canonical element
        let minus_one = Element::MODULUS ^ Element::ONE;
        assert_eq!(to_scalar(minus_one), -Fr::from(1u64));
    }

    #[test]
    fn garbage_keys_are_rejected() {
        let result = Groth16Verifier::new(&[1, 2, 3], parameters().fingerprint);
        assert!(matches!(result, Err(Error::VerifyingKey(_))));
    }

    #[test]
    fn fingerprint_is_checked_first() {
        let result = Groth16Verifier::new(&[], [0; 32]);
        assert!(matches!(result, Err(Error::ParameterMismatch { .. })));
    }
}
