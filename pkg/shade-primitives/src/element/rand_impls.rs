use rand::{CryptoRng, RngCore};

use crate::Element;

impl Element {
    /// Sample a uniformly random canonical element
    ///
    /// The modulus is just under 2^254, so we draw 254 random bits and reject anything at or above
    /// the modulus (this happens for roughly 1 in 4 draws). Rejection keeps the distribution
    /// uniform, unlike reducing a 256-bit sample modulo the prime.
    ///
    /// ```rust
    /// # use shade_primitives::*;
    /// let element = Element::secure_random(&mut rand::rngs::OsRng);
    /// assert!(element.is_canonical());
    /// ```
    #[must_use]
    pub fn secure_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            bytes[0] &= 0x3f;

            let candidate = Element::from_be_bytes(bytes);
            if candidate.is_canonical() {
                return candidate;
            }
        }
    }

    /// Like [`Element::secure_random`], but never returns zero
    #[must_use]
    pub fn secure_random_nonzero<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let candidate = Self::secure_random(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

    use crate::Element;

    #[test]
    fn random_elements_are_canonical_and_distinct() {
        let mut rng = ChaChaRng::from_seed([7; 32]);

        let elements: Vec<_> = (0..256)
            .map(|_| Element::secure_random_nonzero(&mut rng))
            .collect();

        assert!(elements.iter().all(Element::is_canonical));
        assert!(elements.iter().all(|e| !e.is_zero()));

        let mut deduped = elements.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), elements.len());
    }

    #[test]
    fn random_elements_use_the_high_bits() {
        let mut rng = ChaChaRng::from_seed([1; 32]);

        let widest = (0..64)
            .map(|_| Element::secure_random(&mut rng).bits())
            .max()
            .unwrap();

        assert!(widest >= 250);
    }
}
