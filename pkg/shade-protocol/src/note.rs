use std::{fmt, str::FromStr};

use rand::{rngs::OsRng, CryptoRng, RngCore};
use sha3::{Digest, Keccak256};
use shade_primitives::{poseidon, Element};

use crate::{Error, Result};

const PREFIX: &str = "shade";
const CHECKSUM_LEN: usize = 4;

/// The secret half of a deposit
///
/// Only the [`commitment`][Note::commitment] is ever published at deposit time, and only the
/// [`nullifier_hash`][Note::nullifier_hash] at withdrawal time. Anyone holding the note can
/// withdraw it, so the `Debug` impl never prints the secret parts.
///
/// A note can be backed up as a string and parsed back:
/// ```rust
/// # use shade_protocol::*;
/// let note = Note::generate(5_000, 1);
/// let backup = note.to_string();
///
/// assert!(backup.starts_with("shade-5000-1-0x"));
/// assert_eq!(backup.parse::<Note>().unwrap(), note);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Note {
    secret: Element,
    nullifier: Element,
    amount: u128,
    chain_id: u64,
}

impl Note {
    /// Generate a fresh note with randomness from the operating system
    #[must_use]
    pub fn generate(amount: u128, chain_id: u64) -> Self {
        Self::generate_with(&mut OsRng, amount, chain_id)
    }

    /// Generate a fresh note with randomness from `rng`
    ///
    /// The secret and nullifier are drawn independently and uniformly from the non-zero canonical
    /// field elements
    #[must_use]
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R, amount: u128, chain_id: u64) -> Self {
        Self {
            secret: Element::secure_random_nonzero(rng),
            nullifier: Element::secure_random_nonzero(rng),
            amount,
            chain_id,
        }
    }

    /// Rebuild a note from its parts
    pub fn from_parts(
        secret: Element,
        nullifier: Element,
        amount: u128,
        chain_id: u64,
    ) -> Result<Self> {
        if secret.is_zero() || nullifier.is_zero() {
            return Err(Error::InvalidNote("secret and nullifier must be non-zero"));
        }

        if !secret.is_canonical() || !nullifier.is_canonical() {
            return Err(Error::InvalidNote(
                "secret and nullifier must be canonical field elements",
            ));
        }

        Ok(Self {
            secret,
            nullifier,
            amount,
            chain_id,
        })
    }

    /// `poseidon([secret, nullifier, amount])`, the leaf inserted at deposit time
    #[must_use]
    pub fn commitment(&self) -> Element {
        poseidon([self.secret, self.nullifier, Element::from(self.amount)])
    }

    /// `poseidon([secret, nullifier])`, revealed once when the note is withdrawn
    #[must_use]
    pub fn nullifier_hash(&self) -> Element {
        poseidon([self.secret, self.nullifier])
    }

    /// The private randomness that binds the commitment
    #[must_use]
    pub fn secret(&self) -> Element {
        self.secret
    }

    /// The private randomness behind the nullifier hash
    #[must_use]
    pub fn nullifier(&self) -> Element {
        self.nullifier
    }

    /// The deposited amount
    #[must_use]
    pub fn amount(&self) -> u128 {
        self.amount
    }

    /// The chain the note was created for
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let mut hasher = Keccak256::new();
        hasher.update(format!("{PREFIX}-{}-{}-", self.amount, self.chain_id));
        hasher.update(self.secret.to_be_bytes());
        hasher.update(self.nullifier.to_be_bytes());
        let digest = hasher.finalize();

        let mut checksum = [0; CHECKSUM_LEN];
        checksum.copy_from_slice(&digest[..CHECKSUM_LEN]);
        checksum
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("commitment", &self.commitment())
            .field("amount", &self.amount)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

/// `shade-<amount>-<chain id>-0x<secret><nullifier><checksum>`
///
/// The secret and nullifier are 32 bytes each, and the checksum is the first 4 bytes of
/// Keccak-256 over everything before it
impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}-{}-{}-0x{}{}{}",
            self.amount,
            self.chain_id,
            self.secret.to_hex(),
            self.nullifier.to_hex(),
            hex::encode(self.checksum()),
        )
    }
}

impl FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let format_error = |reason: &str| Error::NoteFormat(reason.to_owned());

        let mut parts = s.trim().splitn(4, '-');

        if parts.next() != Some(PREFIX) {
            return Err(format_error("missing `shade-` prefix"));
        }

        let amount = parts
            .next()
            .and_then(|amount| amount.parse::<u128>().ok())
            .ok_or_else(|| format_error("bad amount"))?;

        let chain_id = parts
            .next()
            .and_then(|chain| chain.parse::<u64>().ok())
            .ok_or_else(|| format_error("bad chain id"))?;

        let payload = parts
            .next()
            .and_then(|payload| payload.strip_prefix("0x"))
            .ok_or_else(|| format_error("missing 0x payload"))?;

        let bytes = hex::decode(payload).map_err(|_| format_error("payload is not hex"))?;
        if bytes.len() != 64 + CHECKSUM_LEN {
            return Err(format_error("payload has the wrong length"));
        }

        let mut secret = [0; 32];
        let mut nullifier = [0; 32];
        secret.copy_from_slice(&bytes[..32]);
        nullifier.copy_from_slice(&bytes[32..64]);

        let note = Self::from_parts(
            Element::from_be_bytes(secret),
            Element::from_be_bytes(nullifier),
            amount,
            chain_id,
        )?;

        if note.checksum()[..] != bytes[64..] {
            return Err(format_error("checksum mismatch"));
        }

        Ok(note)
    }
}
