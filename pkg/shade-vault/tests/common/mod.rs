#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rand_chacha::{rand_core::SeedableRng, ChaChaRng};
use shade_protocol::{fee_cap, Note, PublicSignals, Witness, WitnessVerifier};
use shade_tree::MerklePath;
use shade_vault::{Address, InMemorySettlement, ManualClock, Vault, VaultConfig};

pub const OWNER: Address = Address([0x0a; 20]);
pub const FEE_SINK: Address = Address([0x0f; 20]);
pub const DEPOSITOR: Address = Address([0xde; 20]);
pub const RECIPIENT: Address = Address([0xbe; 20]);

pub const MIN: u128 = 100;
pub const MAX: u128 = 1_000_000;
pub const DELAY_SECS: u64 = 3_600;

pub type TestVault<const DEPTH: usize> = Vault<WitnessVerifier<DEPTH>, DEPTH>;

pub fn config() -> VaultConfig {
    VaultConfig {
        min_deposit: MIN,
        max_deposit: MAX,
        emergency_delay_secs: DELAY_SECS,
        owner: OWNER,
        fee_sink: FEE_SINK,
        chain_id: 1,
    }
}

/// A vault with an in-memory settlement layer, a manual clock and a seeded note generator
pub struct Harness<const DEPTH: usize> {
    pub vault: TestVault<DEPTH>,
    pub settlement: Arc<InMemorySettlement>,
    pub clock: Arc<ManualClock>,
    rng: ChaChaRng,
}

impl<const DEPTH: usize> Harness<DEPTH> {
    pub fn new(seed: u8) -> Self {
        let settlement = Arc::new(InMemorySettlement::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));

        let vault = Vault::builder(config(), WitnessVerifier::<DEPTH>, settlement.clone())
            .clock(clock.clone())
            .build_with_depth::<DEPTH>()
            .unwrap();

        Self {
            vault,
            settlement,
            clock,
            rng: ChaChaRng::from_seed([seed; 32]),
        }
    }

    pub fn note(&mut self, amount: u128) -> Note {
        Note::generate_with(&mut self.rng, amount, 1)
    }

    /// Deposit a fresh note of `amount`
    pub fn deposit(&mut self, amount: u128) -> Note {
        let note = self.note(amount);
        self.vault
            .deposit(note.commitment(), amount, DEPOSITOR)
            .unwrap();
        note
    }

    /// A witness and signals for `note` against the current root, built from the deposit log
    pub fn withdrawal(&self, note: &Note, fee: u128) -> (Witness<DEPTH>, PublicSignals) {
        let leaves: Vec<_> = self
            .vault
            .deposits()
            .iter()
            .map(|event| event.commitment)
            .collect();
        let index = leaves
            .iter()
            .position(|leaf| *leaf == note.commitment())
            .unwrap();

        let path = MerklePath::from_leaves(&leaves, index as u64).unwrap();
        let root = path.compute_root(note.commitment());
        assert_eq!(root, self.vault.last_root());

        let signals =
            PublicSignals::new(note.nullifier_hash(), root, RECIPIENT, fee, note.amount());

        (Witness::new(note, path), signals)
    }

    /// Same as [`Harness::withdrawal`], charging the largest allowed fee
    pub fn max_fee_withdrawal(&self, note: &Note) -> (Witness<DEPTH>, PublicSignals) {
        self.withdrawal(note, fee_cap(note.amount()))
    }
}
