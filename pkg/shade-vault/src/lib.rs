#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! The deposit and withdrawal state machine of the shade pool
//!
//! A [`Vault`] owns the commitment tree, the set of spent nullifier hashes, the pool balance and
//! the event log. Deposits append a commitment; withdrawals check a proof against a recent root
//! and pay out through a [`Settlement`] layer. An owner can pause the vault, schedule a delayed
//! emergency pause, collect protocol fees and drain a paused vault.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use shade_protocol::{Note, WitnessVerifier};
//! # use shade_vault::*;
//! let config = VaultConfig {
//!     owner: Address([1; 20]),
//!     fee_sink: Address([2; 20]),
//!     ..VaultConfig::default()
//! };
//!
//! let settlement = Arc::new(InMemorySettlement::new());
//! let vault = Vault::builder(config, WitnessVerifier::<20>, settlement)
//!     .build()
//!     .unwrap();
//!
//! let note = Note::generate(1_000, 1);
//! let index = vault.deposit(note.commitment(), 1_000, Address([3; 20])).unwrap();
//!
//! assert_eq!(index, 0);
//! assert_eq!(vault.stats().balance, 1_000);
//! ```

mod admin;
mod clock;
mod config;
mod error;
mod events;
mod registry;
mod settlement;
mod state;
mod vault;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, VaultConfig, ENV_PREFIX};
pub use error::{Error, InvalidInput, Result};
pub use events::{DepositEvent, WithdrawalEvent};
pub use registry::{InstanceDescriptor, RegistryNotifier};
pub use settlement::{InMemorySettlement, Settlement, SettlementError};
pub use shade_primitives::{Address, Element};
pub use state::{Status, VaultStats};
pub use vault::{Vault, VaultBuilder};
