#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! The commitment scheme and the proof boundary of the shade pool
//!
//! A depositor creates a [`Note`] (two random field elements and an amount), publishes its
//! [`commitment`][Note::commitment] and keeps the note itself secret. To withdraw, they prove
//! that they know a note whose commitment is in the tree, revealing only its
//! [`nullifier_hash`][Note::nullifier_hash]. The statement being proven is fixed by
//! [`PublicSignals`] (what the verifier sees) and [`Witness`] (what only the prover knows).
//!
//! ```rust
//! # use shade_protocol::*;
//! # use shade_tree::MerklePath;
//! let note = Note::generate(1_000, 1);
//!
//! // the tree holds one commitment
//! let leaves = [note.commitment()];
//! let path = MerklePath::<4>::from_leaves(&leaves, 0).unwrap();
//! let root = path.compute_root(note.commitment());
//!
//! let recipient = Address([7; 20]);
//! let signals = PublicSignals::new(note.nullifier_hash(), root, recipient, 10, 1_000);
//! let witness = Witness::new(&note, path);
//!
//! assert_eq!(witness.check_relations(&signals), Ok(()));
//! ```

mod error;
mod groth16;
mod note;
mod signals;
mod verifier;
mod witness;

pub use error::{Error, Relation, Result};
pub use groth16::{Groth16Proof, Groth16Verifier};
pub use note::Note;
pub use shade_primitives::{Address, Element};
pub use signals::{fee_cap, PublicSignals, FEE_DIVISOR, PUBLIC_SIGNAL_COUNT};
pub use verifier::Verifier;
pub use witness::Witness;

#[cfg(any(test, feature = "test-api"))]
pub use witness::WitnessVerifier;
