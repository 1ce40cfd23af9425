#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! Field elements and the Poseidon hash shared by every layer of the shade pool
//!
//! Everything in the pool (commitments, nullifier hashes, tree nodes and roots) is an
//! [`Element`] of the BN254 scalar field, and every digest is computed with [`poseidon`]. The
//! permutation parameters come from the same crate that provides the in-circuit Poseidon chip, so
//! a root computed here is bit-identical to the root a proof constrains.
//!
//! ```rust
//! # use shade_primitives::*;
//! let secret = Element::new(1);
//! let nullifier = Element::new(2);
//!
//! let nullifier_hash = poseidon([secret, nullifier]);
//! let commitment = poseidon([secret, nullifier, Element::new(100)]);
//!
//! assert_ne!(nullifier_hash, commitment);
//! ```

mod address;
mod element;
mod hash;
mod params;
mod path;

pub use address::{Address, AddressError};
pub use element::{Element, ParseElementError};
pub use hash::poseidon;
pub use params::{parameters, HashParameters};
pub use path::compute_merkle_root;

/// The prime field that [`Element`]s are reduced into before hashing
///
/// This is the scalar field of BN254, i.e. integers modulo [`Element::MODULUS`]
pub type Base = poseidon_circuit::Bn256Fr;
