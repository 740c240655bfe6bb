//! Bulletproofs range proofs over secp256k1.
//!
//! A prover convinces a verifier that a Pedersen commitment `V = v*G + blind*H` opens to a
//! value `v` in `[0, 2^64)` without revealing `v`. Proofs come in two forms: the uncompressed
//! form carries the 64-element witness vectors, the compressed form replaces them by an inner
//! product argument of six rounds. Both are non-interactive via a SHA-256 Fiat-Shamir
//! transcript and both have a JSON encoding.
//!
//! ```no_run
//! use rust_bulletproofs::{Generators, Prover, Transcript};
//! use secp256kfun::{marker::*, Scalar};
//!
//! let gens = Generators::new();
//! let blind = Scalar::random(&mut rand::thread_rng()).mark_zero();
//! let mut transcript = Transcript::new(b"my protocol");
//! let proof = Prover::new(&gens)
//!     .compute(&mut rand::thread_rng(), &mut transcript, &blind, 25u64)?;
//! assert!(proof.valid(&gens));
//! let compressed = proof.compress(&gens)?;
//! assert!(compressed.valid(&gens));
//! # Ok::<(), rust_bulletproofs::Error>(())
//! ```
//!
//! All arithmetic is variable time; none of the scalar or point operations here is hardened
//! against timing side channels.

pub mod commitment;
pub mod error;
pub mod generators;
pub mod inner_product;
pub mod json;
pub mod rangeproof;
pub mod transcript;
pub mod util;

/// Bit length of the proven range
pub const UPPER_EXP: usize = 64;

pub use commitment::{commit, commit_value, commit_vector};
pub use error::{Error, Result};
pub use generators::Generators;
pub use inner_product::InnerProductProof;
pub use rangeproof::{
    Challenges, CompressedRangeProof, ProofHeader, Prover, UncompressedRangeProof, Verifier,
};
pub use transcript::Transcript;
