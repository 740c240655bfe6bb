//! Fiat-Shamir transcript.
//!
//! Every challenge is `SHA256(dst || label || enc(P_1) || ... || enc(P_k))` over all points
//! absorbed so far, reduced modulo the group order. Challenging does not consume the absorbed
//! history, so later challenges commit to strictly more of the protocol.

use crate::util::{encode_point, PubScalarNz, PubScalarZ};
use secp256kfun::{marker::*, Point, Scalar};
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    /// Domain separation tag
    dst: Vec<u8>,
    /// Concatenated encodings of the absorbed points
    log: Vec<u8>,
    num_points: usize,
}

impl Transcript {
    pub fn new(dst: &[u8]) -> Self {
        Self { dst: dst.to_vec(), log: Vec::new(), num_points: 0 }
    }

    pub fn dst(&self) -> &[u8] {
        &self.dst
    }

    /// Number of points absorbed so far
    pub fn len(&self) -> usize {
        self.num_points
    }

    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    pub fn absorb(&mut self, point: &Point<Normal, Public, Zero>) {
        self.log.extend_from_slice(&encode_point(point));
        self.num_points += 1;
    }

    pub fn challenge(&self, label: &[u8]) -> PubScalarZ {
        let mut hash = Sha256::new();
        hash.update(&self.dst);
        hash.update(label);
        hash.update(&self.log);
        let digest: [u8; 32] = hash.finalize().into();
        Scalar::<Public, Zero>::from_bytes_mod_order(digest)
    }

    /// A challenge that is about to be inverted. `None` only if the hash reduced to zero.
    pub fn challenge_non_zero(&self, label: &[u8]) -> Option<PubScalarNz> {
        self.challenge(label).non_zero()
    }
}
