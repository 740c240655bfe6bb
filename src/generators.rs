#![allow(non_snake_case)]

use crate::util::{decode_point, PubPoint};
use crate::UPPER_EXP;
use secp256kfun::{hash::Tag, marker::*, Point};
use sha2::{digest::Digest, Sha256};

/// The standard secp256k1 base point, uncompressed.
pub const GENERATOR_G_HEX: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";
/// NUMS point generated by sha256 hashing G
pub const GENERATOR_H_HEX: &str = "0450929b74c1a04954b78b4b6035e97a5e078a5a0f28ec96d547bfee9ace803ac031d3c6863973926e049e637cb1b5f40a36dac28af1766968c30c2313f3a38904";
/// NUMS point generated by sha256 hashing H
pub const GENERATOR_B_HEX: &str = "043de7e317f561e8c9481b2128508c7effd2d524528b7da29e14d040d86e4b0159afd6259519fb77ba2b3bcb83a464cac183c85a2431539ad9a2ab41d7e06beeb2";
/// Order of the secp256k1 group, in the interchange format's scalar notation.
pub const ORDER_HEX: &str = "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

/// Generators used by commitments, range proofs and the inner product argument.
///
/// Built once and handed out by reference; nothing here changes after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Generators {
    /// Value generator of Pedersen commitments
    pub G: Point,
    /// Blinding generator of Pedersen commitments
    pub H: Point,
    /// Generator binding the inner product in the compressed proof
    pub B: Point,
    /// The points Vec<G> committing to left vectors
    pub G_vec: Vec<PubPoint>,
    /// The points Vec<H> committing to right vectors
    pub H_vec: Vec<PubPoint>,
}

fn fixed_point(hex_str: &str) -> Point {
    hex::decode(hex_str)
        .ok()
        .and_then(|bytes| decode_point(&bytes))
        .and_then(|p| p.non_zero())
        .expect("fixed generator must be a valid curve point")
}

impl Generators {
    /// Reference layout: every element of `G_vec` is `G` and every element of `H_vec` is `H`,
    /// one per bit of the range.
    pub fn new() -> Self {
        let G = fixed_point(GENERATOR_G_HEX);
        let H = fixed_point(GENERATOR_H_HEX);
        let B = fixed_point(GENERATOR_B_HEX);
        let G_vec = vec![G.non_normal().mark_zero(); UPPER_EXP];
        let H_vec = vec![H.non_normal().mark_zero(); UPPER_EXP];
        Self { G, H, B, G_vec, H_vec }
    }

    /// Same `G`, `H` and `B`, but with `n` independent vector generators derived by hashing.
    pub fn with_hashed_vectors(n: usize) -> Self {
        let base = Self::new();
        Self {
            G_vec: hashed_points(n, "BulletProofs/G"),
            H_vec: hashed_points(n, "BulletProofs/H"),
            ..base
        }
    }

    /// Number of vector generators on each side
    pub fn vec_len(&self) -> usize {
        self.G_vec.len().min(self.H_vec.len())
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self::new()
    }
}

// Try-and-increment: hash a counter to an x coordinate until it lands on the curve.
fn hashed_points(n: usize, tag: &str) -> Vec<PubPoint> {
    let mut gs = Vec::with_capacity(n);
    let mut i: u64 = 0;
    while gs.len() < n {
        i += 1;
        let mut hash_x = Sha256::default().tag_vectored([tag.as_bytes(), b"x"].into_iter());
        hash_x.update(i.to_be_bytes());
        let gen_x = hash_x.finalize();
        let mut hash_y = Sha256::default().tag_vectored([tag.as_bytes(), b"y"].into_iter());
        hash_y.update(i.to_be_bytes());
        let gen_y = hash_y.finalize();

        let mut bytes = [0u8; 33];
        bytes[1..].copy_from_slice(&gen_x);
        bytes[0] = 2u8 + (gen_y[0] & 1u8);
        if let Some(g) = Point::<Normal, Public, NonZero>::from_bytes(bytes) {
            gs.push(g.non_normal().mark_zero());
        }
    }
    gs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::encode_point;
    use secp256kfun::{g, G};

    #[test]
    fn test_fixed_generators() {
        let gens = Generators::new();
        let fixed_G = gens.G;
        assert_eq!(g!(3 * fixed_G).normalize(), g!(3 * G).normalize());
        assert_eq!(hex::encode(encode_point(&gens.H.mark_zero())), GENERATOR_H_HEX);
        assert_eq!(hex::encode(encode_point(&gens.B.mark_zero())), GENERATOR_B_HEX);
        assert_ne!(gens.G, gens.H);
        assert_ne!(gens.H, gens.B);
    }

    #[test]
    fn test_reference_vectors() {
        let gens = Generators::default();
        assert_eq!(gens.vec_len(), UPPER_EXP);
        assert_eq!(gens.H_vec.len(), UPPER_EXP);
        assert!(gens.G_vec.iter().all(|g| g.normalize() == gens.G.mark_zero()));
        assert!(gens.H_vec.iter().all(|h| h.normalize() == gens.H.mark_zero()));
    }

    #[test]
    fn test_hashed_vectors() {
        let gens = Generators::with_hashed_vectors(8);
        assert_eq!(gens.vec_len(), 8);
        assert_eq!(gens.H_vec.len(), 8);
        for i in 0..8 {
            for j in (i + 1)..8 {
                assert_ne!(gens.G_vec[i].normalize(), gens.G_vec[j].normalize());
            }
            assert_ne!(gens.G_vec[i].normalize(), gens.H_vec[i].normalize());
        }
        // deterministic
        assert_eq!(gens, Generators::with_hashed_vectors(8));
        assert_eq!(gens.G, Generators::new().G);
    }

    #[test]
    fn test_vec_len_is_shorter_side() {
        let mut gens = Generators::new();
        gens.H_vec.truncate(10);
        assert_eq!(gens.vec_len(), 10);
        let mut gens = Generators::new();
        gens.G_vec.truncate(3);
        assert_eq!(gens.vec_len(), 3);
    }
}
