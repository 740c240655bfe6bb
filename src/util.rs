//! Scalar vector arithmetic and point encoding helpers shared by the prover and verifiers.

use secp256kfun::{marker::*, s, Point, Scalar};

pub type PubScalarZ = Scalar<Public, Zero>;
pub type PubScalarNz = Scalar<Public, NonZero>;
/// A point that may be the identity and is not normalized (the output of `g!` and `lincomb`).
pub type PubPoint = Point<NonNormal, Public, Zero>;

/// Interpret a u64 as a scalar.
pub fn scalar_from_u64(v: u64) -> PubScalarZ {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&v.to_be_bytes());
    Scalar::<Public, Zero>::from_bytes_mod_order(bytes)
}

/// Interpret a u128 as a scalar. Handy for blinding factors wider than 64 bits.
pub fn scalar_from_u128(v: u128) -> PubScalarZ {
    let mut bytes = [0u8; 32];
    bytes[16..].copy_from_slice(&v.to_be_bytes());
    Scalar::<Public, Zero>::from_bytes_mod_order(bytes)
}

/// Compute (1, x, x^2, ..., x^(n-1))
pub fn powers(x: &PubScalarZ, n: usize) -> Vec<PubScalarZ> {
    let mut res = Vec::with_capacity(n);
    let mut x_pow = Scalar::<Public, NonZero>::one().mark_zero();
    for _ in 0..n {
        res.push(x_pow);
        x_pow = s!(x_pow * x).public();
    }
    res
}

/// Compute the inner product of two vectors <a, b>.
pub fn inner_product(a: &[PubScalarZ], b: &[PubScalarZ]) -> PubScalarZ {
    let mut res = Scalar::<Public, Zero>::zero();
    for (a_i, b_i) in a.iter().zip(b.iter()) {
        res = s!(res + a_i * b_i).public();
    }
    res
}

// Hadamard product of two vectors of scalars
pub fn hadamard(a: &[PubScalarZ], b: &[PubScalarZ]) -> Vec<PubScalarZ> {
    a.iter().zip(b.iter()).map(|(a_i, b_i)| s!(a_i * b_i).public()).collect()
}

// Add two vectors of scalars
pub fn add_vecs(a: &[PubScalarZ], b: &[PubScalarZ]) -> Vec<PubScalarZ> {
    a.iter().zip(b.iter()).map(|(a_i, b_i)| s!(a_i + b_i).public()).collect()
}

// Add the same scalar to every element of a vector
pub fn add_scalar(a: &[PubScalarZ], b: &PubScalarZ) -> Vec<PubScalarZ> {
    a.iter().map(|a_i| s!(a_i + b).public()).collect()
}

// Multiply every element of a vector by a scalar
pub fn scalar_mul_vec(a: &[PubScalarZ], b: &PubScalarZ) -> Vec<PubScalarZ> {
    a.iter().map(|a_i| s!(a_i * b).public()).collect()
}

pub fn sum(a: &[PubScalarZ]) -> PubScalarZ {
    let mut res = Scalar::<Public, Zero>::zero();
    for a_i in a {
        res = s!(res + a_i).public();
    }
    res
}

/// δ(y, z) = (z - z^2) * <1, y^n> - z^3 * <1, 2^n>
///
/// The public part of <l(X), r(X)> that the verifier can compute without the witness.
/// The length of `y_n` fixes n.
pub fn delta(y_n: &[PubScalarZ], z: &PubScalarZ) -> PubScalarZ {
    let two_n = powers(&scalar_from_u64(2), y_n.len());
    let zz = s!(z * z).public();
    let zzz = s!(zz * z).public();
    let sum_y = sum(y_n);
    let sum_2 = sum(&two_n);
    s!((z - zz) * sum_y - zzz * sum_2).public()
}

pub(crate) fn log(n: usize) -> usize {
    (usize::BITS - 1 - n.leading_zeros()) as usize
}

/// Canonical encoding: uncompressed SEC1 (65 bytes), or a single zero byte for the identity.
pub fn encode_point(point: &Point<Normal, Public, Zero>) -> Vec<u8> {
    match point.non_zero() {
        Some(point) => point.to_bytes_uncompressed().to_vec(),
        None => vec![0u8],
    }
}

/// Inverse of [`encode_point`]. Also accepts 33-byte compressed encodings.
pub fn decode_point(bytes: &[u8]) -> Option<Point<Normal, Public, Zero>> {
    match bytes.len() {
        1 if bytes[0] == 0 => Some(Point::<Normal, Public, Zero>::zero()),
        33 => {
            let mut buf = [0u8; 33];
            buf.copy_from_slice(bytes);
            Point::<Normal, Public, NonZero>::from_bytes(buf).map(|p| p.mark_zero())
        }
        65 => {
            // decompress x and compare, so that (x, y) off the curve is rejected
            if bytes[0] != 4 {
                return None;
            }
            let mut buf = [0u8; 33];
            buf[0] = 2 | (bytes[64] & 1);
            buf[1..].copy_from_slice(&bytes[1..33]);
            let point = Point::<Normal, Public, NonZero>::from_bytes(buf)?;
            if point.to_bytes_uncompressed()[..] != bytes[..] {
                return None;
            }
            Some(point.mark_zero())
        }
        _ => None,
    }
}
