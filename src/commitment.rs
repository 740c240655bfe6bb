#![allow(non_snake_case)]

//! Pedersen and vector Pedersen commitments.

use crate::error::{Error, Result};
use crate::generators::Generators;
use crate::util::{scalar_from_u64, PubPoint, PubScalarZ};
use secp256kfun::{g, op};

/// Create a pedersen commitment C = value*G + blind*H
pub fn commit(gens: &Generators, blind: &PubScalarZ, value: &PubScalarZ) -> PubPoint {
    let (G, H) = (&gens.G, &gens.H);
    g!(value * G + blind * H)
}

/// Commit to an integer value. Anything that does not fit in a u64, such as a negative
/// number, is rejected.
pub fn commit_value<V: TryInto<u64>>(
    gens: &Generators,
    blind: &PubScalarZ,
    value: V,
) -> Result<PubPoint> {
    let value: u64 = value
        .try_into()
        .map_err(|_| Error::InvalidInput("value must be in [0, 2^64)".to_string()))?;
    Ok(commit(gens, blind, &scalar_from_u64(value)))
}

/// Create a vector pedersen commitment C = <l, G_vec> + <r, H_vec> + blind*H
pub fn commit_vector(
    gens: &Generators,
    l: &[PubScalarZ],
    r: &[PubScalarZ],
    blind: &PubScalarZ,
) -> Result<PubPoint> {
    if l.len() != r.len() {
        return Err(Error::InvalidInput(format!(
            "vector length mismatch: {} and {}",
            l.len(),
            r.len()
        )));
    }
    if l.len() > gens.vec_len() {
        return Err(Error::InvalidInput(format!(
            "need {} generators, have {}",
            l.len(),
            gens.vec_len()
        )));
    }
    let n = l.len();
    let H = &gens.H;
    if n == 0 {
        return Ok(g!(blind * H));
    }
    let P = op::lincomb(
        l.iter().chain(r.iter()),
        gens.G_vec[..n].iter().chain(gens.H_vec[..n].iter()),
    );
    Ok(g!(P + blind * H))
}
