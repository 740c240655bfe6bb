#![allow(non_snake_case)]

//! Range proof that a committed value lies in [0, 2^64).
//!
//! # Notation
//!
//! The prover commits to the bit decomposition `a_L` of the value `v` and to `a_R = a_L - 1`,
//! then proves three statements at once using challenges `y` and `z`:
//!
//! - `<a_L, 2^n> = v`
//! - `<a_L, a_R> = 0`
//! - `(a_L - 1) - a_R = 0`
//!
//! They are folded into the vector polynomials
//!
//! ```text
//! l(X) = a_L - z*1 + s_L*X
//! r(X) = y^n ∘ (a_R + z*1 + s_R*X) + z^2*2^n
//! t(X) = <l(X), r(X)> = t0 + t1*X + t2*X^2
//! ```
//!
//! where `s_L, s_R` are random blinding vectors. After the challenge `x`, the prover opens
//! `l(x)`, `r(x)` and `t(x)` together with the blinding factors needed to check them against
//! the commitments `V, A, S, T1, T2`.

use crate::commitment::{commit, commit_vector};
use crate::error::{Error, Result};
use crate::generators::Generators;
use crate::inner_product::InnerProductProof;
use crate::transcript::Transcript;
use crate::util::{
    add_scalar, add_vecs, delta, hadamard, inner_product, powers, scalar_from_u64, scalar_mul_vec,
    PubPoint, PubScalarNz, PubScalarZ,
};
use crate::UPPER_EXP;
use rand::{CryptoRng, RngCore};
use secp256kfun::{g, marker::*, op, s, Point, Scalar};
use tracing::{debug, trace};

/// The fields shared by both proof forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofHeader {
    /// Pedersen commitment to the value
    pub V: Point,
    /// Vector pedersen commitment committing to a_L and a_R
    pub A: Point,
    /// Vector pedersen commitment committing to s_L and s_R
    pub S: Point,
    /// Pedersen commitment to t1
    pub T1: Point,
    /// Pedersen commitment to t2
    pub T2: Point,
    /// Polynomial t() evaluated with challenge x
    pub tx: PubScalarZ,
    /// Opening blinding factor for t() to verify the correctness of t(x)
    pub tx_bf: PubScalarZ,
    /// Opening of the combined blinding factors used in A and S
    pub e: PubScalarZ,
    /// Domain separation tag of the transcript the proof was made with
    pub dst: Vec<u8>,
}

/// Range proof carrying the full length-64 witness vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct UncompressedRangeProof {
    pub header: ProofHeader,
    /// Left side of the blinded vector product, l(x)
    pub lx: Vec<PubScalarZ>,
    /// Right side of the blinded vector product, r(x)
    pub rx: Vec<PubScalarZ>,
}

/// Range proof whose witness vectors are replaced by an inner product argument.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedRangeProof {
    pub header: ProofHeader,
    pub ipp: InnerProductProof,
}

/// Challenges of the range proof, re-derived from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Challenges {
    pub y: PubScalarNz,
    pub z: PubScalarZ,
    pub x: PubScalarZ,
}

fn yz_challenges(t: &mut Transcript, A: &Point, S: &Point) -> (PubScalarZ, PubScalarZ) {
    t.absorb(&A.mark_zero());
    t.absorb(&S.mark_zero());
    let y = t.challenge(b"y");
    let z = t.challenge(b"z");
    (y, z)
}

fn x_challenge(t: &mut Transcript, T1: &Point, T2: &Point) -> PubScalarZ {
    t.absorb(&T1.mark_zero());
    t.absorb(&T2.mark_zero());
    t.challenge(b"x")
}

fn non_zero_point(P: PubPoint, what: &'static str) -> Result<Point> {
    P.normalize().non_zero().ok_or(Error::Consistency(what))
}

fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> PubScalarZ {
    Scalar::random(rng).public().mark_zero()
}

// H_vec ∘ y^-n
fn twisted_H(gens: &Generators, y_n_inv: &[PubScalarZ]) -> Vec<PubPoint> {
    gens.H_vec.iter().zip(y_n_inv.iter()).map(|(H_i, y_i)| g!(y_i * H_i)).collect()
}

impl ProofHeader {
    /// Replay the transcript in prover order: absorb A, S, derive y, z, absorb T1, T2, derive x.
    ///
    /// Returns the transcript positioned after `x`, which the inner product argument continues.
    /// `None` if `y` is zero.
    pub fn challenges(&self) -> Option<(Transcript, Challenges)> {
        let mut t = Transcript::new(&self.dst);
        let (y, z) = yz_challenges(&mut t, &self.A, &self.S);
        let x = x_challenge(&mut t, &self.T1, &self.T2);
        let y = y.non_zero()?;
        Some((t, Challenges { y, z, x }))
    }

    /// Commitment to t(x) using tx and tx_bf
    pub fn tx_commitment(&self, gens: &Generators) -> PubPoint {
        commit(gens, &self.tx_bf, &self.tx)
    }
}

/// Range proof prover.
#[derive(Debug, Clone)]
pub struct Prover<'a> {
    /// The base generators
    gens: &'a Generators,
}

impl<'a> Prover<'a> {
    pub fn new(gens: &'a Generators) -> Self {
        Self { gens }
    }

    /// Prove that `value` lies in [0, 2^64) for the commitment `value*G + blind*H`.
    ///
    /// `value` may be any integer type. Values that do not convert to a u64 fail with
    /// [`Error::InvalidInput`] before anything is committed. The transcript is advanced past
    /// the `x` challenge; callers chaining further protocol steps keep using it.
    pub fn compute<R, V>(
        &self,
        rng: &mut R,
        transcript: &mut Transcript,
        blind: &Scalar<Secret, Zero>,
        value: V,
    ) -> Result<UncompressedRangeProof>
    where
        R: RngCore + CryptoRng,
        V: TryInto<u64>,
    {
        let v: u64 = value
            .try_into()
            .map_err(|_| Error::InvalidInput("value must be in [0, 2^64)".to_string()))?;
        let gens = self.gens;
        let n = UPPER_EXP;
        if gens.vec_len() < n {
            return Err(Error::InvalidInput(format!(
                "need {} generators, have {}",
                n,
                gens.vec_len()
            )));
        }
        let blind = blind.clone().public();

        // only reachable with value 0 and blind 0
        let V = commit(gens, &blind, &scalar_from_u64(v))
            .normalize()
            .non_zero()
            .ok_or_else(|| {
                Error::InvalidInput("value commitment is the point at infinity".to_string())
            })?;

        // bits of v, little endian
        let a_L: Vec<PubScalarZ> = (0..n).map(|i| scalar_from_u64((v >> i) & 1)).collect();
        let a_R: Vec<PubScalarZ> = a_L.iter().map(|a| s!(a - 1).public()).collect();
        if inner_product(&a_L, &a_R) != Scalar::<Public, Zero>::zero() {
            return Err(Error::Consistency("a_L * a_R has to be 0"));
        }

        let a_bf = random_scalar(rng);
        let A = non_zero_point(commit_vector(gens, &a_L, &a_R, &a_bf)?, "A is zero")?;

        let s_L: Vec<PubScalarZ> = (0..n).map(|_| random_scalar(rng)).collect();
        let s_R: Vec<PubScalarZ> = (0..n).map(|_| random_scalar(rng)).collect();
        let s_bf = random_scalar(rng);
        let S = non_zero_point(commit_vector(gens, &s_L, &s_R, &s_bf)?, "S is zero")?;

        let (y, z) = yz_challenges(transcript, &A, &S);
        trace!(absorbed = transcript.len(), "derived challenges y, z");

        let y_n = powers(&y, n);
        let two_n = powers(&scalar_from_u64(2), n);
        let zz = s!(z * z).public();
        let zz_two_n = scalar_mul_vec(&two_n, &zz);
        let minus_z = s!(-z).public();

        // l(X) = l0 + l1*X, r(X) = r0 + r1*X
        let l0 = add_scalar(&a_L, &minus_z);
        let l1 = s_L;
        let r0 = add_vecs(&hadamard(&y_n, &add_scalar(&a_R, &z)), &zz_two_n);
        let r1 = hadamard(&y_n, &s_R);

        // t(X) = <l(X), r(X)> = t0 + t1*X + t2*X^2
        let t0 = inner_product(&l0, &r0);
        let t2 = inner_product(&l1, &r1);
        let t01 = inner_product(&add_vecs(&l0, &l1), &add_vecs(&r0, &r1));
        let t1 = s!(t01 - t0 - t2).public();

        let t1_bf = random_scalar(rng);
        let t2_bf = random_scalar(rng);
        let T1 = non_zero_point(commit(gens, &t1_bf, &t1), "T1 is zero")?;
        let T2 = non_zero_point(commit(gens, &t2_bf, &t2), "T2 is zero")?;

        let x = x_challenge(transcript, &T1, &T2);
        let xx = s!(x * x).public();

        let lx = add_vecs(&l0, &scalar_mul_vec(&l1, &x));
        let rx = add_vecs(&r0, &scalar_mul_vec(&r1, &x));
        let tx = s!(t0 + t1 * x + t2 * xx).public();
        let tx_bf = s!(zz * blind + x * t1_bf + xx * t2_bf).public();

        if inner_product(&lx, &rx) != tx {
            return Err(Error::Consistency("t(x) not match tx"));
        }

        let e = s!(a_bf + x * s_bf).public();
        debug!(absorbed = transcript.len(), "computed uncompressed range proof");

        Ok(UncompressedRangeProof {
            header: ProofHeader { V, A, S, T1, T2, tx, tx_bf, e, dst: transcript.dst().to_vec() },
            lx,
            rx,
        })
    }
}

/// What both proof forms establish before checking their witness: the transcript after `x`,
/// the twisted generators `H_vec ∘ y^-n`, and `P = <l(x), G_vec> + <r(x), H_vec ∘ y^-n>`
/// as derived from the commitments.
struct HeaderContext {
    transcript: Transcript,
    H_twisted: Vec<PubPoint>,
    P: Point<Normal, Public, Zero>,
}

/// Range proof verifier.
#[derive(Debug, Clone)]
pub struct Verifier<'a> {
    /// The base generators
    gens: &'a Generators,
}

impl<'a> Verifier<'a> {
    pub fn new(gens: &'a Generators) -> Self {
        Self { gens }
    }

    /// Checks the polynomial identity
    ///
    /// tx*G + tx_bf*H == z^2*V + δ(y, z)*G + x*T1 + x^2*T2
    ///
    /// and derives `P` twice from `A`, `S`, `e`: once along the twisted generators and once
    /// along the plain `H_vec`. Returns `None` if either check fails.
    fn verify_header(&self, header: &ProofHeader) -> Option<HeaderContext> {
        let gens = self.gens;
        let n = UPPER_EXP;
        if gens.vec_len() < n {
            return None;
        }
        let (transcript, Challenges { y, z, x }) = header.challenges()?;
        let y_inv = y.invert().mark_zero();
        let y = y.mark_zero();
        let y_n = powers(&y, n);
        let y_n_inv = powers(&y_inv, n);
        let two_n = powers(&scalar_from_u64(2), n);
        let zz = s!(z * z).public();
        let xx = s!(x * x).public();

        let lhs = header.tx_commitment(gens).normalize();
        let d = delta(&y_n, &z);
        let (G, V, T1, T2) = (&gens.G, &header.V, &header.T1, &header.T2);
        let rhs = g!(zz * V + d * G + x * T1 + xx * T2).normalize();
        if lhs != rhs {
            debug!("polynomial identity does not hold");
            return None;
        }

        let H_twisted = twisted_H(gens, &y_n_inv);
        let H_vec = &gens.H_vec[..n];

        // l1 = z*y^n + z^2*2^n, l2 = z + z^2*y^-n*2^n
        let zz_two_n = scalar_mul_vec(&two_n, &zz);
        let l1 = add_vecs(&scalar_mul_vec(&y_n, &z), &zz_two_n);
        let l2 = add_scalar(&hadamard(&y_n_inv, &zz_two_n), &z);

        let z_G = op::lincomb(std::iter::repeat(&z).take(n), &gens.G_vec[..n]);
        let (A, S, H, e) = (&header.A, &header.S, &gens.H, &header.e);
        let base = g!(A + x * S - e * H - z_G);
        let l1_H = op::lincomb(l1.iter(), H_twisted.iter());
        let l2_H = op::lincomb(l2.iter(), H_vec.iter());
        let p1 = g!(base + l1_H).normalize();
        let p2 = g!(base + l2_H).normalize();
        if p1 != p2 {
            debug!("commitment to l(x), r(x) is inconsistent");
            return None;
        }

        Some(HeaderContext { transcript, H_twisted, P: p1 })
    }

    /// Verify an uncompressed proof. Never fails with an error: an invalid proof is `false`.
    pub fn verify_uncompressed(&self, proof: &UncompressedRangeProof) -> bool {
        let n = UPPER_EXP;
        let UncompressedRangeProof { header, lx, rx } = proof;
        if lx.len() != n || rx.len() != n {
            return false;
        }
        if inner_product(lx, rx) != header.tx {
            debug!("<lx, rx> does not match tx");
            return false;
        }
        let ctx = match self.verify_header(header) {
            Some(ctx) => ctx,
            None => return false,
        };
        let lx_G = op::lincomb(lx.iter(), &self.gens.G_vec[..n]);
        let rx_H = op::lincomb(rx.iter(), ctx.H_twisted.iter());
        let P = g!(lx_G + rx_H).normalize();
        if P != ctx.P {
            debug!("opened vectors do not match the commitments");
            return false;
        }
        true
    }

    /// Verify a compressed proof.
    ///
    /// Besides the header checks this runs the inner product verifier against
    /// `P + w*B*tx`, which binds `tx` to the folded `a0*b0`.
    pub fn verify_compressed(&self, proof: &CompressedRangeProof) -> bool {
        let n = UPPER_EXP;
        let HeaderContext {
            mut transcript,
            H_twisted,
            P,
        } = match self.verify_header(&proof.header) {
            Some(ctx) => ctx,
            None => return false,
        };
        let Q = match q_point(self.gens, &transcript) {
            Some(Q) => Q,
            None => return false,
        };
        proof.ipp.verify(
            &mut transcript,
            &self.gens.G_vec[..n],
            &H_twisted,
            &Q,
            &P.non_normal(),
            &proof.header.tx,
        )
    }
}

// Q = w*B
fn q_point(gens: &Generators, transcript: &Transcript) -> Option<PubPoint> {
    let w = transcript.challenge_non_zero(b"w")?;
    let B = &gens.B;
    Some(g!(w * B).mark_zero())
}

impl UncompressedRangeProof {
    /// Check whether this range proof is valid.
    pub fn valid(&self, gens: &Generators) -> bool {
        Verifier::new(gens).verify_uncompressed(self)
    }

    /// Replace `lx`, `rx` by an inner product argument of log2(64) = 6 rounds.
    ///
    /// The argument continues a fork of the proof's transcript, so the proof itself and any
    /// transcript the caller holds are left untouched.
    pub fn compress(&self, gens: &Generators) -> Result<CompressedRangeProof> {
        let n = UPPER_EXP;
        if gens.vec_len() < n || self.lx.len() != n || self.rx.len() != n {
            return Err(Error::InvalidInput(
                "proof and generators must have 64 elements".to_string(),
            ));
        }
        let (mut transcript, Challenges { y, .. }) = self
            .header
            .challenges()
            .ok_or(Error::Consistency("challenge y is zero"))?;
        let Q = q_point(gens, &transcript).ok_or(Error::Consistency("challenge w is zero"))?;
        let y_inv = y.invert().mark_zero();
        let H_twisted = twisted_H(gens, &powers(&y_inv, n));

        let ipp = InnerProductProof::prove(
            &mut transcript,
            gens.G_vec[..n].to_vec(),
            H_twisted,
            &Q,
            self.lx.clone(),
            self.rx.clone(),
        )?;
        debug!(rounds = ipp.proof_len(), "compressed range proof");
        Ok(CompressedRangeProof { header: self.header.clone(), ipp })
    }
}

impl CompressedRangeProof {
    /// Check whether this compressed proof is valid.
    pub fn valid(&self, gens: &Generators) -> bool {
        Verifier::new(gens).verify_compressed(self)
    }
}
