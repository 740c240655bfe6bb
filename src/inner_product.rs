#![allow(non_snake_case)]

//! Inner product argument.
//!
//! Proves knowledge of `a`, `b` with `P = <a, G_vec> + <b, H_vec>` and `<a, b> = c`, by
//! committing to `P + c*Q` and halving the vectors every round. A proof for vectors of length
//! `n` carries log2(n) pairs `(L, R)` and the final scalars `a0`, `b0`.

use crate::error::{Error, Result};
use crate::transcript::Transcript;
use crate::util::{inner_product, log, PubPoint, PubScalarNz, PubScalarZ};
use secp256kfun::{g, marker::*, op, s, Point, Scalar};
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct InnerProductProof {
    /// One (L, R) pair per folding round, in the order they were absorbed.
    pub terms: Vec<Term>,
    pub a0: PubScalarZ,
    pub b0: PubScalarZ,
}

type Term = (Point<Normal, Public, Zero>, Point<Normal, Public, Zero>);

fn round_challenge(
    t: &mut Transcript,
    L: &Point<Normal, Public, Zero>,
    R: &Point<Normal, Public, Zero>,
) -> Option<PubScalarNz> {
    t.absorb(L);
    t.absorb(R);
    t.challenge_non_zero(b"uk")
}

impl InnerProductProof {
    /// Prove `<a, b> = c` for `P = <a, G_vec> + <b, H_vec>` where `c*Q` is the inner product
    /// component. All four vectors must have the same power-of-two length.
    pub fn prove(
        transcript: &mut Transcript,
        mut G_vec: Vec<PubPoint>,
        mut H_vec: Vec<PubPoint>,
        Q: &PubPoint,
        mut a: Vec<PubScalarZ>,
        mut b: Vec<PubScalarZ>,
    ) -> Result<Self> {
        let mut n = a.len();
        if n == 0 || !n.is_power_of_two() {
            return Err(Error::InvalidInput(format!("vector length {} is not a power of two", n)));
        }
        if b.len() != n || G_vec.len() != n || H_vec.len() != n {
            return Err(Error::InvalidInput(format!(
                "vector lengths differ: a {}, b {}, G {}, H {}",
                n,
                b.len(),
                G_vec.len(),
                H_vec.len()
            )));
        }

        let mut terms = Vec::with_capacity(log(n));
        while n > 1 {
            n /= 2;
            let (a_lo, a_hi) = a.split_at(n);
            let (b_lo, b_hi) = b.split_at(n);
            let (G_lo, G_hi) = G_vec.split_at(n);
            let (H_lo, H_hi) = H_vec.split_at(n);

            let c_L = inner_product(a_lo, b_hi);
            let c_R = inner_product(a_hi, b_lo);
            // L = <a_lo, G_hi> + <b_hi, H_lo> + c_L*Q
            let L = op::lincomb(
                a_lo.iter().chain(b_hi.iter()).chain(std::iter::once(&c_L)),
                G_hi.iter().chain(H_lo.iter()).chain(std::iter::once(Q)),
            )
            .normalize();
            // R = <a_hi, G_lo> + <b_lo, H_hi> + c_R*Q
            let R = op::lincomb(
                a_hi.iter().chain(b_lo.iter()).chain(std::iter::once(&c_R)),
                G_lo.iter().chain(H_hi.iter()).chain(std::iter::once(Q)),
            )
            .normalize();

            let u = round_challenge(transcript, &L, &R)
                .ok_or(Error::Consistency("round challenge is zero"))?;
            let u_inv = u.invert();
            terms.push((L, R));

            for i in 0..n {
                let (a_l, a_h, b_l, b_h) = (a[i], a[n + i], b[i], b[n + i]);
                a[i] = s!(a_l * u + a_h * u_inv).public();
                b[i] = s!(b_l * u_inv + b_h * u).public();
                let (G_l, G_h, H_l, H_h) = (G_vec[i], G_vec[n + i], H_vec[i], H_vec[n + i]);
                G_vec[i] = g!(u_inv * G_l + u * G_h);
                H_vec[i] = g!(u * H_l + u_inv * H_h);
            }
            a.truncate(n);
            b.truncate(n);
            G_vec.truncate(n);
            H_vec.truncate(n);
            trace!(remaining = n, "folded inner product round");
        }

        Ok(Self { terms, a0: a[0], b0: b[0] })
    }

    /// Number of folding rounds
    pub fn proof_len(&self) -> usize {
        self.terms.len()
    }

    // s_g[i] is the coefficient of G_vec[i] in the fully folded generator: the product over
    // rounds of u (upper half) or u^-1 (lower half). s_h holds the inverses, matching H_vec.
    fn s_vecs(n: usize, challenges: &[PubScalarNz]) -> (Vec<PubScalarZ>, Vec<PubScalarZ>) {
        let m = challenges.len();
        let mut first_g = Scalar::<Public, NonZero>::one();
        let mut first_h = Scalar::<Public, NonZero>::one();
        let mut u_sq = Vec::with_capacity(m);
        let mut u_inv_sq = Vec::with_capacity(m);
        for u in challenges {
            let u_inv = u.invert();
            first_g = s!(first_g * u_inv).public();
            first_h = s!(first_h * u).public();
            u_sq.push(s!(u * u).public());
            u_inv_sq.push(s!(u_inv * u_inv).public());
        }

        let mut s_g = Vec::with_capacity(n);
        let mut s_h = Vec::with_capacity(n);
        s_g.push(first_g.mark_zero());
        s_h.push(first_h.mark_zero());
        for i in 1..n {
            let lg_i = log(i);
            let k = 1 << lg_i;
            // the bit 2^lg_i selects the upper half in round m - 1 - lg_i
            let (prev_g, prev_h) = (s_g[i - k], s_h[i - k]);
            let (sq, inv_sq) = (u_sq[m - 1 - lg_i], u_inv_sq[m - 1 - lg_i]);
            s_g.push(s!(prev_g * sq).public());
            s_h.push(s!(prev_h * inv_sq).public());
        }
        (s_g, s_h)
    }

    /// Verify that the prover knows `a`, `b` with `P = <a, G_vec> + <b, H_vec>` and `<a, b> = c`.
    ///
    /// Checks `P + c*Q + sum(u^2*L + u^-2*R) == a0*g0 + b0*h0 + a0*b0*Q` where `g0`, `h0` are
    /// the folded generators.
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        G_vec: &[PubPoint],
        H_vec: &[PubPoint],
        Q: &PubPoint,
        P: &PubPoint,
        c: &PubScalarZ,
    ) -> bool {
        let n = G_vec.len();
        if n == 0 || !n.is_power_of_two() || H_vec.len() != n || self.terms.len() != log(n) {
            return false;
        }

        let mut challenges = Vec::with_capacity(self.terms.len());
        for (L, R) in &self.terms {
            match round_challenge(transcript, L, R) {
                Some(u) => challenges.push(u),
                None => return false,
            }
        }

        let (s_g, s_h) = Self::s_vecs(n, &challenges);
        let g0 = op::lincomb(s_g.iter(), G_vec.iter());
        let h0 = op::lincomb(s_h.iter(), H_vec.iter());

        let u_sq = challenges.iter().map(|u| s!(u * u).public().mark_zero()).collect::<Vec<_>>();
        let u_inv_sq = challenges
            .iter()
            .map(|u| {
                let u_inv = u.invert();
                s!(u_inv * u_inv).public().mark_zero()
            })
            .collect::<Vec<_>>();
        // with a single element there are no rounds to fold
        let folded = if self.terms.is_empty() {
            Point::<NonNormal, Public, Zero>::zero()
        } else {
            op::lincomb(
                u_sq.iter().chain(u_inv_sq.iter()),
                self.terms.iter().map(|(L, _)| L).chain(self.terms.iter().map(|(_, R)| R)),
            )
        };

        let (a0, b0) = (self.a0, self.b0);
        let a0_b0 = s!(a0 * b0).public();
        let lhs = g!(P + c * Q + folded).normalize();
        let rhs = g!(a0 * g0 + b0 * h0 + a0_b0 * Q).normalize();
        lhs == rhs
    }

    /// Compact encoding: 33-byte compressed L and R per round followed by `a0` and `b0`.
    /// The point at infinity is 33 zero bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(self.terms.len() * 66 + 64);
        for (L, R) in &self.terms {
            ret.extend_from_slice(&L.to_bytes());
            ret.extend_from_slice(&R.to_bytes());
        }
        ret.extend_from_slice(&self.a0.to_bytes());
        ret.extend_from_slice(&self.b0.to_bytes());
        ret
    }

    pub fn deserialize(buf: &[u8]) -> Option<InnerProductProof> {
        let len = buf.len();
        if len < 64 || (len - 64) % 66 != 0 {
            return None;
        }
        let n_rounds = (len - 64) / 66;
        let mut terms = Vec::with_capacity(n_rounds);
        for i in 0..n_rounds {
            let offset = i * 66;
            let L = Point::<_, Public, Zero>::from_slice(&buf[offset..offset + 33])?;
            let R = Point::<_, Public, Zero>::from_slice(&buf[offset + 33..offset + 66])?;
            terms.push((L, R));
        }
        let a0 = Scalar::from_slice(&buf[len - 64..len - 32])?;
        let b0 = Scalar::from_slice(&buf[len - 32..len])?;
        Some(InnerProductProof { terms, a0, b0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Generators;
    use crate::util::scalar_from_u64;
    use proptest::prelude::*;
    use rand::thread_rng;
    use secp256kfun::G;

    fn ts() -> Transcript {
        Transcript::new(b"Inner product Test")
    }

    fn rand_scalar() -> PubScalarZ {
        Scalar::random(&mut thread_rng()).public().mark_zero()
    }

    fn rand_vec(n: usize) -> Vec<PubScalarZ> {
        (0..n).map(|_| rand_scalar()).collect()
    }

    fn statement(gens: &Generators, a: &[PubScalarZ], b: &[PubScalarZ]) -> (PubPoint, PubScalarZ) {
        let n = a.len();
        let P = op::lincomb(
            a.iter().chain(b.iter()),
            gens.G_vec[..n].iter().chain(gens.H_vec[..n].iter()),
        );
        (P, inner_product(a, b))
    }

    fn q_point(gens: &Generators) -> PubPoint {
        gens.B.non_normal().mark_zero()
    }

    fn tester(n: usize) {
        let gens = Generators::with_hashed_vectors(n);
        let Q = q_point(&gens);
        let (a, b) = (rand_vec(n), rand_vec(n));
        let (P, c) = statement(&gens, &a, &b);

        let (G_vec, H_vec) = (gens.G_vec.clone(), gens.H_vec.clone());
        let proof =
            InnerProductProof::prove(&mut ts(), G_vec.clone(), H_vec.clone(), &Q, a, b).unwrap();
        assert_eq!(proof.proof_len(), log(n));
        assert!(proof.verify(&mut ts(), &G_vec, &H_vec, &Q, &P, &c));

        let c_bad = s!(c + 1).public();
        assert!(!proof.verify(&mut ts(), &G_vec, &H_vec, &Q, &P, &c_bad));
        assert!(!proof.verify(&mut Transcript::new(b"other"), &G_vec, &H_vec, &Q, &P, &c));
    }

    #[test]
    fn test_inner_product_arg() {
        for n in [1, 2, 4, 8, 16, 64] {
            tester(n);
        }
    }

    // n = 1 has no rounds: a0, b0 are the inputs and the check is a single equation
    #[test]
    fn test_inner_product_single_element() {
        let gens = Generators::with_hashed_vectors(1);
        let Q = q_point(&gens);
        let (a, b) = (rand_vec(1), rand_vec(1));
        let (P, c) = statement(&gens, &a, &b);
        let proof = InnerProductProof::prove(
            &mut ts(),
            gens.G_vec.clone(),
            gens.H_vec.clone(),
            &Q,
            a.clone(),
            b.clone(),
        )
        .unwrap();
        assert!(proof.terms.is_empty());
        assert_eq!((proof.a0, proof.b0), (a[0], b[0]));
        assert!(proof.verify(&mut ts(), &gens.G_vec, &gens.H_vec, &Q, &P, &c));

        let mut p = proof.clone();
        let b0 = p.b0;
        p.b0 = s!(b0 + 1).public();
        assert!(!p.verify(&mut ts(), &gens.G_vec, &gens.H_vec, &Q, &P, &c));
    }

    #[test]
    fn test_inner_product_transcript_advances() {
        let n = 8;
        let gens = Generators::with_hashed_vectors(n);
        let Q = q_point(&gens);
        let mut transcript = ts();
        let (G_vec, H_vec) = (gens.G_vec.clone(), gens.H_vec.clone());
        let proof =
            InnerProductProof::prove(&mut transcript, G_vec, H_vec, &Q, rand_vec(n), rand_vec(n))
                .unwrap();
        assert_eq!(transcript.len(), 2 * proof.proof_len());
    }

    #[test]
    fn test_inner_product_zeros() {
        let n = 4;
        let gens = Generators::with_hashed_vectors(n);
        let Q = q_point(&gens);
        let zeros = vec![Scalar::<Public, Zero>::zero(); n];
        let (P, c) = statement(&gens, &zeros, &zeros);
        let (G_vec, H_vec) = (gens.G_vec.clone(), gens.H_vec.clone());
        let proof =
            InnerProductProof::prove(&mut ts(), G_vec, H_vec, &Q, zeros.clone(), zeros).unwrap();
        let zero = Point::<Normal, Public, Zero>::zero();
        assert!(proof.terms.iter().all(|(L, R)| *L == zero && *R == zero));
        assert!(proof.verify(&mut ts(), &gens.G_vec, &gens.H_vec, &Q, &P, &c));
    }

    #[test]
    fn test_inner_product_invalid_input() {
        let gens = Generators::with_hashed_vectors(4);
        let Q = q_point(&gens);
        let (G3, H3) = (gens.G_vec[..3].to_vec(), gens.H_vec[..3].to_vec());
        let res = InnerProductProof::prove(&mut ts(), G3, H3, &Q, rand_vec(3), rand_vec(3));
        assert!(matches!(res, Err(Error::InvalidInput(_))));
        let (G_vec, H_vec) = (gens.G_vec.clone(), gens.H_vec.clone());
        let res = InnerProductProof::prove(&mut ts(), G_vec, H_vec, &Q, rand_vec(4), rand_vec(2));
        assert!(matches!(res, Err(Error::InvalidInput(_))));
        let res = InnerProductProof::prove(&mut ts(), vec![], vec![], &Q, vec![], vec![]);
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_inner_product_tamper() {
        let n = 16;
        let gens = Generators::with_hashed_vectors(n);
        let Q = q_point(&gens);
        let (a, b) = (rand_vec(n), rand_vec(n));
        let (P, c) = statement(&gens, &a, &b);
        let (G_vec, H_vec) = (gens.G_vec.clone(), gens.H_vec.clone());
        let proof = InnerProductProof::prove(&mut ts(), G_vec, H_vec, &Q, a, b).unwrap();
        let verify =
            |p: &InnerProductProof| p.verify(&mut ts(), &gens.G_vec, &gens.H_vec, &Q, &P, &c);
        assert!(verify(&proof));

        let mut p = proof.clone();
        let a0 = p.a0;
        p.a0 = s!(a0 + 1).public();
        assert!(!verify(&p));

        let mut p = proof.clone();
        p.terms.swap(1, 2);
        assert!(!verify(&p));

        let mut p = proof.clone();
        p.terms.push(proof.terms[0]);
        assert!(!verify(&p));

        let mut p = proof.clone();
        let R = p.terms[3].1;
        let base = gens.G;
        p.terms[3].1 = g!(R + base).normalize();
        assert!(!verify(&p));

        // generator count must match the proof
        assert!(!proof.verify(&mut ts(), &gens.G_vec[..8], &gens.H_vec[..8], &Q, &P, &c));
    }

    #[test]
    fn test_deserialize_rejects_bad_length() {
        let proof = InnerProductProof {
            terms: vec![],
            a0: scalar_from_u64(1),
            b0: scalar_from_u64(2),
        };
        let buf = proof.serialize();
        assert_eq!(buf.len(), 64);
        assert_eq!(InnerProductProof::deserialize(&buf), Some(proof));
        assert!(InnerProductProof::deserialize(&buf[..63]).is_none());
        assert!(InnerProductProof::deserialize(&[0u8; 64 + 65]).is_none());
    }

    proptest! {
        #[test]
        fn inner_product_proof_serialize(terms in any::<Vec<Term>>(),
                                         a0 in any::<Scalar<Public, Zero>>(),
                                         b0 in any::<Scalar<Public, Zero>>()) {
            let proof = InnerProductProof { terms, a0, b0 };
            let buf = &proof.serialize();
            prop_assert_eq!(proof, InnerProductProof::deserialize(buf).unwrap());
        }

        // an arbitrary proof doesn't verify
        #[test]
        fn inner_product_verify_arbitrary(L in any::<[Point<Normal, Public, Zero>; 2]>(),
                                          R in any::<[Point<Normal, Public, Zero>; 2]>(),
                                          a0 in any::<Scalar<Public, Zero>>(),
                                          b0 in any::<Scalar<Public, Zero>>()) {
            let gens = Generators::with_hashed_vectors(4);
            let Q = q_point(&gens);
            let P = g!(43 * G).mark_zero();
            let proof = InnerProductProof { terms: vec![(L[0], R[0]), (L[1], R[1])], a0, b0 };
            let c = scalar_from_u64(7);
            prop_assert!(!proof.verify(&mut ts(), &gens.G_vec, &gens.H_vec, &Q, &P, &c));
        }
    }
}
