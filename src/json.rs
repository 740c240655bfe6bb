#![allow(non_snake_case)]

//! JSON interchange format for range proofs.
//!
//! Points are lowercase hex of their uncompressed encoding. Scalars are `0x` followed by an
//! even number of lowercase hex digits without leading zero bytes. `G` and `order` pin the
//! group the proof was made in and are checked on load. The domain separation tag is not
//! part of the format; loaders pass the tag the proof was made with.

use crate::error::{Error, Result};
use crate::generators::{GENERATOR_G_HEX, ORDER_HEX};
use crate::inner_product::InnerProductProof;
use crate::rangeproof::{CompressedRangeProof, ProofHeader, UncompressedRangeProof};
use crate::util::{decode_point, encode_point, log, PubScalarZ};
use crate::UPPER_EXP;
use secp256kfun::{marker::*, Point, Scalar};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct HeaderJson {
    V: String,
    A: String,
    S: String,
    T1: String,
    T2: String,
    tx: String,
    txbf: String,
    e: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScalarVecJson {
    n: String,
    elems: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UncompressedJson {
    #[serde(flatten)]
    header: HeaderJson,
    lx: ScalarVecJson,
    rx: ScalarVecJson,
    G: String,
    order: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TermJson {
    L: String,
    R: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompressedJson {
    #[serde(flatten)]
    header: HeaderJson,
    terms: Vec<TermJson>,
    a0: String,
    b0: String,
    G: String,
    order: String,
}

pub fn scalar_to_hex(s: &PubScalarZ) -> String {
    let bytes = s.to_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    if start == bytes.len() {
        return "0x00".to_string();
    }
    format!("0x{}", hex::encode(&bytes[start..]))
}

/// Parse a hex scalar. The `0x` prefix is optional and odd digit counts are accepted.
/// Values at or above the group order are rejected.
pub fn scalar_from_hex(s: &str) -> Result<PubScalarZ> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let digits = if digits.len() % 2 == 1 { format!("0{}", digits) } else { digits.to_string() };
    let bytes = hex::decode(&digits)
        .map_err(|e| Error::Format(format!("invalid scalar {:?}: {}", s, e)))?;
    if bytes.len() > 32 {
        return Err(Error::Format(format!("scalar {:?} is longer than 32 bytes", s)));
    }
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    let scalar: Option<PubScalarZ> = Scalar::from_slice(&buf);
    scalar.ok_or_else(|| Error::Format(format!("scalar {:?} is not below the group order", s)))
}

pub fn point_to_hex(p: &Point<Normal, Public, Zero>) -> String {
    hex::encode(encode_point(p))
}

pub fn point_from_hex(s: &str) -> Result<Point<Normal, Public, Zero>> {
    hex::decode(s)
        .ok()
        .and_then(|bytes| decode_point(&bytes))
        .ok_or_else(|| Error::Format(format!("invalid point {:?}", s)))
}

fn non_zero_point_from_hex(s: &str, field: &str) -> Result<Point> {
    point_from_hex(s)?
        .non_zero()
        .ok_or_else(|| Error::Format(format!("{} must not be the point at infinity", field)))
}

fn check_group(G: &str, order: &str) -> Result<()> {
    if !G.eq_ignore_ascii_case(GENERATOR_G_HEX) {
        return Err(Error::Format("Unsupported generator specified".to_string()));
    }
    if !order.eq_ignore_ascii_case(ORDER_HEX) {
        return Err(Error::Format("Unsupported order specified".to_string()));
    }
    Ok(())
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| Error::Format(e.to_string()))
}

fn render<T: Serialize>(wire: &T) -> Result<String> {
    serde_json::to_string(wire).map_err(|e| Error::Format(e.to_string()))
}

impl HeaderJson {
    fn from_header(h: &ProofHeader) -> Self {
        Self {
            V: point_to_hex(&h.V.mark_zero()),
            A: point_to_hex(&h.A.mark_zero()),
            S: point_to_hex(&h.S.mark_zero()),
            T1: point_to_hex(&h.T1.mark_zero()),
            T2: point_to_hex(&h.T2.mark_zero()),
            tx: scalar_to_hex(&h.tx),
            txbf: scalar_to_hex(&h.tx_bf),
            e: scalar_to_hex(&h.e),
        }
    }

    fn into_header(self, dst: &[u8]) -> Result<ProofHeader> {
        Ok(ProofHeader {
            V: non_zero_point_from_hex(&self.V, "V")?,
            A: non_zero_point_from_hex(&self.A, "A")?,
            S: non_zero_point_from_hex(&self.S, "S")?,
            T1: non_zero_point_from_hex(&self.T1, "T1")?,
            T2: non_zero_point_from_hex(&self.T2, "T2")?,
            tx: scalar_from_hex(&self.tx)?,
            tx_bf: scalar_from_hex(&self.txbf)?,
            e: scalar_from_hex(&self.e)?,
            dst: dst.to_vec(),
        })
    }
}

impl ScalarVecJson {
    fn from_scalars(elems: &[PubScalarZ]) -> Self {
        Self { n: ORDER_HEX.to_string(), elems: elems.iter().map(scalar_to_hex).collect() }
    }

    fn into_scalars(self, field: &str) -> Result<Vec<PubScalarZ>> {
        if !self.n.eq_ignore_ascii_case(ORDER_HEX) {
            return Err(Error::Format(format!("{} has unsupported order", field)));
        }
        if self.elems.len() != UPPER_EXP {
            return Err(Error::Format(format!(
                "{} must have {} elements, has {}",
                field,
                UPPER_EXP,
                self.elems.len()
            )));
        }
        self.elems.iter().map(|s| scalar_from_hex(s)).collect()
    }
}

impl UncompressedRangeProof {
    pub fn to_json(&self) -> Result<String> {
        render(&UncompressedJson {
            header: HeaderJson::from_header(&self.header),
            lx: ScalarVecJson::from_scalars(&self.lx),
            rx: ScalarVecJson::from_scalars(&self.rx),
            G: GENERATOR_G_HEX.to_string(),
            order: ORDER_HEX.to_string(),
        })
    }

    /// Load a proof made under the domain separation tag `dst`.
    pub fn from_json(json: &str, dst: &[u8]) -> Result<Self> {
        let wire: UncompressedJson = parse(json)?;
        check_group(&wire.G, &wire.order)?;
        Ok(Self {
            header: wire.header.into_header(dst)?,
            lx: wire.lx.into_scalars("lx")?,
            rx: wire.rx.into_scalars("rx")?,
        })
    }
}

impl CompressedRangeProof {
    pub fn to_json(&self) -> Result<String> {
        let terms = self
            .ipp
            .terms
            .iter()
            .map(|(L, R)| TermJson { L: point_to_hex(L), R: point_to_hex(R) })
            .collect();
        render(&CompressedJson {
            header: HeaderJson::from_header(&self.header),
            terms,
            a0: scalar_to_hex(&self.ipp.a0),
            b0: scalar_to_hex(&self.ipp.b0),
            G: GENERATOR_G_HEX.to_string(),
            order: ORDER_HEX.to_string(),
        })
    }

    /// Load a compressed proof made under the domain separation tag `dst`.
    pub fn from_json(json: &str, dst: &[u8]) -> Result<Self> {
        let wire: CompressedJson = parse(json)?;
        check_group(&wire.G, &wire.order)?;
        if wire.terms.len() != log(UPPER_EXP) {
            return Err(Error::Format(format!(
                "expected {} inner product rounds, found {}",
                log(UPPER_EXP),
                wire.terms.len()
            )));
        }
        let terms = wire
            .terms
            .iter()
            .map(|t| Ok((point_from_hex(&t.L)?, point_from_hex(&t.R)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            header: wire.header.into_header(dst)?,
            ipp: InnerProductProof {
                terms,
                a0: scalar_from_hex(&wire.a0)?,
                b0: scalar_from_hex(&wire.b0)?,
            },
        })
    }
}
