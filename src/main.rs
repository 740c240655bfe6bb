//! Prints a proof for the value 25 in both JSON forms, then verifies them.
//!
//! Set `RUST_LOG=rust_bulletproofs=debug` to follow the proving steps.

use rust_bulletproofs::util::scalar_from_u128;
use rust_bulletproofs::{Generators, Prover, Result, Transcript};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rust_bulletproofs=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let gens = Generators::new();
    let blind = scalar_from_u128(1_897_278_917_812_981_289_198).set_secrecy();
    let mut transcript = Transcript::new(b"Range proof Test");
    let proof =
        Prover::new(&gens).compute(&mut rand::thread_rng(), &mut transcript, &blind, 25u64)?;
    info!(valid = proof.valid(&gens), "uncompressed proof");
    println!("{}", proof.to_json()?);

    let compressed = proof.compress(&gens)?;
    info!(valid = compressed.valid(&gens), rounds = compressed.ipp.proof_len(), "compressed proof");
    println!("{}", compressed.to_json()?);
    Ok(())
}
