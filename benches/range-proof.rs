#![allow(non_snake_case)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::thread_rng;
use rust_bulletproofs::util::scalar_from_u64;
use rust_bulletproofs::{Generators, InnerProductProof, Prover, Transcript};
use secp256kfun::{marker::*, op, Scalar};

fn prove(c: &mut Criterion) {
    let gens = Generators::new();
    let blind = Scalar::random(&mut thread_rng()).mark_zero();
    let mut group = c.benchmark_group("range proof");
    group.bench_function("prove", |b| {
        b.iter(|| {
            Prover::new(&gens)
                .compute(&mut thread_rng(), &mut Transcript::new(b"bench"), &blind, 25u64)
                .unwrap()
        })
    });

    let proof = Prover::new(&gens)
        .compute(&mut thread_rng(), &mut Transcript::new(b"bench"), &blind, 25u64)
        .unwrap();
    group.bench_function("verify uncompressed", |b| b.iter(|| assert!(proof.valid(&gens))));
    group.bench_function("compress", |b| b.iter(|| proof.compress(&gens).unwrap()));

    let compressed = proof.compress(&gens).unwrap();
    group.bench_function("verify compressed", |b| b.iter(|| assert!(compressed.valid(&gens))));
    group.finish();
}

fn inner_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("inner product");
    for n in [4usize, 16, 64] {
        let gens = Generators::with_hashed_vectors(n);
        let Q = gens.B.non_normal().mark_zero();
        let a: Vec<_> = (0..n as u64).map(scalar_from_u64).collect();
        let b_vec: Vec<_> = (0..n as u64).map(|i| scalar_from_u64(i * i + 1)).collect();
        let P = op::lincomb(
            a.iter().chain(b_vec.iter()),
            gens.G_vec.iter().chain(gens.H_vec.iter()),
        );
        let ip = rust_bulletproofs::util::inner_product(&a, &b_vec);

        group.bench_with_input(BenchmarkId::new("prove", n), &n, |b, _| {
            b.iter(|| {
                InnerProductProof::prove(
                    &mut Transcript::new(b"bench"),
                    gens.G_vec.clone(),
                    gens.H_vec.clone(),
                    &Q,
                    a.clone(),
                    b_vec.clone(),
                )
                .unwrap()
            })
        });
        let proof = InnerProductProof::prove(
            &mut Transcript::new(b"bench"),
            gens.G_vec.clone(),
            gens.H_vec.clone(),
            &Q,
            a.clone(),
            b_vec.clone(),
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("verify", n), &n, |b, _| {
            b.iter(|| {
                let mut transcript = Transcript::new(b"bench");
                assert!(proof.verify(&mut transcript, &gens.G_vec, &gens.H_vec, &Q, &P, &ip))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, prove, inner_product);
criterion_main!(benches);
