// Encoding, signing & verification benchmarks for the ledger driver.
//
// Covers canonical encoding of asset content at various sizes, Ed25519
// signing and verification of raw messages, and the full build-and-sign and
// verify paths of a CREATE transaction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tessera_driver::codec::{self, Value};
use tessera_driver::crypto::{sign, verify, Keypair};
use tessera_driver::model::Content;
use tessera_driver::transaction::{verify_transaction, TransactionBuilder};

fn content_with(fields: usize) -> Content {
    Content::from_pairs((0..fields).map(|i| {
        (
            format!("field_{:04}", i),
            Value::from(format!("value number {}", i)),
        )
    }))
}

fn bench_canonical_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/canonical_encode");

    for fields in [8usize, 64, 512] {
        let content = content_with(fields);
        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fields), &content, |b, content| {
            b.iter(|| codec::encode(content).unwrap());
        });
    }

    group.finish();
}

fn bench_sign_message(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let message = br#"{"asset":{"data":{"firstname":"John"}},"operation":"CREATE"}"#;

    c.bench_function("ed25519/sign_message", |b| {
        b.iter(|| sign(&keypair, message));
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let message = br#"{"asset":{"data":{"firstname":"John"}},"operation":"CREATE"}"#;
    let signature = sign(&keypair, message);
    let public_key = keypair.public_key();

    c.bench_function("ed25519/verify_signature", |b| {
        b.iter(|| verify(&public_key, message, &signature));
    });
}

fn bench_build_and_sign(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let content = content_with(16);

    c.bench_function("transaction/build_and_sign", |b| {
        b.iter(|| {
            TransactionBuilder::create()
                .add_assets(&content)
                .unwrap()
                .add_metadata("what", "bench")
                .unwrap()
                .build_and_sign(&keypair)
                .unwrap()
        });
    });
}

fn bench_verify_transaction(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let tx = TransactionBuilder::create()
        .add_assets(&content_with(16))
        .unwrap()
        .build_and_sign(&keypair)
        .unwrap();

    c.bench_function("transaction/verify", |b| {
        b.iter(|| verify_transaction(&tx).unwrap());
    });
}

criterion_group!(
    benches,
    bench_canonical_encode,
    bench_sign_message,
    bench_verify_signature,
    bench_build_and_sign,
    bench_verify_transaction,
);
criterion_main!(benches);
