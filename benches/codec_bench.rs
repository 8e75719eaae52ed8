//! Multicall Codec Benchmarks — Batch Encode/Decode Throughput
//!
//! Benchmarks the pure codec path that runs on every batch: building
//! the `aggregate` calldata and decoding its response.
//!
//! Run with: cargo bench --bench codec_bench

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{address, Address, U256};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use multicall_reader::domain::aggregator::eth_balance_call;
use multicall_reader::domain::call::CallDescriptor;
use multicall_reader::domain::schema::FunctionSchema;
use multicall_reader::usecases::{decode_batch, encode_batch};

const AGGREGATOR: Address = address!("eefba1e63905ef1d7acba5a8513c70307c1ce441");
const TOKEN: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

/// Alternating native-balance and ERC20 `balanceOf` descriptors.
fn descriptors(n: usize) -> Vec<CallDescriptor> {
    let balance_of = FunctionSchema::parse("balanceOf(address)(uint256)")
        .expect("valid signature");
    (0..n)
        .map(|i| {
            let account = Address::with_last_byte(i as u8);
            if i % 2 == 0 {
                eth_balance_call(AGGREGATOR, account)
            } else {
                CallDescriptor::new(
                    TOKEN,
                    balance_of.clone(),
                    vec![DynSolValue::Address(account)],
                )
            }
        })
        .collect()
}

fn response(n: usize) -> Vec<u8> {
    let buffers = (0..n)
        .map(|i| DynSolValue::Bytes(DynSolValue::Uint(U256::from(i), 256).abi_encode()))
        .collect();
    DynSolValue::Tuple(vec![
        DynSolValue::Uint(U256::from(19_000_000u64), 256),
        DynSolValue::Array(buffers),
    ])
    .abi_encode_params()
}

/// Benchmark signature parsing (done once per configured call).
fn bench_parse_signature(c: &mut Criterion) {
    c.bench_function("parse_signature", |b| {
        b.iter(|| {
            let _schema = FunctionSchema::parse(black_box(
                "function getReserves() view returns (uint112, uint112, uint32)",
            ));
        });
    });
}

/// Benchmark `aggregate` calldata encoding across batch sizes.
fn bench_encode_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_batch");
    for n in [1usize, 10, 100] {
        let calls = descriptors(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &calls, |b, calls| {
            b.iter(|| {
                let _data = encode_batch(black_box(calls));
            });
        });
    }
    group.finish();
}

/// Benchmark `aggregate` response decoding across batch sizes.
fn bench_decode_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_batch");
    for n in [1usize, 10, 100] {
        let calls = descriptors(n);
        let raw = response(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| {
                let _outcome = decode_batch(black_box(&calls), black_box(raw));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_signature,
    bench_encode_batch,
    bench_decode_batch,
);
criterion_main!(benches);
