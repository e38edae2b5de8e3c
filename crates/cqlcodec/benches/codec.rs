// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec Throughput Benchmark
//!
//! Serialize and deserialize cost for a multi-cell UDT holding nested
//! collections, and for a large sorted set.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cqlcodec::{Codec, CodecConfig, CqlType, RandomValues, SchemaRegistry};

fn order_type() -> CqlType {
    let line = CqlType::udt("bench", "line")
        .with_field("sku", CqlType::text())
        .with_field("qty", CqlType::int())
        .with_field("price", CqlType::decimal())
        .build();
    CqlType::udt("bench", "order")
        .with_field("id", CqlType::timeuuid())
        .with_field("lines", CqlType::list(CqlType::frozen(line)))
        .with_field("tags", CqlType::set(CqlType::text()))
        .with_field("attrs", CqlType::map(CqlType::text(), CqlType::blob()))
        .build()
}

fn bench_udt(c: &mut Criterion) {
    let ty = order_type();
    let registry = SchemaRegistry::new();
    registry.register_all(&ty);
    let codec = Codec::new(&registry);
    let mut values = RandomValues::new(CodecConfig::builder().seed(1).min_collection_size(8).build());
    let value = values.value(&ty);
    let bytes = codec.serialize(&ty, &value).expect("serialize");

    c.bench_function("udt_serialize", |b| {
        b.iter(|| codec.serialize(black_box(&ty), black_box(&value)).expect("serialize"));
    });
    c.bench_function("udt_deserialize", |b| {
        b.iter(|| codec.deserialize(black_box(&ty), black_box(&bytes)).expect("deserialize"));
    });
}

fn bench_sorted_set(c: &mut Criterion) {
    let ty = CqlType::set(CqlType::bigint());
    let registry = SchemaRegistry::new();
    let codec = Codec::new(&registry);
    let value = RandomValues::with_seed(2).value_with_min(&ty, 1024);

    c.bench_function("set_1024_serialize", |b| {
        b.iter(|| codec.serialize(black_box(&ty), black_box(&value)).expect("serialize"));
    });
}

criterion_group!(benches, bench_udt, bench_sorted_set);
criterion_main!(benches);
