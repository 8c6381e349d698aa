//! Benchmarks for the type handle table.
//!
//! Measures the paths a serializer hits once per type-bearing slot:
//! - Issuing a handle for an already registered type (index lookup)
//! - Resolving an index handle
//! - Resolving a name handle through a warm name cache
//! - Resolving a name through the catalog (cache miss path)
//! - Creating a table (reserved slot bootstrap)

extern crate dotwire;

use criterion::{criterion_group, criterion_main, Criterion};
use dotwire::{
    metadata::typesystem::{TypeCatalog, TypeResolver},
    wire::{NameCache, TypeHandle, TypeTable, WireConfig},
};
use std::{hint::black_box, sync::Arc};

const GENERIC_NAME: &str = "System.Collections.Generic.Dictionary`2[[System.String, mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089],[System.Int32, mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089]], mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

fn isolated_table(catalog: &Arc<TypeCatalog>) -> TypeTable {
    TypeTable::with_config(catalog.clone(), WireConfig::isolated()).unwrap()
}

/// Benchmark issuing a handle for a type registered earlier in the session.
fn bench_issue_registered(c: &mut Criterion) {
    let catalog = Arc::new(TypeCatalog::default());
    let mut table = isolated_table(&catalog);
    let dictionary = catalog.resolve(GENERIC_NAME).unwrap();
    table.issue_handle(&dictionary, true).unwrap();

    c.bench_function("table_issue_registered", |b| {
        b.iter(|| {
            let handle = table.issue_handle(black_box(&dictionary), true).unwrap();
            black_box(handle)
        });
    });
}

/// Benchmark resolving an index handle.
fn bench_resolve_index(c: &mut Criterion) {
    let catalog = Arc::new(TypeCatalog::default());
    let mut table = isolated_table(&catalog);
    let handle = TypeHandle::Index(3);

    c.bench_function("table_resolve_index", |b| {
        b.iter(|| {
            let resolved = table.resolve_handle(black_box(&handle)).unwrap();
            black_box(resolved)
        });
    });
}

/// Benchmark resolving a name handle that is already in the name cache.
fn bench_resolve_cached_name(c: &mut Criterion) {
    let catalog = Arc::new(TypeCatalog::default());
    let cache = Arc::new(NameCache::new());
    let config = WireConfig::default();
    let handle = TypeHandle::from(GENERIC_NAME);
    TypeTable::with_cache(catalog.clone(), cache.clone(), &config)
        .unwrap()
        .resolve_handle(&handle)
        .unwrap();

    c.bench_function("table_resolve_cached_name", |b| {
        b.iter(|| {
            let mut table = TypeTable::with_cache(catalog.clone(), cache.clone(), &config).unwrap();
            let resolved = table.resolve_handle(black_box(&handle)).unwrap();
            black_box(resolved)
        });
    });
}

/// Benchmark the catalog resolving a generic instance name (the cache miss path).
fn bench_catalog_resolve(c: &mut Criterion) {
    let catalog = TypeCatalog::default();

    c.bench_function("catalog_resolve_generic", |b| {
        b.iter(|| {
            let resolved = catalog.resolve(black_box(GENERIC_NAME)).unwrap();
            black_box(resolved)
        });
    });
}

/// Benchmark creating a table with its four reserved slots.
fn bench_table_new(c: &mut Criterion) {
    let catalog = Arc::new(TypeCatalog::default());

    c.bench_function("table_new", |b| {
        b.iter(|| black_box(isolated_table(&catalog)));
    });
}

criterion_group!(
    benches,
    bench_issue_registered,
    bench_resolve_index,
    bench_resolve_cached_name,
    bench_catalog_resolve,
    bench_table_new
);
criterion_main!(benches);
