use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;

use chrono::Duration;
use showcase_core::ProductId;
use showcase_infra::{
    Clock, CurationAggregator, FixedClock, InMemoryProductStore, ProductStore, ShowcaseConfig,
    VisibilityDispatcher,
};
use showcase_products::{
    Category, Month, Product, ProductStatus, VisibilityChange, VisibilityFlag, VisibilityFlags,
};

/// A collection spread over ten years with a sprinkling of curated flags.
fn seeded_store(size: usize) -> Arc<InMemoryProductStore> {
    let base = FixedClock::at_date(2020, 1, 1).now();
    let products = (0..size).map(|i| {
        let mut visibility = VisibilityFlags::default();
        match i % 10 {
            0 => visibility.best_selling = true,
            1 => visibility.editors_pick = true,
            2 => visibility.featured_product = true,
            _ => {}
        }
        visibility.best_sellers = i < 4;
        if i < 4 {
            visibility.best_selling = false;
            visibility.editors_pick = false;
            visibility.featured_product = false;
        }
        Product {
            id: ProductId::new(),
            name: format!("Product {i}"),
            description: "Seeded".to_string(),
            product_link: String::new(),
            price: (i % 200) as f64,
            category: Category::ALL[i % Category::ALL.len()],
            sku: format!("SKU-{i}"),
            images: vec![],
            year: 2017 + (i % 10) as i32,
            month: Month::ALL[i % 12],
            status: ProductStatus::Active,
            visibility,
            tags: vec![],
            stock: 0,
            views: (i * 7 % 500) as u64,
            created_at: base + Duration::minutes(i as i64),
            updated_at: base + Duration::minutes(i as i64),
        }
    });
    Arc::new(InMemoryProductStore::with_products(products))
}

fn bench_homepage_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("homepage_feed");
    for size in [100usize, 1_000, 10_000] {
        let aggregator = CurationAggregator::new(
            seeded_store(size),
            FixedClock::at_date(2026, 1, 15),
            &ShowcaseConfig::default(),
        );
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(aggregator.homepage_feed().unwrap()));
        });
    }
    group.finish();
}

fn bench_related_products(c: &mut Criterion) {
    let store = seeded_store(1_000);
    let target = store.find(&Default::default()).unwrap()[500].id;
    let aggregator =
        CurationAggregator::new(store, FixedClock::at_date(2026, 1, 15), &ShowcaseConfig::default());

    c.bench_function("related_products_1000", |b| {
        b.iter(|| black_box(aggregator.related_products(black_box(target)).unwrap()));
    });
}

fn bench_visibility_dispatch(c: &mut Criterion) {
    let store = seeded_store(1_000);
    let target = store.find(&Default::default()).unwrap()[500].id;
    let dispatcher = VisibilityDispatcher::new(store, FixedClock::at_date(2026, 1, 15), 3);
    let mut value = false;

    c.bench_function("toggle_editors_pick_1000", |b| {
        b.iter(|| {
            value = !value;
            dispatcher
                .dispatch(VisibilityChange::new(target, VisibilityFlag::EditorsPick, value))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_homepage_feed,
    bench_related_products,
    bench_visibility_dispatch
);
criterion_main!(benches);
