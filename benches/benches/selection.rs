// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use understory_linked_views::{EntityId, View, filter_by_extent};
use understory_scale::BrushExtent;
use understory_selection::SelectionState;

fn grid(len: usize) -> Vec<(EntityId, Point)> {
    let side = (len as f64).sqrt().ceil() as u64;
    (0..len as u64)
        .map(|i| {
            let x = (i % side) as f64;
            let y = (i / side) as f64;
            (EntityId(i), Point::new(x, y))
        })
        .collect()
}

fn bench_filter_by_extent(c: &mut Criterion) {
    let mut group = c.benchmark_group("linked_views/filter_by_extent");

    // Brush covering roughly a quarter of the entities.
    for len in [1_024usize, 16_384, 131_072] {
        let entries = grid(len);
        let half = (len as f64).sqrt() / 2.0;
        let extent = BrushExtent::from_corners(Point::new(-0.5, -0.5), Point::new(half, half));
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::from_parameter(len), &entries, |b, entries| {
            b.iter(|| black_box(filter_by_extent(entries.iter().copied(), &extent)));
        });
    }

    group.finish();
}

fn bench_replace_and_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/replace_and_merge");

    // A brush replacing one source, then the highlight asking for the union.
    for len in [128usize, 2_048, 32_768] {
        let brushed: Vec<EntityId> = (0..len as u64).map(EntityId).collect();
        let picked: Vec<EntityId> = (0..len as u64).step_by(7).map(EntityId).collect();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::from_parameter(len), &brushed, |b, brushed| {
            b.iter_batched(
                || {
                    let mut state = SelectionState::<View, EntityId>::with_sources(View::ALL);
                    state.replace(View::Map, picked.iter().copied());
                    state
                },
                |mut state| {
                    state.replace(View::Scatter, brushed.iter().copied());
                    black_box(state.merged());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_hover_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/merged_with");

    for len in [128usize, 2_048, 32_768] {
        let mut state = SelectionState::<View, EntityId>::with_sources(View::ALL);
        state.replace(View::Scatter, (0..len as u64).map(EntityId));
        let hovered = EntityId(len as u64 + 1);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::from_parameter(len), &state, |b, state| {
            b.iter(|| black_box(state.merged_with(&hovered)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_by_extent,
    bench_replace_and_merge,
    bench_hover_preview
);
criterion_main!(benches);
