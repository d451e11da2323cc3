//! Criterion benchmarks for [`composite`], the per-tick hot path.
//!
//! Run with:
//! ```bash
//! cargo bench --package glint-core --bench composite_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glint_core::handlers::{AbilityLayerHandler, SolidColorLayerHandler};
use glint_core::{composite, BlendMode, Color, GameState, LayerEntry, LayerStack, LogicalKey};
use serde_json::json;

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A full-keyboard background plus `n` ability layers blended on top.
fn build_stack(n: usize) -> LayerStack {
    let keyboard: Vec<LogicalKey> = (0..104).map(|i| LogicalKey::new(format!("K{i}"))).collect();
    let mut stack = LayerStack::new().with(LayerEntry::new(Box::new(
        SolidColorLayerHandler::new(Color::rgb(20, 20, 40), keyboard),
    )));
    for _ in 0..n {
        stack.push(
            LayerEntry::new(Box::new(AbilityLayerHandler::default()))
                .with_blend(BlendMode::AlphaOver),
        );
    }
    stack
}

fn dota_state() -> GameState {
    let abilities: Vec<_> = (0..6)
        .map(|i| {
            json!({
                "name": format!("ability_{i}"),
                "level": 1,
                "can_cast": i % 2 == 0,
                "cooldown": i,
                "ultimate": i == 5
            })
        })
        .collect();
    GameState::from_value("dota2", json!({ "abilities": abilities }))
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_composite(c: &mut Criterion) {
    let state = dota_state();
    let mut group = c.benchmark_group("composite");

    for layers in [1usize, 4, 16] {
        let stack = build_stack(layers);
        group.bench_with_input(BenchmarkId::new("ability_layers", layers), &stack, |b, stack| {
            b.iter(|| composite(black_box(stack), black_box(&state)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_composite);
criterion_main!(benches);
