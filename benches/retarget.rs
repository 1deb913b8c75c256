//! Benchmarks for cursor retargeting over a rendered viewport.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::cast_possible_truncation
)]

use std::rc::Rc;

use cellcursor::local::{GridConfig, LocalGrid};
use cellcursor::SubgridKind;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

/// A header plus `rows` x `cols` data grid with a merge every tenth row.
fn build_grid(rows: usize, cols: usize, width: f32, height: f32) -> Rc<LocalGrid> {
    let columns: Vec<Value> = (0..cols)
        .map(|c| json!({ "name": format!("c{c}"), "properties": { "base": { "format": "thousands" } } }))
        .collect();
    let data: Vec<Value> = (0..rows)
        .map(|r| {
            let row: serde_json::Map<String, Value> =
                (0..cols).map(|c| (format!("c{c}"), json!(r * cols + c))).collect();
            Value::Object(row)
        })
        .collect();
    let merges: Vec<Value> = (0..rows)
        .step_by(10)
        .map(|r| json!({ "startRow": r, "startCol": 1, "endRow": r, "endCol": 3 }))
        .collect();

    let config: GridConfig = serde_json::from_value(json!({
        "properties": { "fixedRowCount": 1, "fixedColumnCount": 1 },
        "columns": columns,
        "subgrids": [
            { "kind": "header" },
            { "kind": "data", "rows": data, "merges": merges }
        ],
        "viewport": { "width": width, "height": height }
    }))
    .expect("valid grid config");
    Rc::new(LocalGrid::from_config(config).expect("valid grid"))
}

/// Retarget across every rendered cell, reading the cached properties.
fn bench_viewport_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_sweep");

    for (name, width, height) in [("small", 800.0, 600.0), ("large", 3840.0, 2160.0)] {
        let grid = build_grid(5000, 60, width, height);
        let columns = grid.visible_columns();
        let rows = grid.visible_rows();
        group.throughput(Throughput::Elements((columns.len() * rows.len()) as u64));

        group.bench_with_input(BenchmarkId::new("retarget", name), &grid, |b, grid| {
            let mut cursor = grid.cursor();
            b.iter(|| {
                for row in &rows {
                    for column in &columns {
                        cursor.retarget(column.clone(), row.clone());
                        black_box(cursor.properties());
                        black_box(cursor.is_cell_selected());
                    }
                }
            })
        });
    }

    group.finish();
}

/// Retarget by data coordinates, including scrolled-out merges.
fn bench_data_lookup(c: &mut Criterion) {
    let grid = build_grid(5000, 60, 800.0, 600.0);
    grid.scroll_to(2, 40);
    let mut cursor = grid.cursor();

    c.bench_function("retarget_from_grid_column_data_row", |b| {
        b.iter(|| {
            for y in 0..200 {
                black_box(cursor.retarget_from_grid_column_data_row(
                    black_box(3),
                    y,
                    Some(SubgridKind::Data),
                    true,
                ));
                black_box(cursor.value_cell());
            }
        })
    });
}

/// Full snapshot cost per rendered cell.
fn bench_snapshot(c: &mut Criterion) {
    let grid = build_grid(1000, 20, 800.0, 600.0);

    c.bench_function("snapshot_all", |b| b.iter(|| black_box(grid.snapshot_all())));
}

criterion_group!(
    benches,
    bench_viewport_sweep,
    bench_data_lookup,
    bench_snapshot,
);

criterion_main!(benches);
