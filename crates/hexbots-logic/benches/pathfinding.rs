use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexbots_logic::grid::{CellKind, HexGrid, StationKind};
use hexbots_logic::hex::{hex_range, Hex};
use hexbots_logic::pathfinding::{find_nearest, find_path};

/// Square field with a comb of walls that forces long detours.
fn comb_field(radius: i32) -> HexGrid {
    let mut grid = HexGrid::new();
    for hex in hex_range(-radius, radius, -radius, radius) {
        let tooth = hex.q % 6 == 0 && hex.q != 0;
        let gap = if (hex.q / 6) % 2 == 0 { hex.r == radius } else { hex.r == -radius };
        let kind = if tooth && !gap { CellKind::Wall } else { CellKind::Floor };
        grid.add_cell(hex, kind, None);
    }
    grid
}

fn bench_pathfinding(c: &mut Criterion) {
    let mut grid = comb_field(32);
    grid.place_station(Hex::new(31, 31), StationKind::Bed).ok();

    let start = Hex::new(-32, 0);
    let goal = Hex::new(32, 0);

    let mut group = c.benchmark_group("hexbots/pathfinding");

    group.bench_function("astar_comb_65x65", |b| {
        b.iter(|| {
            let path = find_path(&grid, black_box(start), black_box(goal));
            black_box(path.map(|p| p.len()));
        })
    });

    group.bench_function("bfs_nearest_station", |b| {
        b.iter(|| {
            let found = find_nearest(&grid, black_box(start), |c| c.station == Some(StationKind::Bed));
            black_box(found.map(|c| c.hex));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_pathfinding);
criterion_main!(benches);
