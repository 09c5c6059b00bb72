//! HexBots Headless Simulation Harness
//!
//! Runs both deployments in-process and checks the scheduling invariants
//! after every tick. No rendering, no input.
//!
//! Usage:
//!   cargo run -p hexbots-simtest
//!   cargo run -p hexbots-simtest -- --seed 7 --hours 48 --verbose
//!   RUST_LOG=debug cargo run -p hexbots-simtest

use std::path::PathBuf;

use clap::Parser;
use hexbots_core::engine::SimulationEngine;
use hexbots_core::generation::{
    build_house, load_solar, HouseLayout, HOUSE_LAYOUT_JSON, HOUSE_TASKS_JSON, MISSIONS_JSON,
    SOLAR_BODIES_JSON, STAGES_JSON,
};
use hexbots_logic::catalog::Catalog;
use hexbots_logic::config::SimConfig;
use hexbots_logic::events::SimEvent;
use hexbots_logic::hex::Hex;
use hexbots_logic::needs::{NeedKind, Needs};
use hexbots_logic::pathfinding::{find_path, hop_count};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexbots-simtest")]
#[command(about = "Headless simulation harness for HexBots", version)]
struct Cli {
    /// RNG seed for both deployments
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Sim hours to run the house for
    #[arg(long, default_value_t = 24.0)]
    hours: f64,

    /// Sim hours to run the solar system for
    #[arg(long, default_value_t = 400.0)]
    solar_hours: f64,

    /// SimConfig JSON overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print passing checks too
    #[arg(short, long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config: {}", e);
            std::process::exit(2);
        }
    };

    println!("=== HexBots Simulation Harness (seed {}) ===\n", cli.seed);

    let mut results = Vec::new();

    // 1. Bundled data
    results.extend(validate_data());

    // 2. Pathfinding on the house grid
    results.extend(validate_pathfinding());

    // 3. Needs decay
    results.extend(validate_needs(&config));

    // 4. House run
    results.extend(run_house(&config, cli.seed, cli.hours));

    // 5. Solar run
    results.extend(run_solar(&config, cli.seed, cli.solar_hours));

    // 6. Determinism
    results.extend(validate_determinism(&config, cli.seed));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || cli.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    SimConfig::from_json(&json).map_err(|e| e.to_string())
}

// ── 1. Bundled data ─────────────────────────────────────────────────────

fn validate_data() -> Vec<TestResult> {
    println!("--- Bundled Data ---");
    let mut results = Vec::new();

    match HouseLayout::from_json(HOUSE_LAYOUT_JSON).and_then(|l| build_house(&l)) {
        Ok(grid) => {
            let stations = grid.stations();
            results.push(TestResult::check(
                "house_builds",
                !stations.is_empty(),
                format!("{} cells, {} stations", grid.len(), stations.len()),
            ));

            let start = grid.walkable_cells().first().copied().unwrap_or(Hex::ORIGIN);
            let stranded: Vec<String> = stations
                .iter()
                .filter(|(hex, _)| {
                    grid.walkable_neighbors(*hex)
                        .iter()
                        .all(|n| find_path(&grid, start, *n).is_none())
                })
                .map(|(hex, kind)| format!("{} at {:?}", kind.label(), hex))
                .collect();
            results.push(TestResult::check(
                "stations_reachable",
                stranded.is_empty(),
                if stranded.is_empty() {
                    "every station has a reachable approach cell".into()
                } else {
                    format!("unreachable: {}", stranded.join(", "))
                },
            ));
        }
        Err(e) => results.push(TestResult::check("house_builds", false, e.to_string())),
    }

    for (name, json) in [("house_tasks", HOUSE_TASKS_JSON), ("missions", MISSIONS_JSON)] {
        let outcome = Catalog::from_json(json);
        results.push(TestResult::check(
            name,
            outcome.is_ok(),
            match outcome {
                Ok(c) => format!("{} kinds, {} schedule entries", c.work.len(), c.schedule.len()),
                Err(e) => e.to_string(),
            },
        ));
    }

    let solar = load_solar(SOLAR_BODIES_JSON, STAGES_JSON);
    results.push(TestResult::check(
        "solar_layout",
        solar.is_ok(),
        match solar {
            Ok((bodies, ladder)) => format!("{} bodies, {} stages", bodies.bodies.len(), ladder.len()),
            Err(e) => e.to_string(),
        },
    ));

    results
}

// ── 2. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding() -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    let grid = match HouseLayout::from_json(HOUSE_LAYOUT_JSON).and_then(|l| build_house(&l)) {
        Ok(grid) => grid,
        Err(e) => {
            results.push(TestResult::check("path_grid", false, e.to_string()));
            return results;
        }
    };

    let cells = grid.walkable_cells();
    let mut mismatches = Vec::new();
    let mut bad_steps = 0;
    for &from in cells.iter().step_by(7) {
        for &to in &cells {
            let path = find_path(&grid, from, to);
            let hops = hop_count(&grid, from, to);
            if path.as_ref().map(|p| p.len()) != hops {
                mismatches.push(format!("{:?}->{:?}", from, to));
            }
            if let Some(path) = path {
                let mut at = from;
                for step in path {
                    if !at.is_adjacent(&step) || !grid.is_walkable(step) {
                        bad_steps += 1;
                    }
                    at = step;
                }
            }
        }
    }
    results.push(TestResult::check(
        "astar_optimal",
        mismatches.is_empty(),
        if mismatches.is_empty() {
            format!("A* agrees with BFS over {} cells", cells.len())
        } else {
            format!("{} mismatches, first {}", mismatches.len(), mismatches[0])
        },
    ));
    results.push(TestResult::check(
        "path_steps_valid",
        bad_steps == 0,
        format!("{} invalid steps", bad_steps),
    ));

    results
}

// ── 3. Needs ────────────────────────────────────────────────────────────

fn validate_needs(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Needs ---");
    let mut results = Vec::new();
    let needs_config = &config.needs;

    let mut needs = Needs::full();
    let mut hours = 0;
    while needs.most_urgent(needs_config).is_none() && hours < 1000 {
        needs.decay(1.0, false, needs_config);
        hours += 1;
    }
    results.push(TestResult::check(
        "needs_become_urgent",
        hours < 1000,
        format!(
            "first urgent need after {}h: {:?}",
            hours,
            needs.most_urgent(needs_config)
        ),
    ));

    let mut drained = Needs::full();
    drained.decay(10_000.0, true, needs_config);
    let in_bounds = NeedKind::ALL.iter().all(|n| drained.get(*n) >= 0.0);
    results.push(TestResult::check(
        "needs_clamped",
        in_bounds,
        format!("after long decay: {:?}", drained.iter().collect::<Vec<_>>()),
    ));

    results
}

// ── 4. House run ────────────────────────────────────────────────────────

/// Bookkeeping problems found after a tick, if any.
fn check_bookkeeping(engine: &SimulationEngine) -> Option<String> {
    let agents = engine.agents();
    for item in engine.queue().active() {
        let Some(holder) = item.assignee else {
            return Some(format!("active {} has no assignee", item.id));
        };
        let held = agents
            .iter()
            .find(|a| a.id == holder)
            .and_then(|a| a.work.as_ref())
            .map(|w| w.id);
        if held != Some(item.id) {
            return Some(format!("active {} not held by {}", item.id, holder));
        }
    }
    for agent in &agents {
        if let Some(work) = &agent.work {
            if !engine.queue().active().iter().any(|i| i.id == work.id) {
                return Some(format!("{} holds inactive {}", agent.name, work.id));
            }
        }
    }
    if engine.queue().completed_len() > engine.queue().capacity() {
        return Some("completed history over capacity".into());
    }
    None
}

fn run_house(config: &SimConfig, seed: u64, hours: f64) -> Vec<TestResult> {
    println!("--- House ({}h) ---", hours);
    let mut results = Vec::new();

    let mut engine =
        match SimulationEngine::house_with(config.clone(), seed, HOUSE_LAYOUT_JSON, HOUSE_TASKS_JSON) {
            Ok(engine) => engine,
            Err(e) => {
                results.push(TestResult::check("house_engine", false, e.to_string()));
                return results;
            }
        };

    let end = engine.clock().total_hours() + hours;
    let mut problem = None;
    let mut off_floor = 0;
    let mut events = Vec::new();
    while engine.clock().total_hours() < end {
        engine.tick(0.5);
        if problem.is_none() {
            problem = check_bookkeeping(&engine);
        }
        if let Some(grid) = engine.grid() {
            off_floor += engine
                .agents()
                .iter()
                .filter(|a| a.location.cell().map_or(true, |c| !grid.is_walkable(c)))
                .count();
        }
        events.extend(engine.drain_events());
    }

    results.push(TestResult::check(
        "house_bookkeeping",
        problem.is_none(),
        problem.unwrap_or_else(|| "no orphaned or double-held work".into()),
    ));
    results.push(TestResult::check(
        "house_robots_on_floor",
        off_floor == 0,
        format!("{} robot-ticks off walkable cells", off_floor),
    ));

    let added = count(&events, |e| matches!(e, SimEvent::ItemAdded { .. }));
    let completed = count(&events, |e| matches!(e, SimEvent::ItemCompleted { .. }));
    results.push(TestResult::check(
        "house_work_done",
        completed > 0,
        format!(
            "{} added, {} completed, {} pending at {}",
            added,
            completed,
            engine.queue().pending().len(),
            engine.clock().label()
        ),
    ));

    for agent in engine.agents() {
        log::info!(
            "{} {} at {:?} needs {:?}",
            agent.name,
            agent.state,
            agent.location,
            agent.needs.map(|n| n.iter().collect::<Vec<_>>())
        );
    }

    results
}

// ── 5. Solar run ────────────────────────────────────────────────────────

fn run_solar(config: &SimConfig, seed: u64, hours: f64) -> Vec<TestResult> {
    println!("--- Solar ({}h) ---", hours);
    let mut results = Vec::new();

    let mut engine = match SimulationEngine::solar_with(
        config.clone(),
        seed,
        SOLAR_BODIES_JSON,
        STAGES_JSON,
        MISSIONS_JSON,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult::check("solar_engine", false, e.to_string()));
            return results;
        }
    };
    engine.clock_mut().set_speed(10.0);

    let end = engine.clock().total_hours() + hours;
    let mut problem = None;
    let mut events = Vec::new();
    while engine.clock().total_hours() < end {
        engine.tick(1.0);
        if problem.is_none() {
            problem = check_bookkeeping(&engine);
        }
        events.extend(engine.drain_events());
    }

    results.push(TestResult::check(
        "solar_bookkeeping",
        problem.is_none(),
        problem.unwrap_or_else(|| "no orphaned or double-held missions".into()),
    ));

    let stages: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::StageAdvanced { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    let in_order = stages.windows(2).all(|w| w[1] == w[0] + 1);
    results.push(TestResult::check(
        "solar_stage_order",
        in_order,
        format!("stages entered: {:?}", stages),
    ));

    if let Some(milestones) = engine.milestones() {
        let unlocked = milestones.unlocked_targets();
        let locked_visit = events.iter().find_map(|e| match e {
            SimEvent::TargetVisited { body, .. } if !unlocked.contains(body) => Some(body.clone()),
            _ => None,
        });
        results.push(TestResult::check(
            "solar_unlocked_only",
            locked_visit.is_none(),
            match locked_visit {
                Some(body) => format!("visited locked body {}", body),
                None => format!("unlocked: {}", unlocked.join(", ")),
            },
        ));
        results.push(TestResult::check(
            "solar_progress",
            milestones.current_stage() > 1,
            format!(
                "stage {}, {} missions, {} visited, {} bases",
                milestones.current_stage(),
                milestones.progress().completed,
                milestones.progress().visited.len(),
                milestones.progress().bases.len()
            ),
        ));
    }

    results
}

// ── 6. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &SimConfig, seed: u64) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let trace = || -> Option<Vec<SimEvent>> {
        let mut engine = SimulationEngine::house_with(
            config.clone(),
            seed,
            HOUSE_LAYOUT_JSON,
            HOUSE_TASKS_JSON,
        )
        .ok()?;
        let mut events = Vec::new();
        for _ in 0..2000 {
            engine.tick(0.5);
            events.extend(engine.drain_events());
        }
        Some(events)
    };

    let (a, b) = (trace(), trace());
    let detail = match (&a, &b) {
        (Some(a), Some(_)) => match serde_json::to_string(a) {
            Ok(json) => format!("{} events, {} bytes of trace", a.len(), json.len()),
            Err(e) => e.to_string(),
        },
        _ => "engine failed to start".into(),
    };
    results.push(TestResult::check(
        "same_seed_same_trace",
        a.is_some() && a == b,
        detail,
    ));

    results
}

fn count(events: &[SimEvent], pred: impl Fn(&SimEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
