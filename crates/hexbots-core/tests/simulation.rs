//! Integration tests for full simulation runs.
//!
//! Exercises: generation → tick loop → needs / queue / agents / milestones
//! on both bundled deployments.

use hecs::Entity;
use hexbots_core::components::{AfterMove, AgentState, Behavior, Location, Needs};
use hexbots_core::engine::SimulationEngine;
use hexbots_core::systems::agent_order;
use hexbots_logic::catalog::WorkTarget;
use hexbots_logic::events::SimEvent;
use hexbots_logic::grid::StationKind;
use hexbots_logic::hex::Hex;
use hexbots_logic::ids::AgentId;
use hexbots_logic::needs::NeedKind;

// ── Helpers ────────────────────────────────────────────────────────────

fn entity(engine: &SimulationEngine, id: u32) -> Entity {
    agent_order(&engine.world)
        .into_iter()
        .find(|(agent, _)| *agent == AgentId(id))
        .map(|(_, e)| e)
        .unwrap()
}

fn state(engine: &SimulationEngine, id: u32) -> AgentState {
    let e = entity(engine, id);
    engine.world.get::<&Behavior>(e).unwrap().state.clone()
}

/// Run `hours` of sim time in ticks of `step` real seconds, checking the
/// queue/agent bookkeeping after every tick.
fn run(engine: &mut SimulationEngine, hours: f64, step: f32) -> Vec<SimEvent> {
    let end = engine.clock().total_hours() + hours;
    let mut events = Vec::new();
    while engine.clock().total_hours() < end {
        engine.tick(step);
        assert_no_orphans(engine);
        events.extend(engine.drain_events());
    }
    events
}

/// Every active item is held by exactly the robot it names, and every held
/// item is active.
fn assert_no_orphans(engine: &SimulationEngine) {
    let agents = engine.agents();
    for item in engine.queue().active() {
        let holder = item.assignee.expect("active item without assignee");
        let agent = agents.iter().find(|a| a.id == holder).unwrap();
        assert_eq!(agent.work.as_ref().map(|w| w.id), Some(item.id));
    }
    for agent in &agents {
        if let Some(work) = &agent.work {
            assert!(engine.queue().active().iter().any(|i| i.id == work.id));
        }
    }
    assert!(engine.queue().pending().iter().all(|i| i.assignee.is_none()));
}

// ── House ──────────────────────────────────────────────────────────────

#[test]
fn test_tired_robot_heads_for_bed() {
    let mut engine = SimulationEngine::house(7).unwrap();
    let e = entity(&engine, 1);
    let _ = engine.world.insert_one(e, Needs::new(10.0, 100.0, 100.0, 100.0));

    engine.tick(0.1);

    let s = state(&engine, 1);
    assert!(
        s == AgentState::Moving {
            then: AfterMove::Recovering(NeedKind::Energy)
        } || s == AgentState::Recovering(NeedKind::Energy),
        "unexpected state {:?}",
        s
    );
}

#[test]
fn test_robot_beside_bed_recovers_immediately() {
    let mut engine = SimulationEngine::house(7).unwrap();
    let e = entity(&engine, 2);
    let _ = engine.world.insert(
        e,
        (
            Needs::new(10.0, 100.0, 100.0, 100.0),
            Location::Cell(Hex::new(1, 2)),
        ),
    );

    engine.tick(0.1);

    assert_eq!(state(&engine, 2), AgentState::Recovering(NeedKind::Energy));
    assert_eq!(engine.focus(AgentId(2)).unwrap().state, "resting");
}

#[test]
fn test_house_day_completes_chores() {
    let mut engine = SimulationEngine::house(3).unwrap();
    let events = run(&mut engine, 24.0, 0.5);

    assert!(engine.queue().completed_len() > 0);
    assert!(engine.queue().completed_len() <= engine.queue().capacity());
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::ItemCompleted { .. })));
    // Robots only ever stand on walkable cells.
    let grid = engine.grid().unwrap();
    for agent in engine.agents() {
        let at = agent.location.cell().unwrap();
        assert!(grid.is_walkable(at), "{} off the floor at {:?}", agent.name, at);
    }
}

#[test]
fn test_requested_work_is_picked_up() {
    let mut engine = SimulationEngine::house(5).unwrap();
    let id = engine
        .request_work("cook_meal", WorkTarget::Station(StationKind::Stove))
        .unwrap();
    assert!(engine
        .request_work("cook_meal", WorkTarget::Station(StationKind::Stove))
        .is_none());
    assert!(engine.request_work("juggle", WorkTarget::Zone(None)).is_none());

    let events = run(&mut engine, 6.0, 0.5);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::ItemCompleted { id: done, .. } if *done == id)));
}

#[test]
fn test_same_seed_same_run() {
    let mut a = SimulationEngine::house(11).unwrap();
    let mut b = SimulationEngine::house(11).unwrap();
    let events_a = run(&mut a, 8.0, 0.5);
    let events_b = run(&mut b, 8.0, 0.5);
    assert_eq!(events_a, events_b);
    assert_eq!(a.agents(), b.agents());
}

// ── Solar ──────────────────────────────────────────────────────────────

#[test]
fn test_solar_run_visits_and_advances() {
    let mut engine = SimulationEngine::solar(9).unwrap();
    engine.clock_mut().set_speed(10.0);

    let mut events = Vec::new();
    for _ in 0..20 {
        events.extend(run(&mut engine, 100.0, 1.0));
        if engine.milestones().unwrap().current_stage() >= 2 {
            break;
        }
    }

    let milestones = engine.milestones().unwrap();
    assert!(milestones.current_stage() >= 2);
    assert!(milestones.progress().visited.contains("moon"));
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::TargetVisited { body, .. } if body == "moon")));
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::StageAdvanced { stage: 2, .. })));

    // Stages are only ever entered one at a time, in order.
    let stages: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::StageAdvanced { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    let expected: Vec<u32> = (2..2 + stages.len() as u32).collect();
    assert_eq!(stages, expected);
}

#[test]
fn test_probes_only_target_unlocked_bodies() {
    let mut engine = SimulationEngine::solar(4).unwrap();
    engine.clock_mut().set_speed(10.0);
    let events = run(&mut engine, 60.0, 1.0);

    let unlocked = engine.milestones().unwrap().unlocked_targets();
    for event in &events {
        if let SimEvent::TargetVisited { body, .. } = event {
            assert!(unlocked.contains(body), "visited locked body {}", body);
        }
    }
    for agent in engine.agents() {
        assert!(agent.visited.contains(&"earth".to_string()));
        assert!(agent.needs.is_none());
    }
}
