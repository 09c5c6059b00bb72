//! Agent system - runs each robot's state machine once per tick.
//!
//! Robots are processed one at a time in ascending id order. For each robot
//! the driver observes the world (needs, queue, route), feeds the pure
//! [`transition`] function and applies the effects it asks for.

use hecs::{Entity, World};
use hexbots_logic::catalog::CompletionEffect;
use hexbots_logic::config::SimConfig;
use hexbots_logic::constants::robots::DEFAULT_WORK_MINUTES;
use hexbots_logic::events::{EventSink, SimEvent};
use hexbots_logic::ids::AgentId;
use hexbots_logic::milestones::MilestoneTracker;
use hexbots_logic::work_queue::WorkQueue;
use rand::seq::SliceRandom;
use rand::Rng;

use super::assignment::{assign_mission, assign_task, plan_recovery, MissionPlan};
use super::behavior::{transition, Effect, Input};
use super::movement::advance_route;
use crate::components::{AgentState, Behavior, Location, Needs, Robot, Route, Visited};
use crate::engine::Deployment;

/// Everything a robot's step may read or mutate besides the world.
pub struct AgentContext<'a, R: Rng, S: EventSink> {
    pub deployment: &'a Deployment,
    pub queue: &'a mut WorkQueue,
    pub milestones: Option<&'a mut MilestoneTracker>,
    pub config: &'a SimConfig,
    pub rng: &'a mut R,
    pub sink: &'a mut S,
}

/// Per-robot scratch copy of its components.
struct Agent {
    id: AgentId,
    behavior: Behavior,
    location: Location,
    needs: Option<Needs>,
    route: Option<Route>,
    visited: Option<Visited>,
}

/// Robot entities in processing order.
pub fn agent_order(world: &World) -> Vec<(AgentId, Entity)> {
    let mut order: Vec<(AgentId, Entity)> = world
        .query::<&Robot>()
        .iter()
        .map(|(entity, robot)| (robot.id, entity))
        .collect();
    order.sort_by_key(|(id, _)| *id);
    order
}

/// Step every robot's state machine.
///
/// `real_secs` drives walking, wandering and launching; `sim_hours` drives
/// work, recovery and flight.
pub fn agent_system<R: Rng, S: EventSink>(
    world: &mut World,
    ctx: &mut AgentContext<'_, R, S>,
    real_secs: f32,
    sim_hours: f32,
) {
    for (_, entity) in agent_order(world) {
        let Some(mut agent) = load(world, entity) else {
            continue;
        };
        step(&mut agent, ctx, real_secs, sim_hours);
        store(world, entity, agent);
    }
}

fn load(world: &World, entity: Entity) -> Option<Agent> {
    let id = world.get::<&Robot>(entity).ok()?.id;
    let behavior = (*world.get::<&Behavior>(entity).ok()?).clone();
    let location = (*world.get::<&Location>(entity).ok()?).clone();
    let needs = world.get::<&Needs>(entity).ok().map(|n| *n);
    let route = world.get::<&Route>(entity).ok().map(|r| (*r).clone());
    let visited = world.get::<&Visited>(entity).ok().map(|v| (*v).clone());
    Some(Agent {
        id,
        behavior,
        location,
        needs,
        route,
        visited,
    })
}

fn store(world: &mut World, entity: Entity, agent: Agent) {
    let _ = world.insert(entity, (agent.behavior, agent.location));
    if let Some(needs) = agent.needs {
        let _ = world.insert_one(entity, needs);
    }
    if let Some(visited) = agent.visited {
        let _ = world.insert_one(entity, visited);
    }
    match agent.route {
        Some(route) => {
            let _ = world.insert_one(entity, route);
        }
        None => {
            let _ = world.remove_one::<Route>(entity);
        }
    }
}

fn step<R: Rng, S: EventSink>(
    agent: &mut Agent,
    ctx: &mut AgentContext<'_, R, S>,
    real_secs: f32,
    sim_hours: f32,
) {
    let minutes = sim_hours * 60.0;
    let input = match agent.behavior.state.clone() {
        AgentState::Idle => observe_idle(agent, ctx, real_secs),
        AgentState::Moving { .. } => {
            let done = match agent.route.as_mut() {
                Some(route) => advance_route(
                    route,
                    &mut agent.location,
                    real_secs,
                    sim_hours,
                    ctx.config.walk_speed,
                ),
                None => true,
            };
            done.then_some(Input::RouteDone)
        }
        AgentState::Working => {
            agent.behavior.timer -= minutes;
            (agent.behavior.timer <= 0.0).then_some(Input::TimerDone)
        }
        AgentState::Recovering(need) => {
            let regen = ctx.config.needs.recovery(need).regen_per_hour;
            let satisfied = match agent.needs.as_mut() {
                Some(needs) => {
                    needs.replenish(need, regen * sim_hours);
                    needs.is_satisfied(need, &ctx.config.needs)
                }
                None => true,
            };
            agent.behavior.timer -= minutes;
            (satisfied || agent.behavior.timer <= 0.0).then_some(Input::TimerDone)
        }
        AgentState::Launching { .. } => {
            agent.behavior.launch_progress += real_secs.max(0.0) * ctx.config.launch_rate;
            (agent.behavior.launch_progress >= 1.0).then_some(Input::LaunchDone)
        }
        AgentState::Arriving(_) => Some(Input::Settled {
            has_work: agent.behavior.work.is_some(),
        }),
    };

    let Some(input) = input else {
        return;
    };
    let t = transition(&agent.behavior.state, input);
    if t.changed(&agent.behavior.state) {
        log::debug!(
            "{} {} -> {}",
            agent.id,
            agent.behavior.state.name(),
            t.next.name()
        );
        ctx.sink.emit(SimEvent::StateChanged {
            agent: agent.id,
            from: agent.behavior.state.name().to_string(),
            to: t.next.name().to_string(),
        });
    }
    agent.behavior.state = t.next;
    for effect in t.effects {
        apply(agent, ctx, effect);
    }
}

/// Idle priorities: urgent need, then work, then wandering.
fn observe_idle<R: Rng, S: EventSink>(
    agent: &mut Agent,
    ctx: &mut AgentContext<'_, R, S>,
    real_secs: f32,
) -> Option<Input> {
    match (ctx.deployment, agent.location.clone()) {
        (Deployment::House(grid), Location::Cell(at)) => {
            let urgent = agent
                .needs
                .as_ref()
                .and_then(|n| n.most_urgent(&ctx.config.needs));
            if let Some(need) = urgent {
                if let Some(path) = plan_recovery(grid, at, need, &ctx.config.needs) {
                    return Some(Input::NeedStation { need, path });
                }
                log::debug!("{} needs {} but no station is reachable", agent.id, need.name());
            }

            if let Some((work, path)) = assign_task(grid, ctx.queue, agent.id, at, ctx.sink) {
                return Some(Input::Assigned { work, path });
            }

            agent.behavior.wander_timer -= real_secs.max(0.0);
            if agent.behavior.wander_timer > 0.0 {
                return None;
            }
            let step = grid.walkable_neighbors(at).choose(ctx.rng).copied();
            Some(Input::Wander { step })
        }
        (Deployment::Solar(bodies), Location::Orbit(at)) => {
            let plan = assign_mission(
                bodies,
                ctx.queue,
                agent.id,
                &at,
                ctx.config.flight_speed,
                ctx.sink,
            )?;
            Some(match plan {
                MissionPlan::Here(work) => Input::Assigned { work, path: vec![] },
                MissionPlan::Fly { work, to, hours } => Input::Launch { work, to, hours },
            })
        }
        _ => None,
    }
}

fn apply<R: Rng, S: EventSink>(agent: &mut Agent, ctx: &mut AgentContext<'_, R, S>, effect: Effect) {
    match effect {
        Effect::Hold(work) => agent.behavior.work = Some(work),
        Effect::Walk(path) => agent.route = Some(Route::walk(path)),
        Effect::Launch { to, hours } => {
            let from = agent.location.body().unwrap_or_default().to_string();
            agent.behavior.launch_progress = 0.0;
            agent.location = Location::InTransit {
                from,
                to: to.clone(),
            };
            agent.route = Some(Route::Flight {
                to,
                remaining_hours: hours,
            });
        }
        Effect::Visit(body) => {
            agent.route = None;
            agent.location = Location::Orbit(body.clone());
            if let Some(visited) = agent.visited.as_mut() {
                visited.0.insert(body.clone());
            }
            ctx.sink.emit(SimEvent::TargetVisited {
                agent: agent.id,
                body: body.clone(),
            });
            if let Some(milestones) = ctx.milestones.as_deref_mut() {
                milestones.record_visit(&body, ctx.sink);
            }
        }
        Effect::StartWork => {
            agent.route = None;
            agent.behavior.timer = agent
                .behavior
                .work
                .and_then(|id| ctx.queue.get(id))
                .map_or(DEFAULT_WORK_MINUTES, |item| item.duration_minutes);
        }
        Effect::StartRecovery(need) => {
            agent.route = None;
            agent.behavior.timer = ctx.config.needs.recovery(need).roll_minutes(ctx.rng);
        }
        Effect::CompleteWork => {
            let Some(id) = agent.behavior.work.take() else {
                return;
            };
            match ctx.queue.complete(id, ctx.sink) {
                Ok(item) => {
                    let effect = ctx
                        .queue
                        .catalog()
                        .def(&item.kind)
                        .map_or(CompletionEffect::None, |d| d.effect);
                    if let Some(milestones) = ctx.milestones.as_deref_mut() {
                        milestones.record_completion(&item, effect, ctx.sink);
                    }
                }
                Err(err) => {
                    log::error!("{} completing work {}: {}", agent.id, id, err);
                    debug_assert!(false, "{}", err);
                }
            }
        }
        Effect::ArmWander { first } => {
            agent.route = None;
            let (min, max) = if first {
                ctx.config.wander_first
            } else {
                ctx.config.wander_repeat
            };
            agent.behavior.wander_timer = if max > min {
                ctx.rng.gen_range(min..max)
            } else {
                min
            };
        }
    }
}
