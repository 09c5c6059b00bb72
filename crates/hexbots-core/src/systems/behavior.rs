//! Behavior state machine - pure transition function.
//!
//! `transition` maps a state and an observed input to the next state plus
//! the effects the driver must apply. It touches no world data, so every
//! edge of the machine is testable on its own. Inputs that make no sense in
//! the current state leave it unchanged.

use hexbots_logic::hex::Hex;
use hexbots_logic::ids::{BodyId, WorkId};
use hexbots_logic::needs::NeedKind;

use crate::components::{AfterMove, AgentState};

/// Something the driver observed about a robot this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Idle with an urgent need and a reachable station; `path` leads to the
    /// station's approach cell (empty when already there).
    NeedStation { need: NeedKind, path: Vec<Hex> },
    /// Idle and handed a work item reachable on foot, or at the body it is
    /// already orbiting (empty `path`).
    Assigned { work: WorkId, path: Vec<Hex> },
    /// Idle and handed a mission at another body.
    Launch { work: WorkId, to: BodyId, hours: f32 },
    /// Idle wander timer ran out; `step` is the neighbor to move to, if any.
    Wander { step: Option<Hex> },
    /// Launch progress reached 1.
    LaunchDone,
    /// The current route is exhausted.
    RouteDone,
    /// Settled in orbit; `has_work` if the robot carries a mission.
    Settled { has_work: bool },
    /// A work or recovery session ended.
    TimerDone,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Take responsibility for a work item.
    Hold(WorkId),
    Walk(Vec<Hex>),
    /// Leave the current orbit on a flight to `to`.
    Launch { to: BodyId, hours: f32 },
    /// Enter orbit, record the visit.
    Visit(BodyId),
    StartWork,
    StartRecovery(NeedKind),
    /// Hand the held item back to the queue as completed.
    CompleteWork,
    /// Re-arm the wander timer with the first-idle or repeat range.
    ArmWander { first: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: AgentState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: &AgentState) -> Self {
        Self {
            next: state.clone(),
            effects: vec![],
        }
    }

    pub fn changed(&self, from: &AgentState) -> bool {
        self.next != *from
    }
}

/// Compute the next state for `input`.
pub fn transition(state: &AgentState, input: Input) -> Transition {
    match (state, input) {
        (AgentState::Idle, Input::NeedStation { need, path }) => {
            move_then(path, AfterMove::Recovering(need), vec![])
        }
        (AgentState::Idle, Input::Assigned { work, path }) => {
            move_then(path, AfterMove::Working, vec![Effect::Hold(work)])
        }
        (AgentState::Idle, Input::Launch { work, to, hours }) => Transition {
            next: AgentState::Launching { to: to.clone() },
            effects: vec![Effect::Hold(work), Effect::Launch { to, hours }],
        },
        (AgentState::Idle, Input::Wander { step: Some(step) }) => Transition {
            next: AgentState::Moving {
                then: AfterMove::Idle,
            },
            effects: vec![Effect::Walk(vec![step])],
        },
        (AgentState::Idle, Input::Wander { step: None }) => Transition {
            next: AgentState::Idle,
            effects: vec![Effect::ArmWander { first: false }],
        },
        (AgentState::Launching { to }, Input::LaunchDone) => Transition {
            next: AgentState::Moving {
                then: AfterMove::Arrive(to.clone()),
            },
            effects: vec![],
        },
        (AgentState::Moving { then }, Input::RouteDone) => enter(then.clone()),
        (AgentState::Arriving(_), Input::Settled { has_work: true }) => enter(AfterMove::Working),
        (AgentState::Arriving(_), Input::Settled { has_work: false }) => enter(AfterMove::Idle),
        (AgentState::Working, Input::TimerDone) => {
            let mut t = enter(AfterMove::Idle);
            t.effects.insert(0, Effect::CompleteWork);
            t
        }
        (AgentState::Recovering(_), Input::TimerDone) => enter(AfterMove::Idle),
        (state, _) => Transition::stay(state),
    }
}

/// Walk `path` then enter `then`, or enter `then` right away if there is
/// nowhere to walk.
fn move_then(path: Vec<Hex>, then: AfterMove, mut effects: Vec<Effect>) -> Transition {
    if path.is_empty() {
        let mut t = enter(then);
        effects.append(&mut t.effects);
        t.effects = effects;
        return t;
    }
    effects.push(Effect::Walk(path));
    Transition {
        next: AgentState::Moving { then },
        effects,
    }
}

/// Entry effects of the state a route leads to.
fn enter(then: AfterMove) -> Transition {
    match then {
        AfterMove::Idle => Transition {
            next: AgentState::Idle,
            effects: vec![Effect::ArmWander { first: true }],
        },
        AfterMove::Working => Transition {
            next: AgentState::Working,
            effects: vec![Effect::StartWork],
        },
        AfterMove::Recovering(need) => Transition {
            next: AgentState::Recovering(need),
            effects: vec![Effect::StartRecovery(need)],
        },
        AfterMove::Arrive(body) => Transition {
            next: AgentState::Arriving(body.clone()),
            effects: vec![Effect::Visit(body)],
        },
    }
}
