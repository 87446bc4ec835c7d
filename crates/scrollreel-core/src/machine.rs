//! Section transition state machine
//!
//! The decision logic is the pure function [`decide`]; [`SectionMachine`] is
//! the only owner and mutator of [`TransitionState`] and applies decisions.

use serde::Serialize;
use tracing::debug;

/// Travel direction of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

impl Direction {
    /// `sign(to - from)` as a direction
    pub fn between(from: usize, to: usize) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::None,
        }
    }

    /// +1 forward, -1 backward, 0 when idle
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
            Direction::None => 0.0,
        }
    }
}

/// Machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Transitioning,
}

/// One accepted move between sections; immutable for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRequest {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

impl TransitionRequest {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            direction: Direction::between(from, to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionState {
    pub current_section: usize,
    pub direction: Direction,
    pub in_flight: bool,
    pub last_progress: f64,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            current_section: 0,
            direction: Direction::None,
            in_flight: false,
            last_progress: 0.0,
        }
    }
}

impl TransitionState {
    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }
}

/// Input to the machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Mapped continuous scroll sample
    ScrollSample { target: usize, progress: f64 },
    /// Deliberate navigation to an index (already clamped)
    Jump { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A transition is in flight; the trigger is dropped, not queued
    Busy,
    /// Target equals the current section
    AlreadyThere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Start(TransitionRequest),
    Ignore(IgnoreReason),
}

/// Decide what a trigger does in a given state
///
/// Scroll samples step exactly one section toward their target; jumps go
/// straight to their index. Anything arriving mid-transition is dropped.
pub fn decide(state: &TransitionState, trigger: Trigger) -> Decision {
    if state.in_flight {
        return Decision::Ignore(IgnoreReason::Busy);
    }
    let current = state.current_section;
    match trigger {
        Trigger::ScrollSample { target, .. } => match Direction::between(current, target) {
            Direction::None => Decision::Ignore(IgnoreReason::AlreadyThere),
            Direction::Forward => Decision::Start(TransitionRequest::new(current, current + 1)),
            Direction::Backward => Decision::Start(TransitionRequest::new(current, current - 1)),
        },
        Trigger::Jump { index } => {
            if index == current {
                Decision::Ignore(IgnoreReason::AlreadyThere)
            } else {
                Decision::Start(TransitionRequest::new(current, index))
            }
        }
    }
}

/// Driver that owns the transition state
#[derive(Debug, Clone, Default)]
pub struct SectionMachine {
    state: TransitionState,
    active: Option<TransitionRequest>,
}

impl SectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Feed a trigger; returns the request to execute when it is accepted
    pub fn accept(&mut self, trigger: Trigger) -> Option<TransitionRequest> {
        if let Trigger::ScrollSample { progress, .. } = trigger {
            // Coalesced: only the latest sample is remembered
            self.state.last_progress = progress;
        }

        match decide(&self.state, trigger) {
            Decision::Start(request) => {
                self.state.in_flight = true;
                self.state.direction = request.direction;
                self.active = Some(request);
                Some(request)
            }
            Decision::Ignore(reason) => {
                debug!(?trigger, ?reason, current = self.state.current_section, "Trigger ignored");
                None
            }
        }
    }

    /// Finish the in-flight request; stale or unknown requests are a no-op
    pub fn complete(&mut self, request: &TransitionRequest) -> bool {
        match self.active {
            Some(active) if active == *request => {
                self.state.current_section = request.to;
                self.state.in_flight = false;
                self.state.direction = Direction::None;
                self.active = None;
                true
            }
            _ => {
                debug!(?request, active = ?self.active, "Stale completion ignored");
                false
            }
        }
    }
}
