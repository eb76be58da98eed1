//! Upstream health state machine.
//!
//! # States
//! - Alive: upstream receives work
//! - Sick: callers should route work elsewhere
//!
//! # State Transitions
//! ```text
//! Alive → Sick:  consecutive failures  >= STREAK_THRESHOLD
//! Sick → Alive:  consecutive successes >= STREAK_THRESHOLD
//! ```
//!
//! # Design Decisions
//! - Hysteresis prevents flapping
//! - A failure clears the success streak and a success clears the failure streak
//! - Both streaks reset on recovery; the failure streak keeps counting while sick
//! - One RwLock guards the whole record so readers never see a torn update

use std::sync::{PoisonError, RwLock};

/// Consecutive outcomes needed to flip the health flag either way.
pub const STREAK_THRESHOLD: u32 = 5;

/// A consistent copy of the health record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub sick: bool,
    /// Consecutive failures since the last reset.
    pub sick_rate: u32,
    /// Consecutive successes since the last reset.
    pub success_rate: u32,
}

/// A change of the health flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BecameSick,
    Recovered,
}

/// What a recorded failure did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// The failure opened a new streak while the upstream was alive.
    pub streak_started: bool,
    pub transition: Option<Transition>,
}

/// Health record for one upstream.
#[derive(Debug, Default)]
pub struct HealthState {
    inner: RwLock<HealthSnapshot>,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the upstream is currently sick.
    pub fn is_sick(&self) -> bool {
        self.snapshot().sick
    }

    /// Read the whole record at once.
    pub fn snapshot(&self) -> HealthSnapshot {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Report a failed call.
    pub fn record_failure(&self) -> FailureOutcome {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let streak_started = !state.sick && state.sick_rate == 0;
        state.sick_rate = state.sick_rate.saturating_add(1);
        state.success_rate = 0;

        let transition = if !state.sick && state.sick_rate >= STREAK_THRESHOLD {
            state.sick = true;
            Some(Transition::BecameSick)
        } else {
            None
        };

        FailureOutcome {
            streak_started,
            transition,
        }
    }

    /// Report a successful liveness check.
    pub fn record_success(&self) -> Option<Transition> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        state.success_rate = state.success_rate.saturating_add(1);
        state.sick_rate = 0;

        if state.success_rate < STREAK_THRESHOLD {
            return None;
        }

        let was_sick = state.sick;
        *state = HealthSnapshot::default();
        was_sick.then_some(Transition::Recovered)
    }
}
