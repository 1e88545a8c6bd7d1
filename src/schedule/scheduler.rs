use rand::Rng;

use crate::foundation::core::TickIndex;
use crate::foundation::error::{PlumError, PlumResult};
use crate::growth::branch::Branch;
use crate::growth::pending::PendingWork;

/// Throttling knobs of the refresh loop.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerParams {
    /// Only every `frame_stride`-th refresh advances growth.
    pub frame_stride: u32,
    /// Chance that a pending branch sits out an eligible tick.
    pub retain_probability: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            frame_stride: 3,
            retain_probability: 0.7,
        }
    }
}

impl SchedulerParams {
    /// Reject a zero stride or a probability outside `[0, 1]`.
    pub fn validate(&self) -> PlumResult<()> {
        if self.frame_stride == 0 {
            return Err(PlumError::validation("scheduler.frame_stride must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.retain_probability) {
            return Err(PlumError::validation(
                "scheduler.retain_probability must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Whether a refresh loop is scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// No loop scheduled; refreshes are ignored.
    #[default]
    Idle,
    /// One tick is scheduled for the next refresh.
    Running,
}

/// What a refresh tick amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The scheduler was idle; nothing was counted.
    Idle,
    /// Counted, but not a multiple of the stride.
    Waiting(TickIndex),
    /// Counted, and pending work should be advanced now.
    Eligible(TickIndex),
}

/// Refresh-driven throttle in front of the growth engine.
///
/// The loop never ends by itself; only [`FrameScheduler::cancel`] stops it.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    params: SchedulerParams,
    state: SchedulerState,
    ticks: u64,
    advanced: u64,
}

impl FrameScheduler {
    /// Idle scheduler using `params` (assumed validated).
    pub fn new(params: SchedulerParams) -> Self {
        Self {
            params,
            state: SchedulerState::Idle,
            ticks: 0,
            advanced: 0,
        }
    }

    /// Active parameters.
    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Return `true` while a loop is scheduled.
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Refreshes counted since the last start.
    pub fn ticks(&self) -> TickIndex {
        TickIndex(self.ticks)
    }

    /// Number of [`FrameScheduler::advance_frame`] calls over the scheduler's lifetime.
    pub fn frames_advanced(&self) -> u64 {
        self.advanced
    }

    /// Enter `Running` with a zeroed tick counter.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::debug!(ticks = self.ticks, "restarting a running scheduler");
        }
        self.state = SchedulerState::Running;
        self.ticks = 0;
    }

    /// Enter `Idle`. Safe to call when already idle.
    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Count one display refresh.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.ticks += 1;
        let idx = TickIndex(self.ticks);
        if self.ticks.is_multiple_of(u64::from(self.params.frame_stride)) {
            TickOutcome::Eligible(idx)
        } else {
            TickOutcome::Waiting(idx)
        }
    }

    /// Apply the retention filter: each pending branch independently stays with
    /// `retain_probability`; the rest are removed and returned to run this frame.
    pub fn advance_frame<R>(&mut self, pending: &mut PendingWork, rng: &mut R) -> Vec<Branch>
    where
        R: Rng,
    {
        self.advanced += 1;
        let retain = self.params.retain_probability;
        pending.partition(|_| rng.random::<f64>() < retain)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
