use rand::Rng;

use crate::foundation::core::Point;
use crate::foundation::error::{PlumError, PlumResult};
use crate::growth::branch::Branch;
use crate::growth::pending::{Admission, PendingWork};
use crate::render::surface::Surface;

/// Tunables of the continuation rule.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrowthParams {
    /// Branches shallower than this always produce both children.
    pub min_depth: u32,
    /// Per-child probability of continuing once `min_depth` is reached.
    pub continue_probability: f64,
    /// Upper bound of the random angular offset applied to each child, in radians.
    pub max_spread: f64,
    /// Child length is the parent's plus a uniform draw in `[-length_jitter, length_jitter]`.
    pub length_jitter: f64,
    /// Floor applied to child lengths so segments never degenerate or flip.
    pub min_length: f64,
    /// Branches at this depth produce no children.
    pub max_depth: Option<u32>,
    /// Ceiling on the pending work set; optional continuations beyond it are dropped.
    /// Children of branches shallower than `min_depth` are always admitted.
    pub max_pending: Option<usize>,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            min_depth: 4,
            continue_probability: 0.5,
            max_spread: 0.2,
            length_jitter: 1.0,
            min_length: 0.05,
            max_depth: None,
            max_pending: Some(200_000),
        }
    }
}

impl GrowthParams {
    /// Reject parameters that would make the rule meaningless.
    pub fn validate(&self) -> PlumResult<()> {
        if !(0.0..=1.0).contains(&self.continue_probability) {
            return Err(PlumError::validation(
                "growth.continue_probability must be within [0, 1]",
            ));
        }
        for (name, v) in [
            ("growth.max_spread", self.max_spread),
            ("growth.length_jitter", self.length_jitter),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PlumError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.min_length.is_finite() || self.min_length <= 0.0 {
            return Err(PlumError::validation(
                "growth.min_length must be finite and > 0",
            ));
        }
        if let Some(max) = self.max_depth
            && max < self.min_depth
        {
            return Err(PlumError::validation(format!(
                "growth.max_depth ({max}) must be >= growth.min_depth ({})",
                self.min_depth
            )));
        }
        if self.max_pending == Some(0) {
            return Err(PlumError::validation(
                "growth.max_pending must be >= 1 so a session can be seeded",
            ));
        }
        Ok(())
    }
}

/// What a single [`GrowthEngine::expand`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expansion {
    /// End point of the drawn segment (start of every child).
    pub end: Point,
    /// Children appended to the pending set.
    pub enqueued: u8,
    /// Children that passed the continuation rule but hit the pending ceiling.
    pub dropped: u8,
}

/// Expands branches into drawn segments and successor branches.
#[derive(Clone, Debug, Default)]
pub struct GrowthEngine {
    params: GrowthParams,
}

impl GrowthEngine {
    /// Engine using `params` (assumed validated).
    pub fn new(params: GrowthParams) -> Self {
        Self { params }
    }

    /// Active parameters.
    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    /// Stroke `branch` from its start to its end.
    pub fn draw_segment<S>(&self, branch: &Branch, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        surface.draw_line(branch.start, branch.end());
    }

    /// Draw `branch`, then offer up to two children to `pending`.
    ///
    /// Each child turns away from the parent's direction by an independent draw in
    /// `[0, max_spread]`, one to each side. Below `min_depth` both children are always offered;
    /// from there on each is offered with `continue_probability`.
    pub fn expand<R, S>(
        &self,
        branch: &Branch,
        rng: &mut R,
        surface: &mut S,
        pending: &mut PendingWork,
    ) -> Expansion
    where
        R: Rng,
        S: Surface + ?Sized,
    {
        let mut out = Expansion {
            end: branch.end(),
            enqueued: 0,
            dropped: 0,
        };
        self.draw_segment(branch, surface);

        for side in [-1.0, 1.0] {
            if !self.should_continue(branch, rng) {
                continue;
            }
            let jitter = self.params.length_jitter;
            let length =
                (branch.length + rng.random_range(-jitter..=jitter)).max(self.params.min_length);
            let theta = branch.theta + side * rng.random_range(0.0..=self.params.max_spread);
            let child = branch.child(length, theta);
            if branch.depth < self.params.min_depth {
                pending.push_past_ceiling(child);
                out.enqueued += 1;
                continue;
            }
            match pending.push(child) {
                Admission::Admitted => out.enqueued += 1,
                Admission::Dropped => out.dropped += 1,
            }
        }
        out
    }

    fn should_continue<R>(&self, branch: &Branch, rng: &mut R) -> bool
    where
        R: Rng,
    {
        if self.params.max_depth.is_some_and(|max| branch.depth >= max) {
            return false;
        }
        branch.depth < self.params.min_depth
            || rng.random::<f64>() < self.params.continue_probability
    }
}

#[cfg(test)]
#[path = "../../tests/unit/growth/engine.rs"]
mod tests;
