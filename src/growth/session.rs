use rand::Rng;

use crate::growth::branch::Branch;
use crate::growth::engine::GrowthEngine;
use crate::growth::pending::PendingWork;
use crate::render::surface::Surface;

/// Identifies one growth session; a new id is issued on every (re)initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct SessionId(pub u64);

/// Counters accumulated over one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionStats {
    /// Branches expanded, i.e. segments drawn.
    pub segments_drawn: u64,
    /// Children appended to the pending set (the root included).
    pub continuations_enqueued: u64,
    /// Children discarded at the pending ceiling.
    pub continuations_dropped: u64,
    /// Deepest generation drawn so far.
    pub max_depth_drawn: u32,
    /// Eligible ticks that advanced this session.
    pub frames_advanced: u64,
}

/// The pending work of one session plus what it has done so far.
///
/// Nothing here survives a reset: the backdrop replaces the whole value.
#[derive(Clone, Debug)]
pub struct GrowthSession {
    id: SessionId,
    pending: PendingWork,
    stats: SessionStats,
}

impl GrowthSession {
    /// Fresh session holding only [`Branch::root`].
    pub fn seeded(id: SessionId, ceiling: Option<usize>) -> Self {
        let mut pending = PendingWork::new(ceiling);
        pending.push(Branch::root());
        Self {
            id,
            pending,
            stats: SessionStats {
                continuations_enqueued: 1,
                ..SessionStats::default()
            },
        }
    }

    /// This session's id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Branches waiting for expansion.
    pub fn pending(&self) -> &PendingWork {
        &self.pending
    }

    pub(crate) fn pending_mut(&mut self) -> &mut PendingWork {
        &mut self.pending
    }

    /// Counters so far.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Expand every branch selected for this frame, drawing each once.
    pub fn run_frame<R, S>(
        &mut self,
        engine: &GrowthEngine,
        selected: Vec<Branch>,
        rng: &mut R,
        surface: &mut S,
    ) where
        R: Rng,
        S: Surface + ?Sized,
    {
        self.stats.frames_advanced += 1;
        for branch in selected {
            let out = engine.expand(&branch, rng, surface, &mut self.pending);
            self.stats.segments_drawn += 1;
            self.stats.continuations_enqueued += u64::from(out.enqueued);
            self.stats.continuations_dropped += u64::from(out.dropped);
            self.stats.max_depth_drawn = self.stats.max_depth_drawn.max(branch.depth);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/growth/session.rs"]
mod tests;
