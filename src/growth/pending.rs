use crate::growth::branch::Branch;

/// Outcome of offering a continuation to a [`PendingWork`] set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The branch was appended and will be expanded on some later eligible tick.
    Admitted,
    /// The set is at its ceiling; the branch was discarded.
    Dropped,
}

/// Branches waiting to be expanded.
///
/// Entries are plain [`Branch`] values so the set can be inspected, serialized and compared in
/// tests. Order is insertion order; it carries no meaning beyond keeping partitions unbiased.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PendingWork {
    items: Vec<Branch>,
    ceiling: Option<usize>,
}

impl PendingWork {
    /// Empty set with an optional hard ceiling on its size.
    pub fn new(ceiling: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            ceiling,
        }
    }

    /// Append a continuation unless the ceiling has been reached.
    pub fn push(&mut self, branch: Branch) -> Admission {
        if self.is_full() {
            return Admission::Dropped;
        }
        self.items.push(branch);
        Admission::Admitted
    }

    /// Split the set: entries for which `keep` returns `true` stay (in their original order), the
    /// rest are removed and returned in their original order.
    pub fn partition<F>(&mut self, mut keep: F) -> Vec<Branch>
    where
        F: FnMut(&Branch) -> bool,
    {
        let mut run_now = Vec::new();
        self.items.retain(|b| {
            if keep(b) {
                true
            } else {
                run_now.push(*b);
                false
            }
        });
        run_now
    }

    /// Append a continuation regardless of the ceiling.
    ///
    /// Used for the guaranteed generations, which add fewer than `2^(min_depth + 1)` branches to a
    /// session.
    pub fn push_past_ceiling(&mut self, branch: Branch) {
        self.items.push(branch);
    }

    /// Drop every pending branch.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of pending branches.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Return `true` when a ceiling is set and has been reached.
    pub fn is_full(&self) -> bool {
        self.ceiling.is_some_and(|cap| self.items.len() >= cap)
    }

    /// Configured ceiling, if any.
    pub fn ceiling(&self) -> Option<usize> {
        self.ceiling
    }

    /// Borrow the pending branches in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/growth/pending.rs"]
mod tests;
