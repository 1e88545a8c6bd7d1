//! Refresh-driven throttling of growth.

/// Tick counting and the retention filter.
pub mod scheduler;
