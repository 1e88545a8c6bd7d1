//! Branch growth: the data model, the pending work set and the continuation rule.

/// Branch geometry.
pub mod branch;
/// The continuation rule.
pub mod engine;
/// Pending work set.
pub mod pending;
/// One growth session between two resets.
pub mod session;
