//! Contest aggregate and ranking.

/// Contest aggregate: reconciliation, ranking and standings.
pub mod contest;
/// Stable ranking and shared place assignment.
pub mod ranking;
