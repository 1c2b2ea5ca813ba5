//! Collaborator seams and update orchestration.

/// List fetcher, metadata provider and observer traits.
pub mod traits;
/// Concurrent fetch and update cycle driver.
pub mod updater;
