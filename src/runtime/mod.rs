//! Single-writer async runtime and event stream APIs.

/// Event payloads emitted during update cycles.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
