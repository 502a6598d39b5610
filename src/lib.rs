//! Purpose: Bounded, validating line-input reader for interactive console programs.
//! Exports: `api` (typed reads), `core` (buffer, acquisition, resolution, validation), `notice`.
//! Role: Library backing the `readtrmin` CLI and embedding programs.
//! Invariants: Every read is bounded by a caller budget; overflow is recovered, never buffered.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub mod notice;
