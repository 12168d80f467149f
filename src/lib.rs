//! Purpose: Shared library crate used by the `recado` CLI and tests.
//! Exports: `api` (stable facade), `core` (codec and errors), `text` (string helpers).
//! Role: UI-agnostic library; the binary only parses arguments and formats output.
//! Invariants: Operations are synchronous; the only ambient inputs are clock and RNG.
//! Invariants: `api` is the supported path for external callers.
pub mod api;
pub mod core;
pub mod text;
