//! Purpose: Internal JSON parsing boundary used by the strict decode engine.
//! Exports: `parse` module with fragment splitting and scalar decode helpers.
//! Role: Single seam for the parser implementation so the engine never calls serde_json directly.
//! Invariants: Fragments are borrowed from the caller's input and never mutated.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
