//! Per-error abort-or-recover decisions.
//!
//! The parser never decides on its own whether a recoverable anomaly is
//! fatal; it asks the [`ErrorPolicy`]. Each [`ErrorKind`] has a documented
//! recovery (skip the character, keep it, close the container, skip the
//! comment, emit null) that applies when the policy returns `false`.

use crate::{context::ParseContext, error::ErrorKind};

/// Arbiter of recoverable parse errors.
pub trait ErrorPolicy {
    /// Called for every recoverable error. Returning `true` aborts the
    /// parse; returning `false` continues with the kind's recovery.
    fn error(&mut self, kind: ErrorKind, ctx: &ParseContext) -> bool;

    /// Called for structural mismatches that abort regardless of any
    /// verdict, e.g. closing an array with `}`.
    fn fatal_error(&mut self, _kind: ErrorKind, _ctx: &ParseContext) {}
}

/// Aborts on every reported error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictPolicy;

impl ErrorPolicy for StrictPolicy {
    fn error(&mut self, _kind: ErrorKind, _ctx: &ParseContext) -> bool {
        true
    }
}

/// Aborts on everything except comments, which are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl ErrorPolicy for DefaultPolicy {
    fn error(&mut self, kind: ErrorKind, _ctx: &ParseContext) -> bool {
        kind != ErrorKind::IllegalComment
    }
}

/// Recovers wherever a recovery is defined; only unconditional errors and
/// structural mismatches still abort.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientPolicy;

impl ErrorPolicy for LenientPolicy {
    fn error(&mut self, _kind: ErrorKind, _ctx: &ParseContext) -> bool {
        false
    }
}
