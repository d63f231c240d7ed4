//! Structural event tracing.
//!
//! Trace-level hooks that compile down to a static subscriber check when
//! tracing is unsubscribed. They are never invoked on error paths and
//! never influence control flow.

use tracing::trace;

pub(crate) fn log_start() {
    trace!(target: "jsontape::stage2", "begin document");
}

pub(crate) fn log_start_value(kind: &'static str, depth: usize) {
    trace!(target: "jsontape::stage2", depth, "+{kind}");
}

pub(crate) fn log_end_value(kind: &'static str, depth: usize) {
    trace!(target: "jsontape::stage2", depth, "-{kind}");
}

pub(crate) fn log_value(kind: &'static str, depth: usize) {
    trace!(target: "jsontape::stage2", depth, "{kind}");
}
