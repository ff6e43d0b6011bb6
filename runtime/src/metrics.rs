//! Metric names recorded by the Store.
//!
//! The Store records through the [`metrics`] facade only. Nothing is
//! exported unless the application installs a recorder; without one every
//! call is a no-op.

use metrics::{describe_counter, describe_histogram};

/// Actions reduced, including follow-up actions sent by effects.
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Follow-up actions queued by effects.
pub const FEEDBACK_ACTIONS_TOTAL: &str = "store.feedback.actions.total";

/// `send` calls cut off by the per-send action limit.
pub const FEEDBACK_LIMIT_EXCEEDED: &str = "store.feedback.limit_exceeded";

/// Actions processed per `send` call.
pub const ACTIONS_PER_SEND: &str = "store.send.actions";

/// Register descriptions for every Store metric with the installed recorder.
///
/// Call once after installing a recorder.
pub fn describe() {
    describe_counter!(ACTIONS_TOTAL, "Actions reduced by the store");
    describe_counter!(
        FEEDBACK_ACTIONS_TOTAL,
        "Follow-up actions queued by effects"
    );
    describe_counter!(
        FEEDBACK_LIMIT_EXCEEDED,
        "Send calls aborted by the per-send action limit"
    );
    describe_histogram!(ACTIONS_PER_SEND, "Actions processed per send call");
}
