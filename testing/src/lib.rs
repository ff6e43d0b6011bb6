//! # Listkeeper Testing
//!
//! Testing utilities and helpers for the Listkeeper reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then builder for reducers ([`ReducerTest`])
//! - Property-based testing strategies
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use listkeeper_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(())
//!     .given_state(TodoAppState::default())
//!     .when_action(TodoAction::AddTodo { text: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.todos.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use listkeeper_core::environment::IdGenerator;

/// Reducer test builder
pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::IdGenerator;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Id generator that replays a fixed script
    ///
    /// Hands out the scripted ids in order (duplicates included), then falls
    /// back to `mock-1`, `mock-2`, ... once the script is exhausted.
    ///
    /// # Example
    ///
    /// ```
    /// use listkeeper_testing::mocks::ScriptedIdGenerator;
    /// use listkeeper_core::environment::IdGenerator;
    ///
    /// let ids = ScriptedIdGenerator::new(["a", "a"]);
    /// assert_eq!(ids.next_id(), "a");
    /// assert_eq!(ids.next_id(), "a");
    /// assert_eq!(ids.next_id(), "mock-1");
    /// ```
    #[derive(Debug, Default)]
    pub struct ScriptedIdGenerator {
        script: Mutex<VecDeque<String>>,
        fallback: AtomicU64,
    }

    impl ScriptedIdGenerator {
        /// Create a generator replaying `ids`
        #[must_use]
        pub fn new<I, S>(ids: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                script: Mutex::new(ids.into_iter().map(Into::into).collect()),
                fallback: AtomicU64::new(0),
            }
        }

        /// Number of scripted ids not yet handed out
        #[must_use]
        pub fn remaining(&self) -> usize {
            self.script.lock().map_or(0, |script| script.len())
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn next_id(&self) -> String {
            let scripted = self
                .script
                .lock()
                .ok()
                .and_then(|mut script| script.pop_front());

            scripted.unwrap_or_else(|| {
                let n = self.fallback.fetch_add(1, Ordering::Relaxed) + 1;
                format!("mock-{n}")
            })
        }
    }
}

/// Property-based testing strategies
pub mod properties {
    use proptest::prelude::*;

    /// Text that is empty after trimming
    pub fn blank_text() -> impl Strategy<Value = String> {
        "[ \t\r\n]{0,8}"
    }

    /// Text with at least one non-whitespace character, possibly padded
    pub fn non_blank_text() -> impl Strategy<Value = String> {
        "[ \t]{0,2}[a-zA-Z0-9][a-zA-Z0-9 ,.!?]{0,24}[ \t]{0,2}"
    }
}

/// Install a tracing subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
/// Honors `RUST_LOG`, defaulting to `debug`.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::ScriptedIdGenerator;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scripted_ids_then_fallback() {
        let ids = ScriptedIdGenerator::new(["x", "y"]);
        assert_eq!(ids.remaining(), 2);
        assert_eq!(ids.next_id(), "x");
        assert_eq!(ids.next_id(), "y");
        assert_eq!(ids.remaining(), 0);
        assert_eq!(ids.next_id(), "mock-1");
        assert_eq!(ids.next_id(), "mock-2");
    }

    #[test]
    fn tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }

    proptest! {
        #[test]
        fn blank_text_trims_to_empty(text in properties::blank_text()) {
            prop_assert!(text.trim().is_empty());
        }

        #[test]
        fn non_blank_text_survives_trim(text in properties::non_blank_text()) {
            prop_assert!(!text.trim().is_empty());
        }
    }
}
