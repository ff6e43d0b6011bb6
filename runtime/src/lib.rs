//! # Listkeeper Runtime
//!
//! Runtime implementation for the Listkeeper reducer architecture.
//!
//! This crate provides the [`Store`] that owns feature state and coordinates
//! reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Single-writer owner of state, reducer and environment
//! - **Effect Executor**: Feeds actions sent by effects back into the reducer
//! - **Observers**: Action broadcast and revision watch channels
//!
//! Everything runs synchronously on the caller's thread. A `send` reduces the
//! action and every follow-up action it causes before returning, so observers
//! always see a settled state.
//!
//! ## Example
//!
//! ```ignore
//! use listkeeper_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use listkeeper_core::{effect::Effect, reducer::Reducer, version::Versioned};
use std::collections::VecDeque;

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A single `send` caused more actions than the configured limit
        ///
        /// Actions reduced before the cut-off keep their state changes;
        /// actions still queued are dropped.
        #[error("Send aborted after {limit} actions: effects kept feeding actions back")]
        FeedbackLimitExceeded {
            /// The configured `max_actions_per_send`
            limit: usize,
        },
    }
}

pub use error::StoreError;
pub use store::Store;

/// Store configuration
///
/// # Example
///
/// ```
/// use listkeeper_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(256)
///     .with_max_actions_per_send(16);
/// assert_eq!(config.max_actions_per_send, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Buffered actions per lagging action subscriber
    pub broadcast_capacity: usize,
    /// Upper bound on actions reduced by one `send`, follow-ups included
    pub max_actions_per_send: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    ///
    /// Zero values are raised to 1.
    #[must_use]
    pub fn new(broadcast_capacity: usize, max_actions_per_send: usize) -> Self {
        Self {
            broadcast_capacity: broadcast_capacity.max(1),
            max_actions_per_send: max_actions_per_send.max(1),
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }

    /// Set the per-send action limit
    #[must_use]
    pub fn with_max_actions_per_send(mut self, limit: usize) -> Self {
        self.max_actions_per_send = limit.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            max_actions_per_send: 64,
        }
    }
}

/// Store module - the runtime coordinator
pub mod store {
    use super::{Effect, Reducer, StoreConfig, StoreError, VecDeque, Versioned, metrics};
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store owns:
    /// 1. State (mutated only through [`Store::send`])
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observer channels (processed actions and state revision)
    ///
    /// It is a plain value with a single writer: the event layer holds it
    /// (or a `&mut` to it) and calls `send` for each discrete user event.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
        /// Every processed action, in processing order.
        action_broadcast: broadcast::Sender<A>,
        /// Count of reduced actions that changed the state's version.
        revision: watch::Sender<u64>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Versioned,
        A: Clone + std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with a custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (revision, _) = watch::channel(0);

            Self {
                state: initial_state,
                reducer,
                environment,
                config,
                action_broadcast,
                revision,
            }
        }

        /// Send an action to the store
        ///
        /// Reduces `action`, then every action its effects send, breadth
        /// first in FIFO order, until the queue is empty. Each reduced action
        /// is broadcast to action subscribers; the revision only moves when
        /// the action changed the state's [`Versioned::version`].
        ///
        /// # Returns
        ///
        /// The number of actions reduced, follow-ups included
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if more than
        /// `max_actions_per_send` actions would be reduced. Actions already
        /// reduced keep their effect on state.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
            let limit = self.config.max_actions_per_send;
            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;

            while let Some(action) = queue.pop_front() {
                if processed == limit {
                    tracing::warn!(limit, dropped = queue.len() + 1, "Action limit reached, dropping queued actions");
                    ::metrics::counter!(metrics::FEEDBACK_LIMIT_EXCEEDED).increment(1);
                    return Err(StoreError::FeedbackLimitExceeded { limit });
                }

                tracing::debug!(?action, "Processing action");
                let version = self.state.version();
                let effects = self.reducer.reduce(&mut self.state, action.clone(), &self.environment);
                processed += 1;
                ::metrics::counter!(metrics::ACTIONS_TOTAL).increment(1);

                if self.state.version() != version {
                    self.revision.send_modify(|revision| *revision += 1);
                }
                // No subscribers is fine; the presentation layer may just poll.
                let _ = self.action_broadcast.send(action);

                let before = queue.len();
                for effect in effects {
                    queue.extend(effect.into_actions());
                }
                let queued = queue.len() - before;
                if queued > 0 {
                    tracing::trace!(queued, "Effects sent follow-up actions");
                    ::metrics::counter!(metrics::FEEDBACK_ACTIONS_TOTAL).increment(queued as u64);
                }
            }

            #[allow(clippy::cast_precision_loss)] // action counts stay far below 2^52
            ::metrics::histogram!(metrics::ACTIONS_PER_SEND).record(processed as f64);
            Ok(processed)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Current revision: the number of reduced actions that changed state
        #[must_use]
        pub fn revision(&self) -> u64 {
            *self.revision.borrow()
        }

        /// Subscribe to every action the store reduces
        ///
        /// Receivers see commands sent by the caller as well as follow-ups
        /// sent by effects, in processing order. Slow receivers lag once
        /// `broadcast_capacity` actions are buffered.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Subscribe to revision changes
        ///
        /// A presentation layer can check `has_changed()` to decide whether a
        /// re-render is due. Actions that leave the state as it was, such as
        /// rejected commands, do not notify.
        #[must_use]
        pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
            self.revision.subscribe()
        }

        /// The store's configuration
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Consume the store, returning its state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("revision", &*self.revision.borrow())
                .field("config", &self.config)
                .finish_non_exhaustive()
        }
    }
}
