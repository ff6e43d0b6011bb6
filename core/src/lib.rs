//! # Listkeeper Core
//!
//! Core traits and types for the Listkeeper reducer architecture.
//!
//! This crate provides the small set of abstractions every Listkeeper feature
//! is built from: a pure reducer over owned state, effect descriptions that
//! feed actions back into the reducer, and injected dependencies.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature, owned by a single writer
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Follow-up work described as data, executed by the runtime
//! - **Environment**: Injected dependencies (id generation)
//!
//! ## Example
//!
//! ```
//! use listkeeper_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Monotonic state revisions
pub mod version;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime, usually none
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe follow-up work to be performed by the runtime.
/// They are values (not execution): a reducer never calls back into the
/// store itself, it returns an [`Effect::Send`] and the runtime dispatches it
/// once the current action has been fully reduced.
pub mod effect {
    /// Effect type - describes follow-up work to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Feed an action back into the reducer
        Send(Action),

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true if this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Send(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }

        /// Flattens this effect into the actions it sends, in execution order
        #[must_use]
        pub fn into_actions(self) -> Vec<Action> {
            let mut actions = Vec::new();
            self.collect_into(&mut actions);
            actions
        }

        fn collect_into(self, out: &mut Vec<Action>) {
            match self {
                Effect::None => {},
                Effect::Send(action) => out.push(action),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_into(out);
                    }
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// so that tests can substitute deterministic implementations.
pub mod environment {
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Id generator trait - abstracts identifier creation for testability
    ///
    /// Implementations must never hand out the same id twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use listkeeper_core::environment::{IdGenerator, SequentialIdGenerator};
    ///
    /// let ids = SequentialIdGenerator::new("todo-");
    /// assert_eq!(ids.next_id(), "todo-1");
    /// assert_eq!(ids.next_id(), "todo-2");
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> String;
    }

    /// Monotonic counter ids: `<prefix>1`, `<prefix>2`, ...
    ///
    /// Safe under rapid successive calls, unlike timestamp-derived ids.
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        counter: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `<prefix>1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                counter: AtomicU64::new(0),
            }
        }

        /// The prefix prepended to every id
        #[must_use]
        pub fn prefix(&self) -> &str {
            &self.prefix
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
            format!("{}{n}", self.prefix)
        }
    }

    /// Random UUID v4 ids: `<prefix><uuid>`
    #[derive(Debug, Clone)]
    pub struct RandomIdGenerator {
        prefix: String,
    }

    impl RandomIdGenerator {
        /// Create a generator producing `<prefix><uuid>` ids
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
            }
        }
    }

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> String {
            format!("{}{}", self.prefix, uuid::Uuid::new_v4())
        }
    }
}
