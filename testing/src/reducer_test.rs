//! Given/When/Then harness for reducers.
//!
//! A [`ReducerTest`] reduces one or more actions against a starting state
//! without a store: effects are collected, never run. That keeps reducer
//! tests free of channels and follow-up ordering, which the runtime tests
//! cover on their own.

#![allow(clippy::module_name_repetitions)]

use listkeeper_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Reduces queued actions in order and checks what they left behind
///
/// State checks see the state after the last action. Effect checks see only
/// the effects returned by the last action, so a test about a follow-up
/// should end on the action that sends it.
///
/// # Example
///
/// ```ignore
/// use listkeeper_testing::{assertions, ReducerTest};
///
/// ReducerTest::new(TodoReducer::new())
///     .with_env(())
///     .given_state(TodoAppState::default())
///     .when_action(TodoAction::DraftChanged { text: "Buy milk".into() })
///     .when_action(TodoAction::SubmitDraft)
///     .then_state(|state| assert_eq!(state.todos.len(), 1))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    given: Option<S>,
    actions: Vec<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Starts a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            given: None,
            actions: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Starting state
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.given = Some(state);
        self
    }

    /// Appends an action; actions are reduced in the order they were added
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Checks the final state
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Checks the effects returned by the last action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Reduces every queued action, then runs the checks
    ///
    /// # Panics
    ///
    /// Panics when no state, environment or action was given, and whenever
    /// a check fails.
    #[allow(clippy::panic, clippy::expect_used)]
    pub fn run(self) {
        let mut state = self.given.expect("given_state() was not called");
        let env = self.env.expect("with_env() was not called");
        assert!(!self.actions.is_empty(), "when_action() was not called");

        let mut last_effects = Vec::new();
        for action in self.actions {
            last_effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effect_checks {
            check(&last_effects);
        }
    }
}

/// Checks for the effects a reducer returned
pub mod assertions {
    use listkeeper_core::effect::Effect;

    /// Every effect is [`Effect::None`], or there are none at all
    ///
    /// # Panics
    ///
    /// Panics if any effect would send an action.
    #[allow(clippy::panic)]
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Exactly `expected` effects were returned, `Effect::None` included
    ///
    /// # Panics
    ///
    /// Panics on a different count.
    #[allow(clippy::panic)]
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "Wrong number of effects");
    }

    /// The effects, flattened, send exactly `expected` in this order
    ///
    /// # Panics
    ///
    /// Panics if the sent actions differ.
    #[allow(clippy::panic)]
    pub fn assert_sends<A>(effects: &[Effect<A>], expected: &[A])
    where
        A: Clone + PartialEq + std::fmt::Debug,
    {
        let sent: Vec<A> = effects
            .iter()
            .cloned()
            .flat_map(Effect::into_actions)
            .collect();
        assert_eq!(sent, expected, "Sent actions differ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listkeeper_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        Double,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.count -= 1;
                    SmallVec::new()
                },
                TestAction::Double => {
                    smallvec![Effect::Send(TestAction::Increment), Effect::Send(TestAction::Increment)]
                },
            }
        }
    }

    #[test]
    fn single_action_updates_state() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_reduce_in_order() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Decrement)
            .when_action(TestAction::Decrement)
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 4);
            })
            .run();
    }

    #[test]
    fn sends_are_flattened_in_order() {
        ReducerTest::new(TestReducer)
            .with_env(())
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Double)
            .then_state(|state| assert_eq!(state.count, 0))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 2);
                assertions::assert_sends(effects, &[TestAction::Increment, TestAction::Increment]);
            })
            .run();
    }

    #[test]
    fn none_effects_count_as_no_effects() {
        assertions::assert_no_effects::<TestAction>(&[Effect::None]);
        assertions::assert_no_effects::<TestAction>(&[]);
    }

    #[test]
    #[should_panic(expected = "Expected no effects")]
    fn send_fails_no_effects_check() {
        assertions::assert_no_effects(&[Effect::Send(TestAction::Increment)]);
    }
}
