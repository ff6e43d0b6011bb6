//! Integration tests for Store dispatch, feedback and observation
//!
//! Covers the synchronous action → reducer → effects → action loop and the
//! channels a presentation layer uses to learn that state changed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use listkeeper_core::version::{Version, Versioned};
use listkeeper_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use listkeeper_runtime::{Store, StoreConfig, StoreError};
use proptest::prelude::*;
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Append a label to the log
    Record(&'static str),
    /// Record "fan" and send two follow-ups
    FanOut,
    /// Send itself forever
    Loop,
    /// Send a nested sequence
    Nested,
    /// Record "spread" and send that many `Record("leaf")` follow-ups
    Spread(usize),
    /// Change nothing
    Ignore,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    log: Vec<&'static str>,
    version: Option<Version>,
}

impl TestState {
    fn record(&mut self, label: &'static str) {
        self.log.push(label);
        Version::advance(&mut self.version);
    }
}

impl Versioned for TestState {
    fn version(&self) -> Option<Version> {
        self.version
    }
}

#[derive(Clone)]
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
            TestAction::Record(label) => {
                state.record(label);
                SmallVec::new()
            },
            TestAction::FanOut => {
                state.record("fan");
                smallvec![
                    Effect::Send(TestAction::Record("left")),
                    Effect::Send(TestAction::Record("right")),
                ]
            },
            TestAction::Loop => smallvec![Effect::Send(TestAction::Loop)],
            TestAction::Nested => smallvec![
                Effect::chain(vec![
                    Effect::Send(TestAction::Record("one")),
                    Effect::None,
                    Effect::chain(vec![Effect::Send(TestAction::FanOut)]),
                ]),
                Effect::Send(TestAction::Record("two")),
            ],
            TestAction::Spread(count) => {
                state.record("spread");
                (0..count).map(|_| Effect::Send(TestAction::Record("leaf"))).collect()
            },
            TestAction::Ignore => SmallVec::new(),
        }
    }
}

fn store() -> Store<TestState, TestAction, (), TestReducer> {
    Store::new(TestState::default(), TestReducer, ())
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn send_reduces_action() {
    let mut store = store();

    let processed = store.send(TestAction::Record("a")).unwrap();

    assert_eq!(processed, 1);
    assert_eq!(store.state(|s| s.log.clone()), vec!["a"]);
}

#[test]
fn follow_up_actions_run_before_send_returns() {
    let mut store = store();

    let processed = store.send(TestAction::FanOut).unwrap();

    assert_eq!(processed, 3);
    assert_eq!(store.state(|s| s.log.clone()), vec!["fan", "left", "right"]);
}

#[test]
fn follow_ups_are_breadth_first() {
    let mut store = store();

    store.send(TestAction::Nested).unwrap();

    // "one", "FanOut" and "two" were queued by Nested; FanOut's own
    // follow-ups join the back of the queue.
    assert_eq!(
        store.state(|s| s.log.clone()),
        vec!["one", "fan", "two", "left", "right"]
    );
}

#[test]
fn runaway_feedback_is_cut_off() {
    listkeeper_testing::init_test_tracing();
    let config = StoreConfig::default().with_max_actions_per_send(10);
    let mut store = Store::with_config(TestState::default(), TestReducer, (), config);

    let result = store.send(TestAction::Loop);

    assert_eq!(result, Err(StoreError::FeedbackLimitExceeded { limit: 10 }));
    // Loop never touches state
    assert_eq!(store.revision(), 0);

    // The store stays usable afterwards
    assert_eq!(store.send(TestAction::Record("after")).unwrap(), 1);
}

// ============================================================================
// Observation
// ============================================================================

#[test]
fn every_processed_action_is_broadcast_in_order() {
    let mut store = store();
    let mut rx = store.subscribe_actions();

    store.send(TestAction::FanOut).unwrap();

    assert_eq!(rx.try_recv().unwrap(), TestAction::FanOut);
    assert_eq!(rx.try_recv().unwrap(), TestAction::Record("left"));
    assert_eq!(rx.try_recv().unwrap(), TestAction::Record("right"));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn send_without_subscribers_succeeds() {
    let mut store = store();
    assert!(store.send(TestAction::Record("quiet")).is_ok());
}

#[test]
fn lagging_subscriber_reports_lag() {
    let config = StoreConfig::default().with_broadcast_capacity(2);
    let mut store = Store::with_config(TestState::default(), TestReducer, (), config);
    let mut rx = store.subscribe_actions();

    for label in ["a", "b", "c", "d"] {
        store.send(TestAction::Record(label)).unwrap();
    }

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(_))));
    assert_eq!(rx.try_recv().unwrap(), TestAction::Record("c"));
}

#[test]
fn revision_tracks_processed_actions() {
    let mut store = store();
    let mut revisions = store.subscribe_revisions();
    assert_eq!(store.revision(), 0);
    assert!(!revisions.has_changed().unwrap());

    store.send(TestAction::FanOut).unwrap();

    assert!(revisions.has_changed().unwrap());
    assert_eq!(*revisions.borrow_and_update(), 3);
    assert!(!revisions.has_changed().unwrap());

    store.send(TestAction::Record("x")).unwrap();
    assert_eq!(*revisions.borrow_and_update(), 4);
}

#[test]
fn into_state_returns_owned_state() {
    let mut store = store();
    store.send(TestAction::Record("kept")).unwrap();

    let state = store.into_state();

    assert_eq!(state.log, vec!["kept"]);
}

#[test]
fn unchanged_state_does_not_move_revision() {
    let mut store = store();
    let mut revisions = store.subscribe_revisions();
    let mut actions = store.subscribe_actions();

    let processed = store.send(TestAction::Ignore).unwrap();

    assert_eq!(processed, 1);
    assert_eq!(store.revision(), 0);
    assert!(!revisions.has_changed().unwrap());
    // Still observable as an action
    assert_eq!(actions.try_recv().unwrap(), TestAction::Ignore);
}

proptest! {
    #[test]
    fn processed_count_follows_fan_out_up_to_limit(count in 0_usize..40, limit in 1_usize..40) {
        let config = StoreConfig::default().with_max_actions_per_send(limit);
        let mut store = Store::with_config(TestState::default(), TestReducer, (), config);

        let result = store.send(TestAction::Spread(count));

        let wanted = count + 1;
        if wanted <= limit {
            prop_assert_eq!(result, Ok(wanted));
        } else {
            prop_assert_eq!(result, Err(StoreError::FeedbackLimitExceeded { limit }));
        }
        let reduced = wanted.min(limit);
        prop_assert_eq!(store.state(|s| s.log.len()), reduced);
        prop_assert_eq!(store.revision(), reduced as u64);
    }
}
