//! Behavioural laws of the combinator set, checked with spy leaves.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use lambdabt_runtime::{
    Node, Outcome, PersistentList, bounded_repeat, invert, repeat_until_failure, selection,
    sequence, succeeder,
};

const ALL: [Outcome; 4] = [
    Outcome::Running,
    Outcome::Success,
    Outcome::Failure,
    Outcome::Error,
];

/// A leaf that always returns `outcome` and counts its ticks.
struct Spy {
    node: Node,
    calls: Arc<AtomicUsize>,
}

impl Spy {
    fn new(outcome: Outcome) -> Self {
        Self::scripted(vec![outcome])
    }

    /// Replays `script`; the last entry repeats forever.
    fn scripted(script: Vec<Outcome>) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let node = Node::leaf("spy", move || {
            let i = c.fetch_add(1, Ordering::SeqCst);
            script[i.min(script.len() - 1)]
        });
        Self { node, calls }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[test]
fn sequence_returns_first_non_success_and_skips_the_rest() {
    for stop in [Outcome::Running, Outcome::Failure, Outcome::Error] {
        let before = Spy::new(Outcome::Success);
        let stopper = Spy::new(stop);
        let after = Spy::new(Outcome::Success);
        let tree = sequence(PersistentList::from_vec(vec![
            before.node.clone(),
            stopper.node.clone(),
            after.node.clone(),
        ]));

        assert_eq!(tree.tick(), stop);
        assert_eq!(before.calls(), 1);
        assert_eq!(stopper.calls(), 1);
        assert_eq!(after.calls(), 0, "{stop} must short-circuit the sequence");
    }
}

#[test]
fn selection_returns_first_non_failure_and_skips_the_rest() {
    for stop in [Outcome::Running, Outcome::Success, Outcome::Error] {
        let before = Spy::new(Outcome::Failure);
        let stopper = Spy::new(stop);
        let after = Spy::new(Outcome::Failure);
        let tree = selection(PersistentList::from_vec(vec![
            before.node.clone(),
            stopper.node.clone(),
            after.node.clone(),
        ]));

        assert_eq!(tree.tick(), stop);
        assert_eq!(before.calls(), 1);
        assert_eq!(after.calls(), 0, "{stop} must short-circuit the selection");
    }
}

#[test]
fn empty_composites_are_vacuous() {
    assert_eq!(sequence(PersistentList::empty()).tick(), Outcome::Success);
    assert_eq!(selection(PersistentList::empty()).tick(), Outcome::Failure);
}

#[test]
fn double_inversion_is_identity() {
    for outcome in ALL {
        let leaf = Node::leaf("leaf", move || outcome);
        assert_eq!(invert(invert(leaf.clone())).tick(), leaf.tick());
    }
}

#[test]
fn bounded_repeat_zero_always_reports_success_on_terminal_child() {
    let ok = Spy::new(Outcome::Success);
    let fail = Spy::new(Outcome::Failure);
    assert_eq!(bounded_repeat(ok.node.clone(), 0).tick(), Outcome::Success);
    assert_eq!(bounded_repeat(fail.node.clone(), 0).tick(), Outcome::Success);
    assert_eq!(ok.calls(), 1);
    assert_eq!(fail.calls(), 1);
}

#[test]
fn bounded_repeat_ticks_child_n_plus_one_times() {
    for n in 0..6 {
        let mut script = vec![Outcome::Failure; n];
        script.push(Outcome::Success);
        let spy = Spy::scripted(script);

        assert_eq!(bounded_repeat(spy.node.clone(), n).tick(), Outcome::Success);
        assert_eq!(spy.calls(), n + 1);
    }
}

#[test]
fn repeat_until_failure_ticks_child_k_plus_one_times() {
    for k in 0..6 {
        let mut script = vec![Outcome::Success; k];
        script.push(Outcome::Failure);
        let spy = Spy::scripted(script);

        assert_eq!(repeat_until_failure(spy.node.clone()).tick(), Outcome::Success);
        assert_eq!(spy.calls(), k + 1);
    }
}

#[test]
fn force_succeed_ignores_child_outcome() {
    for outcome in ALL {
        assert_eq!(succeeder(Node::leaf("leaf", move || outcome)).tick(), Outcome::Success);
    }
}

#[test]
fn shared_tail_is_unaffected_by_evaluation_through_another_list() {
    let tail_spy = Spy::new(Outcome::Success);
    let l1 = PersistentList::cons(tail_spy.node.clone(), PersistentList::empty());
    let l2 = PersistentList::cons(Node::leaf("x", || Outcome::Success), l1.clone());
    let l3 = PersistentList::cons(Node::leaf("y", || Outcome::Failure), l1.clone());

    let via_l2 = sequence(l2.clone());
    for _ in 0..3 {
        assert_eq!(via_l2.tick(), Outcome::Success);
    }

    assert_eq!(l1.len(), 1);
    assert!(l2.tail().unwrap().ptr_eq(&l1));
    assert!(l3.tail().unwrap().ptr_eq(&l1));
    assert_eq!(l3.head().unwrap().name(), "y");
    assert_eq!(sequence(l3).tick(), Outcome::Failure);
    assert_eq!(tail_spy.calls(), 3);
}

#[test]
fn built_trees_can_be_ticked_from_many_threads() {
    let spy = Spy::new(Outcome::Success);
    let tree = sequence(PersistentList::from_vec(vec![spy.node.clone(), spy.node.clone()]));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = tree.clone();
            thread::spawn(move || tree.tick())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Outcome::Success);
    }
    assert_eq!(spy.calls(), 8);
}
