//! Decorator combinators: single-child nodes that transform or re-drive
//! their child's outcome.
//!
//! | Decorator                  | Child `SUCCESS`      | Child `FAILURE`      | `RUNNING` | `ERROR` |
//! |----------------------------|----------------------|----------------------|-----------|---------|
//! | [`invert`]                 | `FAILURE`            | `SUCCESS`            | passed    | passed  |
//! | [`force_succeed`]          | `SUCCESS`            | `SUCCESS`            | `SUCCESS` | `SUCCESS` |
//! | [`force_fail`]             | `FAILURE`            | `FAILURE`            | `FAILURE` | `FAILURE` |
//! | [`bounded_repeat`]         | repeat / `SUCCESS`   | repeat / `SUCCESS`   | passed    | passed  |
//! | [`repeat_until_failure`]   | repeat               | `SUCCESS`            | passed    | passed  |
//!
//! None of these carry state between ticks: every tick restarts the
//! decorator from scratch. See [`crate::resumable`] for repetition that
//! survives a `RUNNING` child.

use lambdabt_types::{BtError, Outcome};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::node::Node;

/// Whether [`force_succeed`] / [`force_fail`] tick their child before
/// discarding its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildEvaluation {
    /// Tick the child for its side effects, ignore the result.
    #[default]
    Evaluate,
    /// Never tick the child.
    Skip,
}

/// Swap `SUCCESS` and `FAILURE`; pass everything else through.
pub fn invert(child: Node) -> Node {
    Node::leaf("invert", move || match child.tick() {
        Outcome::Success => Outcome::Failure,
        Outcome::Failure => Outcome::Success,
        other => other,
    })
}

/// Always `SUCCESS`.
pub fn force_succeed(child: Node, evaluation: ChildEvaluation) -> Node {
    forced("force_succeed", child, evaluation, Outcome::Success)
}

/// Always `FAILURE`.
pub fn force_fail(child: Node, evaluation: ChildEvaluation) -> Node {
    forced("force_fail", child, evaluation, Outcome::Failure)
}

/// [`force_succeed`] with the default [`ChildEvaluation`].
pub fn succeeder(child: Node) -> Node {
    force_succeed(child, ChildEvaluation::default())
}

/// [`force_fail`] with the default [`ChildEvaluation`].
pub fn failer(child: Node) -> Node {
    force_fail(child, ChildEvaluation::default())
}

fn forced(name: &'static str, child: Node, evaluation: ChildEvaluation, result: Outcome) -> Node {
    match evaluation {
        ChildEvaluation::Evaluate => Node::leaf(name, move || {
            let _ = child.tick();
            result
        }),
        ChildEvaluation::Skip => Node::leaf(name, move || result),
    }
}

/// Repeat `child` until it has produced `times + 1` terminal outcomes, then
/// report `SUCCESS` whatever the last one was.
///
/// A `RUNNING` child ends the tick with `RUNNING`; the count is not kept for
/// the next tick. `ERROR` ends the tick with `ERROR`.
pub fn bounded_repeat(child: Node, times: usize) -> Node {
    Node::leaf("bounded_repeat", move || {
        let mut remaining = times;
        loop {
            match child.tick() {
                Outcome::Success | Outcome::Failure => {
                    if remaining == 0 {
                        return Outcome::Success;
                    }
                    remaining -= 1;
                }
                Outcome::Running => return Outcome::Running,
                Outcome::Error => {
                    warn!(child = child.name(), remaining, "bounded_repeat: child errored");
                    return Outcome::Error;
                }
            }
        }
    })
}

/// [`bounded_repeat`] for callers holding a signed bound.
///
/// Returns [`BtError::NegativeRepeatBound`] when `times < 0`.
pub fn try_bounded_repeat(child: Node, times: i64) -> Result<Node, BtError> {
    let times = usize::try_from(times).map_err(|_| BtError::NegativeRepeatBound(times))?;
    Ok(bounded_repeat(child, times))
}

/// Tick `child` while it succeeds; its first `FAILURE` becomes `SUCCESS`.
///
/// Loops synchronously, so a child that never fails never returns.
pub fn repeat_until_failure(child: Node) -> Node {
    Node::leaf("repeat_until_failure", move || loop {
        match child.tick() {
            Outcome::Success => continue,
            Outcome::Failure => return Outcome::Success,
            Outcome::Running => return Outcome::Running,
            Outcome::Error => {
                warn!(child = child.name(), "repeat_until_failure: child errored");
                return Outcome::Error;
            }
        }
    })
}
