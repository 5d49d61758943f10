//! Composite combinators: [`sequence`], [`selection`] and [`if_then_else`].
//!
//! | Combinator    | Short-circuits on   | Exhausted list |
//! |---------------|---------------------|----------------|
//! | [`sequence`]  | first non-`SUCCESS` | `SUCCESS`      |
//! | [`selection`] | first non-`FAILURE` | `FAILURE`      |
//!
//! Children are ticked strictly left to right, one at a time. The outcome that
//! stops the walk is returned unchanged, so `RUNNING` and `ERROR` propagate
//! upward untouched. The `*_pair` forms behave exactly like the two-element
//! list forms.
//!
//! [`if_then_else`] picks one of two branches from a plain boolean guard,
//! re-checked on every tick.
//!
//! Random selection lives in [`crate::random`].
//!
//! # Example
//!
//! ```rust
//! use lambdabt_runtime::composite::{selection, sequence};
//! use lambdabt_runtime::node::Node;
//! use lambdabt_types::{Outcome, PersistentList};
//!
//! let tree = selection(PersistentList::from_vec(vec![
//!     sequence(PersistentList::from_vec(vec![
//!         Node::leaf("a", || Outcome::Success),
//!         Node::leaf("b", || Outcome::Failure),
//!     ])),
//!     Node::leaf("fallback", || Outcome::Success),
//! ]));
//!
//! assert_eq!(tree.tick(), Outcome::Success);
//! ```

use lambdabt_types::{Outcome, PersistentList};

use crate::node::Node;

/// Tick `children` until one does not succeed.
pub fn sequence(children: PersistentList<Node>) -> Node {
    Node::leaf("sequence", move || walk(&children, Outcome::Success))
}

/// [`sequence`] over exactly two children.
pub fn sequence_pair(first: Node, second: Node) -> Node {
    sequence(PersistentList::from_vec(vec![first, second]))
}

/// Tick `children` until one does not fail.
pub fn selection(children: PersistentList<Node>) -> Node {
    Node::leaf("selection", move || walk(&children, Outcome::Failure))
}

/// [`selection`] over exactly two children.
pub fn selection_pair(first: Node, second: Node) -> Node {
    selection(PersistentList::from_vec(vec![first, second]))
}

/// Tick `then` when `cond()` holds, `otherwise` when it does not.
///
/// `cond` runs once per tick, so the chosen branch follows the world as it
/// changes. The branch not taken is not ticked.
pub fn if_then_else(
    cond: impl Fn() -> bool + Send + Sync + 'static,
    then: Node,
    otherwise: Node,
) -> Node {
    Node::leaf("if_then_else", move || {
        if cond() { then.tick() } else { otherwise.tick() }
    })
}

/// Tick children while they return `continue_on`; the first other outcome
/// ends the walk. An exhausted list yields `continue_on`.
pub(crate) fn walk<'a>(
    children: impl IntoIterator<Item = &'a Node>,
    continue_on: Outcome,
) -> Outcome {
    for child in children {
        let outcome = child.tick();
        if outcome != continue_on {
            return outcome;
        }
    }
    continue_on
}
