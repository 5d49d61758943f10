//! Random selection composite and the randomness it draws on.
//!
//! There is no process-wide generator. Every [`random_selection`] node is
//! handed its own [`RandomSource`], so a tree built with a [`SeededSource`]
//! makes the same choices on every run.
//!
//! # Policies
//!
//! | Policy                          | Behaviour                                                          |
//! |---------------------------------|--------------------------------------------------------------------|
//! | [`SelectionPolicy::PickOne`]    | Tick one uniformly chosen child and return its outcome.            |
//! | [`SelectionPolicy::Weighted`]   | Tick one child chosen in proportion to its weight.                 |
//! | [`SelectionPolicy::Shuffled`]   | Selection semantics over a fresh random permutation of the children. |
//!
//! An empty child list yields `FAILURE` under every policy.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lambdabt_runtime::node::Node;
//! use lambdabt_runtime::random::{random_selection, SeededSource, SelectionPolicy};
//! use lambdabt_types::{Outcome, PersistentList};
//!
//! let children = PersistentList::from_vec(vec![
//!     Node::leaf("a", || Outcome::Failure),
//!     Node::leaf("b", || Outcome::Success),
//! ]);
//! let tree = random_selection(
//!     children,
//!     SelectionPolicy::Shuffled,
//!     Arc::new(SeededSource::seed_from_u64(7)),
//! )
//! .unwrap();
//!
//! // Whatever the order, one child succeeds.
//! assert_eq!(tree.tick(), Outcome::Success);
//! ```

use std::sync::{Arc, Mutex};

use lambdabt_types::{BtError, Outcome, PersistentList};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::composite::walk;
use crate::node::Node;

// ─────────────────────────────────────────────────────────────────────────────
// RandomSource
// ─────────────────────────────────────────────────────────────────────────────

/// Supplies uniformly distributed indices.
pub trait RandomSource: Send + Sync {
    /// Return a value in `0..bound`. Callers never pass `bound == 0`.
    ///
    /// Out-of-range values are clamped to `bound - 1` by the combinators.
    fn next_below(&self, bound: usize) -> usize;
}

/// Deterministic source backed by a seeded [`StdRng`].
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_below(&self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }
        // A panic elsewhere cannot leave the generator half-updated.
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.gen_range(0..bound)
    }
}

/// Non-deterministic source using the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSource;

impl RandomSource for ThreadSource {
    fn next_below(&self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SelectionPolicy
// ─────────────────────────────────────────────────────────────────────────────

/// How a [`random_selection`] node chooses among its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    PickOne,
    /// One weight per child, in list order.
    Weighted(Vec<u32>),
    Shuffled,
}

// ─────────────────────────────────────────────────────────────────────────────
// random_selection
// ─────────────────────────────────────────────────────────────────────────────

/// Build a random selection node.
///
/// Returns [`BtError::InvalidPolicy`] when a weighted policy does not carry
/// exactly one weight per child, or when its weights sum to zero.
pub fn random_selection(
    children: PersistentList<Node>,
    policy: SelectionPolicy,
    source: Arc<dyn RandomSource>,
) -> Result<Node, BtError> {
    let children: Vec<Node> = children.iter().cloned().collect();

    if let SelectionPolicy::Weighted(weights) = &policy {
        if weights.len() != children.len() {
            return Err(BtError::InvalidPolicy(format!(
                "{} weights for {} children",
                weights.len(),
                children.len()
            )));
        }
        if !children.is_empty() && weights.iter().all(|w| *w == 0) {
            return Err(BtError::InvalidPolicy("weights sum to zero".to_string()));
        }
    }

    Ok(Node::leaf("random_selection", move || {
        if children.is_empty() {
            return Outcome::Failure;
        }
        match &policy {
            SelectionPolicy::PickOne => {
                let i = source.next_below(children.len()).min(children.len() - 1);
                debug!(index = i, "random_selection: picked child");
                children[i].tick()
            }
            SelectionPolicy::Weighted(weights) => {
                let i = weighted_index(weights, source.as_ref());
                debug!(index = i, "random_selection: picked weighted child");
                children[i].tick()
            }
            SelectionPolicy::Shuffled => {
                let order = permutation(children.len(), source.as_ref());
                debug!(?order, "random_selection: shuffled children");
                walk(order.iter().map(|&i| &children[i]), Outcome::Failure)
            }
        }
    }))
}

/// Index drawn with probability `weights[i] / sum(weights)`.
fn weighted_index(weights: &[u32], source: &dyn RandomSource) -> usize {
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    let bound = usize::try_from(total).unwrap_or(usize::MAX);
    let mut roll = source.next_below(bound) as u64;
    for (i, &w) in weights.iter().enumerate() {
        let w = u64::from(w);
        if roll < w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

/// Fisher–Yates permutation of `0..len`.
fn permutation(len: usize, source: &dyn RandomSource) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = source.next_below(i + 1).min(i);
        order.swap(i, j);
    }
    order
}
