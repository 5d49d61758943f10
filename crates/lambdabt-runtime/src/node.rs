//! The evaluable [`Node`] handle.
//!
//! Every leaf and every combinator result is a `Node`: a label plus a shared
//! zero-argument closure that yields an [`Outcome`]. Building a node never
//! evaluates anything; evaluation happens only when [`Node::tick`] is called
//! on the root.
//!
//! # Example
//!
//! ```rust
//! use lambdabt_runtime::node::Node;
//! use lambdabt_types::Outcome;
//!
//! let always_ok = Node::leaf("always_ok", || Outcome::Success);
//! assert_eq!(always_ok.tick(), Outcome::Success);
//! assert_eq!(always_ok.name(), "always_ok");
//! ```

use std::fmt;
use std::sync::Arc;

use lambdabt_types::Outcome;
use tracing::trace;

use crate::telemetry;

type Action = dyn Fn() -> Outcome + Send + Sync;

/// A node in a behavior tree.
///
/// Cloning is O(1) and shares the underlying closure, so a node may appear
/// under several parents or be ticked from several threads at once.
#[derive(Clone)]
pub struct Node {
    name: Arc<str>,
    action: Arc<Action>,
    traced: bool,
}

impl Node {
    /// Wrap an application-supplied action.
    ///
    /// `action` is called exactly once per [`tick`][Node::tick].
    pub fn leaf(
        name: impl Into<Arc<str>>,
        action: impl Fn() -> Outcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            action: Arc::new(action),
            traced: false,
        }
    }

    /// Open a `bt.tick` span around every tick of this node.
    ///
    /// Children ticked inside become child spans only if they are traced
    /// too; their `trace!` events always land in the span.
    pub fn traced(mut self) -> Self {
        self.traced = true;
        self
    }

    /// Tick this node once and return its [`Outcome`].
    pub fn tick(&self) -> Outcome {
        if !self.traced {
            return self.run();
        }
        let span = telemetry::tick_span(&self.name);
        let outcome = span.in_scope(|| self.run());
        telemetry::record_outcome(&span, outcome);
        outcome
    }

    fn run(&self) -> Outcome {
        let outcome = (self.action)();
        trace!(node = %self.name, %outcome, "tick");
        outcome
    }

    /// Label used in logs. Combinators name themselves after their kind.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("traced", &self.traced)
            .finish()
    }
}
