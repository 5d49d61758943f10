//! `lambdabt-runtime` – behavior tree combinators and their evaluation.
//!
//! Trees are built bottom-up by nesting combinator calls. Each call returns a
//! new [`Node`] without evaluating anything; evaluation happens only when the
//! root is ticked, and recursively ticks children per the combinator.
//!
//! # Modules
//!
//! - [`node`] – [`Node`][node::Node]: the shared, immutable evaluable handle
//!   wrapping an application leaf or a combinator result.
//! - [`composite`] – [`sequence`][composite::sequence] and
//!   [`selection`][composite::selection] over a
//!   [`PersistentList`][lambdabt_types::PersistentList] of children, plus
//!   two-child `*_pair` forms, and the guarded
//!   [`if_then_else`][composite::if_then_else].
//! - [`random`] – [`random_selection`][random::random_selection] with an
//!   explicit [`SelectionPolicy`][random::SelectionPolicy] and injected
//!   [`RandomSource`][random::RandomSource].
//! - [`decorator`] – [`invert`][decorator::invert],
//!   [`force_succeed`][decorator::force_succeed],
//!   [`force_fail`][decorator::force_fail],
//!   [`bounded_repeat`][decorator::bounded_repeat] and
//!   [`repeat_until_failure`][decorator::repeat_until_failure].
//! - [`resumable`] – sequence, selection and repeat variants that resume a
//!   `RUNNING` child on the next tick, keeping their cursors in a
//!   caller-owned [`TickMemory`][resumable::TickMemory].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber with an optional OTLP span exporter, which
//!   ships the `bt.tick` spans of [`Node::traced`][node::Node::traced] nodes.

pub mod composite;
pub mod decorator;
pub mod node;
pub mod random;
pub mod resumable;
pub mod telemetry;

pub use composite::{if_then_else, selection, selection_pair, sequence, sequence_pair};
pub use decorator::{
    ChildEvaluation, bounded_repeat, failer, force_fail, force_succeed, invert,
    repeat_until_failure, succeeder, try_bounded_repeat,
};
pub use node::Node;
pub use random::{RandomSource, SeededSource, SelectionPolicy, ThreadSource, random_selection};
pub use resumable::{
    SlotAllocator, SlotId, StatefulNode, TickMemory, resumable_repeat, resumable_selection,
    resumable_sequence,
};
pub use telemetry::{LogFormat, TelemetrySettings, TracerProviderGuard, init_tracing, init_with};

// Re-exported so callers need no direct dependency on lambdabt-types.
pub use lambdabt_types::{BtError, Outcome, PersistentList};
