//! Combinators that resume where a `RUNNING` child left off.
//!
//! The stateless combinators in [`crate::composite`] and [`crate::decorator`]
//! forget everything between ticks. The variants here keep a small cursor per
//! node, but the cursor lives in a caller-owned [`TickMemory`], never inside
//! the node. Built [`StatefulNode`]s stay immutable and shareable; two agents
//! running the same tree simply hold two memories.
//!
//! Each resumable combinator reserves one [`SlotId`] from a [`SlotAllocator`]
//! at build time. Once the tree is built, [`SlotAllocator::memory`] creates a
//! memory with exactly that many slots.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use lambdabt_runtime::node::Node;
//! use lambdabt_runtime::resumable::{resumable_sequence, SlotAllocator, StatefulNode};
//! use lambdabt_types::{Outcome, PersistentList};
//!
//! let arrived = Arc::new(AtomicBool::new(false));
//! let flag = arrived.clone();
//! let walk = Node::leaf("walk", move || {
//!     if flag.swap(true, Ordering::SeqCst) { Outcome::Success } else { Outcome::Running }
//! });
//!
//! let mut slots = SlotAllocator::new();
//! let tree = resumable_sequence(
//!     PersistentList::from_vec(vec![StatefulNode::from(walk)]),
//!     &mut slots,
//! );
//! let mut memory = slots.memory();
//!
//! assert_eq!(tree.tick(&mut memory), Outcome::Running);
//! assert_eq!(tree.tick(&mut memory), Outcome::Success);
//! ```

use std::fmt;
use std::sync::Arc;

use lambdabt_types::{Outcome, PersistentList};
use tracing::{debug, trace, warn};

use crate::node::Node;

// ─────────────────────────────────────────────────────────────────────────────
// Slots and memory
// ─────────────────────────────────────────────────────────────────────────────

/// Index of one resumable node's cursor inside a [`TickMemory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

/// Hands out consecutive [`SlotId`]s while a tree is being built.
#[derive(Debug, Default)]
pub struct SlotAllocator {
    next: usize,
}

impl SlotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot.
    pub fn allocate(&mut self) -> SlotId {
        let id = SlotId(self.next);
        self.next += 1;
        id
    }

    /// Number of slots reserved so far.
    pub fn len(&self) -> usize {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    /// A fresh memory sized for every slot reserved so far.
    pub fn memory(&self) -> TickMemory {
        TickMemory::with_slots(self.next)
    }
}

/// Caller-owned cursors for the resumable nodes of one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickMemory {
    cursors: Vec<usize>,
}

impl TickMemory {
    pub fn with_slots(slots: usize) -> Self {
        Self {
            cursors: vec![0; slots],
        }
    }

    /// Forget all progress; the next tick starts every node from scratch.
    pub fn reset(&mut self) {
        self.cursors.iter_mut().for_each(|c| *c = 0);
    }

    /// Saved cursor for `slot`, or `None` if this memory has no such slot.
    pub fn cursor(&self, slot: SlotId) -> Option<usize> {
        self.cursors.get(slot.0).copied()
    }

    fn store(&mut self, slot: SlotId, value: usize) {
        if let Some(c) = self.cursors.get_mut(slot.0) {
            *c = value;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StatefulNode
// ─────────────────────────────────────────────────────────────────────────────

type StatefulAction = dyn Fn(&mut TickMemory) -> Outcome + Send + Sync;

/// A node ticked against a [`TickMemory`].
#[derive(Clone)]
pub struct StatefulNode {
    name: Arc<str>,
    action: Arc<StatefulAction>,
}

impl StatefulNode {
    pub fn new(
        name: impl Into<Arc<str>>,
        action: impl Fn(&mut TickMemory) -> Outcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    pub fn tick(&self, memory: &mut TickMemory) -> Outcome {
        let outcome = (self.action)(memory);
        trace!(node = %self.name, %outcome, "tick");
        outcome
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lift a stateless node; it ignores the memory.
impl From<Node> for StatefulNode {
    fn from(node: Node) -> Self {
        let name: Arc<str> = Arc::from(node.name());
        Self::new(name, move |_| node.tick())
    }
}

impl fmt::Debug for StatefulNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulNode").field("name", &self.name).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Combinators
// ─────────────────────────────────────────────────────────────────────────────

/// Sequence that restarts from the child that last returned `RUNNING`.
pub fn resumable_sequence(
    children: PersistentList<StatefulNode>,
    slots: &mut SlotAllocator,
) -> StatefulNode {
    resumable_walk("resumable_sequence", children, slots.allocate(), Outcome::Success)
}

/// Selection that restarts from the child that last returned `RUNNING`.
pub fn resumable_selection(
    children: PersistentList<StatefulNode>,
    slots: &mut SlotAllocator,
) -> StatefulNode {
    resumable_walk("resumable_selection", children, slots.allocate(), Outcome::Failure)
}

fn resumable_walk(
    name: &'static str,
    children: PersistentList<StatefulNode>,
    slot: SlotId,
    continue_on: Outcome,
) -> StatefulNode {
    let children: Vec<StatefulNode> = children.iter().cloned().collect();
    StatefulNode::new(name, move |memory| {
        let Some(start) = memory.cursor(slot) else {
            warn!(node = name, ?slot, "slot missing from tick memory");
            return Outcome::Error;
        };
        if start > 0 {
            debug!(node = name, child = start, "resuming");
        }
        for (i, child) in children.iter().enumerate().skip(start) {
            match child.tick(memory) {
                o if o == continue_on => continue,
                Outcome::Running => {
                    memory.store(slot, i);
                    return Outcome::Running;
                }
                other => {
                    memory.store(slot, 0);
                    return other;
                }
            }
        }
        memory.store(slot, 0);
        continue_on
    })
}

/// [`bounded_repeat`][crate::decorator::bounded_repeat] whose repetition count
/// survives a `RUNNING` child.
pub fn resumable_repeat(
    child: StatefulNode,
    times: usize,
    slots: &mut SlotAllocator,
) -> StatefulNode {
    let slot = slots.allocate();
    StatefulNode::new("resumable_repeat", move |memory| {
        let Some(mut done) = memory.cursor(slot) else {
            warn!(node = "resumable_repeat", ?slot, "slot missing from tick memory");
            return Outcome::Error;
        };
        loop {
            match child.tick(memory) {
                Outcome::Success | Outcome::Failure => {
                    if done >= times {
                        memory.store(slot, 0);
                        return Outcome::Success;
                    }
                    done += 1;
                }
                Outcome::Running => {
                    debug!(node = "resumable_repeat", done, times, "child running");
                    memory.store(slot, done);
                    return Outcome::Running;
                }
                Outcome::Error => {
                    memory.store(slot, 0);
                    return Outcome::Error;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scripted(script: Vec<Outcome>) -> (StatefulNode, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let node = Node::leaf("scripted", move || {
            let i = c.fetch_add(1, Ordering::SeqCst);
            script[i.min(script.len() - 1)]
        });
        (node.into(), calls)
    }

    #[test]
    fn allocator_sizes_memory() {
        let mut slots = SlotAllocator::new();
        assert!(slots.is_empty());
        let a = slots.allocate();
        let b = slots.allocate();
        assert_ne!(a, b);
        assert_eq!(slots.len(), 2);
        let memory = slots.memory();
        assert_eq!(memory.cursor(b), Some(0));
    }

    #[test]
    fn sequence_resumes_at_running_child() {
        let (first, first_calls) = scripted(vec![Outcome::Success]);
        let (second, second_calls) = scripted(vec![Outcome::Running, Outcome::Success]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_sequence(PersistentList::from_vec(vec![first, second]), &mut slots);
        let mut memory = slots.memory();

        assert_eq!(tree.tick(&mut memory), Outcome::Running);
        assert_eq!(tree.tick(&mut memory), Outcome::Success);
        // The first child is not re-ticked on resume.
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 2);
        assert_eq!(memory, slots.memory());
    }

    #[test]
    fn selection_resumes_at_running_child() {
        let (first, first_calls) = scripted(vec![Outcome::Failure]);
        let (second, _) = scripted(vec![Outcome::Running, Outcome::Failure]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_selection(PersistentList::from_vec(vec![first, second]), &mut slots);
        let mut memory = slots.memory();

        assert_eq!(tree.tick(&mut memory), Outcome::Running);
        assert_eq!(tree.tick(&mut memory), Outcome::Failure);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_restarts_from_first_child() {
        let (first, first_calls) = scripted(vec![Outcome::Success]);
        let (second, _) = scripted(vec![Outcome::Running]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_sequence(PersistentList::from_vec(vec![first, second]), &mut slots);
        let mut memory = slots.memory();

        tree.tick(&mut memory);
        memory.reset();
        tree.tick(&mut memory);
        assert_eq!(first_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn repeat_keeps_count_across_running() {
        let (child, calls) = scripted(vec![
            Outcome::Success,
            Outcome::Running,
            Outcome::Failure,
            Outcome::Success,
        ]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_repeat(child, 2, &mut slots);
        let mut memory = slots.memory();

        assert_eq!(tree.tick(&mut memory), Outcome::Running);
        assert_eq!(tree.tick(&mut memory), Outcome::Success);
        // Three terminal results in total, plus the one RUNNING.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn repeat_propagates_error_and_clears_cursor() {
        let (child, _) = scripted(vec![Outcome::Success, Outcome::Running, Outcome::Error]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_repeat(child, 5, &mut slots);
        let mut memory = slots.memory();

        assert_eq!(tree.tick(&mut memory), Outcome::Running);
        assert_eq!(tree.tick(&mut memory), Outcome::Error);
        assert_eq!(memory, slots.memory());
    }

    #[test]
    fn foreign_memory_yields_error() {
        let (child, calls) = scripted(vec![Outcome::Success]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_sequence(PersistentList::from_vec(vec![child]), &mut slots);
        let mut empty = TickMemory::default();

        assert_eq!(tree.tick(&mut empty), Outcome::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn separate_memories_progress_independently() {
        let (first, _) = scripted(vec![Outcome::Success]);
        let (second, _) = scripted(vec![Outcome::Running]);
        let mut slots = SlotAllocator::new();
        let tree = resumable_sequence(PersistentList::from_vec(vec![first, second]), &mut slots);
        let mut agent_a = slots.memory();
        let agent_b = slots.memory();

        tree.tick(&mut agent_a);
        assert_ne!(agent_a, agent_b);
    }
}
