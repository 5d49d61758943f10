//! The sentry demo tree.
//!
//! A guard that engages visible enemies (reloading when empty), patrols on
//! duty ticks, and otherwise glances around at random:
//!
//! ```text
//! selection
//! ├── sequence                                   engage
//! │   ├── enemy_visible
//! │   ├── selection(invert(out_of_ammo), repeat_until_failure(load_round))
//! │   └── shoot
//! ├── sequence(on_duty, bounded_repeat(step, patrol_repeats))   patrol
//! └── force_succeed(random_selection(look_left, look_right, wait))   idle
//! ```
//!
//! The world is a handful of atomic counters shared by the leaves.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use lambdabt_runtime::{
    BtError, Node, Outcome, PersistentList, SeededSource, bounded_repeat, force_succeed, invert,
    random_selection, repeat_until_failure, selection, selection_pair, sequence, sequence_pair,
};

use crate::config::Config;

pub const MAGAZINE: u32 = 3;

/// Mutable state the leaves observe and act upon.
#[derive(Debug, Default)]
pub struct World {
    tick: AtomicU64,
    ammo: AtomicU32,
    steps: AtomicU64,
    shots: AtomicU64,
    glances: AtomicU64,
}

impl World {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Advance the clock; returns the new tick number (starting at 1).
    pub fn advance(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn ammo(&self) -> u32 {
        self.ammo.load(Ordering::SeqCst)
    }

    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    pub fn shots(&self) -> u64 {
        self.shots.load(Ordering::SeqCst)
    }

    pub fn glances(&self) -> u64 {
        self.glances.load(Ordering::SeqCst)
    }

    fn now(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }
}

fn condition(flag: bool) -> Outcome {
    if flag { Outcome::Success } else { Outcome::Failure }
}

/// Build the sentry tree over `world`.
///
/// Fails only if `cfg.selection_policy` is invalid for the idle branch's
/// three children.
pub fn build_sentry(world: &Arc<World>, cfg: &Config) -> Result<Node, BtError> {
    let w = world.clone();
    let enemy_visible = Node::leaf("enemy_visible", move || condition(w.now() % 3 == 0));

    let w = world.clone();
    let out_of_ammo = Node::leaf("out_of_ammo", move || condition(w.ammo() == 0));

    let w = world.clone();
    let load_round = Node::leaf("load_round", move || {
        let loaded = w
            .ammo
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |a| (a < MAGAZINE).then_some(a + 1))
            .is_ok();
        condition(loaded)
    });

    let w = world.clone();
    let shoot = Node::leaf("shoot", move || {
        let fired = w
            .ammo
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |a| a.checked_sub(1))
            .is_ok();
        if fired {
            w.shots.fetch_add(1, Ordering::SeqCst);
        }
        condition(fired)
    });

    let engage = sequence(PersistentList::from_vec(vec![
        enemy_visible,
        selection_pair(invert(out_of_ammo), repeat_until_failure(load_round)),
        shoot,
    ]));

    let w = world.clone();
    let on_duty = Node::leaf("on_duty", move || condition(w.now() % 2 == 0));

    let w = world.clone();
    let step = Node::leaf("step", move || {
        w.steps.fetch_add(1, Ordering::SeqCst);
        Outcome::Success
    });

    let patrol = sequence_pair(on_duty, bounded_repeat(step, cfg.patrol_repeats));

    let glance = |name: &'static str, outcome: Outcome| {
        let w = world.clone();
        Node::leaf(name, move || {
            w.glances.fetch_add(1, Ordering::SeqCst);
            outcome
        })
    };
    let glances = PersistentList::from_vec(vec![
        glance("look_left", Outcome::Success),
        glance("look_right", Outcome::Success),
        glance("wait", Outcome::Running),
    ]);
    let idle = force_succeed(
        random_selection(
            glances,
            cfg.selection_policy.clone(),
            Arc::new(SeededSource::seed_from_u64(cfg.seed)),
        )?,
        cfg.force_child_evaluation,
    );

    Ok(selection(PersistentList::from_vec(vec![engage, patrol, idle])).traced())
}
