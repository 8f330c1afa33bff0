//! Phase clock, crisis arc scheduling, and retention
//!
//! Runs last each tick. Emits phase/day transitions and arc lifecycle events
//! for the arbitrator to commit, then garbage-collects perception records
//! past their retention windows. Arc spawning is the only randomness here.

use crate::core::rng::KernelRng;
use crate::core::types::{ArcId, ArcKind};
use crate::events::EventKind;
use crate::state::KernelState;
use crate::world::World;

/// Advance pacing one tick; returns scheduling events to commit
pub fn advance(state: &mut KernelState, world: &World, rng: &mut KernelRng) -> Vec<EventKind> {
    let mut events = Vec::new();
    advance_clock(state, &mut events);
    advance_arcs(state, &mut events);
    spawn_arc(state, world, rng, &mut events);
    collect_garbage(state);
    events
}

fn advance_clock(state: &KernelState, out: &mut Vec<EventKind>) {
    let tick = state.truth.tick;
    if tick == 0 || tick % state.config.phase_length != 0 {
        return;
    }
    let (phase, rollover) = state.truth.phase.next();
    let day = if rollover { state.truth.day + 1 } else { state.truth.day };
    out.push(EventKind::PhaseChanged { phase, day });
}

/// Escalate due arcs; resolve those past their peak or already extinguished
fn advance_arcs(state: &KernelState, out: &mut Vec<EventKind>) {
    let tick = state.truth.tick;
    for arc in &state.truth.arcs {
        // A fire someone put out is over regardless of the schedule
        if arc.kind == ArcKind::Fire {
            let burning = state
                .truth
                .rooms
                .get(&arc.place)
                .map(|r| r.on_fire)
                .unwrap_or(false);
            if !burning {
                out.push(EventKind::ArcResolved { arc: arc.id });
                continue;
            }
        }
        if tick < arc.next_step_tick {
            continue;
        }
        if arc.step >= arc.kind.max_steps() {
            out.push(EventKind::ArcResolved { arc: arc.id });
        } else {
            out.push(EventKind::ArcAdvanced { arc: arc.id, step: arc.step + 1 });
        }
    }
}

/// Occasionally start a new crisis, avoiding back-to-back repeats of a kind
fn spawn_arc(
    state: &mut KernelState,
    world: &World,
    rng: &mut KernelRng,
    out: &mut Vec<EventKind>,
) {
    if state.truth.arcs.len() >= state.config.max_arcs {
        return;
    }
    if !rng.chance(state.config.arc_spawn_chance) {
        return;
    }
    let candidates: Vec<ArcKind> = ArcKind::ALL
        .into_iter()
        .filter(|kind| Some(*kind) != state.truth.pacing.last_arc_kind)
        .filter(|kind| state.truth.arc_of_kind(*kind).is_none())
        .collect();
    let Some(kind) = rng.pick(&candidates).copied() else {
        return;
    };
    let Some(place) = world.response_room(kind.system()) else {
        return;
    };
    let arc = ArcId(state.next_arc_id);
    state.next_arc_id += 1;
    out.push(EventKind::ArcSpawned { arc, kind, place });
    if kind == ArcKind::Fire {
        out.push(EventKind::FireStarted { place });
    }
}

/// Drop perception records past their retention windows
fn collect_garbage(state: &mut KernelState) {
    let tick = state.truth.tick;
    let retention = state.config.op_retention;
    let doubt_lifetime = state.config.doubt_lifetime;
    state.perception.tamper_ops.retain(|op| {
        op.resolved_tick
            .map(|resolved| tick < resolved + retention)
            .unwrap_or(true)
    });
    state
        .perception
        .active_doubts
        .retain(|d| tick < d.raised_tick + doubt_lifetime);
}
