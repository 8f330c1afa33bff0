//! Tamper operation lifecycle
//!
//! Runs after the proposal systems each tick. Records which crew were in a
//! position to notice each pending operation (perception bookkeeping, mutated
//! in place), then emits lifecycle transition events for ops whose window has
//! expired. The transitions themselves are applied by the reducer like any
//! other committed event.
//!
//! Expiry rule, uniform across kinds:
//! - nobody was ever in range: the lie passes unnoticed, op resolves quietly
//! - a matching real crisis appeared in the window: the lie looked true,
//!   op resolves
//! - otherwise crew saw through it: the op backfires
//!
//! Fabrication inverts the reading of `crew_affected`: witnesses who shared
//! the room with the subject are the alibi that exposes the frame. Systems
//! with no crisis arc behind them (atmospherics, comms) can never produce a
//! matching crisis, so spoofing them always backfires once anyone responds.

use crate::core::types::NpcId;
use crate::events::EventKind;
use crate::state::KernelState;
use crate::world::World;

/// Advance every pending op one tick; returns lifecycle events to commit
pub fn run(state: &mut KernelState, world: &World) -> Vec<EventKind> {
    record_presence(state, world);
    expire_ops(state)
}

/// Note crew currently in range of each pending op, and matching crises
fn record_presence(state: &mut KernelState, world: &World) {
    let mut observations: Vec<(usize, Vec<NpcId>, bool)> = Vec::new();
    for (index, op) in state.perception.tamper_ops.iter().enumerate() {
        if !op.is_pending() {
            continue;
        }
        let Some(system) = op.target.system else {
            // Fabrication: witnesses were fixed at creation
            continue;
        };
        let present = world
            .response_room(system)
            .map(|room| state.truth.crew_in_room(world, room))
            .unwrap_or_default();
        let crisis = system
            .arc_kind()
            .map(|kind| state.truth.arc_of_kind(kind).is_some())
            .unwrap_or(false);
        if !present.is_empty() || crisis {
            observations.push((index, present, crisis));
        }
    }
    for (index, present, crisis) in observations {
        let op = &mut state.perception.tamper_ops[index];
        for npc in present {
            if !op.crew_affected.contains(&npc) {
                op.crew_affected.push(npc);
            }
        }
        if crisis {
            op.matching_crisis_seen = true;
        }
    }
}

/// Emit terminal transitions for ops whose window has closed
fn expire_ops(state: &KernelState) -> Vec<EventKind> {
    let tick = state.truth.tick;
    let mut events = Vec::new();
    for op in &state.perception.tamper_ops {
        if !op.is_pending() || tick < op.window_end_tick {
            continue;
        }
        if op.crew_affected.is_empty() || op.matching_crisis_seen {
            events.push(EventKind::TamperResolved { op: op.id });
        } else {
            events.push(EventKind::TamperBackfired { op: op.id });
            if let Some(system) = op.target.system {
                for npc in &op.crew_affected {
                    events.push(EventKind::DoubtRaised { npc: *npc, system });
                }
            }
        }
    }
    events
}
