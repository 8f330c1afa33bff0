//! The tick arbitrator
//!
//! One call to [`step_kernel`] advances the simulation exactly one tick:
//!
//! 1. increment the tick counter
//! 2. run the proposal systems in fixed order: command interpreter, station
//!    physics, crew behavior, comms
//! 3. structurally deduplicate the combined proposals
//! 4. commit every survivor as a [`SimEvent`] and apply it through the
//!    reducer, in order
//! 5. advance the tamper op lifecycle and commit its transitions
//! 6. advance pacing (phase clock, crisis arcs, retention) and commit its
//!    events
//!
//! The same state, world, command list, and RNG seed always produce the same
//! committed event sequence. There is no cross-system ranking: proposal order
//! is system order, and dedup is the only filter.

pub mod pacing;
pub mod reducer;
pub mod tamper;

use crate::command::{self, Command};
use crate::core::rng::KernelRng;
use crate::core::types::EventId;
use crate::events::{dedup_proposals, EventKind, ProposalTag, SimEvent};
use crate::state::KernelState;
use crate::systems::{comms, crew, physics};
use crate::world::World;

/// Everything a caller learns from one tick
#[derive(Debug, Clone, PartialEq)]
pub struct KernelOutput {
    /// All events committed this tick, in commit order
    pub events: Vec<SimEvent>,
    /// The subset worth surfacing to a player or log
    pub headlines: Vec<SimEvent>,
}

/// Advance the simulation by exactly one tick
pub fn step_kernel(
    state: &mut KernelState,
    world: &World,
    commands: &[Command],
    rng: &mut KernelRng,
) -> KernelOutput {
    state.truth.tick += 1;
    let mut committed = Vec::new();

    let mut proposals = command::interpret(state, world, commands);
    proposals.extend(physics::propose(state, world));
    proposals.extend(crew::propose(state, world, rng));
    proposals.extend(comms::propose(state, world, rng));
    let proposals = dedup_proposals(proposals);

    record_beats(state, &proposals);
    for proposal in proposals {
        commit(state, world, proposal.kind, &mut committed);
    }

    for kind in tamper::run(state, world) {
        commit(state, world, kind, &mut committed);
    }
    for kind in pacing::advance(state, world, rng) {
        commit(state, world, kind, &mut committed);
    }

    let headlines = committed
        .iter()
        .filter(|e| e.kind.is_headline())
        .cloned()
        .collect();
    KernelOutput { events: committed, headlines }
}

/// Stamp, apply, and log one event
fn commit(state: &mut KernelState, world: &World, kind: EventKind, out: &mut Vec<SimEvent>) {
    let event = SimEvent {
        id: EventId(state.next_event_id),
        tick: state.truth.tick,
        kind,
    };
    state.next_event_id += 1;
    reducer::apply(state, world, &event);
    tracing::trace!(id = event.id.0, kind = ?event.kind, "event committed");
    out.push(event);
}

/// Fold this tick's proposal tags into the per-phase beat record
fn record_beats(state: &mut KernelState, proposals: &[crate::events::Proposal]) {
    let beats = &mut state.truth.pacing.beats;
    for proposal in proposals {
        for tag in &proposal.tags {
            match tag {
                ProposalTag::Choice => beats.dilemma = true,
                ProposalTag::Reaction => beats.crew_agency = true,
                ProposalTag::Uncertainty => beats.deception = true,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DeviceSystem, NpcId};
    use crate::state::create_initial_state;

    #[test]
    fn test_event_ids_are_dense_and_sequential() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        let mut rng = KernelRng::new(11);
        let mut expected = 0u64;
        for _ in 0..20 {
            let output = step_kernel(&mut state, &world, &[], &mut rng);
            for event in &output.events {
                assert_eq!(event.id.0, expected);
                assert_eq!(event.tick, state.truth.tick);
                expected += 1;
            }
        }
        assert_eq!(state.next_event_id, expected);
    }

    #[test]
    fn test_headlines_are_a_subset_of_events() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        let mut rng = KernelRng::new(11);
        let output = step_kernel(
            &mut state,
            &world,
            &[Command::Spoof { system: DeviceSystem::Thermal }],
            &mut rng,
        );
        for headline in &output.headlines {
            assert!(output.events.contains(headline));
            assert!(headline.kind.is_headline());
        }
    }

    #[test]
    fn test_invalid_commands_commit_nothing_extra() {
        let world = World::station_default();
        let mut state_a = create_initial_state(&world, 10);
        let mut state_b = create_initial_state(&world, 10);
        let mut rng_a = KernelRng::new(5);
        let mut rng_b = KernelRng::new(5);
        // Zero-duration suppress and an order to a dead target are no-ops
        state_a.truth.crew_mut(NpcId(1)).expect("crew").alive = false;
        state_b.truth.crew_mut(NpcId(1)).expect("crew").alive = false;
        let bad = [
            Command::Suppress { system: DeviceSystem::Power, duration: 0 },
            Command::Order {
                target: NpcId(1),
                intent: crate::state::truth::OrderIntent::Guard,
                place: crate::core::types::RoomId(0),
            },
        ];
        let with_bad = step_kernel(&mut state_a, &world, &bad, &mut rng_a);
        let without = step_kernel(&mut state_b, &world, &[], &mut rng_b);
        assert_eq!(with_bad.events, without.events);
        assert_eq!(state_a, state_b);
    }
}
