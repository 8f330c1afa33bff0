//! Social pressure proposal system
//!
//! Generates whispers and escalating incidents from crew belief state:
//! grudges, trust in the station intelligence, and unresolved sensor doubts.
//! At most one proposal per tick, chosen by score among this system's own
//! candidates - score never competes across systems. Rate-limited per phase,
//! and throttled further when the same beat type already played this phase.

use crate::core::rng::KernelRng;
use crate::events::{EventKind, Proposal, ProposalTag};
use crate::state::perception::CommsTopic;
use crate::state::KernelState;
use crate::world::World;

/// Propose at most one comms event this tick
pub fn propose(state: &KernelState, world: &World, rng: &mut KernelRng) -> Vec<Proposal> {
    let config = &state.config;

    if state.perception.phase_comms_count >= config.comms_phase_cap {
        return Vec::new();
    }

    let Some(best) = best_candidate(state, world) else {
        return Vec::new();
    };

    // Content-variety throttle: a beat type that already played this phase
    // only repeats occasionally.
    let beats = &state.truth.pacing.beats;
    let repeated = match beat_of(&best.kind) {
        Beat::Deception => beats.deception,
        Beat::CrewAgency => beats.crew_agency,
    };
    if repeated && !rng.chance(config.repeat_beat_chance) {
        return Vec::new();
    }

    vec![best]
}

enum Beat {
    Deception,
    CrewAgency,
}

fn beat_of(kind: &EventKind) -> Beat {
    match kind {
        EventKind::Whisper { topic: CommsTopic::DistrustMother, .. }
        | EventKind::Whisper { topic: CommsTopic::SensorDoubt, .. } => Beat::Deception,
        _ => Beat::CrewAgency,
    }
}

/// Highest-scoring candidate; generation order breaks ties
fn best_candidate(state: &KernelState, world: &World) -> Option<Proposal> {
    let config = &state.config;
    let mut best: Option<Proposal> = None;
    let mut consider = |candidate: Proposal| {
        let replace = best
            .as_ref()
            .map(|b| candidate.score > b.score)
            .unwrap_or(true);
        if replace {
            best = Some(candidate);
        }
    };

    for member in &world.crew {
        let Some(truth) = state.truth.crew.get(&member.id) else {
            continue;
        };
        if !truth.alive {
            continue;
        }
        let Some(belief) = state.perception.belief(member.id) else {
            continue;
        };

        // Grudges: whisper behind backs, confront face to face
        for other in &world.crew {
            if other.id == member.id {
                continue;
            }
            let grudge = belief.grudge(other.id);
            if grudge < config.whisper_grudge {
                continue;
            }
            let colocated = state
                .truth
                .crew
                .get(&other.id)
                .map(|o| o.alive && o.place == truth.place)
                .unwrap_or(false);
            if grudge >= config.incident_grudge && colocated {
                consider(
                    Proposal::tagged(
                        EventKind::Incident { a: member.id, b: other.id, place: truth.place },
                        ProposalTag::Reaction,
                    )
                    .with_score((grudge * 100.0) as i32 + 20),
                );
            } else {
                consider(
                    Proposal::tagged(
                        EventKind::Whisper {
                            from: member.id,
                            about: Some(other.id),
                            topic: CommsTopic::Grudge,
                        },
                        ProposalTag::Pressure,
                    )
                    .with_score((grudge * 80.0) as i32),
                );
            }
        }

        // Distrust of the station intelligence spreads by word of mouth
        if belief.mother_reliable < config.distrust_threshold {
            consider(
                Proposal::tagged(
                    EventKind::Whisper {
                        from: member.id,
                        about: None,
                        topic: CommsTopic::DistrustMother,
                    },
                    ProposalTag::Uncertainty,
                )
                .with_score(((1.0 - belief.mother_reliable) * 90.0) as i32),
            );
        }
    }

    // Unresolved doubts about specific sensors
    for doubt in &state.perception.active_doubts {
        consider(
            Proposal::tagged(
                EventKind::Whisper {
                    from: doubt.npc,
                    about: None,
                    topic: CommsTopic::SensorDoubt,
                },
                ProposalTag::Uncertainty,
            )
            .with_score((doubt.strength * 70.0) as i32),
        );
    }

    best
}
