//! Crew behavior proposal system
//!
//! Per-NPC hazard avoidance, order compliance, role-driven movement and
//! mining yield, stress/paranoia drift, and the escalation of both into panic
//! or violence. Pure: reads truth and perception, proposes events.

use crate::core::config::KernelConfig;
use crate::core::rng::KernelRng;
use crate::core::types::{NpcId, Phase, RoomId, TamperKind};
use crate::events::{EventKind, Proposal, ProposalTag};
use crate::state::truth::CrewTruth;
use crate::state::KernelState;
use crate::world::{Role, World};

/// Ticks between security patrol moves
const PATROL_INTERVAL: u64 = 6;

/// Propose this tick's crew events, one member at a time in roster order
pub fn propose(state: &KernelState, world: &World, rng: &mut KernelRng) -> Vec<Proposal> {
    let config = &state.config;
    let mut proposals = Vec::new();

    for member in &world.crew {
        let Some(truth) = state.truth.crew.get(&member.id) else {
            continue;
        };
        if !truth.alive {
            continue;
        }

        propose_movement(state, world, member.id, member.role, truth, rng, &mut proposals);
        propose_yield(state, world, member.id, member.role, truth, &mut proposals);
        propose_drift(state, config, member.id, truth, &mut proposals);
        propose_breakdown(state, world, member.id, truth, &mut proposals);
    }

    proposals
}

/// At most one movement proposal per crew member per tick
///
/// Priority: hazard flight, then standing orders, then alarm response, then
/// the role's default station for the current phase.
fn propose_movement(
    state: &KernelState,
    world: &World,
    npc: NpcId,
    role: Role,
    truth: &CrewTruth,
    rng: &mut KernelRng,
    out: &mut Vec<Proposal>,
) {
    let config = &state.config;

    // 1. Hazard flight beats everything
    let in_hazard = state
        .truth
        .rooms
        .get(&truth.place)
        .map(|r| r.hazardous(config))
        .unwrap_or(false);
    if in_hazard {
        if let Some(to) = find_safe_room(state, world, truth.place) {
            out.push(Proposal::tagged(
                EventKind::CrewFlee { npc, from: truth.place, to },
                ProposalTag::Reaction,
            ));
        }
        return;
    }

    // Sluggish doors halve all non-emergency movement
    if state.truth.station.door_delay > 0 && state.truth.tick % 2 == 1 {
        return;
    }

    // 2. Standing orders
    if let Some(order) = truth.ordered {
        if truth.place != order.place {
            if let Some(to) = world.next_step(truth.place, order.place) {
                out.push(Proposal::tagged(
                    EventKind::CrewMove { npc, to },
                    ProposalTag::Background,
                ));
            }
        }
        // In place: Guard holds position; Work falls through to the yield check
        return;
    }

    // 3. Alarm response: engineers and security head for the signalled room
    if matches!(role, Role::Engineer | Role::Security) {
        if let Some(room) = alarm_room(state, world) {
            if truth.place != room {
                if rng.chance(config.respond_chance) {
                    if let Some(to) = world.next_step(truth.place, room) {
                        out.push(Proposal::tagged(
                            EventKind::CrewMove { npc, to },
                            ProposalTag::Reaction,
                        ));
                    }
                }
                return;
            }
            // Already at the response room: hold there
            return;
        }
    }

    // 4. Default station for the phase
    match default_station(state, world, truth.place, role, rng) {
        Some(room) if room != truth.place => {
            if let Some(to) = world.next_step(truth.place, room) {
                out.push(Proposal::tagged(
                    EventKind::CrewMove { npc, to },
                    ProposalTag::Background,
                ));
            }
        }
        _ => {}
    }
}

/// First adjacent non-hazardous room, ties toward lower room ids
///
/// Falls back to `None` (shelter in place) when every neighbor is worse.
pub fn find_safe_room(state: &KernelState, world: &World, from: RoomId) -> Option<RoomId> {
    world.adjacent(from).into_iter().find(|id| {
        state
            .truth
            .rooms
            .get(id)
            .map(|r| !r.hazardous(&state.config))
            .unwrap_or(false)
    })
}

/// Room currently demanding a response, if any
///
/// A pending spoof rings a fake alarm; an announced arc rings a real one.
/// Crew cannot tell the difference - that is the point.
fn alarm_room(state: &KernelState, world: &World) -> Option<RoomId> {
    for op in &state.perception.tamper_ops {
        if op.is_pending() && op.kind == TamperKind::Spoof {
            if let Some(system) = op.target.system {
                if let Some(room) = world.response_room(system) {
                    return Some(room);
                }
            }
        }
    }
    state
        .truth
        .arcs
        .iter()
        .find(|a| a.announced)
        .and_then(|a| world.response_room(a.kind.system()))
}

/// Where a crew member belongs this phase when nothing demands otherwise
fn default_station(
    state: &KernelState,
    world: &World,
    here: RoomId,
    role: Role,
    rng: &mut KernelRng,
) -> Option<RoomId> {
    let mess = RoomId(1);
    let quarters = RoomId(2);
    match state.truth.phase {
        Phase::PreShift | Phase::Evening => Some(mess),
        Phase::Night => Some(quarters),
        Phase::Shift => match role {
            Role::Miner => Some(world.mining_room()),
            Role::Medic => world.response_room(crate::core::types::DeviceSystem::Atmos),
            Role::Engineer => world.response_room(crate::core::types::DeviceSystem::Power),
            Role::Captain => Some(RoomId(0)),
            Role::Security => {
                // Patrol: an occasional step through a random doorway
                if state.truth.tick % PATROL_INTERVAL == 0 {
                    rng.pick(&world.adjacent(here)).copied()
                } else {
                    None
                }
            }
        },
    }
}

/// Mining yield: an explicit AND of three independent conditions
///
/// The miner must be alive, unstressed, and physically at the mine face, and
/// the tick must land on the yield cadence. Nothing implicit.
fn propose_yield(
    state: &KernelState,
    world: &World,
    npc: NpcId,
    role: Role,
    truth: &CrewTruth,
    out: &mut Vec<Proposal>,
) {
    if role != Role::Miner {
        return;
    }
    let config = &state.config;
    if state.truth.tick == 0 || state.truth.tick % config.yield_interval != 0 {
        return;
    }
    let eligible = truth.alive
        && truth.stress < config.yield_stress_threshold
        && truth.place == world.mining_room();
    if eligible {
        out.push(Proposal::tagged(
            EventKind::CargoYield { npc, amount: config.yield_amount },
            ProposalTag::Background,
        ));
    }
}

/// Passive stress/paranoia drift, surfaced as an auditable event
fn propose_drift(
    state: &KernelState,
    config: &KernelConfig,
    npc: NpcId,
    truth: &CrewTruth,
    out: &mut Vec<Proposal>,
) {
    let mut stress = 0.0f32;
    let mut paranoia = 0.0f32;

    if truth.stress > 0.0 {
        stress -= config.stress_decay.min(truth.stress);
    }
    if truth.paranoia > 0.0 {
        paranoia -= config.paranoia_decay.min(truth.paranoia);
    }

    // Unresolved doubts gnaw
    let doubts = state
        .perception
        .active_doubts
        .iter()
        .filter(|d| d.npc == npc)
        .count() as f32;
    paranoia += doubts * 0.1;

    if stress != 0.0 || paranoia != 0.0 {
        out.push(Proposal::tagged(
            EventKind::StressShift { npc, stress, paranoia },
            ProposalTag::Background,
        ));
    }
}

/// Threshold crossings: panic, and paranoia-plus-grudge turning violent
fn propose_breakdown(
    state: &KernelState,
    world: &World,
    npc: NpcId,
    truth: &CrewTruth,
    out: &mut Vec<Proposal>,
) {
    let config = &state.config;

    if truth.stress >= config.panic_stress {
        out.push(Proposal::tagged(
            EventKind::CrewPanic { npc, place: truth.place },
            ProposalTag::Pressure,
        ));
        return;
    }

    if truth.paranoia < config.violence_paranoia {
        return;
    }
    let Some(belief) = state.perception.belief(npc) else {
        return;
    };
    // Strongest grudge wins; roster order breaks ties deterministically
    let mut target: Option<(NpcId, f32)> = None;
    for other in &world.crew {
        if other.id == npc {
            continue;
        }
        let grudge = belief.grudge(other.id);
        if grudge >= config.violence_grudge
            && target.map(|(_, best)| grudge > best).unwrap_or(true)
        {
            target = Some((other.id, grudge));
        }
    }
    if let Some((victim, _)) = target {
        let colocated = state
            .truth
            .crew
            .get(&victim)
            .map(|v| v.alive && v.place == truth.place)
            .unwrap_or(false);
        if colocated {
            out.push(Proposal::tagged(
                EventKind::CrewViolence { attacker: npc, victim, place: truth.place },
                ProposalTag::Consequence,
            ));
        }
    }
}
