//! Player commands and the command interpreter
//!
//! The interpreter turns a [`Command`] into zero or more proposals. Every
//! validity gate lives here: a command issued in an invalid context produces
//! no proposals and therefore no events - the kernel never raises. The
//! calling UI is responsible for surfacing "nothing happened" as feedback.

use serde::{Deserialize, Serialize};

use crate::core::types::{DeviceSystem, NpcId, RoomId};
use crate::events::{EventKind, Proposal, ProposalTag};
use crate::state::truth::OrderIntent;
use crate::state::KernelState;
use crate::world::World;

/// Closed set of player actions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Hide a system's sensor readings for a number of ticks
    Suppress { system: DeviceSystem, duration: u32 },
    /// Manufacture a false alarm on a system
    Spoof { system: DeviceSystem },
    /// Plant evidence implicating a crew member
    Fabricate { target: NpcId },
    /// Confess an outstanding tamper operation on a system
    Alert { system: DeviceSystem },
    /// Publicly acknowledge the crisis signalled by a system
    Announce { system: DeviceSystem },
    /// Publicly minimize the crisis signalled by a system
    Downplay { system: DeviceSystem },
    /// Direct a crew member to a room
    Order { target: NpcId, intent: OrderIntent, place: RoomId },
    /// Open a room to vacuum
    Vent { place: RoomId },
    /// Re-seal a vented room
    Seal { place: RoomId },
    /// Flush the station atmosphere, starving every fire
    PurgeAir,
}

/// Interpret player commands into proposals, applying every validity gate
pub fn interpret(state: &KernelState, world: &World, commands: &[Command]) -> Vec<Proposal> {
    let mut proposals = Vec::new();
    for command in commands {
        interpret_one(state, world, *command, &mut proposals);
    }
    proposals
}

fn interpret_one(
    state: &KernelState,
    world: &World,
    command: Command,
    out: &mut Vec<Proposal>,
) {
    match command {
        Command::Suppress { system, duration } => {
            if duration == 0 {
                return;
            }
            // One outstanding lie per system and kind at a time
            if has_pending(state, system, crate::core::types::TamperKind::Suppress) {
                return;
            }
            out.push(Proposal::tagged(
                EventKind::SensorSuppressed { system, duration },
                ProposalTag::Uncertainty,
            ));
        }
        Command::Spoof { system } => {
            if has_pending(state, system, crate::core::types::TamperKind::Spoof) {
                return;
            }
            out.push(Proposal::tagged(
                EventKind::SensorSpoofed { system },
                ProposalTag::Uncertainty,
            ));
        }
        Command::Fabricate { target } => {
            // Living or dead targets are both valid; the reducer branches on
            // which. An unknown id is a silent no-op.
            if world.crew_member(target).is_none() {
                return;
            }
            let already = state
                .perception
                .tamper_ops
                .iter()
                .any(|o| o.is_pending() && o.target.npc == Some(target));
            if already {
                return;
            }
            out.push(Proposal::tagged(
                EventKind::EvidenceFabricated { subject: target },
                ProposalTag::Uncertainty,
            ));
        }
        Command::Alert { system } => {
            let Some(op) = state.perception.oldest_pending_for(system) else {
                return;
            };
            let early = state.truth.tick
                < op.created_tick + state.config.early_confession_window;
            out.push(Proposal::tagged(
                EventKind::Confessed { op: op.id, system, early },
                ProposalTag::Choice,
            ));
        }
        Command::Announce { system } => {
            if let Some(arc) = quiet_arc_for(state, system) {
                out.push(
                    Proposal::tagged(EventKind::Announced { arc }, ProposalTag::Choice)
                        .with_arc(arc),
                );
            }
        }
        Command::Downplay { system } => {
            if let Some(arc) = quiet_arc_for(state, system) {
                out.push(
                    Proposal::tagged(EventKind::Downplayed { arc }, ProposalTag::Choice)
                        .with_arc(arc),
                );
            }
        }
        Command::Order { target, intent, place } => {
            let Some(truth) = state.truth.crew.get(&target) else {
                return;
            };
            if !truth.alive || world.room(place).is_none() {
                return;
            }
            // Stressed crew stop taking direction
            let kind = if truth.loyalty >= truth.stress {
                EventKind::CrewOrdered { npc: target, intent, place }
            } else {
                EventKind::CrewRefused { npc: target }
            };
            out.push(Proposal::tagged(kind, ProposalTag::Choice));
        }
        Command::Vent { place } => {
            // Vent actuators are dead during a blackout
            if state.truth.station.blackout_ticks > 0 {
                return;
            }
            let Some(room) = state.truth.rooms.get(&place) else {
                return;
            };
            if !room.is_vented {
                out.push(Proposal::tagged(
                    EventKind::VentOpened { place },
                    ProposalTag::Consequence,
                ));
            }
        }
        Command::Seal { place } => {
            if state.truth.station.blackout_ticks > 0 {
                return;
            }
            let Some(room) = state.truth.rooms.get(&place) else {
                return;
            };
            if room.is_vented {
                out.push(Proposal::tagged(
                    EventKind::VentSealed { place },
                    ProposalTag::Consequence,
                ));
            }
        }
        Command::PurgeAir => {
            if state.truth.station.power >= state.config.power_regen_threshold {
                out.push(Proposal::tagged(EventKind::AirPurged, ProposalTag::Consequence));
            }
        }
    }
}

fn has_pending(state: &KernelState, system: DeviceSystem, kind: crate::core::types::TamperKind) -> bool {
    state
        .perception
        .tamper_ops
        .iter()
        .any(|o| o.is_pending() && o.kind == kind && o.target.system == Some(system))
}

/// Active arc matching the system's crisis kind that has had no comms-op yet
fn quiet_arc_for(state: &KernelState, system: DeviceSystem) -> Option<crate::core::types::ArcId> {
    let kind = system.arc_kind()?;
    state
        .truth
        .arcs
        .iter()
        .find(|a| a.kind == kind && !a.announced && !a.downplayed)
        .map(|a| a.id)
}
