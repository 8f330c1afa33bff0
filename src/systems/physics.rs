//! Station physics proposal system
//!
//! Advances room atmosphere with simple first-order rules, decays station
//! timers, and emits sensor readings. Pure: reads state and world, proposes
//! events, mutates nothing. The rules themselves need no randomness, so this
//! system takes no RNG.

use crate::core::types::{ArcKind, DeviceSystem, RoomId};
use crate::events::{EventKind, Proposal, ProposalTag};
use crate::state::KernelState;
use crate::world::World;

/// Propose this tick's physics events, one room at a time in world order
pub fn propose(state: &KernelState, world: &World) -> Vec<Proposal> {
    let config = &state.config;
    let mut proposals = Vec::new();

    for room_def in &world.rooms {
        let Some(room) = state.truth.rooms.get(&room_def.id) else {
            continue;
        };

        let mut o2 = 0.0f32;
        let mut temperature = 0.0f32;
        let mut integrity = 0.0f32;

        if room.is_vented {
            o2 -= config.vent_o2_loss.min(room.o2_level);
            temperature -= config.vent_heat_loss.min(room.temperature);
        }
        // An open hull breach bleeds air on top of any vent loss
        let breached = state
            .truth
            .arcs
            .iter()
            .any(|a| a.kind == ArcKind::HullBreach && a.place == room_def.id);
        if breached {
            o2 -= config.breach_o2_loss.min(room.o2_level + o2);
        }
        if room.on_fire {
            temperature += config.fire_temp_gain;
            o2 -= config.fire_o2_burn.min(room.o2_level + o2);
            integrity -= config.fire_integrity_loss;
            // Fire starves once the room runs out of air
            if room.o2_level + o2 <= config.fire_min_o2 {
                proposals.push(Proposal::tagged(
                    EventKind::FireOut { place: room_def.id },
                    ProposalTag::Consequence,
                ));
            }
        } else if !room.is_vented
            && state.truth.station.power >= config.power_regen_threshold
            && room.o2_level < 100.0
        {
            o2 += config.o2_regen_rate;
        }

        let radiation = if room.radiation > 0.0 {
            -config.radiation_decay.min(room.radiation)
        } else {
            0.0
        };

        if o2 != 0.0 || temperature != 0.0 || radiation != 0.0 || integrity != 0.0 {
            proposals.push(Proposal::tagged(
                EventKind::AtmosShift {
                    place: room_def.id,
                    o2,
                    temperature,
                    radiation,
                    integrity,
                },
                ProposalTag::Background,
            ));
        }

        // Crew caught in a hostile room take damage
        if room.on_fire || room.o2_level < config.hazard_o2 {
            for npc in state.truth.crew_in_room(world, room_def.id) {
                proposals.push(Proposal::tagged(
                    EventKind::CrewHarm { npc, hp: config.hazard_hp_loss },
                    ProposalTag::Consequence,
                ));
            }
        }
    }

    if has_running_timers(state) {
        proposals.push(Proposal::tagged(
            EventKind::TimersDecayed,
            ProposalTag::Background,
        ));
    }

    if state.truth.tick % config.sensor_interval == 0 {
        propose_sensor_sweep(state, world, &mut proposals);
    }

    proposals
}

fn has_running_timers(state: &KernelState) -> bool {
    state.truth.station.door_delay > 0
        || state.truth.station.blackout_ticks > 0
        || !state.perception.suppressed.is_empty()
}

/// Emit one reading per device, honoring suppression and spoofing
fn propose_sensor_sweep(state: &KernelState, world: &World, out: &mut Vec<Proposal>) {
    // A station-wide blackout takes every sensor down at once
    if state.truth.station.blackout_ticks > 0 {
        return;
    }
    for device in &world.devices {
        // Suppressed systems go dark: no reading at all
        if state.perception.suppressed.contains_key(&device.system) {
            continue;
        }

        let spoofed = state
            .perception
            .tamper_ops
            .iter()
            .any(|o| {
                o.is_pending()
                    && o.kind == crate::core::types::TamperKind::Spoof
                    && o.target.system == Some(device.system)
            });

        let value = if spoofed {
            alarm_value(device.system)
        } else {
            measured_value(state, device.system, device.room)
        };

        out.push(Proposal::tagged(
            EventKind::SensorReport {
                place: device.room,
                system: device.system,
                value,
                spoofed,
            },
            ProposalTag::Background,
        ));
    }
}

/// Ground-truth value a healthy sensor would report
fn measured_value(state: &KernelState, system: DeviceSystem, room: RoomId) -> f32 {
    let room_state = state.truth.rooms.get(&room);
    match system {
        DeviceSystem::Thermal => room_state.map(|r| r.temperature).unwrap_or(0.0),
        DeviceSystem::Atmos => room_state.map(|r| r.o2_level).unwrap_or(0.0),
        DeviceSystem::Radiation => room_state.map(|r| r.radiation).unwrap_or(0.0),
        DeviceSystem::Hull => room_state.map(|r| r.integrity).unwrap_or(0.0),
        DeviceSystem::Power => state.truth.station.power,
        DeviceSystem::Comms => state.truth.station.comms,
    }
}

/// The manufactured crisis value a spoofed sensor shows
fn alarm_value(system: DeviceSystem) -> f32 {
    match system {
        DeviceSystem::Thermal => 95.0,
        DeviceSystem::Atmos => 15.0,
        DeviceSystem::Radiation => 80.0,
        DeviceSystem::Hull => 30.0,
        DeviceSystem::Power => 20.0,
        DeviceSystem::Comms => 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ArcId;
    use crate::state::create_initial_state;
    use crate::state::truth::ActiveArc;

    #[test]
    fn test_nominal_station_proposes_only_sensor_sweep() {
        let world = World::station_default();
        let state = create_initial_state(&world, 10);
        // Tick 0: full O2 everywhere, no timers, sensors due
        let proposals = propose(&state, &world);
        assert!(proposals
            .iter()
            .all(|p| matches!(p.kind, EventKind::SensorReport { .. })));
        assert_eq!(proposals.len(), world.devices.len());
    }

    #[test]
    fn test_vented_room_loses_o2_and_heat() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.tick = 1; // off the sensor cadence
        state.truth.room_mut(RoomId(4)).expect("room").is_vented = true;
        let proposals = propose(&state, &world);
        let shift = proposals
            .iter()
            .find_map(|p| match p.kind {
                EventKind::AtmosShift { place, o2, temperature, .. } if place == RoomId(4) => {
                    Some((o2, temperature))
                }
                _ => None,
            })
            .expect("vented room shift");
        assert!(shift.0 < 0.0);
        assert!(shift.1 < 0.0);
    }

    #[test]
    fn test_starved_fire_goes_out() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.tick = 1;
        let room = state.truth.room_mut(RoomId(5)).expect("room");
        room.on_fire = true;
        room.o2_level = 6.0;
        let proposals = propose(&state, &world);
        assert!(proposals
            .iter()
            .any(|p| matches!(p.kind, EventKind::FireOut { place: RoomId(5) })));
    }

    #[test]
    fn test_unpowered_station_stops_o2_regen() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.tick = 1;
        state.truth.station.power = 10.0;
        state.truth.room_mut(RoomId(1)).expect("room").o2_level = 50.0;
        let proposals = propose(&state, &world);
        assert!(!proposals.iter().any(|p| matches!(
            p.kind,
            EventKind::AtmosShift { place: RoomId(1), o2, .. } if o2 > 0.0
        )));
    }

    #[test]
    fn test_hull_breach_bleeds_air_before_venting() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.tick = 1;
        state.truth.arcs.push(ActiveArc {
            id: ArcId(0),
            kind: ArcKind::HullBreach,
            step: 1,
            place: RoomId(6),
            next_step_tick: 99,
            announced: false,
            downplayed: false,
        });
        let proposals = propose(&state, &world);
        let o2 = proposals
            .iter()
            .find_map(|p| match p.kind {
                EventKind::AtmosShift { place, o2, .. } if place == RoomId(6) => Some(o2),
                _ => None,
            })
            .expect("breached room shift");
        assert_eq!(o2, -state.config.breach_o2_loss);
    }

    #[test]
    fn test_blackout_silences_every_sensor() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.station.blackout_ticks = 3;
        let proposals = propose(&state, &world);
        assert!(!proposals
            .iter()
            .any(|p| matches!(p.kind, EventKind::SensorReport { .. })));
    }

    #[test]
    fn test_suppressed_sensor_goes_dark() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.perception.suppressed.insert(DeviceSystem::Thermal, 20);
        let proposals = propose(&state, &world);
        assert!(!proposals.iter().any(|p| matches!(
            p.kind,
            EventKind::SensorReport { system: DeviceSystem::Thermal, .. }
        )));
    }
}
