//! Event reducers
//!
//! The single place state changes. [`apply`] dispatches on [`EventKind`] with
//! an exhaustive match, so adding a variant without a reducer is a compile
//! error rather than a silently ignored case. Reducers clamp at the point of
//! mutation and skip missing entities instead of panicking.

use crate::core::types::{
    clamp_pct, clamp_unit, ArcId, ArcKind, DeviceSystem, NpcId, OpId, RoomId, TamperKind,
};
use crate::events::{EventKind, SimEvent};
use crate::state::perception::{
    ActiveDoubt, CommsMessage, CommsTopic, Rumor, SuspicionReason, TamperOp, TamperStatus,
    TamperTarget,
};
use crate::state::truth::{ActiveArc, PhaseBeats, StandingOrder};
use crate::state::KernelState;
use crate::world::World;

/// Apply one committed event to truth and perception
pub fn apply(state: &mut KernelState, world: &World, event: &SimEvent) {
    let tick = event.tick;
    match &event.kind {
        EventKind::CrewMove { npc, to } => {
            if world.room(*to).is_none() {
                return;
            }
            if let Some(crew) = state.truth.crew_mut(*npc) {
                if crew.alive {
                    crew.place = *to;
                }
            }
        }

        EventKind::CrewFlee { npc, from: _, to } => {
            let flee_stress = state.config.flee_stress;
            if let Some(crew) = state.truth.crew_mut(*npc) {
                if crew.alive {
                    crew.place = *to;
                    crew.stress = clamp_pct(crew.stress + flee_stress);
                }
            }
        }

        EventKind::CrewOrdered { npc, intent, place } => {
            if let Some(crew) = state.truth.crew_mut(*npc) {
                crew.ordered = Some(StandingOrder { intent: *intent, place: *place });
                crew.move_target = Some(*place);
            }
        }

        EventKind::CrewRefused { npc } => {
            if let Some(crew) = state.truth.crew_mut(*npc) {
                crew.ordered = None;
                crew.loyalty = clamp_pct(crew.loyalty - 2.0);
                crew.stress = clamp_pct(crew.stress + 2.0);
            }
        }

        EventKind::CargoYield { npc: _, amount } => {
            state.truth.cargo += *amount;
        }

        EventKind::CrewPanic { npc, place: _ } => {
            if let Some(crew) = state.truth.crew_mut(*npc) {
                // Panic vents stress but burns loyalty and drops any order
                crew.stress = clamp_pct(crew.stress - 20.0);
                crew.loyalty = clamp_pct(crew.loyalty - 2.0);
                crew.ordered = None;
                crew.move_target = None;
            }
        }

        EventKind::CrewViolence { attacker, victim, place: _ } => {
            apply_violence(state, world, tick, *attacker, *victim);
        }

        EventKind::CrewHarm { npc, hp } => {
            let mut died = false;
            if let Some(crew) = state.truth.crew_mut(*npc) {
                if crew.alive {
                    crew.hp = (crew.hp - hp).max(0.0);
                    if crew.hp <= 0.0 {
                        crew.alive = false;
                        died = true;
                    }
                }
            }
            if died {
                record_death(state, world, tick, *npc, "environmental");
            }
        }

        EventKind::StressShift { npc, stress, paranoia } => {
            if let Some(crew) = state.truth.crew_mut(*npc) {
                if crew.alive {
                    crew.stress = clamp_pct(crew.stress + stress);
                    crew.paranoia = clamp_pct(crew.paranoia + paranoia);
                }
            }
        }

        EventKind::AtmosShift { place, o2, temperature, radiation, integrity } => {
            state
                .truth
                .shift_room(*place, *o2, *temperature, *radiation, *integrity);
        }

        EventKind::FireStarted { place } => {
            if let Some(room) = state.truth.room_mut(*place) {
                room.on_fire = true;
            }
        }

        EventKind::FireOut { place } => {
            if let Some(room) = state.truth.room_mut(*place) {
                room.on_fire = false;
            }
        }

        EventKind::VentOpened { place } => {
            if let Some(room) = state.truth.room_mut(*place) {
                room.is_vented = true;
            }
        }

        EventKind::VentSealed { place } => {
            if let Some(room) = state.truth.room_mut(*place) {
                room.is_vented = false;
            }
        }

        EventKind::AirPurged => {
            let loss = state.config.purge_o2_loss;
            for room_def in &world.rooms {
                if let Some(room) = state.truth.room_mut(room_def.id) {
                    room.o2_level = (room.o2_level - loss).max(0.0);
                    room.on_fire = false;
                }
            }
        }

        EventKind::TimersDecayed => {
            let station = &mut state.truth.station;
            station.door_delay = station.door_delay.saturating_sub(1);
            station.blackout_ticks = station.blackout_ticks.saturating_sub(1);
            // Fixed iteration order keeps the mutation sequence deterministic
            for system in DeviceSystem::ALL {
                if let Some(remaining) = state.perception.suppressed.get_mut(&system) {
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        state.perception.suppressed.remove(&system);
                    }
                }
            }
        }

        EventKind::ArcSpawned { arc, kind, place } => {
            let interval = state.config.arc_step_interval;
            state.truth.arcs.push(ActiveArc {
                id: *arc,
                kind: *kind,
                step: 1,
                place: *place,
                next_step_tick: tick + interval,
                announced: false,
                downplayed: false,
            });
            state.truth.pacing.last_arc_kind = Some(*kind);
            apply_arc_step(state, *kind, *place, 1);
            tracing::info!(?kind, ?place, "crisis arc spawned");
        }

        EventKind::ArcAdvanced { arc, step } => {
            let interval = state.config.arc_step_interval;
            let info = state.truth.arc_mut(*arc).map(|a| {
                a.step = *step;
                a.next_step_tick = tick + interval;
                (a.kind, a.place)
            });
            if let Some((kind, place)) = info {
                apply_arc_step(state, kind, place, *step);
            }
        }

        EventKind::ArcResolved { arc } => {
            resolve_arc(state, tick, *arc);
        }

        EventKind::PhaseChanged { phase, day } => {
            state.truth.phase = *phase;
            state.perception.phase_comms_count = 0;
            state.truth.pacing.beats = PhaseBeats::default();
            if *day != state.truth.day {
                settle_day(state, tick);
                state.truth.day = *day;
            }
        }

        EventKind::SensorReport { place, system, value, spoofed } => {
            state.perception.readings.push(crate::state::perception::SensorReading {
                tick,
                place: *place,
                system: *system,
                value: *value,
                spoofed: *spoofed,
            });
            let cap = state.config.max_readings;
            if state.perception.readings.len() > cap {
                let excess = state.perception.readings.len() - cap;
                state.perception.readings.drain(..excess);
            }
        }

        EventKind::SensorSuppressed { system, duration } => {
            state.perception.suppressed.insert(*system, *duration);
            let severity = (1 + duration / 40).min(3) as u8;
            let window_end = tick + u64::from(*duration);
            spawn_op(state, tick, TamperKind::Suppress, severity, window_end, TamperTarget {
                system: Some(*system),
                ..Default::default()
            });
            tracing::debug!(?system, duration, "sensor feed suppressed");
        }

        EventKind::SensorSpoofed { system } => {
            let window_end = tick + state.config.spoof_window;
            spawn_op(state, tick, TamperKind::Spoof, 2, window_end, TamperTarget {
                system: Some(*system),
                ..Default::default()
            });
            tracing::debug!(?system, "sensor feed spoofed");
        }

        EventKind::EvidenceFabricated { subject } => {
            apply_fabrication(state, world, tick, *subject);
        }

        EventKind::Confessed { op, system, early } => {
            apply_confession(state, world, tick, *op, *system, *early);
        }

        EventKind::TamperResolved { op } => {
            let mut clear: Option<DeviceSystem> = None;
            if let Some(op) = state.perception.op_mut(*op) {
                op.status = TamperStatus::Resolved;
                op.resolved_tick = Some(tick);
                if op.kind == TamperKind::Suppress {
                    clear = op.target.system;
                }
            }
            if let Some(system) = clear {
                state.perception.suppressed.remove(&system);
            }
        }

        EventKind::TamperBackfired { op } => {
            apply_backfire(state, world, tick, *op);
        }

        EventKind::Whisper { from, about, topic } => {
            apply_whisper(state, world, tick, *from, *about, *topic);
        }

        EventKind::Incident { a, b, place: _ } => {
            apply_incident(state, tick, *a, *b);
        }

        EventKind::Announced { arc } => {
            let relief = state.config.announce_relief;
            let kind = state.truth.arc_mut(*arc).map(|a| {
                a.announced = true;
                a.kind
            });
            if let Some(kind) = kind {
                state.perception.record_suspicion(
                    tick,
                    relief,
                    SuspicionReason::AnnounceCrisis,
                    format!("{kind:?} announced openly"),
                );
                // Honesty is alarming and reassuring at once
                for member in &world.crew {
                    if let Some(crew) = state.truth.crew_mut(member.id) {
                        if crew.alive {
                            crew.stress = clamp_pct(crew.stress + 3.0);
                        }
                    }
                    if let Some(belief) = state.perception.belief_mut(member.id) {
                        belief.mother_reliable = clamp_unit(belief.mother_reliable + 0.03);
                    }
                }
            }
        }

        EventKind::Downplayed { arc } => {
            let penalty = state.config.downplay_penalty;
            let kind = state.truth.arc_mut(*arc).map(|a| {
                a.downplayed = true;
                a.kind
            });
            if let Some(kind) = kind {
                state.perception.record_suspicion(
                    tick,
                    penalty,
                    SuspicionReason::DownplayCrisis,
                    format!("{kind:?} minimized on the record"),
                );
                for member in &world.crew {
                    if let Some(crew) = state.truth.crew_mut(member.id) {
                        if crew.alive {
                            crew.stress = clamp_pct(crew.stress - 2.0);
                        }
                    }
                }
            }
        }

        EventKind::DoubtRaised { npc, system } => {
            state.perception.active_doubts.push(ActiveDoubt {
                npc: *npc,
                system: *system,
                raised_tick: tick,
                strength: 0.6,
            });
            if let Some(crew) = state.truth.crew_mut(*npc) {
                crew.paranoia = clamp_pct(crew.paranoia + 5.0);
            }
        }
    }
}

fn spawn_op(
    state: &mut KernelState,
    tick: u64,
    kind: TamperKind,
    severity: u8,
    window_end_tick: u64,
    target: TamperTarget,
) -> OpId {
    let id = OpId(state.next_op_id);
    state.next_op_id += 1;
    state.perception.tamper_ops.push(TamperOp {
        id,
        kind,
        created_tick: tick,
        target,
        window_end_tick,
        status: TamperStatus::Pending,
        severity,
        crew_affected: Vec::new(),
        matching_crisis_seen: false,
        resolved_tick: None,
    });
    id
}

fn apply_violence(state: &mut KernelState, world: &World, tick: u64, attacker: NpcId, victim: NpcId) {
    let damage = state.config.violence_damage;
    let mut died = false;
    if let Some(victim_truth) = state.truth.crew_mut(victim) {
        if !victim_truth.alive {
            return;
        }
        victim_truth.hp = (victim_truth.hp - damage).max(0.0);
        if victim_truth.hp <= 0.0 {
            victim_truth.alive = false;
            died = true;
        } else {
            victim_truth.stress = clamp_pct(victim_truth.stress + 20.0);
        }
    } else {
        return;
    }
    if let Some(attacker_truth) = state.truth.crew_mut(attacker) {
        attacker_truth.paranoia = clamp_pct(attacker_truth.paranoia - 15.0);
        attacker_truth.stress = clamp_pct(attacker_truth.stress + 5.0);
    }
    if !died {
        if let Some(belief) = state.perception.belief_mut(victim) {
            belief.raise_grudge(attacker, 0.3);
        }
    }
    if died {
        record_death(state, world, tick, victim, "violence");
    }
}

fn record_death(state: &mut KernelState, world: &World, tick: u64, npc: NpcId, cause: &str) {
    let name = world
        .crew_member(npc)
        .map(|c| c.name.as_str())
        .unwrap_or("unknown");
    let penalty = state.config.death_suspicion;
    state.perception.record_suspicion(
        tick,
        penalty,
        SuspicionReason::CrewDeath,
        format!("{name} lost ({cause})"),
    );
    tracing::warn!(?npc, cause, "crew member lost");
}

/// Physical consequences of an arc reaching a given step
fn apply_arc_step(state: &mut KernelState, kind: ArcKind, place: RoomId, step: u8) {
    match kind {
        // Burning is continuous; physics does the per-tick damage
        ArcKind::Fire => {}
        ArcKind::PowerSurge => {
            state.truth.station.power = clamp_pct(state.truth.station.power - 12.0);
            state.truth.station.door_delay += 5;
            if step >= 2 {
                state.truth.station.blackout_ticks += 10;
            }
        }
        ArcKind::RadiationLeak => {
            state.truth.shift_room(place, 0.0, 0.0, 15.0 * f32::from(step), 0.0);
        }
        ArcKind::HullBreach => {
            state.truth.shift_room(place, 0.0, 0.0, 0.0, -10.0);
            if step >= 2 {
                if let Some(room) = state.truth.room_mut(place) {
                    room.is_vented = true;
                }
            }
        }
    }
}

fn resolve_arc(state: &mut KernelState, tick: u64, arc: ArcId) {
    let Some(pos) = state.truth.arcs.iter().position(|a| a.id == arc) else {
        return;
    };
    let done = state.truth.arcs.remove(pos);
    // A downplayed crisis that peaked anyway is a lie laid bare
    if done.downplayed && done.step >= done.kind.max_steps() {
        let penalty = state.config.downplay_peak_penalty;
        state.perception.record_suspicion(
            tick,
            penalty,
            SuspicionReason::DownplayCrisis,
            format!("{:?} peaked after being downplayed", done.kind),
        );
    } else if done.announced {
        state.perception.record_suspicion(
            tick,
            -1,
            SuspicionReason::VerifyTrust,
            format!("{:?} handled in the open", done.kind),
        );
    }
    match done.kind {
        ArcKind::Fire => {
            if let Some(room) = state.truth.room_mut(done.place) {
                room.on_fire = false;
            }
        }
        ArcKind::HullBreach => {
            if let Some(room) = state.truth.room_mut(done.place) {
                room.is_vented = false;
            }
        }
        ArcKind::PowerSurge | ArcKind::RadiationLeak => {}
    }
    tracing::info!(kind = ?done.kind, "crisis arc resolved");
}

/// Day rollover: settle the quota and reset per-day counters
fn settle_day(state: &mut KernelState, tick: u64) {
    let quota = state.truth.quota_per_day;
    if state.truth.cargo >= quota {
        state.truth.cargo -= quota;
    } else {
        let penalty = state.config.quota_suspicion;
        let short = quota - state.truth.cargo;
        state.truth.cargo = 0;
        state.perception.record_suspicion(
            tick,
            penalty,
            SuspicionReason::QuotaShortfall,
            format!("daily quota missed by {short}"),
        );
    }
    state.truth.pacing.backfires_today.clear();
}

fn apply_fabrication(state: &mut KernelState, world: &World, tick: u64, subject: NpcId) {
    let subject_truth = state.truth.crew.get(&subject).cloned();
    let Some(subject_truth) = subject_truth else {
        return;
    };
    let window_end = tick + state.config.fabricate_window;
    let grudge = state.config.fabricate_grudge;
    let place = subject_truth.place;

    // Witnesses sharing the room give the subject an alibi later
    let witnesses: Vec<NpcId> = state
        .truth
        .crew_in_room(world, place)
        .into_iter()
        .filter(|id| *id != subject)
        .collect();

    let op = spawn_op(state, tick, TamperKind::Fabricate, 3, window_end, TamperTarget {
        npc: Some(subject),
        place: Some(place),
        ..Default::default()
    });
    if let Some(op) = state.perception.op_mut(op) {
        op.crew_affected = witnesses;
    }

    if subject_truth.alive {
        // Planted evidence lands: the crew turn on the subject
        for member in &world.crew {
            if member.id == subject {
                continue;
            }
            if let Some(belief) = state.perception.belief_mut(member.id) {
                belief.raise_grudge(subject, grudge);
                belief.rumors.push(Rumor { subject, place, tick });
            }
        }
    } else {
        // Framing the dead convinces no one and smells of tampering
        for member in &world.crew {
            if let Some(belief) = state.perception.belief_mut(member.id) {
                belief.tamper_evidence = clamp_unit(belief.tamper_evidence + 0.1);
            }
        }
    }
    tracing::debug!(?subject, alive = subject_truth.alive, "evidence fabricated");
}

fn apply_confession(
    state: &mut KernelState,
    world: &World,
    tick: u64,
    op_id: OpId,
    system: DeviceSystem,
    early: bool,
) {
    let severity = {
        let Some(op) = state.perception.op_mut(op_id) else {
            return;
        };
        if !op.is_pending() {
            return;
        }
        op.status = TamperStatus::Confessed;
        op.resolved_tick = Some(tick);
        op.severity
    };
    state.perception.suppressed.remove(&system);

    let (reason, per_severity) = if early {
        (SuspicionReason::EarlyConfession, state.config.confess_early_penalty)
    } else {
        (SuspicionReason::LateConfession, state.config.confess_late_penalty)
    };
    let delta = per_severity * i32::from(severity);
    state.perception.record_suspicion(
        tick,
        delta,
        reason,
        format!("{system:?} tampering admitted"),
    );
    // Coming clean buys back a little faith
    for member in &world.crew {
        if let Some(belief) = state.perception.belief_mut(member.id) {
            belief.mother_reliable = clamp_unit(belief.mother_reliable + 0.05);
        }
    }
    tracing::info!(?system, early, "tamper operation confessed");
}

fn apply_backfire(state: &mut KernelState, world: &World, tick: u64, op_id: OpId) {
    let (kind, severity, system, affected) = {
        let Some(op) = state.perception.op_mut(op_id) else {
            return;
        };
        if !op.is_pending() {
            return;
        }
        op.status = TamperStatus::Backfired;
        op.resolved_tick = Some(tick);
        (op.kind, op.severity, op.target.system, op.crew_affected.clone())
    };
    if kind == TamperKind::Suppress {
        if let Some(system) = system {
            state.perception.suppressed.remove(&system);
        }
    }

    let reason = match kind {
        TamperKind::Suppress => SuspicionReason::SuppressBackfire,
        TamperKind::Spoof => SuspicionReason::SpoofBackfire,
        TamperKind::Fabricate => SuspicionReason::FabricateBackfire,
    };

    // Cry-wolf: the N-th same-day backfire of a kind costs more than the first
    let prior = state
        .truth
        .pacing
        .backfires_today
        .get(&kind)
        .copied()
        .unwrap_or(0);
    let delta = backfire_penalty(&state.config, severity, prior);
    *state.truth.pacing.backfires_today.entry(kind).or_insert(0) += 1;

    state.perception.record_suspicion(
        tick,
        delta,
        reason,
        format!("{kind:?} exposed (same-day repeat {prior})"),
    );

    // Local effect: everyone burned stops trusting the voice in the walls
    let trust_loss = state.config.backfire_trust_loss;
    for npc in &affected {
        if world.crew_member(*npc).is_none() {
            continue;
        }
        if let Some(belief) = state.perception.belief_mut(*npc) {
            belief.mother_reliable = clamp_unit(belief.mother_reliable - trust_loss);
            belief.tamper_evidence = clamp_unit(belief.tamper_evidence + 0.2);
        }
    }
    tracing::info!(?kind, ?system, repeat = prior, "tamper operation backfired");
}

/// Monotone non-decreasing in the same-day repeat count
pub fn backfire_penalty(config: &crate::core::config::KernelConfig, severity: u8, prior_today: u32) -> i32 {
    let escalation = config.crywolf_step * i32::try_from(prior_today).unwrap_or(i32::MAX);
    (config.backfire_base_penalty + escalation) * i32::from(severity)
}

fn apply_whisper(
    state: &mut KernelState,
    world: &World,
    tick: u64,
    from: NpcId,
    about: Option<NpcId>,
    topic: CommsTopic,
) {
    state.perception.messages.push(CommsMessage { tick, from, about, topic });
    let cap = state.config.max_messages;
    if state.perception.messages.len() > cap {
        let excess = state.perception.messages.len() - cap;
        state.perception.messages.drain(..excess);
    }
    state.perception.phase_comms_count += 1;

    // Whispers land on whoever shares the room with the speaker
    let Some(speaker_place) = state.truth.crew.get(&from).map(|c| c.place) else {
        return;
    };
    let listeners: Vec<NpcId> = state
        .truth
        .crew_in_room(world, speaker_place)
        .into_iter()
        .filter(|id| *id != from)
        .collect();
    for listener in listeners {
        let Some(belief) = state.perception.belief_mut(listener) else {
            continue;
        };
        match topic {
            CommsTopic::Grudge => {
                if let Some(subject) = about {
                    if subject != listener {
                        belief.raise_grudge(subject, 0.05);
                    }
                }
            }
            CommsTopic::DistrustMother => {
                belief.mother_reliable = clamp_unit(belief.mother_reliable - 0.02);
            }
            CommsTopic::SensorDoubt => {
                belief.tamper_evidence = clamp_unit(belief.tamper_evidence + 0.05);
            }
            CommsTopic::Confrontation => {}
        }
    }
}

fn apply_incident(state: &mut KernelState, tick: u64, a: NpcId, b: NpcId) {
    state.perception.messages.push(CommsMessage {
        tick,
        from: a,
        about: Some(b),
        topic: CommsTopic::Confrontation,
    });
    state.perception.phase_comms_count += 1;
    let stress = state.config.incident_stress;
    for npc in [a, b] {
        if let Some(crew) = state.truth.crew_mut(npc) {
            crew.stress = clamp_pct(crew.stress + stress);
        }
    }
    if let Some(belief) = state.perception.belief_mut(a) {
        belief.raise_grudge(b, 0.1);
    }
    if let Some(belief) = state.perception.belief_mut(b) {
        belief.raise_grudge(a, 0.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EventId;
    use crate::state::create_initial_state;

    fn event(tick: u64, kind: EventKind) -> SimEvent {
        SimEvent { id: EventId(0), tick, kind }
    }

    #[test]
    fn test_dead_crew_never_revive() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.crew_mut(NpcId(1)).expect("crew").alive = false;
        apply(
            &mut state,
            &world,
            &event(5, EventKind::CrewMove { npc: NpcId(1), to: RoomId(0) }),
        );
        apply(
            &mut state,
            &world,
            &event(6, EventKind::StressShift { npc: NpcId(1), stress: 5.0, paranoia: 0.0 }),
        );
        let crew = &state.truth.crew[&NpcId(1)];
        assert!(!crew.alive);
        assert_eq!(crew.place, RoomId(2));
        assert_eq!(crew.stress, 0.0);
    }

    #[test]
    fn test_violence_can_kill_and_ledgers_the_death() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.crew_mut(NpcId(2)).expect("crew").hp = 20.0;
        apply(
            &mut state,
            &world,
            &event(9, EventKind::CrewViolence { attacker: NpcId(5), victim: NpcId(2), place: RoomId(2) }),
        );
        assert!(!state.truth.crew[&NpcId(2)].alive);
        assert!(state
            .perception
            .suspicion_ledger
            .iter()
            .any(|e| e.reason == SuspicionReason::CrewDeath));
    }

    #[test]
    fn test_backfire_penalty_is_monotone_in_repeats() {
        let config = crate::core::config::KernelConfig::default();
        let mut last = 0;
        for n in 0..6 {
            let penalty = backfire_penalty(&config, 2, n);
            assert!(penalty >= last, "penalty must not decrease");
            last = penalty;
        }
        assert!(backfire_penalty(&config, 2, 3) > backfire_penalty(&config, 2, 0));
    }

    #[test]
    fn test_suppression_timer_decays_and_clears() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.perception.suppressed.insert(DeviceSystem::Thermal, 2);
        apply(&mut state, &world, &event(1, EventKind::TimersDecayed));
        assert_eq!(state.perception.suppressed.get(&DeviceSystem::Thermal), Some(&1));
        apply(&mut state, &world, &event(2, EventKind::TimersDecayed));
        assert!(state.perception.suppressed.is_empty());
    }

    #[test]
    fn test_air_purge_starves_every_fire() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.room_mut(RoomId(4)).expect("room").on_fire = true;
        state.truth.room_mut(RoomId(5)).expect("room").on_fire = true;
        apply(&mut state, &world, &event(3, EventKind::AirPurged));
        for room in state.truth.rooms.values() {
            assert!(!room.on_fire);
            assert_eq!(room.o2_level, 100.0 - state.config.purge_o2_loss);
        }
    }

    #[test]
    fn test_fabricating_against_living_subject_raises_grudges() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        apply(
            &mut state,
            &world,
            &event(4, EventKind::EvidenceFabricated { subject: NpcId(1) }),
        );
        for member in &world.crew {
            if member.id == NpcId(1) {
                continue;
            }
            let belief = state.perception.belief(member.id).expect("belief");
            assert!(belief.grudge(NpcId(1)) > 0.0, "{:?}", member.id);
            assert_eq!(belief.rumors.len(), 1);
        }
        assert_eq!(state.perception.tamper_ops.len(), 1);
        assert_eq!(state.perception.tamper_ops[0].kind, TamperKind::Fabricate);
    }

    #[test]
    fn test_fabricating_against_the_dead_breeds_tamper_evidence() {
        let world = World::station_default();
        let mut state = create_initial_state(&world, 10);
        state.truth.crew_mut(NpcId(1)).expect("crew").alive = false;
        apply(
            &mut state,
            &world,
            &event(4, EventKind::EvidenceFabricated { subject: NpcId(1) }),
        );
        for member in &world.crew {
            let belief = state.perception.belief(member.id).expect("belief");
            assert_eq!(belief.grudge(NpcId(1)), 0.0);
            assert!(belief.tamper_evidence > 0.0);
        }
    }
}
