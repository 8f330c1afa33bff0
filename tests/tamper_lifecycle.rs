//! Integration tests for the tamper op lifecycle and the suspicion economy

use umbra_station::command::Command;
use umbra_station::core::config::KernelConfig;
use umbra_station::core::rng::KernelRng;
use umbra_station::core::types::{DeviceSystem, NpcId, RoomId, TamperKind};
use umbra_station::kernel::step_kernel;
use umbra_station::state::perception::{SuspicionReason, TamperStatus};
use umbra_station::state::truth::OrderIntent;
use umbra_station::state::{create_initial_state_with, KernelState};
use umbra_station::world::World;

fn quiet_config() -> KernelConfig {
    // No spontaneous crises: every consequence in these tests is command-made
    let mut config = KernelConfig::default();
    config.arc_spawn_chance = 0;
    config
}

fn guard(target: NpcId, place: RoomId) -> Command {
    Command::Order { target, intent: OrderIntent::Guard, place }
}

fn run(
    state: &mut KernelState,
    world: &World,
    rng: &mut KernelRng,
    ticks: u64,
    script: &[(u64, Command)],
) {
    for _ in 0..ticks {
        let tick = state.truth.tick + 1;
        let commands: Vec<Command> = script
            .iter()
            .filter(|(at, _)| *at == tick)
            .map(|(_, c)| *c)
            .collect();
        step_kernel(state, world, &commands, rng);
    }
}

#[test]
fn test_unwatched_suppression_resolves_without_suspicion() {
    let world = World::station_default();
    let mut state = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(42);
    // Pre-shift: everyone heads for the Mess; Thermal Control stays empty
    run(
        &mut state,
        &world,
        &mut rng,
        25,
        &[(1, Command::Suppress { system: DeviceSystem::Thermal, duration: 20 })],
    );
    let op = &state.perception.tamper_ops[0];
    assert_eq!(op.status, TamperStatus::Resolved);
    assert!(op.crew_affected.is_empty());
    assert!(state.perception.suspicion_ledger.is_empty());
    assert_eq!(state.perception.suspicion(), 0);
}

#[test]
fn test_witnessed_suppression_backfires() {
    let world = World::station_default();
    let mut state = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(42);
    // Dietrich is sent to guard Thermal Control the same tick the feed dies
    let script = [
        (1, guard(NpcId(5), RoomId(5))),
        (1, Command::Suppress { system: DeviceSystem::Thermal, duration: 50 }),
    ];
    run(&mut state, &world, &mut rng, 1, &script);
    {
        let op = &state.perception.tamper_ops[0];
        assert_eq!(op.kind, TamperKind::Suppress);
        assert_eq!(op.status, TamperStatus::Pending);
        assert_eq!(op.window_end_tick, 51);
    }

    run(&mut state, &world, &mut rng, 50, &script);
    let op = &state.perception.tamper_ops[0];
    assert_eq!(op.status, TamperStatus::Backfired);
    assert_eq!(op.resolved_tick, Some(51));
    assert!(op.crew_affected.contains(&NpcId(5)));

    // Duration 50 is severity 2: penalty 2 * base, no cry-wolf escalation yet
    let entry = state
        .perception
        .suspicion_ledger
        .iter()
        .find(|e| e.reason == SuspicionReason::SuppressBackfire)
        .expect("backfire ledgered");
    assert_eq!(entry.delta, state.config.backfire_base_penalty * 2);
    assert_eq!(entry.tick, 51);
    assert_eq!(entry.reason.to_string(), "SUPPRESS_BACKFIRE");

    // The witness stops trusting the station intelligence and starts doubting
    let belief = state.perception.belief(NpcId(5)).expect("belief");
    assert!(belief.mother_reliable < state.config.initial_trust);
    assert!(state
        .perception
        .active_doubts
        .iter()
        .any(|d| d.npc == NpcId(5) && d.system == DeviceSystem::Thermal));
}

#[test]
fn test_early_confession_costs_less_than_late() {
    let world = World::station_default();

    let mut early = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(11);
    run(
        &mut early,
        &world,
        &mut rng,
        20,
        &[
            (1, Command::Spoof { system: DeviceSystem::Thermal }),
            (10, Command::Alert { system: DeviceSystem::Thermal }),
        ],
    );

    let mut late = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(11);
    run(
        &mut late,
        &world,
        &mut rng,
        40,
        &[
            (1, Command::Spoof { system: DeviceSystem::Thermal }),
            (30, Command::Alert { system: DeviceSystem::Thermal }),
        ],
    );

    assert_eq!(early.perception.tamper_ops[0].status, TamperStatus::Confessed);
    assert_eq!(late.perception.tamper_ops[0].status, TamperStatus::Confessed);
    assert!(early
        .perception
        .suspicion_ledger
        .iter()
        .any(|e| e.reason == SuspicionReason::EarlyConfession));
    assert!(late
        .perception
        .suspicion_ledger
        .iter()
        .any(|e| e.reason == SuspicionReason::LateConfession));
    assert!(early.perception.suspicion() < late.perception.suspicion());
}

#[test]
fn test_spoofing_an_unmapped_system_always_backfires_once_seen() {
    let world = World::station_default();
    let mut state = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(42);
    // No crisis arc ever reports through the atmos scrubbers, so the fake
    // alarm can never be covered by a real one. Marsh at the scrubbers seals it.
    run(
        &mut state,
        &world,
        &mut rng,
        50,
        &[
            (1, guard(NpcId(4), RoomId(3))),
            (5, Command::Spoof { system: DeviceSystem::Atmos }),
        ],
    );
    let op = &state.perception.tamper_ops[0];
    assert_eq!(op.kind, TamperKind::Spoof);
    assert_eq!(op.status, TamperStatus::Backfired);
    assert!(!op.matching_crisis_seen);
    assert!(state
        .perception
        .suspicion_ledger
        .iter()
        .any(|e| e.reason == SuspicionReason::SpoofBackfire));
}

#[test]
fn test_same_day_repeat_backfires_escalate() {
    let world = World::station_default();
    let mut state = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(42);
    // Two spoofs of the same kind, both witnessed, both expiring the same day
    run(
        &mut state,
        &world,
        &mut rng,
        50,
        &[
            (1, guard(NpcId(4), RoomId(3))),
            (1, guard(NpcId(0), RoomId(7))),
            (1, Command::Spoof { system: DeviceSystem::Atmos }),
            (2, Command::Spoof { system: DeviceSystem::Comms }),
        ],
    );
    let deltas: Vec<i32> = state
        .perception
        .suspicion_ledger
        .iter()
        .filter(|e| e.reason == SuspicionReason::SpoofBackfire)
        .map(|e| e.delta)
        .collect();
    assert_eq!(deltas.len(), 2);
    assert!(deltas[1] > deltas[0], "cry-wolf must escalate: {deltas:?}");
    let base = state.config.backfire_base_penalty;
    let step = state.config.crywolf_step;
    assert_eq!(deltas, vec![base * 2, (base + step) * 2]);
}

#[test]
fn test_terminal_ops_always_carry_a_resolution_tick() {
    let world = World::station_default();
    let mut state = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(42);
    run(
        &mut state,
        &world,
        &mut rng,
        100,
        &[
            (1, guard(NpcId(5), RoomId(5))),
            (2, Command::Suppress { system: DeviceSystem::Thermal, duration: 30 }),
            (3, Command::Spoof { system: DeviceSystem::Radiation }),
            (8, Command::Alert { system: DeviceSystem::Radiation }),
            (40, Command::Fabricate { target: NpcId(2) }),
        ],
    );
    assert!(!state.perception.tamper_ops.is_empty());
    for op in &state.perception.tamper_ops {
        if op.status.is_terminal() {
            assert!(op.resolved_tick.is_some(), "{:?}", op.id);
        } else {
            assert!(op.resolved_tick.is_none());
        }
    }
}

#[test]
fn test_fabrication_with_witnesses_backfires_as_alibi() {
    let world = World::station_default();
    let mut state = create_initial_state_with(&world, 10, quiet_config());
    let mut rng = KernelRng::new(42);
    // Everyone starts the day together in Quarters; fabricating against
    // Lindqvist while five others share the room hands the op its alibi.
    run(
        &mut state,
        &world,
        &mut rng,
        70,
        &[(1, Command::Fabricate { target: NpcId(2) })],
    );
    let op = &state.perception.tamper_ops[0];
    assert_eq!(op.kind, TamperKind::Fabricate);
    assert_eq!(op.status, TamperStatus::Backfired);
    assert!(state
        .perception
        .suspicion_ledger
        .iter()
        .any(|e| e.reason == SuspicionReason::FabricateBackfire));
}
