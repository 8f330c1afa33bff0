//! Perceived and manipulated state
//!
//! Everything derivable from signals rather than from reality: sensor
//! readings, per-crew beliefs, the comms log, outstanding tamper operations,
//! active doubts, and the suspicion ledger. This side may diverge from
//! [`super::truth`] - that divergence is the game.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::KernelConfig;
use crate::core::types::{DeviceSystem, NpcId, OpId, RoomId, TamperKind, Tick};

/// One sensor sample as shown to the crew (possibly false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub tick: Tick,
    pub place: RoomId,
    pub system: DeviceSystem,
    pub value: f32,
    /// True when this reading was manufactured rather than measured
    pub spoofed: bool,
}

/// Second-hand testimony placing a crew member somewhere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rumor {
    pub subject: NpcId,
    pub place: RoomId,
    pub tick: Tick,
}

/// What one crew member believes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefState {
    /// Trust in the station intelligence, [0, 1]
    pub mother_reliable: f32,
    /// Grudge toward each other crew member; absent entry = 0 (neutral)
    pub grudges: AHashMap<NpcId, f32>,
    /// Accumulated sense that the sensors are being tampered with, [0, 1]
    pub tamper_evidence: f32,
    pub rumors: Vec<Rumor>,
}

impl BeliefState {
    pub fn fresh(config: &KernelConfig) -> Self {
        Self {
            mother_reliable: config.initial_trust,
            grudges: AHashMap::new(),
            tamper_evidence: 0.0,
            rumors: Vec::new(),
        }
    }

    /// Grudge toward another crew member; absent entry reads as neutral
    pub fn grudge(&self, other: NpcId) -> f32 {
        self.grudges.get(&other).copied().unwrap_or(0.0)
    }

    pub fn raise_grudge(&mut self, other: NpcId, amount: f32) {
        let entry = self.grudges.entry(other).or_insert(0.0);
        *entry = (*entry + amount).clamp(0.0, 1.0);
    }
}

/// Topic of a whisper or broadcast on the crew channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommsTopic {
    /// One crew member bad-mouthing another
    Grudge,
    /// Shared doubt about the station intelligence
    DistrustMother,
    /// A sensor that does not add up
    SensorDoubt,
    /// Open confrontation
    Confrontation,
}

/// One message on the crew channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommsMessage {
    pub tick: Tick,
    pub from: NpcId,
    pub about: Option<NpcId>,
    pub topic: CommsTopic,
}

/// Lifecycle status of a tamper operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TamperStatus {
    Pending,
    Resolved,
    Backfired,
    Confessed,
}

impl TamperStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// What a tamper operation is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TamperTarget {
    pub system: Option<DeviceSystem>,
    pub npc: Option<NpcId>,
    pub place: Option<RoomId>,
}

/// A player-initiated deception with a scheduled resolution window
///
/// A `Pending` op is the only mutable-state representation of an outstanding
/// lie. Once terminal it is retained solely for ledger and cooldown lookups
/// and garbage-collected after the retention window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TamperOp {
    pub id: OpId,
    pub kind: TamperKind,
    pub created_tick: Tick,
    pub target: TamperTarget,
    pub window_end_tick: Tick,
    pub status: TamperStatus,
    /// 1 (minor) to 3 (brazen); scales every penalty attached to this op
    pub severity: u8,
    /// Crew recorded responding (or witnessing) while the op was pending
    pub crew_affected: Vec<NpcId>,
    /// A real crisis matching the op's system was active during pendency
    pub matching_crisis_seen: bool,
    pub resolved_tick: Option<Tick>,
}

impl TamperOp {
    pub fn is_pending(&self) -> bool {
        self.status == TamperStatus::Pending
    }
}

/// A crew member's unresolved doubt about a specific system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDoubt {
    pub npc: NpcId,
    pub system: DeviceSystem,
    pub raised_tick: Tick,
    /// [0, 1]; feeds whisper topic selection
    pub strength: f32,
}

/// Machine-readable cause tag for a suspicion delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspicionReason {
    SuppressBackfire,
    SpoofBackfire,
    FabricateBackfire,
    EarlyConfession,
    LateConfession,
    AnnounceCrisis,
    DownplayCrisis,
    VerifyTrust,
    CrewDeath,
    QuotaShortfall,
}

impl std::fmt::Display for SuspicionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::SuppressBackfire => "SUPPRESS_BACKFIRE",
            Self::SpoofBackfire => "SPOOF_BACKFIRE",
            Self::FabricateBackfire => "FABRICATE_BACKFIRE",
            Self::EarlyConfession => "EARLY_CONFESSION",
            Self::LateConfession => "LATE_CONFESSION",
            Self::AnnounceCrisis => "ANNOUNCE_CRISIS",
            Self::DownplayCrisis => "DOWNPLAY_CRISIS",
            Self::VerifyTrust => "VERIFY_TRUST",
            Self::CrewDeath => "CREW_DEATH",
            Self::QuotaShortfall => "QUOTA_SHORTFALL",
        };
        f.write_str(tag)
    }
}

/// One append-only entry in the suspicion ledger; never edited after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionLedgerEntry {
    pub tick: Tick,
    pub delta: i32,
    pub reason: SuspicionReason,
    pub detail: String,
}

/// Suspicion bounds; the running sum is clamped into this range at every entry
pub const SUSPICION_FLOOR: i32 = 0;
pub const SUSPICION_CEILING: i32 = 100;

/// Current suspicion score: the clamped running sum of the ledger
///
/// Clamping happens per entry, not on the final sum, so a score parked at the
/// floor does not bank hidden credit against future increases.
pub fn current_suspicion(ledger: &[SuspicionLedgerEntry]) -> u8 {
    ledger
        .iter()
        .fold(0i32, |acc, entry| {
            (acc + entry.delta).clamp(SUSPICION_FLOOR, SUSPICION_CEILING)
        }) as u8
}

/// Everything derivable from manipulated or observed signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionState {
    pub readings: Vec<SensorReading>,
    pub beliefs: AHashMap<NpcId, BeliefState>,
    pub messages: Vec<CommsMessage>,
    pub tamper_ops: Vec<TamperOp>,
    pub active_doubts: Vec<ActiveDoubt>,
    pub suspicion_ledger: Vec<SuspicionLedgerEntry>,
    /// Live suppression effects: system -> remaining ticks
    pub suppressed: AHashMap<DeviceSystem, u32>,
    /// Comms proposals committed this phase (rate limit)
    pub phase_comms_count: u32,
}

impl PerceptionState {
    pub fn initial(crew: &[crate::world::CrewMember], config: &KernelConfig) -> Self {
        let beliefs = crew
            .iter()
            .map(|c| (c.id, BeliefState::fresh(config)))
            .collect();
        Self {
            readings: Vec::new(),
            beliefs,
            messages: Vec::new(),
            tamper_ops: Vec::new(),
            active_doubts: Vec::new(),
            suspicion_ledger: Vec::new(),
            suppressed: AHashMap::new(),
            phase_comms_count: 0,
        }
    }

    /// Append a suspicion delta with its cause; the only way the score moves
    pub fn record_suspicion(
        &mut self,
        tick: Tick,
        delta: i32,
        reason: SuspicionReason,
        detail: impl Into<String>,
    ) {
        self.suspicion_ledger.push(SuspicionLedgerEntry {
            tick,
            delta,
            reason,
            detail: detail.into(),
        });
    }

    pub fn suspicion(&self) -> u8 {
        current_suspicion(&self.suspicion_ledger)
    }

    /// Ledger entries recorded during the given day's tick range
    pub fn entries_between(&self, from_tick: Tick, to_tick: Tick) -> Vec<&SuspicionLedgerEntry> {
        self.suspicion_ledger
            .iter()
            .filter(|e| e.tick >= from_tick && e.tick < to_tick)
            .collect()
    }

    pub fn op(&self, id: OpId) -> Option<&TamperOp> {
        self.tamper_ops.iter().find(|o| o.id == id)
    }

    pub fn op_mut(&mut self, id: OpId) -> Option<&mut TamperOp> {
        self.tamper_ops.iter_mut().find(|o| o.id == id)
    }

    /// Oldest pending op aimed at the given system, if any
    pub fn oldest_pending_for(&self, system: DeviceSystem) -> Option<&TamperOp> {
        self.tamper_ops
            .iter()
            .filter(|o| o.is_pending() && o.target.system == Some(system))
            .min_by_key(|o| o.created_tick)
    }

    pub fn belief(&self, npc: NpcId) -> Option<&BeliefState> {
        self.beliefs.get(&npc)
    }

    pub fn belief_mut(&mut self, npc: NpcId) -> Option<&mut BeliefState> {
        self.beliefs.get_mut(&npc)
    }
}
