//! Events and proposals
//!
//! A [`Proposal`] is a candidate event generated by one subsystem within a
//! tick; the arbitrator deduplicates proposals and commits survivors as
//! [`SimEvent`]s. Committed events are the only way truth or perception
//! changes - every mutation is traceable to exactly one of them.

use serde::{Deserialize, Serialize};

use crate::core::types::{
    ArcId, ArcKind, DeviceSystem, EventId, NpcId, OpId, Phase, RoomId, Tick,
};
use crate::state::truth::OrderIntent;

/// Closed set of everything that can happen in one tick
///
/// Variants carry their actor/place/target payloads directly so the reducer's
/// `match` is compiler-checked exhaustive: an unhandled case cannot silently
/// do nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    // --- crew (truth side) ---
    CrewMove { npc: NpcId, to: RoomId },
    CrewFlee { npc: NpcId, from: RoomId, to: RoomId },
    CrewOrdered { npc: NpcId, intent: OrderIntent, place: RoomId },
    CrewRefused { npc: NpcId },
    CargoYield { npc: NpcId, amount: u32 },
    CrewPanic { npc: NpcId, place: RoomId },
    CrewViolence { attacker: NpcId, victim: NpcId, place: RoomId },
    CrewHarm { npc: NpcId, hp: f32 },
    StressShift { npc: NpcId, stress: f32, paranoia: f32 },

    // --- station physics (truth side) ---
    AtmosShift { place: RoomId, o2: f32, temperature: f32, radiation: f32, integrity: f32 },
    FireStarted { place: RoomId },
    FireOut { place: RoomId },
    VentOpened { place: RoomId },
    VentSealed { place: RoomId },
    AirPurged,
    TimersDecayed,

    // --- arcs & pacing ---
    ArcSpawned { arc: ArcId, kind: ArcKind, place: RoomId },
    ArcAdvanced { arc: ArcId, step: u8 },
    ArcResolved { arc: ArcId },
    PhaseChanged { phase: Phase, day: u32 },

    // --- perception side ---
    SensorReport { place: RoomId, system: DeviceSystem, value: f32, spoofed: bool },
    SensorSuppressed { system: DeviceSystem, duration: u32 },
    SensorSpoofed { system: DeviceSystem },
    EvidenceFabricated { subject: NpcId },
    Confessed { op: OpId, system: DeviceSystem, early: bool },
    TamperResolved { op: OpId },
    TamperBackfired { op: OpId },
    Whisper { from: NpcId, about: Option<NpcId>, topic: crate::state::perception::CommsTopic },
    Incident { a: NpcId, b: NpcId, place: RoomId },
    Announced { arc: ArcId },
    Downplayed { arc: ArcId },
    DoubtRaised { npc: NpcId, system: DeviceSystem },
}

impl EventKind {
    /// Whether this event belongs in the UI-relevant headline subset
    ///
    /// Background bookkeeping (atmosphere drift, stress drift, timers,
    /// routine sensor traffic, quiet tamper resolutions) stays out of it.
    pub fn is_headline(&self) -> bool {
        !matches!(
            self,
            Self::AtmosShift { .. }
                | Self::StressShift { .. }
                | Self::TimersDecayed
                | Self::SensorReport { .. }
                | Self::TamperResolved { .. }
                | Self::CrewMove { .. }
        )
    }
}

/// A committed simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub id: EventId,
    pub tick: Tick,
    pub kind: EventKind,
}

/// Classification tags attached by the proposing system
///
/// Tags feed pacing's per-phase beat bookkeeping; they never affect
/// arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalTag {
    Pressure,
    Uncertainty,
    Choice,
    Reaction,
    Telegraph,
    Consequence,
    Background,
}

/// A candidate event, ephemeral within a single tick
///
/// Score is a within-system tie-break only (e.g. which whisper topic to
/// emit). Arbitration never ranks proposals across systems by score - doing
/// so would change observable tick ordering and break determinism.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub kind: EventKind,
    pub score: i32,
    pub tags: Vec<ProposalTag>,
    pub arc: Option<ArcId>,
}

impl Proposal {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            score: 0,
            tags: Vec::new(),
            arc: None,
        }
    }

    pub fn tagged(kind: EventKind, tag: ProposalTag) -> Self {
        Self {
            kind,
            score: 0,
            tags: vec![tag],
            arc: None,
        }
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    /// Associate the proposal with the crisis arc it concerns
    pub fn with_arc(mut self, arc: ArcId) -> Self {
        self.arc = Some(arc);
        self
    }
}

/// Drop structurally identical proposals, keeping first occurrence order
///
/// Two systems proposing the same action in the same tick must not commit it
/// twice; anything else survives untouched. This is the only way arbitration
/// ever drops a proposal.
pub fn dedup_proposals(proposals: Vec<Proposal>) -> Vec<Proposal> {
    let mut kept: Vec<Proposal> = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        if !kept.iter().any(|p| p.kind == proposal.kind) {
            kept.push(proposal);
        }
    }
    kept
}
