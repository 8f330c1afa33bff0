//! Ground-truth simulation state
//!
//! Everything in here is what is actually happening aboard the station,
//! independent of what any crew member or the player has been told. The
//! perceived/manipulated side lives in [`super::perception`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::KernelConfig;
use crate::core::types::{clamp_pct, ArcId, ArcKind, NpcId, Phase, RoomId, TamperKind, Tick};
use crate::world::World;

/// Physical state of one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSystemState {
    /// Breathable atmosphere, percent
    pub o2_level: f32,
    /// Abstract temperature band, 0 (frozen) to 100 (inferno)
    pub temperature: f32,
    /// Ambient radiation, percent of lethal
    pub radiation: f32,
    /// Structural integrity, percent
    pub integrity: f32,
    pub is_vented: bool,
    pub on_fire: bool,
}

impl RoomSystemState {
    pub fn nominal() -> Self {
        Self {
            o2_level: 100.0,
            temperature: 40.0,
            radiation: 0.0,
            integrity: 100.0,
            is_vented: false,
            on_fire: false,
        }
    }

    /// Whether crew should not be in this room
    pub fn hazardous(&self, config: &KernelConfig) -> bool {
        self.on_fire
            || self.is_vented
            || self.o2_level < config.flee_o2
            || self.radiation > config.flee_radiation
    }
}

/// A standing order issued to one crew member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingOrder {
    pub intent: OrderIntent,
    pub place: RoomId,
}

/// What an ordered crew member should do once in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderIntent {
    /// Go to the room and stay there
    Guard,
    /// Go to the room and do role work there
    Work,
}

/// Physical and psychological ground truth for one crew member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewTruth {
    pub place: RoomId,
    pub alive: bool,
    pub hp: f32,
    pub stress: f32,
    pub loyalty: f32,
    pub paranoia: f32,
    /// Where this crew member is currently heading, if anywhere
    pub move_target: Option<RoomId>,
    pub ordered: Option<StandingOrder>,
}

impl CrewTruth {
    pub fn fresh(place: RoomId, config: &KernelConfig) -> Self {
        Self {
            place,
            alive: true,
            hp: 100.0,
            stress: 0.0,
            loyalty: config.initial_loyalty,
            paranoia: config.initial_paranoia,
            move_target: None,
            ordered: None,
        }
    }
}

/// A multi-step crisis in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveArc {
    pub id: ArcId,
    pub kind: ArcKind,
    /// Escalation step, 1-based; resolves past [`ArcKind::max_steps`]
    pub step: u8,
    pub place: RoomId,
    pub next_step_tick: Tick,
    /// The player publicly acknowledged this crisis
    pub announced: bool,
    /// The player publicly minimized this crisis
    pub downplayed: bool,
}

/// Station-wide aggregate systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSystems {
    /// Reactor output, percent
    pub power: f32,
    /// Comms array health, percent
    pub comms: f32,
    /// Extra ticks every door takes to cycle
    pub door_delay: u32,
    /// Remaining ticks of station-wide blackout
    pub blackout_ticks: u32,
}

impl StationSystems {
    pub fn nominal() -> Self {
        Self {
            power: 100.0,
            comms: 100.0,
            door_delay: 0,
            blackout_ticks: 0,
        }
    }
}

/// Per-phase beat bookkeeping used to vary content, not to enforce correctness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseBeats {
    pub dilemma: bool,
    pub crew_agency: bool,
    pub deception: bool,
}

/// Pacing sub-record: beat variety and same-day backfire counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PacingState {
    pub beats: PhaseBeats,
    /// Kind of the most recently spawned arc, avoided when spawning the next
    pub last_arc_kind: Option<ArcKind>,
    /// Backfires so far today, per tamper kind, feeding the cry-wolf penalty
    pub backfires_today: AHashMap<TamperKind, u32>,
}

/// The one authoritative simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthState {
    pub tick: Tick,
    pub day: u32,
    pub phase: Phase,
    pub rooms: AHashMap<RoomId, RoomSystemState>,
    pub crew: AHashMap<NpcId, CrewTruth>,
    pub arcs: Vec<ActiveArc>,
    pub station: StationSystems,
    /// Units mined since the last quota settlement
    pub cargo: u32,
    pub quota_per_day: u32,
    pub pacing: PacingState,
}

impl TruthState {
    pub fn initial(world: &World, quota_per_day: u32, config: &KernelConfig) -> Self {
        let rooms = world
            .rooms
            .iter()
            .map(|r| (r.id, RoomSystemState::nominal()))
            .collect();
        let quarters = RoomId(2);
        let crew = world
            .crew
            .iter()
            .map(|c| (c.id, CrewTruth::fresh(quarters, config)))
            .collect();
        Self {
            tick: 0,
            day: 1,
            phase: Phase::PreShift,
            rooms,
            crew,
            arcs: Vec::new(),
            station: StationSystems::nominal(),
            cargo: 0,
            quota_per_day,
            pacing: PacingState::default(),
        }
    }

    /// Not found => skip: callers treat a missing room as "nothing to do"
    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut RoomSystemState> {
        self.rooms.get_mut(&id)
    }

    pub fn crew_mut(&mut self, id: NpcId) -> Option<&mut CrewTruth> {
        self.crew.get_mut(&id)
    }

    /// Arc of the given kind currently active, if any
    pub fn arc_of_kind(&self, kind: ArcKind) -> Option<&ActiveArc> {
        self.arcs.iter().find(|a| a.kind == kind)
    }

    pub fn arc_mut(&mut self, id: ArcId) -> Option<&mut ActiveArc> {
        self.arcs.iter_mut().find(|a| a.id == id)
    }

    /// Living crew physically present in a room, in roster order
    pub fn crew_in_room(&self, world: &World, room: RoomId) -> Vec<NpcId> {
        world
            .crew
            .iter()
            .filter(|c| {
                self.crew
                    .get(&c.id)
                    .map(|t| t.alive && t.place == room)
                    .unwrap_or(false)
            })
            .map(|c| c.id)
            .collect()
    }

    /// Apply a bounded delta to a room metric; clamps at the point of mutation
    pub fn shift_room(&mut self, id: RoomId, o2: f32, temperature: f32, radiation: f32, integrity: f32) {
        if let Some(room) = self.rooms.get_mut(&id) {
            // Burning rooms never regain O2, whatever the source of the delta.
            let o2 = if room.on_fire && o2 > 0.0 { 0.0 } else { o2 };
            room.o2_level = clamp_pct(room.o2_level + o2);
            room.temperature = clamp_pct(room.temperature + temperature);
            room.radiation = clamp_pct(room.radiation + radiation);
            room.integrity = clamp_pct(room.integrity + integrity);
        }
    }
}
