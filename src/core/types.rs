//! Core type definitions used throughout the kernel

use serde::{Deserialize, Serialize};

/// Simulation tick counter (the fundamental time unit)
pub type Tick = u64;

/// Unique identifier for crew members
///
/// Indexes into the static roster in [`crate::world::World`]. The id space is
/// closed over the known roster, so typed maps keyed by `NpcId` preserve
/// sparse-map semantics (absent entry = neutral default) without stringly keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NpcId(pub u8);

/// Unique identifier for rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u8);

/// Unique identifier for active crisis arcs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArcId(pub u32);

/// Unique identifier for tamper operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpId(pub u32);

/// Unique identifier for committed simulation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// Phase of the station day
///
/// Phases advance on a fixed tick schedule; a full cycle is one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    PreShift,
    Shift,
    Evening,
    Night,
}

impl Phase {
    /// Next phase in the cycle; `true` when the transition rolls over to a new day
    pub fn next(self) -> (Self, bool) {
        match self {
            Self::PreShift => (Self::Shift, false),
            Self::Shift => (Self::Evening, false),
            Self::Evening => (Self::Night, false),
            Self::Night => (Self::PreShift, true),
        }
    }
}

/// Station subsystem a sensor, command, or tamper operation can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceSystem {
    Thermal,
    Atmos,
    Radiation,
    Power,
    Hull,
    Comms,
}

impl DeviceSystem {
    /// All systems, in fixed order (used wherever iteration order must be stable)
    pub const ALL: [DeviceSystem; 6] = [
        Self::Thermal,
        Self::Atmos,
        Self::Radiation,
        Self::Power,
        Self::Hull,
        Self::Comms,
    ];

    /// The crisis kind whose signals this system carries, if any
    ///
    /// `Atmos` and `Comms` deliberately have no mapping: a spoofed alarm on an
    /// unmapped system can never align with a real crisis, so it backfires as
    /// soon as crew respond to it.
    pub fn arc_kind(self) -> Option<ArcKind> {
        match self {
            Self::Thermal => Some(ArcKind::Fire),
            Self::Radiation => Some(ArcKind::RadiationLeak),
            Self::Power => Some(ArcKind::PowerSurge),
            Self::Hull => Some(ArcKind::HullBreach),
            Self::Atmos | Self::Comms => None,
        }
    }
}

/// Kind of multi-step crisis arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcKind {
    Fire,
    PowerSurge,
    RadiationLeak,
    HullBreach,
}

impl ArcKind {
    pub const ALL: [ArcKind; 4] = [
        Self::Fire,
        Self::PowerSurge,
        Self::RadiationLeak,
        Self::HullBreach,
    ];

    /// Number of escalation steps before the arc resolves on its own
    pub fn max_steps(self) -> u8 {
        match self {
            Self::Fire => 3,
            Self::PowerSurge => 2,
            Self::RadiationLeak => 3,
            Self::HullBreach => 2,
        }
    }

    /// The sensor system that would report this crisis
    pub fn system(self) -> DeviceSystem {
        match self {
            Self::Fire => DeviceSystem::Thermal,
            Self::PowerSurge => DeviceSystem::Power,
            Self::RadiationLeak => DeviceSystem::Radiation,
            Self::HullBreach => DeviceSystem::Hull,
        }
    }
}

/// Kind of tamper operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TamperKind {
    Suppress,
    Spoof,
    Fabricate,
}

/// Clamp a percent-like quantity to [0, 100]
pub fn clamp_pct(v: f32) -> f32 {
    v.clamp(0.0, 100.0)
}

/// Clamp a unit-interval quantity to [0, 1]
pub fn clamp_unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
