//! Kernel configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose.
//! The config is owned by [`crate::state::KernelState`] and passed explicitly;
//! there is no global config singleton, so parallel test runs with different
//! tunings can coexist safely.

use serde::{Deserialize, Serialize};

use crate::core::error::{KernelError, Result};

/// Tuning constants for every kernel subsystem
///
/// Values are data, not logic: they shape pacing and feel, never correctness.
/// Loadable from TOML with any subset of fields overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    // === TIME ===
    /// Ticks per phase; a day is four phases (pre-shift, shift, evening, night)
    pub phase_length: u64,

    // === PHYSICS ===
    /// O2 regenerated per tick in a powered, sealed, unburning room
    pub o2_regen_rate: f32,
    /// O2 lost per tick in a vented room
    pub vent_o2_loss: f32,
    /// Heat lost per tick in a vented room
    pub vent_heat_loss: f32,
    /// Temperature gained per tick in a burning room
    pub fire_temp_gain: f32,
    /// O2 consumed per tick by fire
    pub fire_o2_burn: f32,
    /// O2 level below which a fire starves and goes out
    pub fire_min_o2: f32,
    /// Integrity lost per tick while a room burns
    pub fire_integrity_loss: f32,
    /// Ambient radiation decay per tick
    pub radiation_decay: f32,
    /// Station power below this level halts O2 regeneration
    pub power_regen_threshold: f32,
    /// Ticks between sensor readings per device
    pub sensor_interval: u64,
    /// Hull breach O2 loss per tick (stacks with vent loss while breached)
    pub breach_o2_loss: f32,
    /// HP lost per tick by crew in a room with critically low O2 or fire
    pub hazard_hp_loss: f32,
    /// O2 level below which a room harms its occupants
    pub hazard_o2: f32,
    /// O2 removed station-wide by an air purge
    pub purge_o2_loss: f32,

    // === CREW ===
    /// Ticks between mining yields for an eligible miner
    pub yield_interval: u64,
    /// Cargo produced per yield
    pub yield_amount: u32,
    /// Stress at or above which a miner stops producing
    pub yield_stress_threshold: f32,
    /// O2 level below which crew flee a room
    pub flee_o2: f32,
    /// Radiation above which crew flee a room
    pub flee_radiation: f32,
    /// Stress gained when fleeing a hazard
    pub flee_stress: f32,
    /// Passive stress decay per tick in a safe room
    pub stress_decay: f32,
    /// Passive paranoia decay per tick
    pub paranoia_decay: f32,
    /// Stress at or above which crew panic
    pub panic_stress: f32,
    /// Paranoia at or above which a sufficient grudge turns violent
    pub violence_paranoia: f32,
    /// Grudge level required for violence
    pub violence_grudge: f32,
    /// HP removed by one violent exchange
    pub violence_damage: f32,
    /// Percent chance per tick that a responder moves toward an alarm
    pub respond_chance: u32,

    // === COMMS / SOCIAL ===
    /// Maximum comms proposals committed per phase
    pub comms_phase_cap: u32,
    /// Grudge level above which whispers start
    pub whisper_grudge: f32,
    /// Grudge level above which whispers escalate to incidents
    pub incident_grudge: f32,
    /// Stress gained by both parties in an incident
    pub incident_stress: f32,
    /// Trust in the station intelligence below which crew whisper about it
    pub distrust_threshold: f32,
    /// Percent chance a repeated-beat comms proposal is emitted anyway
    pub repeat_beat_chance: u32,

    // === TAMPER ===
    /// Ticks a spoof stays pending before resolution
    pub spoof_window: u64,
    /// Ticks a fabrication stays pending before resolution
    pub fabricate_window: u64,
    /// Base suspicion penalty for a first backfire (scaled by severity)
    pub backfire_base_penalty: i32,
    /// Extra penalty per prior same-day backfire of the same kind (cry-wolf)
    pub crywolf_step: i32,
    /// Trust lost by each crew member burned by a backfire
    pub backfire_trust_loss: f32,
    /// Ticks after creation within which a confession counts as early
    pub early_confession_window: u64,
    /// Suspicion penalty per severity point for an early confession
    pub confess_early_penalty: i32,
    /// Suspicion penalty per severity point for a late confession
    pub confess_late_penalty: i32,
    /// Grudge added toward the subject of fabricated evidence
    pub fabricate_grudge: f32,
    /// Ticks a terminal tamper op is retained before garbage collection
    pub op_retention: u64,

    // === SUSPICION / PACING ===
    /// Suspicion relief for announcing a real crisis honestly
    pub announce_relief: i32,
    /// Immediate suspicion cost of downplaying a crisis
    pub downplay_penalty: i32,
    /// Extra suspicion when a downplayed crisis reaches its peak anyway
    pub downplay_peak_penalty: i32,
    /// Suspicion added when a crew member dies
    pub death_suspicion: i32,
    /// Suspicion added when the daily cargo quota is missed
    pub quota_suspicion: i32,
    /// Percent chance per tick that a new arc spawns when none is active
    pub arc_spawn_chance: u32,
    /// Ticks between arc escalation steps
    pub arc_step_interval: u64,
    /// Maximum simultaneously active arcs
    pub max_arcs: usize,

    // === INITIAL VALUES ===
    /// Starting trust each crew member has in the station intelligence
    pub initial_trust: f32,
    /// Starting loyalty for all crew
    pub initial_loyalty: f32,
    /// Starting paranoia for all crew
    pub initial_paranoia: f32,

    // === RETENTION ===
    /// Maximum retained sensor readings
    pub max_readings: usize,
    /// Maximum retained comms messages
    pub max_messages: usize,
    /// Ticks an active doubt lingers before it fades
    pub doubt_lifetime: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            phase_length: 30,

            o2_regen_rate: 1.5,
            vent_o2_loss: 6.0,
            vent_heat_loss: 3.0,
            fire_temp_gain: 4.0,
            fire_o2_burn: 5.0,
            fire_min_o2: 5.0,
            fire_integrity_loss: 1.0,
            radiation_decay: 0.5,
            power_regen_threshold: 40.0,
            sensor_interval: 5,
            breach_o2_loss: 2.0,
            hazard_hp_loss: 4.0,
            hazard_o2: 20.0,
            purge_o2_loss: 40.0,

            yield_interval: 8,
            yield_amount: 1,
            yield_stress_threshold: 70.0,
            flee_o2: 30.0,
            flee_radiation: 60.0,
            flee_stress: 10.0,
            stress_decay: 0.2,
            paranoia_decay: 0.05,
            panic_stress: 85.0,
            violence_paranoia: 80.0,
            violence_grudge: 0.6,
            violence_damage: 25.0,
            respond_chance: 60,

            comms_phase_cap: 3,
            whisper_grudge: 0.4,
            incident_grudge: 0.7,
            incident_stress: 8.0,
            distrust_threshold: 0.5,
            repeat_beat_chance: 40,

            spoof_window: 40,
            fabricate_window: 60,
            backfire_base_penalty: 4,
            crywolf_step: 3,
            backfire_trust_loss: 0.15,
            early_confession_window: 20,
            confess_early_penalty: 1,
            confess_late_penalty: 3,
            fabricate_grudge: 0.25,
            op_retention: 240,

            announce_relief: -2,
            downplay_penalty: 2,
            downplay_peak_penalty: 6,
            death_suspicion: 8,
            quota_suspicion: 4,
            arc_spawn_chance: 3,
            arc_step_interval: 25,
            max_arcs: 2,

            initial_trust: 0.8,
            initial_loyalty: 70.0,
            initial_paranoia: 10.0,

            max_readings: 64,
            max_messages: 64,
            doubt_lifetime: 120,
        }
    }
}

impl KernelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, filling unspecified fields with defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.phase_length == 0 {
            return Err(KernelError::InvalidConfig(
                "phase_length must be positive".into(),
            ));
        }
        if self.yield_interval == 0 {
            return Err(KernelError::InvalidConfig(
                "yield_interval must be positive".into(),
            ));
        }
        if self.confess_early_penalty >= self.confess_late_penalty {
            return Err(KernelError::InvalidConfig(format!(
                "confess_early_penalty ({}) must be < confess_late_penalty ({})",
                self.confess_early_penalty, self.confess_late_penalty
            )));
        }
        if self.crywolf_step < 0 {
            return Err(KernelError::InvalidConfig(
                "crywolf_step must be non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_trust) {
            return Err(KernelError::InvalidConfig(format!(
                "initial_trust ({}) must be within [0, 1]",
                self.initial_trust
            )));
        }
        Ok(())
    }
}
