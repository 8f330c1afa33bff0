//! Kernel state: ground truth plus perception, owned by the caller
//!
//! The whole mutable simulation lives in one [`KernelState`] passed by `&mut`
//! into [`crate::kernel::step_kernel`]. No subsystem keeps its own copy or
//! cache, and there is no module-level global, so multiple simulations can
//! run side by side (the test suite relies on this).

pub mod perception;
pub mod truth;

use serde::{Deserialize, Serialize};

use crate::core::config::KernelConfig;
use crate::world::World;
pub use perception::PerceptionState;
pub use truth::TruthState;

/// The complete mutable state of one simulation
///
/// Serialized as-is (plus the seed and command history) this is sufficient to
/// reconstruct any prior tick by replaying from tick 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelState {
    pub truth: TruthState,
    pub perception: PerceptionState,
    pub config: KernelConfig,
    pub next_event_id: u64,
    pub next_op_id: u32,
    pub next_arc_id: u32,
}

/// Build a fresh kernel state from static world data and the day quota
///
/// All counters start at documented defaults: full O2, power, and comms;
/// zero stress, cargo, and suspicion.
pub fn create_initial_state(world: &World, quota_per_day: u32) -> KernelState {
    create_initial_state_with(world, quota_per_day, KernelConfig::default())
}

/// As [`create_initial_state`] with explicit tuning
pub fn create_initial_state_with(
    world: &World,
    quota_per_day: u32,
    config: KernelConfig,
) -> KernelState {
    KernelState {
        truth: TruthState::initial(world, quota_per_day, &config),
        perception: PerceptionState::initial(&world.crew, &config),
        config,
        next_event_id: 0,
        next_op_id: 0,
        next_arc_id: 0,
    }
}
