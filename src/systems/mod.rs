//! Independent proposal systems
//!
//! Each system is a pure reader of kernel state that emits candidate events.
//! None of them mutate anything; only the arbitrator commits. They run in a
//! fixed order every tick (commands, physics, crew, comms), which together
//! with structural deduplication replaces any need for locking.

pub mod comms;
pub mod crew;
pub mod physics;
