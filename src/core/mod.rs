//! Core primitives: ids, phases, config, errors, and the deterministic RNG

pub mod config;
pub mod error;
pub mod rng;
pub mod types;
