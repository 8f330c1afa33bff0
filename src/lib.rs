//! Umbra Station - deterministic social-deduction simulation kernel
//!
//! A tick-based kernel for a station survival scenario in which the caller
//! plays the station intelligence: the one entity that sees ground truth and
//! chooses what the crew gets to perceive. The kernel owns both sides of that
//! split - physical truth and manipulated perception - and advances them in
//! lockstep, one deterministic tick at a time.
//!
//! The library has no I/O, no clock, and no global state. Drive it with
//! [`kernel::step_kernel`] from any front end:
//!
//! ```
//! use umbra_station::core::rng::KernelRng;
//! use umbra_station::kernel::step_kernel;
//! use umbra_station::state::create_initial_state;
//! use umbra_station::world::World;
//!
//! let world = World::station_default();
//! let mut state = create_initial_state(&world, 10);
//! let mut rng = KernelRng::new(42);
//! for _ in 0..100 {
//!     let output = step_kernel(&mut state, &world, &[], &mut rng);
//!     for event in &output.headlines {
//!         println!("[{}] {:?}", event.tick, event.kind);
//!     }
//! }
//! ```

pub mod command;
pub mod core;
pub mod events;
pub mod kernel;
pub mod state;
pub mod systems;
pub mod world;
