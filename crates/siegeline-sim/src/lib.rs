//! Deterministic lane auto-battler simulation.
//!
//! `World` is a struct-of-arrays component store over integer entity ids;
//! `Simulation` owns it together with a priority scheduler and a fixed-step
//! clock, and is completely headless: the host pushes real-time deltas in,
//! reads snapshots and drains events out. Same seed + same input sequence =
//! identical component tables at every tick.

pub mod clock;
pub mod effects;
pub mod engine;
pub mod factory;
pub mod queries;
pub mod scheduler;
pub mod snapshot;
pub mod spatial;
pub mod systems;
pub mod world;
