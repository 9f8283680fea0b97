//! Simulation systems. Each is a plain function over the world that reads
//! and writes a narrow slice of components; the scheduler runs them in
//! ascending priority order every tick (see `engine::register_default_systems`
//! for the order).

pub mod blocking;
pub mod combat;
pub mod control_points;
pub mod cooldown;
pub mod cleanup;
pub mod death;
pub mod healing;
pub mod movement;
pub mod status;
pub mod targeting;
