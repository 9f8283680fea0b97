use serde::{Deserialize, Serialize};

use crate::components::Role;

/// Fixed logical timestep: 20 Hz
pub const TICK_MS: f64 = 50.0;
/// Ticks the clock may emit per advance call to catch up after a host stall.
/// Backlog beyond this is discarded so a stall cannot snowball.
pub const MAX_CATCHUP_TICKS: u32 = 5;

// --- Spatial index ---

/// Bucket width of the 1-D spatial hash over X.
pub const SPATIAL_CELL_WIDTH: f32 = 100.0;

// --- Lane & movement ---

/// Units halt this far short of the enemy castle's X coordinate. Kept
/// inside common attack ranges so a unit standing at the stop line can
/// still batter the castle.
pub const CASTLE_STOP_OFFSET: f32 = 30.0;
/// Per-tick decay applied to displacement impulses.
pub const DISPLACEMENT_DECAY: f32 = 0.85;
/// Displacement below this magnitude snaps to zero.
pub const DISPLACEMENT_EPSILON: f32 = 0.01;

// --- Control points ---

/// Milliseconds between presence checks at each point.
pub const CAPTURE_CHECK_INTERVAL_MS: f64 = 250.0;
/// Progress gained per check, scaled by the presence advantage.
pub const CAPTURE_PROGRESS_RATE: f32 = 0.12;
/// Multiplicative decay toward 0 while presence is contested or absent.
pub const CAPTURE_DECAY_RATE: f32 = 0.9;
/// Presence difference treated as contested.
pub const CAPTURE_DEADZONE: f32 = 0.5;
/// |progress| at which a point flips ownership.
pub const CAPTURE_OWNERSHIP_THRESHOLD: f32 = 0.4;

// --- Death & cleanup ---

/// Grace window between death and removal eligibility, letting the death
/// presentation play out.
pub const DEATH_GRACE_MS: f64 = 1200.0;

// --- Queries ---

/// Wall-clock memoization window for aggregate queries.
pub const QUERY_CACHE_TTL_MS: f64 = 50.0;

// --- Combat ---

/// Attack animation lock, capped by the attack rate.
pub const ATTACK_ANIM_LOCK_MS: f64 = 300.0;

/// Presence multiplier by role. Frontline anchors points, support barely
/// holds them.
pub fn role_presence_multiplier(role: Role) -> f32 {
    match role {
        Role::Frontline => 1.25,
        Role::Damage => 1.0,
        Role::Support => 0.5,
        Role::Disruptor => 0.75,
    }
}

/// Static lane geometry. Player castle sits at the low-X end, AI castle at
/// the high-X end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LaneLayout {
    pub player_castle_x: f32,
    pub ai_castle_x: f32,
    pub lane_y: f32,
}

impl LaneLayout {
    /// X coordinate a marching unit of `faction` may not advance past.
    pub fn stop_x(&self, faction: crate::components::Faction) -> f32 {
        match faction {
            crate::components::Faction::Player => self.ai_castle_x - CASTLE_STOP_OFFSET,
            crate::components::Faction::Ai => self.player_castle_x + CASTLE_STOP_OFFSET,
            crate::components::Faction::Neutral => 0.0,
        }
    }
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            player_castle_x: 0.0,
            ai_castle_x: 1600.0,
            lane_y: 0.0,
        }
    }
}
