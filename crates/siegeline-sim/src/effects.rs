//! Sanctioned external mutation paths. Ability and attack resolution in the
//! host calls these between ticks, outside the normal system order; the
//! effect lands immediately. Every function is a quiet no-op on a dead or
//! unknown entity and returns whether anything was applied.

use siegeline_core::entity::EntityId;

use crate::world::World;

/// Direct damage, clamped so health never leaves [0, max]. Negative
/// amounts are ignored rather than smuggling in a heal.
pub fn apply_damage(world: &mut World, id: EntityId, amount: f32) -> bool {
    if !world.is_alive(id) || !(amount > 0.0) {
        return false;
    }
    match world.healths[id.index as usize] {
        Some(ref mut health) => {
            health.current = (health.current - amount).clamp(0.0, health.max);
            true
        }
        None => false,
    }
}

/// Direct heal, clamped to max. Negative amounts are ignored.
pub fn apply_heal(world: &mut World, id: EntityId, amount: f32) -> bool {
    if !world.is_alive(id) || !(amount > 0.0) {
        return false;
    }
    match world.healths[id.index as usize] {
        Some(ref mut health) => {
            health.current = (health.current + amount).clamp(0.0, health.max);
            true
        }
        None => false,
    }
}

/// Stun for a duration. Overlapping stuns keep the longer remainder.
pub fn apply_stun(world: &mut World, id: EntityId, duration_ms: f32) -> bool {
    if !world.is_alive(id) || !(duration_ms > 0.0) {
        return false;
    }
    match world.statuses[id.index as usize] {
        Some(ref mut status) => {
            status.stun_timer = status.stun_timer.max(duration_ms);
            true
        }
        None => false,
    }
}

/// Slow movement to `power` (0..1) of base speed for a duration. A stronger
/// slow overrides a weaker one; the timer keeps the longer remainder.
pub fn apply_slow(world: &mut World, id: EntityId, duration_ms: f32, power: f32) -> bool {
    if !world.is_alive(id) || !(duration_ms > 0.0) {
        return false;
    }
    match world.statuses[id.index as usize] {
        Some(ref mut status) => {
            status.slow_timer = status.slow_timer.max(duration_ms);
            status.slow_power = status.slow_power.min(power.clamp(0.0, 1.0));
            true
        }
        None => false,
    }
}

/// Buff damage and healing to `power` (>= 1) for a duration. A stronger
/// buff overrides a weaker one; the timer keeps the longer remainder.
pub fn apply_buff(world: &mut World, id: EntityId, duration_ms: f32, power: f32) -> bool {
    if !world.is_alive(id) || !(duration_ms > 0.0) {
        return false;
    }
    match world.statuses[id.index as usize] {
        Some(ref mut status) => {
            status.buff_timer = status.buff_timer.max(duration_ms);
            status.buff_power = status.buff_power.max(power.max(1.0));
            true
        }
        None => false,
    }
}
