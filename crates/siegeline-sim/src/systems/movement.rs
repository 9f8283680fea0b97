use siegeline_core::components::{AnimAction, EntityKind, Role};
use siegeline_core::config;

use crate::world::World;

/// Advance unblocked, untargeted, unstunned units toward the enemy castle
/// and integrate displacement impulses. Support units are moved by the
/// healing system instead, through the same march rule.
pub fn run(world: &mut World) {
    let dt = world.time.dt_secs();

    for idx in world.alive_entities() {
        if !world.is_kind(idx, EntityKind::UNIT) {
            continue;
        }
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }

        integrate_displacement(world, idx, dt);

        if world.roles[idx] == Some(Role::Support) {
            continue;
        }
        if world.statuses[idx].is_some_and(|s| s.stunned()) {
            continue;
        }
        // A resolved target means stand and fight.
        if world.targets[idx].is_some_and(|t| t.entity.is_some()) {
            set_action(world, idx, AnimAction::Idle);
            continue;
        }
        if world.collisions[idx].is_some_and(|c| c.blocked_by.is_some()) {
            set_action(world, idx, AnimAction::Idle);
            continue;
        }

        let moved = march(world, idx, dt);
        set_action(
            world,
            idx,
            if moved { AnimAction::Walk } else { AnimAction::Idle },
        );
    }
}

/// Knockback-style impulses move the unit and bleed off each tick.
fn integrate_displacement(world: &mut World, idx: usize, dt: f32) {
    let vel = match world.velocities[idx] {
        Some(v) => v,
        None => return,
    };
    if vel.vx == 0.0 && vel.vy == 0.0 {
        return;
    }

    if let Some(ref mut pos) = world.positions[idx] {
        pos.x += vel.vx * dt;
        pos.y += vel.vy * dt;
    }
    if let Some(ref mut vel) = world.velocities[idx] {
        vel.vx *= config::DISPLACEMENT_DECAY;
        vel.vy *= config::DISPLACEMENT_DECAY;
        if vel.vx.abs() < config::DISPLACEMENT_EPSILON {
            vel.vx = 0.0;
        }
        if vel.vy.abs() < config::DISPLACEMENT_EPSILON {
            vel.vy = 0.0;
        }
    }
}

/// March one step toward the enemy castle at base speed scaled by any
/// active slow, clamped so the unit stops at the castle offset and never
/// overshoots. Returns whether the unit actually moved. Shared with the
/// healing system for healers with nobody to heal.
pub(crate) fn march(world: &mut World, idx: usize, dt: f32) -> bool {
    let faction = match world.factions[idx] {
        Some(f) => f,
        None => return false,
    };
    let dir = faction.march_direction();
    if dir == 0.0 {
        return false;
    }
    let base_speed = match world.velocities[idx] {
        Some(v) => v.base_speed,
        None => return false,
    };
    let slow_power = world.statuses[idx].map_or(1.0, |s| s.slow_power);
    let stop_x = world.layout.stop_x(faction);

    let pos = match world.positions[idx] {
        Some(p) => p,
        None => return false,
    };
    let step = base_speed * slow_power * dt * dir;
    let next_x = if dir > 0.0 {
        (pos.x + step).min(stop_x)
    } else {
        (pos.x + step).max(stop_x)
    };

    if next_x == pos.x {
        return false;
    }
    if let Some(ref mut p) = world.positions[idx] {
        p.x = next_x;
    }
    true
}

/// Stamp the presentation action unless an animation lock is active.
pub(crate) fn set_action(world: &mut World, idx: usize, action: AnimAction) {
    let now = world.time.elapsed_ms;
    if let Some(ref mut anim) = world.animations[idx] {
        if anim.locked && now < anim.lock_until {
            return;
        }
        anim.locked = false;
        anim.current_action = action;
    }
}
