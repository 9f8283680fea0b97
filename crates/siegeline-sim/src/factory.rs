//! Archetype factories. Each constructor attaches the full component set for
//! its archetype and writes the documented defaults: cooldown 0, status
//! timers 0 with powers 1, target cleared, death cleared, render store
//! index 0.

use glam::Vec2;

use siegeline_core::components::*;
use siegeline_core::config;
use siegeline_core::entity::EntityId;
use siegeline_core::error::SimError;

use crate::world::World;

/// Design-time description of a unit archetype, resolved by the host from
/// its catalog before spawning.
#[derive(Debug, Clone, Copy)]
pub struct UnitSpec {
    pub type_index: u32,
    pub size: f32,
    pub color: u32,
    pub role: Role,
    pub max_health: f32,
    pub damage: f32,
    pub range: f32,
    /// Milliseconds between attacks or heals.
    pub attack_rate: f32,
    pub heal_amount: f32,
    /// March speed in units/second.
    pub speed: f32,
    pub collision_radius: f32,
    pub presence: f32,
}

impl UnitSpec {
    fn validate(&self) -> Result<(), SimError> {
        if !(self.max_health > 0.0) {
            return Err(SimError::InvalidArchetype(format!(
                "unit type {} has non-positive max health {}",
                self.type_index, self.max_health
            )));
        }
        if !(self.attack_rate > 0.0) {
            return Err(SimError::InvalidArchetype(format!(
                "unit type {} has non-positive attack rate {}",
                self.type_index, self.attack_rate
            )));
        }
        if self.range < 0.0 || self.speed < 0.0 || self.collision_radius <= 0.0 {
            return Err(SimError::InvalidArchetype(format!(
                "unit type {} has malformed geometry (range {}, speed {}, radius {})",
                self.type_index, self.range, self.speed, self.collision_radius
            )));
        }
        if self.role == Role::Support && !(self.heal_amount > 0.0) {
            return Err(SimError::InvalidArchetype(format!(
                "support unit type {} cannot heal for {}",
                self.type_index, self.heal_amount
            )));
        }
        Ok(())
    }
}

/// Spawn a unit for a faction. Reuses a pooled entity index when one is
/// free; every component row is rewritten so nothing leaks from the previous
/// occupant.
pub fn spawn_unit(
    world: &mut World,
    spec: &UnitSpec,
    faction: Faction,
    x: f32,
    y: f32,
) -> Result<EntityId, SimError> {
    spec.validate()?;

    let id = world.spawn();
    let idx = id.index as usize;

    world.positions[idx] = Some(Position { x, y });
    world.velocities[idx] = Some(Velocity {
        base_speed: spec.speed,
        vx: 0.0,
        vy: 0.0,
    });
    world.healths[idx] = Some(Health::full(spec.max_health));
    world.combats[idx] = Some(Combat {
        damage: spec.damage,
        range: spec.range,
        attack_rate: spec.attack_rate,
        cooldown: 0.0,
        heal_amount: spec.heal_amount,
        ignore_faction: false,
    });
    world.statuses[idx] = Some(StatusEffects::neutral());
    world.factions[idx] = Some(faction);
    world.roles[idx] = Some(spec.role);
    world.targets[idx] = Some(Target::cleared());
    world.collisions[idx] = Some(Collision::solid(spec.collision_radius));
    world.presences[idx] = Some(Presence {
        base_value: spec.presence,
        multiplier: config::role_presence_multiplier(spec.role),
    });
    world.unit_configs[idx] = Some(UnitConfig {
        type_index: spec.type_index,
        size: spec.size,
        color: spec.color,
    });
    world.deaths[idx] = Some(Death::none());
    world.animations[idx] = Some(Animation::idle());
    world.renders[idx] = Some(Render::unattached());
    world.kinds[idx] = Some(EntityKind::UNIT);

    Ok(id)
}

/// Spawn a castle. Castles never move and never attack; losing one ends the
/// game.
pub fn spawn_castle(
    world: &mut World,
    faction: Faction,
    x: f32,
    y: f32,
    max_health: f32,
) -> Result<EntityId, SimError> {
    if !(max_health > 0.0) {
        return Err(SimError::InvalidArchetype(format!(
            "castle has non-positive max health {max_health}"
        )));
    }

    let id = world.spawn();
    let idx = id.index as usize;
    world.positions[idx] = Some(Position { x, y });
    world.healths[idx] = Some(Health::full(max_health));
    world.factions[idx] = Some(faction);
    world.renders[idx] = Some(Render::unattached());
    world.kinds[idx] = Some(EntityKind::CASTLE);
    Ok(id)
}

/// Spawn a turret. Turrets hold position, target units only, and can be
/// stunned like any combatant.
pub fn spawn_turret(
    world: &mut World,
    faction: Faction,
    x: f32,
    y: f32,
    max_health: f32,
    damage: f32,
    range: f32,
    attack_rate: f32,
) -> Result<EntityId, SimError> {
    if !(max_health > 0.0) || !(attack_rate > 0.0) || range < 0.0 {
        return Err(SimError::InvalidArchetype(format!(
            "turret has malformed stats (health {max_health}, rate {attack_rate}, range {range})"
        )));
    }

    let id = world.spawn();
    let idx = id.index as usize;
    world.positions[idx] = Some(Position { x, y });
    world.healths[idx] = Some(Health::full(max_health));
    world.combats[idx] = Some(Combat {
        damage,
        range,
        attack_rate,
        cooldown: 0.0,
        heal_amount: 0.0,
        ignore_faction: false,
    });
    world.statuses[idx] = Some(StatusEffects::neutral());
    world.factions[idx] = Some(faction);
    world.targets[idx] = Some(Target::cleared());
    world.animations[idx] = Some(Animation::idle());
    world.renders[idx] = Some(Render::unattached());
    world.kinds[idx] = Some(EntityKind::TURRET);
    Ok(id)
}

/// Spawn a control point with a rectangular capture zone centered on (x, y).
/// Its Faction row holds the current owner and is the only faction value
/// the simulation ever mutates.
pub fn spawn_control_point(
    world: &mut World,
    x: f32,
    y: f32,
    half_width: f32,
    half_height: f32,
) -> Result<EntityId, SimError> {
    if half_width <= 0.0 || half_height <= 0.0 {
        return Err(SimError::InvalidArchetype(format!(
            "control point zone has non-positive extents ({half_width}, {half_height})"
        )));
    }

    let id = world.spawn();
    let idx = id.index as usize;
    world.positions[idx] = Some(Position { x, y });
    world.factions[idx] = Some(Faction::Neutral);
    world.capture_points[idx] = Some(CapturePoint::new(Vec2::new(half_width, half_height)));
    world.renders[idx] = Some(Render::unattached());
    world.kinds[idx] = Some(EntityKind::CONTROL_POINT);
    Ok(id)
}
