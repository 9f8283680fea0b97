use serde::{Deserialize, Serialize};

use siegeline_core::components::EntityKind;

use crate::world::World;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub extra: Option<EntityExtra>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityExtra {
    Unit {
        faction: String,
        role: String,
        type_index: u32,
        health: f32,
        max_health: f32,
        stunned: bool,
        dying: bool,
    },
    Castle {
        faction: String,
        health: f32,
        max_health: f32,
    },
    Turret {
        faction: String,
        health: f32,
        max_health: f32,
    },
    ControlPoint {
        owner: String,
        progress: f32,
    },
}

/// Full visible state at one tick. Serialized for host display sync and
/// byte-compared by the determinism tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub phase: String,
    pub zone_owner: String,
    pub entities: Vec<EntitySnapshot>,
}

/// Build a snapshot from the live tables. Entities appear in ascending
/// index order so two identical worlds serialize identically.
pub fn build(world: &World, phase: &str) -> StateSnapshot {
    let mut entities = Vec::new();

    for idx in world.alive_entities() {
        let kind = match world.kinds[idx] {
            Some(k) => k,
            None => continue,
        };
        let pos = match world.positions[idx] {
            Some(p) => p,
            None => continue,
        };

        let faction_str = |idx: usize| {
            world.factions[idx]
                .map(|f| f.as_str().to_string())
                .unwrap_or_else(|| "Neutral".to_string())
        };

        let extra = if kind.intersects(EntityKind::UNIT) {
            let health = health_pair(&world.healths[idx]);
            Some(EntityExtra::Unit {
                faction: faction_str(idx),
                role: world.roles[idx].map_or("", |r| r.as_str()).to_string(),
                type_index: world.unit_configs[idx].map_or(0, |c| c.type_index),
                health: health.0,
                max_health: health.1,
                stunned: world.statuses[idx].is_some_and(|s| s.stunned()),
                dying: world.deaths[idx].is_some_and(|d| d.started),
            })
        } else if kind.intersects(EntityKind::CASTLE) {
            let health = health_pair(&world.healths[idx]);
            Some(EntityExtra::Castle {
                faction: faction_str(idx),
                health: health.0,
                max_health: health.1,
            })
        } else if kind.intersects(EntityKind::TURRET) {
            let health = health_pair(&world.healths[idx]);
            Some(EntityExtra::Turret {
                faction: faction_str(idx),
                health: health.0,
                max_health: health.1,
            })
        } else if kind.intersects(EntityKind::CONTROL_POINT) {
            Some(EntityExtra::ControlPoint {
                owner: faction_str(idx),
                progress: world.capture_points[idx].map_or(0.0, |cp| cp.progress),
            })
        } else {
            None
        };

        entities.push(EntitySnapshot {
            id: idx as u32,
            kind: kind.as_str().to_string(),
            x: pos.x,
            y: pos.y,
            extra,
        });
    }

    StateSnapshot {
        tick: world.time.tick,
        phase: phase.to_string(),
        zone_owner: world.zone_owner.as_str().to_string(),
        entities,
    }
}

fn health_pair(health: &Option<siegeline_core::components::Health>) -> (f32, f32) {
    health.map_or((0.0, 0.0), |h| (h.current, h.max))
}
