use siegeline_core::components::EntityKind;
use siegeline_core::config;
use siegeline_core::entity::EntityId;

use crate::spatial::SpatialHash;
use crate::world::World;

/// Lane blocking: for each alive unit, find the nearest enemy ahead in its
/// march direction whose collision radius overlaps its own. Allies never
/// block, and pass-through/ghost entities neither block nor are blocked.
pub fn run(world: &mut World) {
    let alive = world.alive_entities();

    let mut hash = SpatialHash::new(config::SPATIAL_CELL_WIDTH);
    for &idx in &alive {
        if !world.is_kind(idx, EntityKind::UNIT) {
            continue;
        }
        let pos = match world.positions[idx] {
            Some(p) => p,
            None => continue,
        };
        let col = match world.collisions[idx] {
            Some(c) => c,
            None => continue,
        };
        if col.pass_through || col.ghost {
            continue;
        }
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        hash.insert(idx, pos.x);
    }

    let mut resolved: Vec<(usize, Option<EntityId>)> = Vec::new();

    for &idx in &alive {
        if !world.is_kind(idx, EntityKind::UNIT) {
            continue;
        }
        let col = match world.collisions[idx] {
            Some(c) => c,
            None => continue,
        };
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        if col.pass_through || col.ghost {
            resolved.push((idx, None));
            continue;
        }
        let pos = match world.positions[idx] {
            Some(p) => p,
            None => continue,
        };
        let faction = match world.factions[idx] {
            Some(f) => f,
            None => continue,
        };
        let dir = faction.march_direction();
        if dir == 0.0 {
            resolved.push((idx, None));
            continue;
        }

        // One cell width past the combined radii covers any blocker radius.
        let scan = col.radius + config::SPATIAL_CELL_WIDTH;
        let mut best: Option<(usize, f32)> = None;
        for cand in hash.query_radius(pos.x, scan) {
            if cand == idx {
                continue;
            }
            let cand_faction = match world.factions[cand] {
                Some(f) => f,
                None => continue,
            };
            if cand_faction != faction.opposing() {
                continue;
            }
            let cand_pos = match world.positions[cand] {
                Some(p) => p,
                None => continue,
            };
            let gap = cand_pos.x - pos.x;
            // Only entities ahead in the travel direction obstruct.
            if gap * dir <= 0.0 {
                continue;
            }
            let cand_radius = match world.collisions[cand] {
                Some(c) => c.radius,
                None => continue,
            };
            if gap.abs() > col.radius + cand_radius {
                continue;
            }
            if best.is_none_or(|(_, g)| gap.abs() < g) {
                best = Some((cand, gap.abs()));
            }
        }

        resolved.push((idx, best.and_then(|(cand, _)| world.entity_at(cand))));
    }

    for (idx, blocker) in resolved {
        if let Some(ref mut col) = world.collisions[idx] {
            col.blocked_by = blocker;
        }
    }
}
