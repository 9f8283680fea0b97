use siegeline_core::components::{EntityKind, Role, Target};
use siegeline_core::config;
use siegeline_core::entity::EntityId;

use crate::spatial::SpatialHash;
use crate::world::World;

/// What a unit may attack. Castles are included so a unit that marches to
/// the stop line can batter the castle through the same resolution path.
const UNIT_TARGET_MASK: EntityKind =
    EntityKind(EntityKind::UNIT.0 | EntityKind::TURRET.0 | EntityKind::CASTLE.0);
/// Turrets only ever shoot units.
const TURRET_TARGET_MASK: EntityKind = EntityKind::UNIT;

const TARGETABLE_MASK: EntityKind = EntityKind(UNIT_TARGET_MASK.0);

/// Resolve every combat-capable, non-support entity's target: nearest
/// eligible candidate within Combat.range, first-found on distance ties.
/// No candidate clears the target to (none, +inf); stale targets are never
/// carried across ticks.
pub fn run(world: &mut World) {
    let alive = world.alive_entities();

    // Rebuild the candidate index from everything targetable this tick.
    let mut hash = SpatialHash::new(config::SPATIAL_CELL_WIDTH);
    for &idx in &alive {
        if !world.is_kind(idx, TARGETABLE_MASK) {
            continue;
        }
        let pos = match world.positions[idx] {
            Some(p) => p,
            None => continue,
        };
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        // Ghosts are untargetable while still otherwise simulated.
        if world.collisions[idx].is_some_and(|c| c.ghost) {
            continue;
        }
        hash.insert(idx, pos.x);
    }

    let mut resolved: Vec<(usize, Option<(EntityId, f32)>)> = Vec::new();

    for &idx in &alive {
        let combat = match world.combats[idx] {
            Some(c) => c,
            None => continue,
        };
        if world.targets[idx].is_none() {
            continue;
        }
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        // Support units heal instead of auto-attacking.
        if world.roles[idx] == Some(Role::Support) {
            continue;
        }
        // Stunned entities skip targeting this tick; combat revalidates
        // whatever target they were left with before acting on it.
        if world.statuses[idx].is_some_and(|s| s.stunned()) {
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
        let mask = if world.is_kind(idx, EntityKind::TURRET) {
            TURRET_TARGET_MASK
        } else {
            UNIT_TARGET_MASK
        };

        let mut best: Option<(usize, f32)> = None;
        for cand in hash.query_radius(pos.x, combat.range) {
            if cand == idx {
                continue;
            }
            if !world.is_kind(cand, mask) {
                continue;
            }
            let cand_faction = match world.factions[cand] {
                Some(f) => f,
                None => continue,
            };
            if combat.ignore_faction {
                if cand_faction == faction {
                    continue;
                }
            } else if cand_faction != faction.opposing() {
                continue;
            }
            let cand_pos = match world.positions[cand] {
                Some(p) => p,
                None => continue,
            };
            let dx = cand_pos.x - pos.x;
            let dy = cand_pos.y - pos.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > combat.range {
                continue;
            }
            // Strict less-than keeps the first candidate found at the
            // minimum distance.
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((cand, dist));
            }
        }

        let hit = best.and_then(|(cand, dist)| world.entity_at(cand).map(|id| (id, dist)));
        resolved.push((idx, hit));
    }

    for (idx, hit) in resolved {
        world.targets[idx] = Some(match hit {
            Some((entity, distance)) => Target {
                entity: Some(entity),
                distance,
            },
            None => Target::cleared(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{self, UnitSpec};
    use siegeline_core::components::Faction;
    use siegeline_core::config::LaneLayout;

    fn test_world() -> World {
        World::new(42, 50.0, LaneLayout::default())
    }

    fn ranged_spec(range: f32) -> UnitSpec {
        UnitSpec {
            type_index: 1,
            size: 1.0,
            color: 0x3366cc,
            role: Role::Damage,
            max_health: 80.0,
            damage: 12.0,
            range,
            attack_rate: 900.0,
            heal_amount: 0.0,
            speed: 35.0,
            collision_radius: 10.0,
            presence: 1.0,
        }
    }

    #[test]
    fn picks_nearest_enemy_in_range() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &ranged_spec(200.0), Faction::Player, 100.0, 0.0)
                .unwrap();
        let near =
            factory::spawn_unit(&mut world, &ranged_spec(200.0), Faction::Ai, 180.0, 0.0).unwrap();
        let _far =
            factory::spawn_unit(&mut world, &ranged_spec(200.0), Faction::Ai, 260.0, 0.0).unwrap();

        run(&mut world);

        let target = world.targets[attacker.index as usize].unwrap();
        assert_eq!(target.entity, Some(near));
        assert!((target.distance - 80.0).abs() < 1e-3);
    }

    #[test]
    fn never_targets_allies_or_out_of_range() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &ranged_spec(100.0), Faction::Player, 100.0, 0.0)
                .unwrap();
        let _ally =
            factory::spawn_unit(&mut world, &ranged_spec(100.0), Faction::Player, 120.0, 0.0)
                .unwrap();
        let _distant =
            factory::spawn_unit(&mut world, &ranged_spec(100.0), Faction::Ai, 400.0, 0.0).unwrap();

        run(&mut world);

        let target = world.targets[attacker.index as usize].unwrap();
        assert!(target.entity.is_none());
        assert_eq!(target.distance, f32::INFINITY);
    }

    #[test]
    fn dead_and_ghost_entities_are_ineligible() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &ranged_spec(300.0), Faction::Player, 100.0, 0.0)
                .unwrap();
        let dead =
            factory::spawn_unit(&mut world, &ranged_spec(300.0), Faction::Ai, 150.0, 0.0).unwrap();
        world.healths[dead.index as usize].as_mut().unwrap().current = 0.0;
        let ghost =
            factory::spawn_unit(&mut world, &ranged_spec(300.0), Faction::Ai, 200.0, 0.0).unwrap();
        world.collisions[ghost.index as usize].as_mut().unwrap().ghost = true;
        let solid =
            factory::spawn_unit(&mut world, &ranged_spec(300.0), Faction::Ai, 250.0, 0.0).unwrap();

        run(&mut world);

        let target = world.targets[attacker.index as usize].unwrap();
        assert_eq!(target.entity, Some(solid));
    }

    #[test]
    fn stale_target_is_cleared_next_tick() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &ranged_spec(150.0), Faction::Player, 100.0, 0.0)
                .unwrap();
        let victim =
            factory::spawn_unit(&mut world, &ranged_spec(150.0), Faction::Ai, 180.0, 0.0).unwrap();

        run(&mut world);
        assert_eq!(
            world.targets[attacker.index as usize].unwrap().entity,
            Some(victim)
        );

        world.despawn(victim);
        run(&mut world);
        assert!(world.targets[attacker.index as usize].unwrap().entity.is_none());
    }

    #[test]
    fn turret_targets_units_but_not_castles() {
        let mut world = test_world();
        let turret = factory::spawn_turret(
            &mut world,
            Faction::Player,
            100.0,
            0.0,
            300.0,
            8.0,
            250.0,
            600.0,
        )
        .unwrap();
        let _enemy_castle =
            factory::spawn_castle(&mut world, Faction::Ai, 150.0, 0.0, 1000.0).unwrap();

        run(&mut world);
        assert!(world.targets[turret.index as usize].unwrap().entity.is_none());

        let enemy =
            factory::spawn_unit(&mut world, &ranged_spec(100.0), Faction::Ai, 220.0, 0.0).unwrap();
        run(&mut world);
        assert_eq!(
            world.targets[turret.index as usize].unwrap().entity,
            Some(enemy)
        );
    }

    #[test]
    fn unit_targets_enemy_castle_in_range() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &ranged_spec(120.0), Faction::Player, 1500.0, 0.0)
                .unwrap();
        let castle =
            factory::spawn_castle(&mut world, Faction::Ai, 1600.0, 0.0, 2000.0).unwrap();

        run(&mut world);
        assert_eq!(
            world.targets[attacker.index as usize].unwrap().entity,
            Some(castle)
        );
    }

    #[test]
    fn support_units_never_acquire_targets() {
        let mut world = test_world();
        let mut spec = ranged_spec(200.0);
        spec.role = Role::Support;
        spec.heal_amount = 10.0;
        let healer =
            factory::spawn_unit(&mut world, &spec, Faction::Player, 100.0, 0.0).unwrap();
        let _enemy =
            factory::spawn_unit(&mut world, &ranged_spec(200.0), Faction::Ai, 150.0, 0.0).unwrap();

        run(&mut world);
        assert!(world.targets[healer.index as usize].unwrap().entity.is_none());
    }
}
