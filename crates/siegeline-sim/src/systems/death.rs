use siegeline_core::components::{AnimAction, EntityKind, Faction, Target};
use siegeline_core::config;
use siegeline_core::events::{GameOverEvent, SimEvent, UnitDiedEvent};

use crate::world::World;

/// Latch deaths. A unit whose health reaches zero starts its death state
/// exactly once: the grace deadline is computed, the death animation is
/// locked in, and a UnitDied event fires. Removal itself is the cleanup
/// system's job. A castle at zero health ends the game.
pub fn run(world: &mut World) {
    let now = world.time.elapsed_ms;
    let tick = world.time.tick;

    for idx in world.alive_entities() {
        let dead = world.healths[idx].is_some_and(|h| h.current <= 0.0);
        if !dead {
            continue;
        }

        if world.is_kind(idx, EntityKind::CASTLE) {
            let faction = world.factions[idx].unwrap_or(Faction::Neutral);
            world.push_event(SimEvent::GameOver(GameOverEvent {
                winner: faction.opposing(),
                tick,
            }));
            continue;
        }

        if !world.is_kind(idx, EntityKind::UNIT) {
            continue;
        }
        let already_started = match world.deaths[idx] {
            Some(d) => d.started,
            None => continue,
        };
        if already_started {
            continue;
        }

        if let Some(ref mut death) = world.deaths[idx] {
            death.started = true;
            death.anim_done = false;
            death.cleanup_at = now + config::DEATH_GRACE_MS;
        }
        // A corpse neither fights nor blocks anything downstream.
        if let Some(ref mut target) = world.targets[idx] {
            *target = Target::cleared();
        }
        if let Some(ref mut col) = world.collisions[idx] {
            col.blocked_by = None;
        }
        if let Some(ref mut anim) = world.animations[idx] {
            anim.current_action = AnimAction::Death;
            anim.locked = true;
            anim.lock_until = now + config::DEATH_GRACE_MS;
        }

        let faction = world.factions[idx].unwrap_or(Faction::Neutral);
        let (x, y) = world.positions[idx].map_or((0.0, 0.0), |p| (p.x, p.y));
        if let Some(entity) = world.entity_at(idx) {
            world.push_event(SimEvent::UnitDied(UnitDiedEvent {
                entity,
                faction,
                x,
                y,
                tick,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{self, UnitSpec};
    use siegeline_core::components::Role;
    use siegeline_core::config::LaneLayout;

    fn test_world() -> World {
        World::new(42, 50.0, LaneLayout::default())
    }

    fn pawn() -> UnitSpec {
        UnitSpec {
            type_index: 8,
            size: 1.0,
            color: 0x997700,
            role: Role::Frontline,
            max_health: 50.0,
            damage: 5.0,
            range: 20.0,
            attack_rate: 800.0,
            heal_amount: 0.0,
            speed: 30.0,
            collision_radius: 10.0,
            presence: 1.0,
        }
    }

    #[test]
    fn zero_health_starts_death_exactly_once() {
        let mut world = test_world();
        world.time.elapsed_ms = 1000.0;
        let id = factory::spawn_unit(&mut world, &pawn(), Faction::Player, 100.0, 0.0).unwrap();
        let idx = id.index as usize;
        world.healths[idx].as_mut().unwrap().current = 0.0;

        run(&mut world);
        let death = world.deaths[idx].unwrap();
        assert!(death.started);
        assert_eq!(death.cleanup_at, 1000.0 + config::DEATH_GRACE_MS);
        assert_eq!(
            world.animations[idx].unwrap().current_action,
            AnimAction::Death
        );
        assert_eq!(world.drain_events().len(), 1);

        // Repeat runs must not restart the grace window or re-emit.
        world.time.elapsed_ms = 2000.0;
        run(&mut world);
        let death = world.deaths[idx].unwrap();
        assert_eq!(death.cleanup_at, 1000.0 + config::DEATH_GRACE_MS);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn living_units_are_untouched() {
        let mut world = test_world();
        let id = factory::spawn_unit(&mut world, &pawn(), Faction::Player, 100.0, 0.0).unwrap();
        run(&mut world);
        assert!(!world.deaths[id.index as usize].unwrap().started);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn dying_clears_target_and_blocker() {
        let mut world = test_world();
        let id = factory::spawn_unit(&mut world, &pawn(), Faction::Player, 100.0, 0.0).unwrap();
        let other = factory::spawn_unit(&mut world, &pawn(), Faction::Ai, 120.0, 0.0).unwrap();
        let idx = id.index as usize;
        world.targets[idx] = Some(Target {
            entity: Some(other),
            distance: 20.0,
        });
        world.collisions[idx].as_mut().unwrap().blocked_by = Some(other);
        world.healths[idx].as_mut().unwrap().current = 0.0;

        run(&mut world);
        assert!(world.targets[idx].unwrap().entity.is_none());
        assert!(world.collisions[idx].unwrap().blocked_by.is_none());
    }

    #[test]
    fn destroyed_castle_ends_the_game() {
        let mut world = test_world();
        let castle = factory::spawn_castle(&mut world, Faction::Ai, 1600.0, 0.0, 500.0).unwrap();
        world.healths[castle.index as usize].as_mut().unwrap().current = 0.0;

        run(&mut world);
        assert!(matches!(
            world.events().first(),
            Some(SimEvent::GameOver(e)) if e.winner == Faction::Player
        ));
    }
}
