use siegeline_core::components::{AnimAction, EntityKind, Role};
use siegeline_core::config;

use crate::systems::movement;
use crate::world::World;

struct Heal {
    healer: usize,
    target: usize,
    amount: f32,
}

/// Support behavior: pick the ally in range with the greatest missing
/// health (first-found on ties) and heal it on cooldown; with nobody to
/// heal, march like any other unit.
pub fn run(world: &mut World) {
    let dt = world.time.dt_secs();
    let now = world.time.elapsed_ms;
    let alive = world.alive_entities();

    let mut heals: Vec<Heal> = Vec::new();
    let mut movers: Vec<usize> = Vec::new();

    for &idx in &alive {
        if !world.is_kind(idx, EntityKind::UNIT) {
            continue;
        }
        if world.roles[idx] != Some(Role::Support) {
            continue;
        }
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        if world.statuses[idx].is_some_and(|s| s.stunned()) {
            continue;
        }
        let combat = match world.combats[idx] {
            Some(c) => c,
            None => continue,
        };
        let pos = match world.positions[idx] {
            Some(p) => p,
            None => continue,
        };
        let faction = match world.factions[idx] {
            Some(f) => f,
            None => continue,
        };

        // Ally with the greatest missing health within range.
        let mut best: Option<(usize, f32)> = None;
        for &cand in &alive {
            if cand == idx || !world.is_kind(cand, EntityKind::UNIT) {
                continue;
            }
            if world.factions[cand] != Some(faction) {
                continue;
            }
            let health = match world.healths[cand] {
                Some(h) => h,
                None => continue,
            };
            if health.current <= 0.0 {
                continue;
            }
            let missing = health.missing();
            if missing <= 0.0 {
                continue;
            }
            let cand_pos = match world.positions[cand] {
                Some(p) => p,
                None => continue,
            };
            let dx = cand_pos.x - pos.x;
            let dy = cand_pos.y - pos.y;
            if (dx * dx + dy * dy).sqrt() > combat.range {
                continue;
            }
            // Strict greater-than keeps the first ally found on ties.
            if best.is_none_or(|(_, m)| missing > m) {
                best = Some((cand, missing));
            }
        }

        match best {
            Some((target, _)) if combat.cooldown <= 0.0 => {
                let buff_power = world.statuses[idx].map_or(1.0, |s| s.buff_power);
                heals.push(Heal {
                    healer: idx,
                    target,
                    amount: combat.heal_amount * buff_power,
                });
            }
            Some(_) => {
                // Hold position while the cooldown runs.
                movement::set_action(world, idx, AnimAction::Idle);
            }
            None => movers.push(idx),
        }
    }

    for heal in heals {
        if let Some(ref mut health) = world.healths[heal.target] {
            health.current = (health.current + heal.amount).min(health.max);
        }
        if let Some(ref mut combat) = world.combats[heal.healer] {
            combat.cooldown = combat.attack_rate;
            let lock = config::ATTACK_ANIM_LOCK_MS.min(combat.attack_rate as f64);
            if let Some(ref mut anim) = world.animations[heal.healer] {
                anim.current_action = AnimAction::Cast;
                anim.locked = true;
                anim.lock_until = now + lock;
            }
        }
    }

    // Nobody to heal: behave like a mover, same rules as the movement system.
    for idx in movers {
        if world.collisions[idx].is_some_and(|c| c.blocked_by.is_some()) {
            movement::set_action(world, idx, AnimAction::Idle);
            continue;
        }
        let moved = movement::march(world, idx, dt);
        movement::set_action(
            world,
            idx,
            if moved { AnimAction::Walk } else { AnimAction::Idle },
        );
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

    fn medic() -> UnitSpec {
        UnitSpec {
            type_index: 5,
            size: 1.0,
            color: 0xeeeeee,
            role: Role::Support,
            max_health: 70.0,
            damage: 0.0,
            range: 120.0,
            attack_rate: 900.0,
            heal_amount: 20.0,
            speed: 35.0,
            collision_radius: 9.0,
            presence: 1.0,
        }
    }

    fn grunt() -> UnitSpec {
        UnitSpec {
            type_index: 6,
            size: 1.0,
            color: 0x222299,
            role: Role::Frontline,
            max_health: 100.0,
            damage: 10.0,
            range: 25.0,
            attack_rate: 800.0,
            heal_amount: 0.0,
            speed: 30.0,
            collision_radius: 10.0,
            presence: 1.0,
        }
    }

    #[test]
    fn heals_the_most_wounded_ally_and_clamps_to_max() {
        let mut world = test_world();
        let healer = factory::spawn_unit(&mut world, &medic(), Faction::Player, 100.0, 0.0).unwrap();
        let scratched =
            factory::spawn_unit(&mut world, &grunt(), Faction::Player, 140.0, 0.0).unwrap();
        let mauled =
            factory::spawn_unit(&mut world, &grunt(), Faction::Player, 160.0, 0.0).unwrap();
        world.healths[scratched.index as usize].as_mut().unwrap().current = 95.0;
        world.healths[mauled.index as usize].as_mut().unwrap().current = 40.0;

        run(&mut world);

        assert_eq!(world.healths[mauled.index as usize].unwrap().current, 60.0);
        assert_eq!(world.healths[scratched.index as usize].unwrap().current, 95.0);
        assert_eq!(world.combats[healer.index as usize].unwrap().cooldown, 900.0);
        assert_eq!(world.positions[healer.index as usize].unwrap().x, 100.0);

        // Heal the same ally up to max but never past it.
        world.combats[healer.index as usize].as_mut().unwrap().cooldown = 0.0;
        world.healths[mauled.index as usize].as_mut().unwrap().current = 95.0;
        world.healths[scratched.index as usize].as_mut().unwrap().current = 100.0;
        run(&mut world);
        assert_eq!(world.healths[mauled.index as usize].unwrap().current, 100.0);
    }

    #[test]
    fn wounded_enemy_is_not_a_heal_target() {
        let mut world = test_world();
        let healer =
            factory::spawn_unit(&mut world, &medic(), Faction::Player, 100.0, 0.0).unwrap();
        let enemy = factory::spawn_unit(&mut world, &grunt(), Faction::Ai, 140.0, 0.0).unwrap();
        world.healths[enemy.index as usize].as_mut().unwrap().current = 10.0;

        run(&mut world);
        assert_eq!(world.healths[enemy.index as usize].unwrap().current, 10.0);
        // With no ally to heal, the healer marched instead.
        assert!(world.positions[healer.index as usize].unwrap().x > 100.0);
    }

    #[test]
    fn full_health_allies_leave_healer_marching() {
        let mut world = test_world();
        let healer =
            factory::spawn_unit(&mut world, &medic(), Faction::Player, 100.0, 0.0).unwrap();
        let _healthy =
            factory::spawn_unit(&mut world, &grunt(), Faction::Player, 140.0, 0.0).unwrap();

        run(&mut world);
        let pos = world.positions[healer.index as usize].unwrap();
        assert!((pos.x - 101.75).abs() < 1e-3, "35 u/s over 50ms");
        assert_eq!(
            world.animations[healer.index as usize].unwrap().current_action,
            AnimAction::Walk
        );
    }

    #[test]
    fn out_of_range_ally_does_not_hold_the_healer() {
        let mut world = test_world();
        let healer =
            factory::spawn_unit(&mut world, &medic(), Faction::Player, 100.0, 0.0).unwrap();
        let wounded =
            factory::spawn_unit(&mut world, &grunt(), Faction::Player, 400.0, 0.0).unwrap();
        world.healths[wounded.index as usize].as_mut().unwrap().current = 30.0;

        run(&mut world);
        assert_eq!(world.healths[wounded.index as usize].unwrap().current, 30.0);
        assert!(world.positions[healer.index as usize].unwrap().x > 100.0);
    }

    #[test]
    fn cooldown_gates_heals_but_healer_still_holds() {
        let mut world = test_world();
        let healer =
            factory::spawn_unit(&mut world, &medic(), Faction::Player, 100.0, 0.0).unwrap();
        let wounded =
            factory::spawn_unit(&mut world, &grunt(), Faction::Player, 140.0, 0.0).unwrap();
        world.healths[wounded.index as usize].as_mut().unwrap().current = 50.0;
        world.combats[healer.index as usize].as_mut().unwrap().cooldown = 400.0;

        run(&mut world);
        assert_eq!(world.healths[wounded.index as usize].unwrap().current, 50.0);
        assert_eq!(world.positions[healer.index as usize].unwrap().x, 100.0);
    }

    #[test]
    fn stunned_healer_does_nothing() {
        let mut world = test_world();
        let healer =
            factory::spawn_unit(&mut world, &medic(), Faction::Player, 100.0, 0.0).unwrap();
        let wounded =
            factory::spawn_unit(&mut world, &grunt(), Faction::Player, 140.0, 0.0).unwrap();
        world.healths[wounded.index as usize].as_mut().unwrap().current = 50.0;
        world.statuses[healer.index as usize].as_mut().unwrap().stun_timer = 500.0;

        run(&mut world);
        assert_eq!(world.healths[wounded.index as usize].unwrap().current, 50.0);
        assert_eq!(world.positions[healer.index as usize].unwrap().x, 100.0);
    }
}
