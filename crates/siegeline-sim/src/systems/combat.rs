use siegeline_core::components::{AnimAction, EntityKind, Faction, Role};
use siegeline_core::config;
use siegeline_core::entity::EntityId;
use siegeline_core::events::{CastleDamagedEvent, SimEvent};

use crate::world::World;

struct Strike {
    attacker: usize,
    target: EntityId,
    amount: f32,
}

/// Resolve attacks: every combat-capable, non-support entity with a live
/// target and an expired cooldown deals damage × buff power, then resets
/// its cooldown to the attack rate. Target health is clamped to [0, max];
/// the death system picks up whatever hits zero.
pub fn run(world: &mut World) {
    let tick = world.time.tick;
    let now = world.time.elapsed_ms;
    let mut strikes: Vec<Strike> = Vec::new();

    for idx in world.alive_entities() {
        let combat = match world.combats[idx] {
            Some(c) => c,
            None => continue,
        };
        if combat.cooldown > 0.0 {
            continue;
        }
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        if world.roles[idx] == Some(Role::Support) {
            continue;
        }
        if world.statuses[idx].is_some_and(|s| s.stunned()) {
            continue;
        }
        let target = match world.targets[idx] {
            Some(t) => t,
            None => continue,
        };
        let tid = match target.entity {
            Some(id) => id,
            None => continue,
        };
        // Re-validate: the target may have died earlier this same tick.
        if !world.is_alive(tid) || world.health_of(tid) <= 0.0 {
            continue;
        }

        let buff_power = world.statuses[idx].map_or(1.0, |s| s.buff_power);
        strikes.push(Strike {
            attacker: idx,
            target: tid,
            amount: combat.damage * buff_power,
        });
    }

    for strike in strikes {
        if let Some(ref mut combat) = world.combats[strike.attacker] {
            combat.cooldown = combat.attack_rate;
            let lock = config::ATTACK_ANIM_LOCK_MS.min(combat.attack_rate as f64);
            if let Some(ref mut anim) = world.animations[strike.attacker] {
                anim.current_action = AnimAction::Attack;
                anim.locked = true;
                anim.lock_until = now + lock;
            }
        }

        let tidx = strike.target.index as usize;
        if !world.is_alive(strike.target) {
            continue;
        }
        let remaining = match world.healths[tidx] {
            Some(ref mut health) => {
                health.current = (health.current - strike.amount).clamp(0.0, health.max);
                health.current
            }
            None => continue,
        };

        if world.is_kind(tidx, EntityKind::CASTLE) {
            let faction = world.factions[tidx].unwrap_or(Faction::Neutral);
            world.push_event(SimEvent::CastleDamaged(CastleDamagedEvent {
                castle: strike.target,
                faction,
                damage: strike.amount,
                remaining_health: remaining,
                tick,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{self, UnitSpec};
    use crate::systems::targeting;
    use siegeline_core::components::Faction;
    use siegeline_core::config::LaneLayout;

    fn test_world() -> World {
        World::new(42, 50.0, LaneLayout::default())
    }

    fn swordsman() -> UnitSpec {
        UnitSpec {
            type_index: 4,
            size: 1.0,
            color: 0xaa2222,
            role: Role::Frontline,
            max_health: 100.0,
            damage: 15.0,
            range: 40.0,
            attack_rate: 600.0,
            heal_amount: 0.0,
            speed: 30.0,
            collision_radius: 10.0,
            presence: 1.0,
        }
    }

    #[test]
    fn ready_attacker_deals_damage_and_resets_cooldown() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Player, 100.0, 0.0).unwrap();
        let victim =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Ai, 130.0, 0.0).unwrap();

        targeting::run(&mut world);
        run(&mut world);

        assert_eq!(world.healths[victim.index as usize].unwrap().current, 85.0);
        assert_eq!(
            world.combats[attacker.index as usize].unwrap().cooldown,
            600.0
        );
        let anim = world.animations[attacker.index as usize].unwrap();
        assert_eq!(anim.current_action, AnimAction::Attack);
        assert!(anim.locked);
    }

    #[test]
    fn cooldown_gates_attacks() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Player, 100.0, 0.0).unwrap();
        let victim =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Ai, 130.0, 0.0).unwrap();
        world.combats[attacker.index as usize]
            .as_mut()
            .unwrap()
            .cooldown = 100.0;

        targeting::run(&mut world);
        run(&mut world);
        assert_eq!(world.healths[victim.index as usize].unwrap().current, 100.0);
    }

    #[test]
    fn buff_scales_damage() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Player, 100.0, 0.0).unwrap();
        let victim =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Ai, 130.0, 0.0).unwrap();
        let status = world.statuses[attacker.index as usize].as_mut().unwrap();
        status.buff_timer = 1000.0;
        status.buff_power = 2.0;

        targeting::run(&mut world);
        run(&mut world);
        assert_eq!(world.healths[victim.index as usize].unwrap().current, 70.0);
    }

    #[test]
    fn stunned_attacker_does_not_act() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Player, 100.0, 0.0).unwrap();
        let victim =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Ai, 130.0, 0.0).unwrap();

        targeting::run(&mut world);
        world.statuses[attacker.index as usize]
            .as_mut()
            .unwrap()
            .stun_timer = 500.0;
        run(&mut world);
        assert_eq!(world.healths[victim.index as usize].unwrap().current, 100.0);
    }

    #[test]
    fn health_never_goes_negative() {
        let mut world = test_world();
        let mut heavy = swordsman();
        heavy.damage = 500.0;
        let _attacker =
            factory::spawn_unit(&mut world, &heavy, Faction::Player, 100.0, 0.0).unwrap();
        let victim =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Ai, 130.0, 0.0).unwrap();

        targeting::run(&mut world);
        run(&mut world);
        assert_eq!(world.healths[victim.index as usize].unwrap().current, 0.0);
    }

    #[test]
    fn castle_damage_emits_event() {
        let mut world = test_world();
        let _attacker =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Player, 1570.0, 0.0).unwrap();
        let castle =
            factory::spawn_castle(&mut world, Faction::Ai, 1600.0, 0.0, 2000.0).unwrap();

        targeting::run(&mut world);
        run(&mut world);

        assert_eq!(world.healths[castle.index as usize].unwrap().current, 1985.0);
        assert!(matches!(
            world.events().first(),
            Some(SimEvent::CastleDamaged(e)) if e.castle == castle
        ));
    }

    #[test]
    fn target_killed_earlier_in_tick_is_not_struck_again() {
        let mut world = test_world();
        let attacker =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Player, 100.0, 0.0).unwrap();
        let victim =
            factory::spawn_unit(&mut world, &swordsman(), Faction::Ai, 130.0, 0.0).unwrap();
        targeting::run(&mut world);
        world.healths[victim.index as usize].as_mut().unwrap().current = 0.0;

        run(&mut world);
        // No cooldown spent on a corpse.
        assert_eq!(world.combats[attacker.index as usize].unwrap().cooldown, 0.0);
    }
}
