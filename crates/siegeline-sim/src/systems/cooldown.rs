use crate::world::World;

/// Count attack/heal cooldowns down to zero. An entity may act when its
/// cooldown reaches 0; the acting system resets it to the attack rate.
pub fn run(world: &mut World) {
    let dt = world.time.dt_ms();

    for idx in world.alive_entities() {
        if let Some(ref mut combat) = world.combats[idx] {
            if combat.cooldown > 0.0 {
                combat.cooldown = (combat.cooldown - dt).max(0.0);
            }
        }
    }
}
