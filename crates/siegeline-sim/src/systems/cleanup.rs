use siegeline_core::entity::EntityId;

use crate::world::{CleanupAction, World};

/// Remove entities whose death presentation is over: either the external
/// animation-finished flag is set or the grace deadline has passed,
/// whichever comes first. The caller's cleanup hook runs before each
/// removal and may answer Keep to defer it; removal then retries on later
/// ticks. Scanning is idempotent: a corpse inside its grace window
/// survives any number of passes untouched.
pub fn run(world: &mut World) {
    let now = world.time.elapsed_ms;

    let mut ready: Vec<EntityId> = Vec::new();
    for idx in world.alive_entities() {
        let death = match world.deaths[idx] {
            Some(d) => d,
            None => continue,
        };
        if !death.started {
            continue;
        }
        if death.anim_done || now >= death.cleanup_at {
            if let Some(id) = world.entity_at(idx) {
                ready.push(id);
            }
        }
    }
    if ready.is_empty() {
        return;
    }

    // Take the hook out so it can borrow the world id without aliasing.
    let mut hook = world.cleanup_hook.take();
    for id in ready {
        let action = match hook.as_mut() {
            Some(h) => h(id),
            None => CleanupAction::Remove,
        };
        match action {
            CleanupAction::Remove => world.despawn(id),
            CleanupAction::Keep => {}
        }
    }
    world.cleanup_hook = hook;
}
