use crate::world::World;

/// Count status timers down and clamp at zero. Slow and buff powers reset
/// to the neutral 1.0 exactly when their timer expires, never earlier.
pub fn run(world: &mut World) {
    let dt = world.time.dt_ms();

    for idx in world.alive_entities() {
        if let Some(ref mut status) = world.statuses[idx] {
            if status.stun_timer > 0.0 {
                status.stun_timer = (status.stun_timer - dt).max(0.0);
            }
            if status.slow_timer > 0.0 {
                status.slow_timer = (status.slow_timer - dt).max(0.0);
                if status.slow_timer == 0.0 {
                    status.slow_power = 1.0;
                }
            }
            if status.buff_timer > 0.0 {
                status.buff_timer = (status.buff_timer - dt).max(0.0);
                if status.buff_timer == 0.0 {
                    status.buff_power = 1.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siegeline_core::components::StatusEffects;
    use siegeline_core::config::LaneLayout;

    fn world_with_status(status: StatusEffects) -> (World, usize) {
        let mut world = World::new(1, 50.0, LaneLayout::default());
        let id = world.spawn();
        let idx = id.index as usize;
        world.statuses[idx] = Some(status);
        (world, idx)
    }

    #[test]
    fn timers_decrement_by_tick_delta() {
        let (mut world, idx) = world_with_status(StatusEffects {
            stun_timer: 120.0,
            ..StatusEffects::neutral()
        });
        run(&mut world);
        assert_eq!(world.statuses[idx].unwrap().stun_timer, 70.0);
    }

    #[test]
    fn slow_power_resets_exactly_at_expiry() {
        let (mut world, idx) = world_with_status(StatusEffects {
            slow_timer: 80.0,
            slow_power: 0.5,
            ..StatusEffects::neutral()
        });

        run(&mut world);
        let status = world.statuses[idx].unwrap();
        assert_eq!(status.slow_timer, 30.0);
        assert_eq!(status.slow_power, 0.5, "power holds while the timer runs");

        run(&mut world);
        let status = world.statuses[idx].unwrap();
        assert_eq!(status.slow_timer, 0.0);
        assert_eq!(status.slow_power, 1.0, "expired slow must never leave a stale power");
    }

    #[test]
    fn buff_power_resets_at_expiry() {
        let (mut world, idx) = world_with_status(StatusEffects {
            buff_timer: 40.0,
            buff_power: 1.5,
            ..StatusEffects::neutral()
        });
        run(&mut world);
        let status = world.statuses[idx].unwrap();
        assert_eq!(status.buff_timer, 0.0);
        assert_eq!(status.buff_power, 1.0);
    }

    #[test]
    fn expired_timers_stay_at_zero() {
        let (mut world, idx) = world_with_status(StatusEffects::neutral());
        run(&mut world);
        run(&mut world);
        let status = world.statuses[idx].unwrap();
        assert_eq!(status.stun_timer, 0.0);
        assert_eq!(status.slow_power, 1.0);
        assert_eq!(status.buff_power, 1.0);
    }
}
