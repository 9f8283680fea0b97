use siegeline_core::components::{EntityKind, Faction};
use siegeline_core::config;
use siegeline_core::events::{PointOwnerChangedEvent, SimEvent, ZoneOwnerChangedEvent};

use crate::spatial::SpatialHash;
use crate::world::World;

/// Capture state machine. Every check interval each point sums the weighted
/// presence of alive units inside its zone per faction. Contested (or
/// empty) presence decays progress multiplicatively toward 0; an advantage
/// pushes progress toward that side, scaled by the advantage. Ownership
/// flips only at the ±threshold, which with the decay gives natural
/// hysteresis: a momentary presence swing cannot flip a held point.
pub fn run(world: &mut World) {
    let now = world.time.elapsed_ms;
    let tick = world.time.tick;
    let alive = world.alive_entities();

    let due: Vec<usize> = alive
        .iter()
        .copied()
        .filter(|&idx| {
            world.capture_points[idx].is_some_and(|cp| now >= cp.next_check_at)
                && world.positions[idx].is_some()
        })
        .collect();
    if due.is_empty() {
        return;
    }

    // Index alive units once for all due points.
    let mut hash = SpatialHash::new(config::SPATIAL_CELL_WIDTH);
    for &idx in &alive {
        if !world.is_kind(idx, EntityKind::UNIT) {
            continue;
        }
        if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
            continue;
        }
        if let Some(pos) = world.positions[idx] {
            hash.insert(idx, pos.x);
        }
    }

    for idx in due {
        let center = match world.positions[idx] {
            Some(p) => p,
            None => continue,
        };
        let mut cp = match world.capture_points[idx] {
            Some(cp) => cp,
            None => continue,
        };

        let mut player = 0.0f32;
        let mut ai = 0.0f32;
        for cand in hash.query_range(center.x - cp.half_extents.x, center.x + cp.half_extents.x) {
            let pos = match world.positions[cand] {
                Some(p) => p,
                None => continue,
            };
            if !cp.contains(center, pos) {
                continue;
            }
            let weight = match world.presences[cand] {
                Some(p) => p.weight(),
                None => continue,
            };
            match world.factions[cand] {
                Some(Faction::Player) => player += weight,
                Some(Faction::Ai) => ai += weight,
                _ => {}
            }
        }

        let advantage = player - ai;
        if advantage.abs() <= config::CAPTURE_DEADZONE {
            cp.progress *= config::CAPTURE_DECAY_RATE;
        } else {
            cp.progress =
                (cp.progress + advantage * config::CAPTURE_PROGRESS_RATE).clamp(-1.0, 1.0);
        }
        cp.next_check_at = now + config::CAPTURE_CHECK_INTERVAL_MS;

        let owner = owner_for_progress(cp.progress);
        let previous = world.factions[idx].unwrap_or(Faction::Neutral);
        world.capture_points[idx] = Some(cp);
        if owner != previous {
            // The only faction value the simulation ever rewrites.
            world.factions[idx] = Some(owner);
            if let Some(point) = world.entity_at(idx) {
                log::info!(
                    "control point {point} flipped {} -> {} at progress {:.2}",
                    previous.as_str(),
                    owner.as_str(),
                    cp.progress
                );
                world.push_event(SimEvent::PointOwnerChanged(PointOwnerChangedEvent {
                    point,
                    previous,
                    owner,
                    progress: cp.progress,
                    tick,
                }));
            }
        }
    }

    // Zone ownership: strict majority of point owners, tie -> Neutral.
    let owners: Vec<Faction> = world
        .alive_entities()
        .into_iter()
        .filter(|&idx| world.is_kind(idx, EntityKind::CONTROL_POINT))
        .filter_map(|idx| world.factions[idx])
        .collect();
    let zone = strict_majority(&owners);
    if zone != world.zone_owner {
        let previous = world.zone_owner;
        world.zone_owner = zone;
        world.push_event(SimEvent::ZoneOwnerChanged(ZoneOwnerChangedEvent {
            previous,
            owner: zone,
            tick,
        }));
    }
}

pub(crate) fn owner_for_progress(progress: f32) -> Faction {
    if progress >= config::CAPTURE_OWNERSHIP_THRESHOLD {
        Faction::Player
    } else if progress <= -config::CAPTURE_OWNERSHIP_THRESHOLD {
        Faction::Ai
    } else {
        Faction::Neutral
    }
}

/// Whoever owns strictly more than half the points owns the zone.
pub(crate) fn strict_majority(owners: &[Faction]) -> Faction {
    let player = owners.iter().filter(|&&f| f == Faction::Player).count();
    let ai = owners.iter().filter(|&&f| f == Faction::Ai).count();
    if player * 2 > owners.len() {
        Faction::Player
    } else if ai * 2 > owners.len() {
        Faction::Ai
    } else {
        Faction::Neutral
    }
}
