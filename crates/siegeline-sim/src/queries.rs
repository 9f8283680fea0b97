//! Cached read-only aggregates over the component tables.
//!
//! Several host-side callers (panels, ability logic, AI) want the same
//! totals within the same frame; each accessor memoizes its result for a
//! short wall-clock window keyed by the world's `now_ms`. The cache is an
//! explicit object owned by the simulation, not hidden module state, so
//! tests can construct and expire it freely.

use siegeline_core::components::{EntityKind, Faction};
use siegeline_core::config;
use siegeline_core::entity::EntityId;

use crate::systems::control_points;
use crate::world::World;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AliveCounts {
    pub player: u32,
    pub ai: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PresenceTotals {
    pub player: f32,
    pub ai: f32,
}

struct Cached<T> {
    value: T,
    computed_at: f64,
}

pub struct QueryCache {
    ttl_ms: f64,
    alive: Option<Cached<AliveCounts>>,
    presence: Option<Cached<PresenceTotals>>,
    owners: Option<Cached<Vec<(EntityId, Faction)>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_ttl(config::QUERY_CACHE_TTL_MS)
    }

    pub fn with_ttl(ttl_ms: f64) -> Self {
        Self {
            ttl_ms,
            alive: None,
            presence: None,
            owners: None,
        }
    }

    fn fresh<T>(&self, cached: &Option<Cached<T>>, now: f64) -> bool {
        cached
            .as_ref()
            .is_some_and(|c| now >= c.computed_at && now - c.computed_at <= self.ttl_ms)
    }

    /// Drop all memoized values, forcing recomputation on next access.
    pub fn invalidate(&mut self) {
        self.alive = None;
        self.presence = None;
        self.owners = None;
    }

    /// Alive units per faction.
    pub fn alive_unit_counts(&mut self, world: &World) -> AliveCounts {
        let now = world.time.now_ms;
        if self.fresh(&self.alive, now) {
            return self.alive.as_ref().map(|c| c.value).unwrap_or_default();
        }

        let mut counts = AliveCounts::default();
        for idx in world.alive_entities() {
            if !world.is_kind(idx, EntityKind::UNIT) {
                continue;
            }
            if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
                continue;
            }
            match world.factions[idx] {
                Some(Faction::Player) => counts.player += 1,
                Some(Faction::Ai) => counts.ai += 1,
                _ => {}
            }
        }
        self.alive = Some(Cached {
            value: counts,
            computed_at: now,
        });
        counts
    }

    /// Summed presence weight of alive units per faction.
    pub fn presence_totals(&mut self, world: &World) -> PresenceTotals {
        let now = world.time.now_ms;
        if self.fresh(&self.presence, now) {
            return self.presence.as_ref().map(|c| c.value).unwrap_or_default();
        }

        let mut totals = PresenceTotals::default();
        for idx in world.alive_entities() {
            if !world.is_kind(idx, EntityKind::UNIT) {
                continue;
            }
            if !world.healths[idx].is_some_and(|h| h.current > 0.0) {
                continue;
            }
            let weight = match world.presences[idx] {
                Some(p) => p.weight(),
                None => continue,
            };
            match world.factions[idx] {
                Some(Faction::Player) => totals.player += weight,
                Some(Faction::Ai) => totals.ai += weight,
                _ => {}
            }
        }
        self.presence = Some(Cached {
            value: totals,
            computed_at: now,
        });
        totals
    }

    /// Current owner of every control point.
    pub fn point_owners(&mut self, world: &World) -> Vec<(EntityId, Faction)> {
        let now = world.time.now_ms;
        if self.fresh(&self.owners, now) {
            return self
                .owners
                .as_ref()
                .map(|c| c.value.clone())
                .unwrap_or_default();
        }

        let mut owners = Vec::new();
        for idx in world.alive_entities() {
            if !world.is_kind(idx, EntityKind::CONTROL_POINT) {
                continue;
            }
            if let (Some(id), Some(faction)) = (world.entity_at(idx), world.factions[idx]) {
                owners.push((id, faction));
            }
        }
        self.owners = Some(Cached {
            value: owners.clone(),
            computed_at: now,
        });
        owners
    }

    /// Zone owner derived from the cached point owners, same strict-majority
    /// rule the control point system applies.
    pub fn zone_owner(&mut self, world: &World) -> Faction {
        let owners: Vec<Faction> = self
            .point_owners(world)
            .into_iter()
            .map(|(_, f)| f)
            .collect();
        control_points::strict_majority(&owners)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
