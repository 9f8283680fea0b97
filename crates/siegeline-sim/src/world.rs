use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use siegeline_core::components::*;
use siegeline_core::config::LaneLayout;
use siegeline_core::entity::{EntityAllocator, EntityId};
use siegeline_core::events::SimEvent;

/// Logical simulation time. `elapsed_ms` and `tick` advance by the fixed
/// step; `now_ms` is the wall-clock timestamp of the latest advance call and
/// is only used for query-cache expiry.
#[derive(Debug, Clone, Copy)]
pub struct SimTime {
    pub tick: u64,
    pub tick_ms: f64,
    pub elapsed_ms: f64,
    pub now_ms: f64,
}

impl SimTime {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick: 0,
            tick_ms,
            elapsed_ms: 0.0,
            now_ms: 0.0,
        }
    }

    /// Fixed step as seconds, for speed × dt integration.
    pub fn dt_secs(&self) -> f32 {
        (self.tick_ms / 1000.0) as f32
    }

    /// Fixed step as milliseconds, for countdown timers.
    pub fn dt_ms(&self) -> f32 {
        self.tick_ms as f32
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
        self.elapsed_ms += self.tick_ms;
    }
}

/// Answer from the caller-supplied cleanup hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupAction {
    /// Free the row; the index returns to the allocator pool.
    Remove,
    /// Leave the row in place for now; cleanup retries next tick.
    Keep,
}

pub type CleanupHook = Box<dyn FnMut(EntityId) -> CleanupAction>;

/// SoA (Struct of Arrays) component store plus the simulation's time, RNG,
/// and event buffer. Each component type has its own `Vec<Option<T>>`
/// storage indexed by entity index; an entity "has" a component when its row
/// is `Some`.
pub struct World {
    pub allocator: EntityAllocator,
    alive: Vec<bool>,

    pub positions: Vec<Option<Position>>,
    pub velocities: Vec<Option<Velocity>>,
    pub healths: Vec<Option<Health>>,
    pub combats: Vec<Option<Combat>>,
    pub statuses: Vec<Option<StatusEffects>>,
    pub factions: Vec<Option<Faction>>,
    pub roles: Vec<Option<Role>>,
    pub targets: Vec<Option<Target>>,
    pub collisions: Vec<Option<Collision>>,
    pub presences: Vec<Option<Presence>>,
    pub unit_configs: Vec<Option<UnitConfig>>,
    pub deaths: Vec<Option<Death>>,
    pub animations: Vec<Option<Animation>>,
    pub renders: Vec<Option<Render>>,
    pub kinds: Vec<Option<EntityKind>>,
    pub capture_points: Vec<Option<CapturePoint>>,

    pub time: SimTime,
    pub rng: ChaCha8Rng,
    pub layout: LaneLayout,
    /// Majority owner across all control points.
    pub zone_owner: Faction,

    pub(crate) cleanup_hook: Option<CleanupHook>,
    pending_events: Vec<SimEvent>,
}

impl World {
    pub fn new(seed: u64, tick_ms: f64, layout: LaneLayout) -> Self {
        Self {
            allocator: EntityAllocator::new(),
            alive: Vec::new(),
            positions: Vec::new(),
            velocities: Vec::new(),
            healths: Vec::new(),
            combats: Vec::new(),
            statuses: Vec::new(),
            factions: Vec::new(),
            roles: Vec::new(),
            targets: Vec::new(),
            collisions: Vec::new(),
            presences: Vec::new(),
            unit_configs: Vec::new(),
            deaths: Vec::new(),
            animations: Vec::new(),
            renders: Vec::new(),
            kinds: Vec::new(),
            capture_points: Vec::new(),
            time: SimTime::new(tick_ms),
            rng: ChaCha8Rng::seed_from_u64(seed),
            layout,
            zone_owner: Faction::Neutral,
            cleanup_hook: None,
            pending_events: Vec::new(),
        }
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        let idx = id.index as usize;

        // Grow all storage to accommodate
        while self.alive.len() <= idx {
            self.alive.push(false);
            self.positions.push(None);
            self.velocities.push(None);
            self.healths.push(None);
            self.combats.push(None);
            self.statuses.push(None);
            self.factions.push(None);
            self.roles.push(None);
            self.targets.push(None);
            self.collisions.push(None);
            self.presences.push(None);
            self.unit_configs.push(None);
            self.deaths.push(None);
            self.animations.push(None);
            self.renders.push(None);
            self.kinds.push(None);
            self.capture_points.push(None);
        }

        self.alive[idx] = true;
        id
    }

    /// Strip every component row and return the index to the pool.
    pub fn despawn(&mut self, id: EntityId) {
        if !self.allocator.is_alive(id) {
            return;
        }
        let idx = id.index as usize;
        self.alive[idx] = false;
        self.positions[idx] = None;
        self.velocities[idx] = None;
        self.healths[idx] = None;
        self.combats[idx] = None;
        self.statuses[idx] = None;
        self.factions[idx] = None;
        self.roles[idx] = None;
        self.targets[idx] = None;
        self.collisions[idx] = None;
        self.presences[idx] = None;
        self.unit_configs[idx] = None;
        self.deaths[idx] = None;
        self.animations[idx] = None;
        self.renders[idx] = None;
        self.kinds[idx] = None;
        self.capture_points[idx] = None;
        self.allocator.deallocate(id);
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
            && (id.index as usize) < self.alive.len()
            && self.alive[id.index as usize]
    }

    pub fn entity_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Iterate over all alive entity indices
    pub fn alive_entities(&self) -> Vec<usize> {
        self.alive
            .iter()
            .enumerate()
            .filter_map(|(i, &alive)| if alive { Some(i) } else { None })
            .collect()
    }

    /// Reconstruct the EntityId currently occupying an index.
    pub fn entity_at(&self, idx: usize) -> Option<EntityId> {
        if idx < self.alive.len() && self.alive[idx] {
            self.allocator
                .generation_of(idx as u32)
                .map(|g| EntityId::new(idx as u32, g))
        } else {
            None
        }
    }

    pub fn is_kind(&self, idx: usize, mask: EntityKind) -> bool {
        self.kinds
            .get(idx)
            .and_then(|k| *k)
            .is_some_and(|k| k.intersects(mask))
    }

    // --- Neutral-default readers ---
    //
    // Component tables carry no existence check; reading a missing or
    // removed entity yields a neutral value instead of an error.

    pub fn health_of(&self, id: EntityId) -> f32 {
        if !self.is_alive(id) {
            return 0.0;
        }
        self.healths[id.index as usize]
            .as_ref()
            .map_or(0.0, |h| h.current)
    }

    pub fn target_distance_of(&self, id: EntityId) -> f32 {
        if !self.is_alive(id) {
            return f32::INFINITY;
        }
        self.targets[id.index as usize]
            .as_ref()
            .map_or(f32::INFINITY, |t| t.distance)
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        if !self.is_alive(id) {
            return None;
        }
        self.positions[id.index as usize]
    }

    // --- Events ---

    pub fn push_event(&mut self, event: SimEvent) {
        self.pending_events.push(event);
    }

    /// Peek at events accumulated so far this tick.
    pub fn events(&self) -> &[SimEvent] {
        &self.pending_events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Install the hook consulted right before each entity removal. The
    /// hook may answer `Keep` to defer removal to a later tick, e.g. while
    /// presentation resources are still being released.
    pub fn set_cleanup_hook(&mut self, hook: CleanupHook) {
        self.cleanup_hook = Some(hook);
    }

    /// Presentation-side notification that a death animation finished,
    /// releasing the entity for cleanup ahead of its deadline.
    pub fn set_death_anim_done(&mut self, id: EntityId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(ref mut death) = self.deaths[id.index as usize] {
            if death.started {
                death.anim_done = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_world() -> World {
        World::new(42, 50.0, LaneLayout::default())
    }

    #[test]
    fn spawn_and_despawn() {
        let mut world = empty_world();
        let e = world.spawn();
        assert!(world.is_alive(e));
        assert_eq!(world.entity_count(), 1);

        world.despawn(e);
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn despawn_strips_component_rows() {
        let mut world = empty_world();
        let e = world.spawn();
        let idx = e.index as usize;

        world.positions[idx] = Some(Position { x: 10.0, y: 0.0 });
        world.healths[idx] = Some(Health::full(100.0));
        world.despawn(e);

        assert!(world.positions[idx].is_none());
        assert!(world.healths[idx].is_none());

        // The pooled index comes back clean.
        let reused = world.spawn();
        assert_eq!(reused.index, e.index);
        assert!(world.positions[reused.index as usize].is_none());
    }

    #[test]
    fn missing_entities_read_as_neutral_defaults() {
        let mut world = empty_world();
        let e = world.spawn();
        world.despawn(e);

        assert_eq!(world.health_of(e), 0.0);
        assert_eq!(world.target_distance_of(e), f32::INFINITY);
        assert!(world.position_of(e).is_none());
    }

    #[test]
    fn stale_id_does_not_alias_reused_index() {
        let mut world = empty_world();
        let old = world.spawn();
        world.despawn(old);
        let fresh = world.spawn();
        world.healths[fresh.index as usize] = Some(Health::full(50.0));

        assert_eq!(world.health_of(old), 0.0);
        assert_eq!(world.health_of(fresh), 50.0);
    }
}
