//! Top-level simulation orchestrator.
//!
//! `Simulation` owns the world, the scheduler, and the fixed-step clock.
//! It is completely headless: the host pushes real-time deltas into
//! `advance`, reads snapshots, and drains events. Same seed + same calls =
//! identical state, which is what the determinism tests pin down.

use siegeline_core::components::Faction;
use siegeline_core::config::{self, LaneLayout};
use siegeline_core::entity::EntityId;
use siegeline_core::error::SimError;
use siegeline_core::events::SimEvent;

use crate::clock::FixedStepClock;
use crate::effects;
use crate::queries::{AliveCounts, PresenceTotals, QueryCache};
use crate::scheduler::Scheduler;
use crate::snapshot::{self, StateSnapshot};
use crate::systems;
use crate::world::{CleanupHook, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver,
}

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Fixed logical timestep in milliseconds.
    pub tick_ms: f64,
    pub layout: LaneLayout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_ms: config::TICK_MS,
            layout: LaneLayout::default(),
        }
    }
}

pub struct Simulation {
    pub world: World,
    scheduler: Scheduler,
    clock: FixedStepClock,
    queries: QueryCache,
    pub phase: GamePhase,
    pub winner: Option<Faction>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        if !(config.tick_ms > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "tick duration must be positive, got {}",
                config.tick_ms
            )));
        }
        if config.layout.player_castle_x >= config.layout.ai_castle_x {
            return Err(SimError::InvalidConfig(format!(
                "player castle ({}) must sit left of the AI castle ({})",
                config.layout.player_castle_x, config.layout.ai_castle_x
            )));
        }

        let mut scheduler = Scheduler::new();
        register_default_systems(&mut scheduler);

        Ok(Self {
            world: World::new(config.seed, config.tick_ms, config.layout),
            scheduler,
            clock: FixedStepClock::new(config.tick_ms),
            queries: QueryCache::new(),
            phase: GamePhase::Running,
            winner: None,
        })
    }

    /// The single time entry point. Feeds the real-time delta to the fixed
    /// step clock and runs every emitted tick; `now_ms` is the wall-clock
    /// timestamp used only for query-cache expiry. Returns how many ticks
    /// actually ran.
    pub fn advance(&mut self, delta_ms: f64, now_ms: f64) -> u32 {
        self.world.time.now_ms = now_ms;
        if self.phase == GamePhase::GameOver {
            return 0;
        }

        let ticks = self.clock.advance(delta_ms);
        let mut ran = 0;
        for _ in 0..ticks {
            self.step();
            ran += 1;
            if self.phase == GamePhase::GameOver {
                self.clock.reset();
                break;
            }
        }
        ran
    }

    /// Run exactly one fixed tick, bypassing the clock (tests, replays).
    pub fn step(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.world.time.advance_tick();
        self.scheduler.run(&mut self.world);

        for event in self.world.events() {
            if let SimEvent::GameOver(e) = event {
                log::info!("game over at tick {}: {} wins", e.tick, e.winner.as_str());
                self.phase = GamePhase::GameOver;
                self.winner = Some(e.winner);
                break;
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.drain_events()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let phase = match self.phase {
            GamePhase::Running => "Running",
            GamePhase::GameOver => "GameOver",
        };
        snapshot::build(&self.world, phase)
    }

    /// Toggle a registered system by name without unregistering it.
    pub fn set_system_enabled(&mut self, name: &str, enabled: bool) -> bool {
        self.scheduler.set_enabled(name, enabled)
    }

    pub fn set_cleanup_hook(&mut self, hook: CleanupHook) {
        self.world.set_cleanup_hook(hook);
    }

    pub fn notify_death_anim_done(&mut self, id: EntityId) {
        self.world.set_death_anim_done(id);
    }

    // --- Cached aggregate queries ---

    pub fn alive_unit_counts(&mut self) -> AliveCounts {
        self.queries.alive_unit_counts(&self.world)
    }

    pub fn presence_totals(&mut self) -> PresenceTotals {
        self.queries.presence_totals(&self.world)
    }

    pub fn point_owners(&mut self) -> Vec<(EntityId, Faction)> {
        self.queries.point_owners(&self.world)
    }

    pub fn zone_owner(&mut self) -> Faction {
        self.queries.zone_owner(&self.world)
    }

    // --- Effect injection (between ticks, outside the system order) ---

    pub fn apply_damage(&mut self, id: EntityId, amount: f32) -> bool {
        effects::apply_damage(&mut self.world, id, amount)
    }

    pub fn apply_heal(&mut self, id: EntityId, amount: f32) -> bool {
        effects::apply_heal(&mut self.world, id, amount)
    }

    pub fn apply_stun(&mut self, id: EntityId, duration_ms: f32) -> bool {
        effects::apply_stun(&mut self.world, id, duration_ms)
    }

    pub fn apply_slow(&mut self, id: EntityId, duration_ms: f32, power: f32) -> bool {
        effects::apply_slow(&mut self.world, id, duration_ms, power)
    }

    pub fn apply_buff(&mut self, id: EntityId, duration_ms: f32, power: f32) -> bool {
        effects::apply_buff(&mut self.world, id, duration_ms, power)
    }
}

/// The default system set in execution order. Priorities leave gaps so a
/// host can slot presentation-adjacent systems between the built-ins.
fn register_default_systems(scheduler: &mut Scheduler) {
    scheduler.register("status_decay", 10, Box::new(|w| {
        systems::status::run(w);
        Ok(())
    }));
    scheduler.register("cooldown", 20, Box::new(|w| {
        systems::cooldown::run(w);
        Ok(())
    }));
    scheduler.register("targeting", 30, Box::new(|w| {
        systems::targeting::run(w);
        Ok(())
    }));
    scheduler.register("blocking", 40, Box::new(|w| {
        systems::blocking::run(w);
        Ok(())
    }));
    scheduler.register("movement", 50, Box::new(|w| {
        systems::movement::run(w);
        Ok(())
    }));
    scheduler.register("combat", 60, Box::new(|w| {
        systems::combat::run(w);
        Ok(())
    }));
    scheduler.register("healing", 70, Box::new(|w| {
        systems::healing::run(w);
        Ok(())
    }));
    scheduler.register("control_points", 80, Box::new(|w| {
        systems::control_points::run(w);
        Ok(())
    }));
    scheduler.register("death", 90, Box::new(|w| {
        systems::death::run(w);
        Ok(())
    }));
    scheduler.register("cleanup", 100, Box::new(|w| {
        systems::cleanup::run(w);
        Ok(())
    }));
}
