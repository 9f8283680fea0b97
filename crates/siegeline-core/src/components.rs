use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Ai,
    Neutral,
}

impl Faction {
    pub fn parse(s: &str) -> Self {
        match s {
            "Player" => Faction::Player,
            "Ai" => Faction::Ai,
            _ => Faction::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Player => "Player",
            Faction::Ai => "Ai",
            Faction::Neutral => "Neutral",
        }
    }

    /// The faction this one fights. Neutral opposes nobody.
    pub fn opposing(&self) -> Faction {
        match self {
            Faction::Player => Faction::Ai,
            Faction::Ai => Faction::Player,
            Faction::Neutral => Faction::Neutral,
        }
    }

    /// Lane travel direction along X: Player marches +X, Ai marches -X.
    pub fn march_direction(&self) -> f32 {
        match self {
            Faction::Player => 1.0,
            Faction::Ai => -1.0,
            Faction::Neutral => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Frontline,
    Damage,
    Support,
    Disruptor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Frontline => "Frontline",
            Role::Damage => "Damage",
            Role::Support => "Support",
            Role::Disruptor => "Disruptor",
        }
    }
}

/// Archetype discriminant as a bitmask so "is this one of these kinds" is a
/// single AND, and target masks can name several kinds at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKind(pub u16);

impl EntityKind {
    pub const UNIT: EntityKind = EntityKind(1 << 0);
    pub const CASTLE: EntityKind = EntityKind(1 << 1);
    pub const TURRET: EntityKind = EntityKind(1 << 2);
    pub const PROJECTILE: EntityKind = EntityKind(1 << 3);
    pub const CONTROL_POINT: EntityKind = EntityKind(1 << 4);

    pub fn intersects(&self, mask: EntityKind) -> bool {
        self.0 & mask.0 != 0
    }

    pub fn union(self, other: EntityKind) -> EntityKind {
        EntityKind(self.0 | other.0)
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            EntityKind::UNIT => "Unit",
            EntityKind::CASTLE => "Castle",
            EntityKind::TURRET => "Turret",
            EntityKind::PROJECTILE => "Projectile",
            EntityKind::CONTROL_POINT => "ControlPoint",
            _ => "Mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    /// Y only participates in zone membership and distance checks; the lane
    /// itself runs along X.
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Velocity {
    /// March speed in units/second.
    pub base_speed: f32,
    /// Displacement impulse (knockback etc.), decays toward zero.
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn missing(&self) -> f32 {
        (self.max - self.current).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Combat {
    pub damage: f32,
    pub range: f32,
    /// Milliseconds between actions; `cooldown` counts down to 0.
    pub attack_rate: f32,
    pub cooldown: f32,
    pub heal_amount: f32,
    /// When set, eligibility ignores the opposing-faction requirement.
    pub ignore_faction: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusEffects {
    /// Remaining stun in ms; > 0 skips targeting, movement, and actions.
    pub stun_timer: f32,
    pub slow_timer: f32,
    /// Speed multiplier while slowed; resets to 1.0 when slow_timer hits 0.
    pub slow_power: f32,
    pub buff_timer: f32,
    /// Damage/heal multiplier while buffed; resets to 1.0 on expiry.
    pub buff_power: f32,
}

impl StatusEffects {
    pub fn neutral() -> Self {
        Self {
            stun_timer: 0.0,
            slow_timer: 0.0,
            slow_power: 1.0,
            buff_timer: 0.0,
            buff_power: 1.0,
        }
    }

    pub fn stunned(&self) -> bool {
        self.stun_timer > 0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    /// Last resolved target. Recomputed every tick; never trusted across
    /// ticks without validation.
    pub entity: Option<EntityId>,
    pub distance: f32,
}

impl Target {
    pub fn cleared() -> Self {
        Self {
            entity: None,
            distance: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collision {
    pub radius: f32,
    /// Nearest enemy physically obstructing forward motion, if any.
    pub blocked_by: Option<EntityId>,
    /// Pass-through entities neither block nor are blocked.
    pub pass_through: bool,
    /// Ghosts are additionally untargetable.
    pub ghost: bool,
}

impl Collision {
    pub fn solid(radius: f32) -> Self {
        Self {
            radius,
            blocked_by: None,
            pass_through: false,
            ghost: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Presence {
    /// Contribution toward capturing a control point.
    pub base_value: f32,
    /// Stance/role modifier applied at spawn.
    pub multiplier: f32,
}

impl Presence {
    pub fn weight(&self) -> f32 {
        self.base_value * self.multiplier
    }
}

/// Link into the design-time unit catalog. The catalog itself is data owned
/// by the host; the simulation only carries the index and display hints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitConfig {
    pub type_index: u32,
    pub size: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Death {
    pub started: bool,
    /// Set by the presentation layer when the death animation finished.
    pub anim_done: bool,
    /// Logical-time deadline after which cleanup proceeds regardless.
    pub cleanup_at: f64,
}

impl Death {
    pub fn none() -> Self {
        Self {
            started: false,
            anim_done: false,
            cleanup_at: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimAction {
    Idle,
    Walk,
    Attack,
    Cast,
    Death,
}

impl AnimAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimAction::Idle => "Idle",
            AnimAction::Walk => "Walk",
            AnimAction::Attack => "Attack",
            AnimAction::Cast => "Cast",
            AnimAction::Death => "Death",
        }
    }
}

/// Consumed by the presentation layer only; the simulation stamps it so clip
/// selection never has to inspect simulation internals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Animation {
    pub current_action: AnimAction,
    pub locked: bool,
    pub lock_until: f64,
}

impl Animation {
    pub fn idle() -> Self {
        Self {
            current_action: AnimAction::Idle,
            locked: false,
            lock_until: 0.0,
        }
    }
}

/// Opaque handle into the presentation-side store. 0 = no visual yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Render {
    pub store_index: u32,
    pub visible: bool,
    pub depth: f32,
}

impl Render {
    pub fn unattached() -> Self {
        Self {
            store_index: 0,
            visible: true,
            depth: 0.0,
        }
    }
}

/// Capture state machine for one control point. The zone is a rectangle
/// centered on the entity's Position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapturePoint {
    pub half_extents: Vec2,
    /// -1 (fully AI) .. +1 (fully player).
    pub progress: f32,
    /// Logical time of the next presence check.
    pub next_check_at: f64,
}

impl CapturePoint {
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            progress: 0.0,
            next_check_at: 0.0,
        }
    }

    pub fn contains(&self, center: Position, p: Position) -> bool {
        (p.x - center.x).abs() <= self.half_extents.x
            && (p.y - center.y).abs() <= self.half_extents.y
    }
}
