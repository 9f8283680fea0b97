use serde::{Deserialize, Serialize};

use crate::components::Faction;
use crate::entity::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDiedEvent {
    pub entity: EntityId,
    pub faction: Faction,
    pub x: f32,
    pub y: f32,
    pub tick: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastleDamagedEvent {
    pub castle: EntityId,
    pub faction: Faction,
    pub damage: f32,
    pub remaining_health: f32,
    pub tick: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOwnerChangedEvent {
    pub point: EntityId,
    pub previous: Faction,
    pub owner: Faction,
    pub progress: f32,
    pub tick: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneOwnerChangedEvent {
    pub previous: Faction,
    pub owner: Faction,
    pub tick: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverEvent {
    pub winner: Faction,
    pub tick: u64,
}

/// Discrete simulation events, accumulated during a tick and drained by the
/// host. Transition events (ownership, game over) fire only on the tick the
/// transition happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimEvent {
    UnitDied(UnitDiedEvent),
    CastleDamaged(CastleDamagedEvent),
    PointOwnerChanged(PointOwnerChangedEvent),
    ZoneOwnerChanged(ZoneOwnerChangedEvent),
    GameOver(GameOverEvent),
}
