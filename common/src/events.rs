use bevy_math::Vec2;

use crate::entities::{ItemId, ItemKind, Side};
use crate::weapons::WeaponKind;

// ============================================================================
// Simulation Events
// ============================================================================

// Side-channel for the out-of-scope audio/VFX/UI layers. Pushed during a tick
// and drained by the embedding loop; never read back by the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    ShotFired { shooter: Side, weapon: WeaponKind, pos: Vec2 },
    ReloadStarted { side: Side },
    BulletHitWall { pos: Vec2 },
    CombatantHit { target: Side, damage: f32, pos: Vec2 },
    LootSpawned { id: ItemId, kind: ItemKind },
    LootPickedUp { side: Side, kind: ItemKind },
    MatchEnded { winner: Side },
}
