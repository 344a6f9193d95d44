use bevy_math::Vec2;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use crate::entities::{Bullet, Combatant, ItemKind, LootItem, Side, Wall};
use crate::weapons::WeaponKind;

// Macro to reduce boilerplate for wire structs
macro_rules! message {
    ($(#[$meta:meta])* struct $name:ident $body:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "bincode", derive(Encode, Decode))]
        pub struct $name $body
    };
}

// ============================================================================
// Common Wire Types
// ============================================================================

// Wire-friendly float pair; the simulation's Vec2 does not derive the codecs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct NetVec2 {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for NetVec2 {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<NetVec2> for Vec2 {
    fn from(v: NetVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

message! {
// Full per-combatant state as carried in a snapshot.
struct CombatantState {
    pub pos: NetVec2,
    pub vel: NetVec2,
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub armor: f32,
    pub weapon: WeaponKind,
    pub ammo: u32,
    pub reloading: bool,
    pub reload_remaining: f32,
    pub sprint_remaining: f32,
    pub sprint_cooldown_remaining: f32,
    pub speed_multiplier: f32,
}
}

impl CombatantState {
    #[must_use]
    pub fn capture(c: &Combatant) -> Self {
        Self {
            pos: c.pos.into(),
            vel: c.vel.into(),
            angle: c.angle,
            hp: c.hp,
            max_hp: c.max_hp,
            armor: c.armor,
            weapon: c.weapon,
            ammo: c.ammo,
            reloading: c.reloading,
            reload_remaining: if c.reloading { c.reload.remaining_secs() } else { 0.0 },
            sprint_remaining: c.sprint_active.remaining_secs(),
            sprint_cooldown_remaining: c.sprint_cooldown.remaining_secs(),
            speed_multiplier: c.speed_multiplier,
        }
    }

    #[must_use]
    pub fn alive(&self) -> bool {
        self.hp > 0.0
    }
}

message! {
struct BulletState {
    pub id: u32,
    pub owner: Side,
    pub pos: NetVec2,
    pub vel: NetVec2,
    pub color: u32,
}
}

impl BulletState {
    #[must_use]
    pub fn capture(b: &Bullet) -> Self {
        Self {
            id: b.id.0,
            owner: b.owner,
            pos: b.pos.into(),
            vel: b.vel.into(),
            color: b.color,
        }
    }
}

message! {
struct LootState {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: NetVec2,
    pub value: f32,
}
}

impl LootState {
    #[must_use]
    pub fn capture(item: &LootItem) -> Self {
        Self {
            id: item.id.0,
            kind: item.kind,
            pos: item.pos.into(),
            value: item.value,
        }
    }
}

// ============================================================================
// Client Messages
// ============================================================================

message! {
// Client to Host: this tick's intent. The facing angle is authoritative for
// the client's own aim feel.
struct CInput {
    pub movement: NetVec2,
    pub aim: NetVec2,
    pub sprint: bool,
    pub fire: bool,
    pub angle: f32,
}
}

message! {
// Either direction: terminal result.
struct MGameOver {
    pub winner: Side,
}
}

message! {
// Either direction: liveness probe, echoed back verbatim.
struct MPing {
    pub timestamp_ms: u64,
}
}

// ============================================================================
// Host Messages
// ============================================================================

message! {
// Host to Client, once: everything needed to build the arena locally.
struct SInit {
    pub walls: Vec<Wall>,
    pub player_start: NetVec2,
    pub opponent_start: NetVec2,
    pub seed: u64,
}
}

message! {
// Host to Client, throttled: the authoritative snapshot. players[0] is the
// host-side combatant, players[1] the client's own.
struct SState {
    pub players: [CombatantState; 2],
    pub bullets: Vec<BulletState>,
    pub loot: Vec<LootState>,
    pub zone_radius: f32,
    pub time_remaining: f32,
}
}

// ============================================================================
// Message Envelopes
// ============================================================================

// All client to host messages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum ClientMessage {
    Input(CInput),
    GameOver(MGameOver),
    Ping(MPing),
}

// All host to client messages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum HostMessage {
    Init(SInit),
    State(SState),
    GameOver(MGameOver),
    Ping(MPing),
}

message! {
// Timestamped framing around every client payload.
struct ClientEnvelope {
    pub timestamp_ms: u64,
    pub msg: ClientMessage,
}
}

message! {
// Timestamped framing around every host payload.
struct HostEnvelope {
    pub timestamp_ms: u64,
    pub msg: HostMessage,
}
}
