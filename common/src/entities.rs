use bevy_math::Vec2;
use bevy_time::{Stopwatch, Timer, TimerMode};
use std::time::Duration;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use crate::constants::{ARMOR_MAX, BULLET_RADIUS, COMBATANT_MAX_HP, COMBATANT_RADIUS, LOOT_RADIUS};
use crate::weapons::WeaponKind;

// ============================================================================
// Identifiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct BulletId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct ItemId(pub u32);

// The two sides of a match. `Player` is the locally-controlled combatant on
// the authoritative peer; `Opponent` is the bot or the remote peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

// ============================================================================
// Static Geometry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum WallShape {
    Rect { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

// Static for the whole match; the arena boundary is four oversized rects.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub shape: WallShape,
}

impl Wall {
    #[must_use]
    pub const fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            shape: WallShape::Rect {
                half_width: width / 2.0,
                half_height: height / 2.0,
            },
        }
    }

    #[must_use]
    pub const fn pillar(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            shape: WallShape::Circle { radius },
        }
    }

    #[must_use]
    pub const fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

// ============================================================================
// Loot
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum ItemKind {
    Medkit,
    MegaHealth,
    Shield,
    Ammo,
    Weapon(WeaponKind),
}

impl ItemKind {
    // Heal amount, armor amount, or zero for effects without a magnitude.
    #[must_use]
    pub const fn value(self) -> f32 {
        match self {
            Self::Medkit => crate::constants::MEDKIT_HEAL,
            Self::MegaHealth => crate::constants::MEGA_HEALTH_HEAL,
            Self::Shield => crate::constants::SHIELD_ARMOR,
            Self::Ammo | Self::Weapon(_) => 0.0,
        }
    }

    #[must_use]
    pub const fn restores_health_or_armor(self) -> bool {
        matches!(self, Self::Medkit | Self::MegaHealth | Self::Shield)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub pos: Vec2,
    pub radius: f32,
    pub value: f32,
}

impl LootItem {
    #[must_use]
    pub fn new(id: ItemId, kind: ItemKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: LOOT_RADIUS,
            value: kind.value(),
        }
    }
}

// ============================================================================
// Bullets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub id: BulletId,
    pub owner: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub range_remaining: f32,
    pub color: u32, // packed RGB, cosmetic only
}

// ============================================================================
// Combatants
// ============================================================================

#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: PlayerId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub angle: f32, // radians, facing/aim direction
    pub hp: f32,
    pub max_hp: f32,
    pub armor: f32,
    pub weapon: WeaponKind,
    pub ammo: u32,
    pub reloading: bool,
    pub reload: Timer,
    pub last_fired_at: f32, // match seconds
    pub sprint_active: Timer,
    pub sprint_cooldown: Timer,
    pub speed_multiplier: f32,
    pub last_damage_at: f32, // match seconds
    pub regen: Stopwatch,
    pub is_bot: bool,
}

// A fresh one-shot timer that starts in the finished state.
fn expired_timer(secs: f32) -> Timer {
    let mut timer = Timer::from_seconds(secs, TimerMode::Once);
    timer.tick(Duration::from_secs_f32(secs));
    timer
}

impl Combatant {
    #[must_use]
    pub fn spawn(id: PlayerId, pos: Vec2, is_bot: bool) -> Self {
        let weapon = WeaponKind::Pistol;
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: COMBATANT_RADIUS,
            angle: 0.0,
            hp: COMBATANT_MAX_HP,
            max_hp: COMBATANT_MAX_HP,
            armor: 0.0,
            weapon,
            ammo: weapon.clip_size(),
            reloading: false,
            reload: expired_timer(weapon.stats().reload_time),
            last_fired_at: f32::NEG_INFINITY,
            sprint_active: expired_timer(crate::constants::SPRINT_DURATION),
            sprint_cooldown: expired_timer(crate::constants::SPRINT_COOLDOWN),
            speed_multiplier: 1.0,
            last_damage_at: f32::NEG_INFINITY,
            regen: Stopwatch::new(),
            is_bot,
        }
    }

    #[must_use]
    pub fn alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).clamp(0.0, self.max_hp);
    }

    pub fn add_armor(&mut self, amount: f32) {
        self.armor = (self.armor + amount).clamp(0.0, ARMOR_MAX);
    }

    // Equip a picked-up weapon with a full clip, dropping any reload in flight.
    pub fn equip(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
        self.ammo = weapon.clip_size();
        self.reloading = false;
        self.reload = expired_timer(weapon.stats().reload_time);
    }

    pub fn begin_reload(&mut self) {
        self.reloading = true;
        self.reload = Timer::from_seconds(self.weapon.stats().reload_time, TimerMode::Once);
    }

    // Reset ammo/hp/weapon to the common PvP baseline; single-player paths may
    // have drifted these before the remote match started.
    pub fn normalize_for_match(&mut self) {
        let weapon = WeaponKind::Pistol;
        self.hp = self.max_hp;
        self.armor = 0.0;
        self.equip(weapon);
        self.vel = Vec2::ZERO;
        self.last_fired_at = f32::NEG_INFINITY;
        self.last_damage_at = f32::NEG_INFINITY;
        self.regen.reset();
    }

    #[must_use]
    pub fn bullet_spawn_radius(&self) -> f32 {
        self.radius + BULLET_RADIUS + crate::constants::MUZZLE_OFFSET
    }
}
