#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

// ============================================================================
// Weapon Catalog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum WeaponKind {
    #[default]
    Pistol,
    Smg,
    Shotgun,
    Rifle,
    Sniper,
}

// Static per-weapon tuning. Times in seconds, distances/speeds in world
// units, spread is the full cone width in radians.
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    pub damage: f32,
    pub fire_interval: f32,
    pub clip_size: u32,
    pub reload_time: f32,
    pub bullet_speed: f32,
    pub spread: f32,
    pub range: f32,
    pub pellets: u32,
    // Bots pull the trigger slower than a human mashing at the cap.
    pub bot_fire_interval_multiplier: f32,
}

const PISTOL: WeaponStats = WeaponStats {
    damage: 12.0,
    fire_interval: 0.32,
    clip_size: 15,
    reload_time: 1.1,
    bullet_speed: 1200.0,
    spread: 0.03,
    range: 700.0,
    pellets: 1,
    bot_fire_interval_multiplier: 1.5,
};

const SMG: WeaponStats = WeaponStats {
    damage: 8.0,
    fire_interval: 0.11,
    clip_size: 30,
    reload_time: 1.4,
    bullet_speed: 1300.0,
    spread: 0.09,
    range: 520.0,
    pellets: 1,
    bot_fire_interval_multiplier: 2.0,
};

const SHOTGUN: WeaponStats = WeaponStats {
    damage: 9.0,
    fire_interval: 0.8,
    clip_size: 6,
    reload_time: 1.8,
    bullet_speed: 1000.0,
    spread: 0.25,
    range: 320.0,
    pellets: 5,
    bot_fire_interval_multiplier: 1.3,
};

const RIFLE: WeaponStats = WeaponStats {
    damage: 17.0,
    fire_interval: 0.45,
    clip_size: 12,
    reload_time: 1.6,
    bullet_speed: 1500.0,
    spread: 0.02,
    range: 900.0,
    pellets: 1,
    bot_fire_interval_multiplier: 1.4,
};

const SNIPER: WeaponStats = WeaponStats {
    damage: 40.0,
    fire_interval: 1.2,
    clip_size: 4,
    reload_time: 2.2,
    bullet_speed: 2000.0,
    spread: 0.004,
    range: 1400.0,
    pellets: 1,
    bot_fire_interval_multiplier: 1.2,
};

impl WeaponKind {
    pub const ALL: [Self; 5] = [Self::Pistol, Self::Smg, Self::Shotgun, Self::Rifle, Self::Sniper];

    #[must_use]
    pub const fn stats(self) -> &'static WeaponStats {
        match self {
            Self::Pistol => &PISTOL,
            Self::Smg => &SMG,
            Self::Shotgun => &SHOTGUN,
            Self::Rifle => &RIFLE,
            Self::Sniper => &SNIPER,
        }
    }

    #[must_use]
    pub const fn clip_size(self) -> u32 {
        self.stats().clip_size
    }
}
