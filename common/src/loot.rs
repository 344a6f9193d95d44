use bevy_math::Vec2;
use bevy_time::{Timer, TimerMode};
use rand::Rng;
use rand::rngs::StdRng;
use std::time::Duration;

use crate::collision::{circle_overlaps_circle, circle_overlaps_wall};
use crate::constants::{
    ARENA_HEIGHT, ARENA_WIDTH, DAMAGE_DROP_SCATTER, LOOT_CAP, LOOT_EDGE_MARGIN, LOOT_PLACEMENT_ATTEMPTS,
    LOOT_RADIUS, LOOT_SPAWN_INTERVAL,
};
use crate::entities::{Combatant, ItemId, ItemKind, LootItem, Side, Wall};
use crate::events::SimEvent;
use crate::weapons::WeaponKind;

// ============================================================================
// Loot Director
// ============================================================================

// Spawning runs only on the simulation authority (host or single-player);
// the network client just renders whatever the snapshot carries.
#[derive(Debug)]
pub struct LootDirector {
    spawn_timer: Timer,
    next_id: u32,
}

impl Default for LootDirector {
    fn default() -> Self {
        Self {
            spawn_timer: Timer::from_seconds(LOOT_SPAWN_INTERVAL, TimerMode::Repeating),
            next_id: 1,
        }
    }
}

impl LootDirector {
    pub fn update(
        &mut self,
        loot: &mut Vec<LootItem>,
        walls: &[Wall],
        rng: &mut StdRng,
        dt: f32,
        events: &mut Vec<SimEvent>,
    ) {
        self.spawn_timer.tick(Duration::from_secs_f32(dt));
        for _ in 0..self.spawn_timer.times_finished_this_tick() {
            if loot.len() >= LOOT_CAP {
                break;
            }
            let kind = roll_kind(rng);
            let pos = place_clear_of_walls(walls, rng);
            let item = LootItem::new(self.allocate_id(), kind, pos);
            events.push(SimEvent::LootSpawned { id: item.id, kind });
            loot.push(item);
        }
    }

    // Consumable scattered near a damaged bot (single-player flavor drop).
    pub fn drop_consumable_near(
        &mut self,
        pos: Vec2,
        loot: &mut Vec<LootItem>,
        rng: &mut StdRng,
        events: &mut Vec<SimEvent>,
    ) {
        let kind = match rng.gen_range(0..3u8) {
            0 => ItemKind::Medkit,
            1 => ItemKind::Shield,
            _ => ItemKind::Ammo,
        };
        let offset = Vec2::new(
            rng.gen_range(-DAMAGE_DROP_SCATTER..=DAMAGE_DROP_SCATTER),
            rng.gen_range(-DAMAGE_DROP_SCATTER..=DAMAGE_DROP_SCATTER),
        );
        let item = LootItem::new(self.allocate_id(), kind, pos + offset);
        events.push(SimEvent::LootSpawned { id: item.id, kind });
        loot.push(item);
    }

    fn allocate_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn roll_kind(rng: &mut StdRng) -> ItemKind {
    let roll: f32 = rng.r#gen();
    if roll < 0.30 {
        ItemKind::Medkit
    } else if roll < 0.52 {
        ItemKind::Shield
    } else if roll < 0.70 {
        ItemKind::Ammo
    } else if roll < 0.95 {
        ItemKind::Weapon(roll_weapon(rng))
    } else {
        ItemKind::MegaHealth
    }
}

fn roll_weapon(rng: &mut StdRng) -> WeaponKind {
    let roll: f32 = rng.r#gen();
    if roll < 0.30 {
        WeaponKind::Smg
    } else if roll < 0.55 {
        WeaponKind::Shotgun
    } else if roll < 0.80 {
        WeaponKind::Rifle
    } else {
        WeaponKind::Sniper
    }
}

// Bounded rejection sampling against the wall set. If every attempt lands in
// geometry the final candidate is accepted anyway: visually imperfect, but a
// spawn never blocks gameplay.
fn place_clear_of_walls(walls: &[Wall], rng: &mut StdRng) -> Vec2 {
    let mut candidate = Vec2::ZERO;
    for _ in 0..LOOT_PLACEMENT_ATTEMPTS {
        candidate = Vec2::new(
            rng.gen_range(LOOT_EDGE_MARGIN..ARENA_WIDTH - LOOT_EDGE_MARGIN),
            rng.gen_range(LOOT_EDGE_MARGIN..ARENA_HEIGHT - LOOT_EDGE_MARGIN),
        );
        if !walls.iter().any(|w| circle_overlaps_wall(candidate, LOOT_RADIUS, w)) {
            break;
        }
    }
    candidate
}

// ============================================================================
// Pickup Resolution
// ============================================================================

// Apply one item to one combatant. Returns false when the pickup would be
// wasted (healing at full health), in which case the item stays on the
// ground untouched.
pub fn apply_pickup(combatant: &mut Combatant, item: &LootItem) -> bool {
    match item.kind {
        ItemKind::Medkit | ItemKind::MegaHealth => {
            if combatant.hp >= combatant.max_hp {
                return false;
            }
            combatant.heal(item.value);
            true
        }
        ItemKind::Shield => {
            combatant.add_armor(item.value);
            true
        }
        ItemKind::Ammo => {
            combatant.ammo = combatant.weapon.clip_size();
            combatant.reloading = false;
            true
        }
        ItemKind::Weapon(kind) => {
            combatant.equip(kind);
            true
        }
    }
}

pub fn resolve_pickups(
    player: &mut Combatant,
    opponent: &mut Combatant,
    loot: &mut Vec<LootItem>,
    events: &mut Vec<SimEvent>,
) {
    loot.retain(|item| {
        for (combatant, side) in [(&mut *player, Side::Player), (&mut *opponent, Side::Opponent)] {
            if !combatant.alive() {
                continue;
            }
            if !circle_overlaps_circle(combatant.pos, combatant.radius, item.pos, item.radius) {
                continue;
            }
            if apply_pickup(combatant, item) {
                events.push(SimEvent::LootPickedUp { side, kind: item.kind });
                return false;
            }
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlayerId;
    use rand::SeedableRng;

    fn combatant_at(pos: Vec2) -> Combatant {
        Combatant::spawn(PlayerId(1), pos, false)
    }

    #[test]
    fn medkit_at_full_health_is_left_on_the_ground() {
        let mut player = combatant_at(Vec2::new(400.0, 400.0));
        let mut opponent = combatant_at(Vec2::new(1200.0, 400.0));
        let mut loot = vec![LootItem::new(ItemId(1), ItemKind::Medkit, player.pos)];
        let mut events = Vec::new();

        resolve_pickups(&mut player, &mut opponent, &mut loot, &mut events);
        assert_eq!(loot.len(), 1); // untouched
        assert!((player.hp - player.max_hp).abs() < f32::EPSILON);
        assert!(events.is_empty());

        // Hurt, the same overlap consumes it.
        player.hp = 40.0;
        resolve_pickups(&mut player, &mut opponent, &mut loot, &mut events);
        assert!(loot.is_empty());
        assert!((player.hp - (40.0 + crate::constants::MEDKIT_HEAL)).abs() < 1e-4);
    }

    #[test]
    fn ammo_refills_clip_and_cancels_reload() {
        let mut player = combatant_at(Vec2::new(400.0, 400.0));
        player.ammo = 0;
        player.begin_reload();
        let item = LootItem::new(ItemId(1), ItemKind::Ammo, player.pos);

        assert!(apply_pickup(&mut player, &item));
        assert_eq!(player.ammo, player.weapon.clip_size());
        assert!(!player.reloading);
    }

    #[test]
    fn shield_caps_at_armor_limit() {
        let mut player = combatant_at(Vec2::ZERO);
        player.armor = 40.0;
        let item = LootItem::new(ItemId(1), ItemKind::Shield, player.pos);

        assert!(apply_pickup(&mut player, &item));
        assert!((player.armor - crate::constants::ARMOR_MAX).abs() < f32::EPSILON);
    }

    #[test]
    fn weapon_pickup_swaps_and_fills_the_new_clip() {
        let mut player = combatant_at(Vec2::ZERO);
        player.ammo = 3;
        let item = LootItem::new(ItemId(1), ItemKind::Weapon(WeaponKind::Rifle), player.pos);

        assert!(apply_pickup(&mut player, &item));
        assert_eq!(player.weapon, WeaponKind::Rifle);
        assert_eq!(player.ammo, WeaponKind::Rifle.clip_size());
    }

    #[test]
    fn spawning_respects_interval_and_cap() {
        let mut director = LootDirector::default();
        let mut loot = Vec::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut events = Vec::new();

        // Just under the interval: nothing yet.
        director.update(&mut loot, &[], &mut rng, LOOT_SPAWN_INTERVAL - 0.1, &mut events);
        assert!(loot.is_empty());

        director.update(&mut loot, &[], &mut rng, 0.2, &mut events);
        assert_eq!(loot.len(), 1);

        // Saturate to the cap; further intervals spawn nothing.
        for _ in 0..LOOT_CAP * 2 {
            director.update(&mut loot, &[], &mut rng, LOOT_SPAWN_INTERVAL, &mut events);
        }
        assert_eq!(loot.len(), LOOT_CAP);
    }

    #[test]
    fn placement_avoids_walls_when_possible() {
        let mut rng = StdRng::seed_from_u64(11);
        // One modest wall: rejection sampling should always find clear ground.
        let walls = [Wall::rect(800.0, 800.0, 200.0, 200.0)];
        for _ in 0..50 {
            let pos = place_clear_of_walls(&walls, &mut rng);
            assert!(!circle_overlaps_wall(pos, LOOT_RADIUS, &walls[0]));
        }
    }

    #[test]
    fn ids_are_unique_across_spawn_paths() {
        let mut director = LootDirector::default();
        let mut loot = Vec::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut events = Vec::new();

        director.update(&mut loot, &[], &mut rng, LOOT_SPAWN_INTERVAL, &mut events);
        director.drop_consumable_near(Vec2::new(500.0, 500.0), &mut loot, &mut rng, &mut events);
        director.drop_consumable_near(Vec2::new(500.0, 500.0), &mut loot, &mut rng, &mut events);

        let mut ids: Vec<u32> = loot.iter().map(|i| i.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), loot.len());
    }
}
