use bevy_math::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::collision::{segment_hits_combatant, segment_hits_wall};
use crate::constants::{BULLET_RADIUS, PHYSICS_EPSILON};
use crate::entities::{Bullet, BulletId, Combatant, Side, Wall};
use crate::events::SimEvent;
use crate::weapons::WeaponKind;

// ============================================================================
// Firing
// ============================================================================

const fn bullet_color(weapon: WeaponKind) -> u32 {
    match weapon {
        WeaponKind::Pistol => 0x00ff_d75f,
        WeaponKind::Smg => 0x00ff_af87,
        WeaponKind::Shotgun => 0x00ff_8700,
        WeaponKind::Rifle => 0x005f_d7ff,
        WeaponKind::Sniper => 0x00ff_5fd7,
    }
}

// One trigger pull. A dry pull (ammo at zero) is not an error: it starts the
// reload. Emptying the clip with the final round also starts the reload.
// Returns true when at least one bullet left the barrel.
pub fn try_fire(
    shooter: &mut Combatant,
    side: Side,
    now: f32,
    rng: &mut StdRng,
    next_bullet_id: &mut u32,
    bullets: &mut Vec<Bullet>,
    events: &mut Vec<SimEvent>,
) -> bool {
    if shooter.reloading {
        return false;
    }

    let stats = shooter.weapon.stats();
    if now - shooter.last_fired_at < stats.fire_interval {
        return false;
    }

    if shooter.ammo == 0 {
        shooter.begin_reload();
        events.push(SimEvent::ReloadStarted { side });
        return false;
    }

    shooter.ammo -= 1;
    shooter.last_fired_at = now;

    let muzzle = shooter.pos + Vec2::from_angle(shooter.angle) * shooter.bullet_spawn_radius();
    for _ in 0..stats.pellets {
        let spread = if stats.spread > 0.0 {
            rng.gen_range(-stats.spread / 2.0..=stats.spread / 2.0)
        } else {
            0.0
        };
        let dir = Vec2::from_angle(shooter.angle + spread);

        bullets.push(Bullet {
            id: BulletId(*next_bullet_id),
            owner: side,
            pos: muzzle,
            vel: dir * stats.bullet_speed,
            radius: BULLET_RADIUS,
            damage: stats.damage,
            range_remaining: stats.range,
            color: bullet_color(shooter.weapon),
        });
        *next_bullet_id += 1;
    }

    events.push(SimEvent::ShotFired {
        shooter: side,
        weapon: shooter.weapon,
        pos: muzzle,
    });

    if shooter.ammo == 0 {
        shooter.begin_reload();
        events.push(SimEvent::ReloadStarted { side });
    }

    true
}

// Checked every tick; refills the clip once the reload timer runs out.
pub fn finish_reload(combatant: &mut Combatant, delta: std::time::Duration) {
    if !combatant.reloading {
        return;
    }
    combatant.reload.tick(delta);
    if combatant.reload.is_finished() {
        combatant.reloading = false;
        combatant.ammo = combatant.weapon.clip_size();
    }
}

// ============================================================================
// Damage
// ============================================================================

// Armor absorbs up to its own value per hit; it is not an unlimited buffer,
// and a hit that lands on armor deals no hp damage this tick. Either way the
// damage stamp and regen accumulator reset.
pub fn apply_damage(target: &mut Combatant, damage: f32, now: f32) {
    if target.armor > 0.0 {
        target.armor = (target.armor - damage).max(0.0);
    } else {
        target.hp = (target.hp - damage).clamp(0.0, target.max_hp);
    }
    target.last_damage_at = now;
    target.regen.reset();
}

// ============================================================================
// Bullet Advancement
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct HitReport {
    pub target: Side,
    pub damage: f32,
    pub pos: Vec2,
}

// Integrate every live bullet, sweeping its per-tick path. Removal reasons:
// wall hit, non-owner combatant hit, range exhausted. The path is clamped to
// the remaining range so a round never damages past its reach.
pub fn advance_bullets(
    bullets: &mut Vec<Bullet>,
    walls: &[Wall],
    player: &mut Combatant,
    opponent: &mut Combatant,
    now: f32,
    dt: f32,
    events: &mut Vec<SimEvent>,
) -> Vec<HitReport> {
    let mut hits = Vec::new();

    bullets.retain_mut(|bullet| {
        let step = bullet.vel.length() * dt;
        let travel = step.min(bullet.range_remaining);
        if travel <= PHYSICS_EPSILON {
            return false;
        }
        let end = bullet.pos + bullet.vel.normalize_or_zero() * travel;

        // Earliest wall strike along the path.
        let wall_t = walls
            .iter()
            .filter_map(|w| segment_hits_wall(bullet.pos, end, w))
            .fold(None::<f32>, |best, t| Some(best.map_or(t, |b| b.min(t))));

        // The one combatant a bullet can hurt is the non-owner.
        let target_side = bullet.owner.opposite();
        let target = match target_side {
            Side::Player => &mut *player,
            Side::Opponent => &mut *opponent,
        };
        let target_t = if target.alive() {
            segment_hits_combatant(bullet.pos, end, bullet.radius, target)
        } else {
            None
        };

        match (wall_t, target_t) {
            (Some(wt), Some(tt)) if wt <= tt => {
                events.push(SimEvent::BulletHitWall {
                    pos: bullet.pos + (end - bullet.pos) * wt,
                });
                false
            }
            (_, Some(tt)) => {
                let impact = bullet.pos + (end - bullet.pos) * tt;
                apply_damage(target, bullet.damage, now);
                events.push(SimEvent::CombatantHit {
                    target: target_side,
                    damage: bullet.damage,
                    pos: impact,
                });
                hits.push(HitReport {
                    target: target_side,
                    damage: bullet.damage,
                    pos: impact,
                });
                false
            }
            (Some(wt), None) => {
                events.push(SimEvent::BulletHitWall {
                    pos: bullet.pos + (end - bullet.pos) * wt,
                });
                false
            }
            (None, None) => {
                bullet.pos = end;
                bullet.range_remaining -= travel;
                bullet.range_remaining > PHYSICS_EPSILON
            }
        }
    });

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlayerId;
    use rand::SeedableRng;
    use std::time::Duration;

    fn shooter_at(pos: Vec2) -> Combatant {
        Combatant::spawn(PlayerId(1), pos, false)
    }

    fn fire_once(shooter: &mut Combatant, now: f32, bullets: &mut Vec<Bullet>) -> bool {
        let mut rng = StdRng::seed_from_u64(1);
        let mut next_id = 0;
        let mut events = Vec::new();
        try_fire(shooter, Side::Player, now, &mut rng, &mut next_id, bullets, &mut events)
    }

    #[test]
    fn emptying_the_clip_triggers_reload_and_refill() {
        let mut shooter = shooter_at(Vec2::new(100.0, 100.0));
        let mut bullets = Vec::new();
        let interval = shooter.weapon.stats().fire_interval;
        let clip = shooter.weapon.clip_size();

        let mut now = 0.0;
        for round in 0..clip {
            assert!(fire_once(&mut shooter, now, &mut bullets), "round {round} refused");
            now += interval;
        }

        assert_eq!(shooter.ammo, 0);
        assert!(shooter.reloading);
        assert_eq!(bullets.len(), clip as usize);

        // After the reload time elapses the clip is full again.
        let reload_for = Duration::from_secs_f32(shooter.weapon.stats().reload_time + 0.01);
        finish_reload(&mut shooter, reload_for);
        assert!(!shooter.reloading);
        assert_eq!(shooter.ammo, clip);
    }

    #[test]
    fn dry_pull_starts_reload_without_a_bullet() {
        let mut shooter = shooter_at(Vec2::ZERO);
        shooter.ammo = 0;
        let mut bullets = Vec::new();

        assert!(!fire_once(&mut shooter, 10.0, &mut bullets));
        assert!(shooter.reloading);
        assert!(bullets.is_empty());
    }

    #[test]
    fn fire_rate_is_enforced() {
        let mut shooter = shooter_at(Vec2::ZERO);
        let mut bullets = Vec::new();

        assert!(fire_once(&mut shooter, 1.0, &mut bullets));
        let too_soon = 1.0 + shooter.weapon.stats().fire_interval * 0.5;
        assert!(!fire_once(&mut shooter, too_soon, &mut bullets));
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn shotgun_spawns_five_independent_pellets() {
        let mut shooter = shooter_at(Vec2::ZERO);
        shooter.equip(WeaponKind::Shotgun);
        let mut bullets = Vec::new();

        assert!(fire_once(&mut shooter, 1.0, &mut bullets));
        assert_eq!(bullets.len(), 5);
        assert_eq!(shooter.ammo, WeaponKind::Shotgun.clip_size() - 1);

        // Pellets fan out: not all share one heading.
        let first = bullets[0].vel.normalize();
        assert!(bullets.iter().any(|b| b.vel.normalize().dot(first) < 0.9999));
    }

    #[test]
    fn armor_absorbs_without_overflow() {
        let mut target = shooter_at(Vec2::ZERO);
        target.armor = 10.0;

        apply_damage(&mut target, 25.0, 5.0);
        assert!((target.armor - 0.0).abs() < f32::EPSILON);
        assert!((target.hp - target.max_hp).abs() < f32::EPSILON); // no spill into hp

        apply_damage(&mut target, 25.0, 6.0);
        assert!((target.hp - (target.max_hp - 25.0)).abs() < 1e-4);
        assert!((target.last_damage_at - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn bullet_expires_at_exact_range() {
        let stats = WeaponKind::Pistol.stats();
        let mut bullets = vec![Bullet {
            id: BulletId(0),
            owner: Side::Player,
            pos: Vec2::ZERO,
            vel: Vec2::new(stats.bullet_speed, 0.0),
            radius: BULLET_RADIUS,
            damage: stats.damage,
            range_remaining: stats.range,
            color: 0,
        }];
        let mut player = shooter_at(Vec2::new(-5000.0, -5000.0));
        let mut opponent = shooter_at(Vec2::new(5000.0, 5000.0));
        let mut events = Vec::new();

        // Flight time is range/speed; step just short of it keeps the bullet.
        let flight = stats.range / stats.bullet_speed;
        advance_bullets(&mut bullets, &[], &mut player, &mut opponent, 0.0, flight - 0.01, &mut events);
        assert_eq!(bullets.len(), 1);

        advance_bullets(&mut bullets, &[], &mut player, &mut opponent, 0.0, 0.02, &mut events);
        assert!(bullets.is_empty());
    }

    #[test]
    fn wall_in_front_of_target_shields_it() {
        let mut bullets = vec![Bullet {
            id: BulletId(0),
            owner: Side::Player,
            pos: Vec2::new(0.0, 0.0),
            vel: Vec2::new(1200.0, 0.0),
            radius: BULLET_RADIUS,
            damage: 12.0,
            range_remaining: 700.0,
            color: 0,
        }];
        let walls = [Wall::rect(200.0, 0.0, 20.0, 200.0)];
        let mut player = shooter_at(Vec2::new(-100.0, 0.0));
        let mut opponent = shooter_at(Vec2::new(400.0, 0.0));
        let mut events = Vec::new();

        let hits = advance_bullets(&mut bullets, &walls, &mut player, &mut opponent, 0.0, 1.0, &mut events);
        assert!(hits.is_empty());
        assert!(bullets.is_empty());
        assert!((opponent.hp - opponent.max_hp).abs() < f32::EPSILON);
        assert!(events.iter().any(|e| matches!(e, SimEvent::BulletHitWall { .. })));
    }

    #[test]
    fn bullet_damages_only_the_non_owner() {
        let mut bullets = vec![Bullet {
            id: BulletId(0),
            owner: Side::Player,
            pos: Vec2::new(0.0, 0.0),
            vel: Vec2::new(1200.0, 0.0),
            radius: BULLET_RADIUS,
            damage: 12.0,
            range_remaining: 700.0,
            color: 0,
        }];
        // The owner stands on the path; the opponent is behind them.
        let mut player = shooter_at(Vec2::new(100.0, 0.0));
        let mut opponent = shooter_at(Vec2::new(300.0, 0.0));
        let mut events = Vec::new();

        let hits = advance_bullets(&mut bullets, &[], &mut player, &mut opponent, 2.0, 1.0, &mut events);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, Side::Opponent);
        assert!((player.hp - player.max_hp).abs() < f32::EPSILON);
        assert!(opponent.hp < opponent.max_hp);
    }
}
