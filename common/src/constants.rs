// ============================================================================
// Simulation Pacing
// ============================================================================

pub const TICK_RATE_HZ: u64 = 60;
// Longest physics step accepted in one tick; a backgrounded peer resuming
// after seconds must not integrate one giant step.
pub const MAX_TICK_DT: f32 = 0.05; // seconds

pub const STATE_BROADCAST_INTERVAL: f32 = 0.05; // seconds (20 Hz)
pub const HUD_UPDATE_INTERVAL: f32 = 0.1; // seconds

// ============================================================================
// Floating-Point Comparisons
// ============================================================================

// Small value for floating-point comparisons (near-zero checks, division guards).
pub const PHYSICS_EPSILON: f32 = 1e-6;

// ============================================================================
// Arena
// ============================================================================

pub const ARENA_WIDTH: f32 = 1600.0; // world units
pub const ARENA_HEIGHT: f32 = 1600.0;
// Boundary rectangles extend well past the playfield so fast entities cannot
// step over them in one tick.
pub const BOUNDARY_THICKNESS: f32 = 400.0;

pub const OBSTACLE_COUNT: usize = 14;
pub const OBSTACLE_MIN_SIZE: f32 = 60.0;
pub const OBSTACLE_MAX_SIZE: f32 = 180.0;
pub const PILLAR_RADIUS: f32 = 36.0;
pub const SPAWN_CLEARANCE: f32 = 120.0; // obstacle-free radius around spawn points

// ============================================================================
// Combatants
// ============================================================================

pub const COMBATANT_RADIUS: f32 = 14.0;
pub const COMBATANT_MAX_HP: f32 = 100.0;
pub const ARMOR_MAX: f32 = 50.0;

// Speeds (units per second)
pub const MOVE_SPEED: f32 = 220.0;
pub const SPRINT_MULTIPLIER: f32 = 1.6;
pub const SPRINT_DURATION: f32 = 1.5; // seconds
pub const SPRINT_COOLDOWN: f32 = 4.0; // seconds, counted from sprint start

// Exponential velocity approach rates (per second)
pub const ACCEL_RATE: f32 = 8.0;
pub const FRICTION_RATE: f32 = 10.0;
pub const TURN_ACCEL_RATE: f32 = 14.0; // reversing direction, fastest
pub const VELOCITY_SNAP_EPSILON: f32 = 0.5; // below this, velocity snaps to zero

// Wall response
pub const WALL_BOUNCE_DAMPING: f32 = 0.1; // fraction of velocity kept (inverted) on block
pub const WALL_SLIDE_DAMPING: f32 = 0.7; // cross-axis damping while sliding
pub const UNSTUCK_ITERATIONS: usize = 3;
pub const UNSTUCK_PADDING: f32 = 0.5; // pushed this far clear of a penetrated wall

// Health regeneration: after a damage-free interval, heal a fixed amount and
// start counting again. Any damage resets the count.
pub const REGEN_INTERVAL: f32 = 1.5; // seconds
pub const REGEN_HEAL: f32 = 4.0; // hp per interval

// ============================================================================
// Aiming
// ============================================================================

pub const AIM_DEADZONE: f32 = 0.25; // stick magnitude
pub const AIM_TURN_RATE: f32 = 11.0; // angular exponential approach rate, per second
pub const AUTO_FIRE_THRESHOLD: f32 = 0.92; // stick magnitude
pub const MUZZLE_OFFSET: f32 = 6.0; // bullet spawn distance past the combatant radius

// Aim assist (stick/touch affordance, local player only)
pub const SNAP_MAX_RANGE: f32 = 600.0;
pub const SNAP_ACQUIRE_CONE: f32 = 0.35; // radians, half-angle
pub const SNAP_MAINTAIN_CONE: f32 = 0.70; // radians, wider for hysteresis
pub const SNAP_BLEND_STRENGTH: f32 = 0.6; // lerp weight toward exact target angle
pub const SNAP_FIRE_THRESHOLD: f32 = 0.5; // lowered auto-fire threshold while snapped

// ============================================================================
// Bullets
// ============================================================================

pub const BULLET_RADIUS: f32 = 3.0;

// ============================================================================
// Loot
// ============================================================================

pub const LOOT_RADIUS: f32 = 12.0;
pub const LOOT_SPAWN_INTERVAL: f32 = 4.0; // seconds
pub const LOOT_CAP: usize = 8;
pub const LOOT_PLACEMENT_ATTEMPTS: usize = 12;
pub const LOOT_EDGE_MARGIN: f32 = 60.0; // keep spawns off the boundary

pub const MEDKIT_HEAL: f32 = 35.0;
pub const MEGA_HEALTH_HEAL: f32 = 100.0;
pub const SHIELD_ARMOR: f32 = 25.0;

// Chance that a bot drops a consumable when damaged (single-player only).
pub const BOT_DAMAGE_DROP_CHANCE: f64 = 0.15;
pub const DAMAGE_DROP_SCATTER: f32 = 40.0; // dropped items land within this radius

// ============================================================================
// Zone
// ============================================================================

// Covers the whole arena including corners until the shrink starts.
pub const ZONE_INITIAL_RADIUS: f32 = 1200.0;
pub const ZONE_MIN_RADIUS: f32 = 150.0;
pub const ZONE_SHRINK_START: f32 = 30.0; // seconds of match time
pub const ZONE_SHRINK_DURATION: f32 = 90.0; // seconds
pub const ZONE_DAMAGE_PER_SECOND: f32 = 10.0;

// ============================================================================
// Match
// ============================================================================

pub const MATCH_DURATION: f32 = 240.0; // seconds

// ============================================================================
// Bot AI
// ============================================================================

pub const BOT_CRITICAL_HP: f32 = 25.0;
pub const BOT_LOW_HP: f32 = 40.0;
pub const BOT_LOOT_SEARCH_RADIUS: f32 = 500.0;
pub const BOT_DANGER_DISTANCE: f32 = 350.0;
pub const BOT_ADVANTAGE_MARGIN: f32 = 20.0; // hp lead counted as an advantage

// Preferred engagement distance as a fraction of weapon range.
pub const BOT_OPTIMAL_RANGE_FRACTION: f32 = 0.6;
pub const BOT_PRESSING_RANGE_FRACTION: f32 = 0.4; // tighter when pressing an advantage
pub const BOT_RANGE_BAND: f32 = 0.15; // +/- tolerance around the optimal distance

pub const BOT_WEAVE_FREQUENCY: f32 = 3.1; // radians per second
pub const BOT_WEAVE_GAIN: f32 = 0.45; // perpendicular intent mixed into approach
pub const BOT_ZIGZAG_FREQUENCY: f32 = 4.3;
pub const BOT_ZIGZAG_GAIN: f32 = 0.6;
pub const BOT_STRAFE_FLIP_RATE: f32 = 0.7; // sine rate driving strafe direction flips
pub const BOT_STRAFE_WOBBLE: f32 = 0.3; // secondary radial oscillation while strafing

pub const BOT_STUCK_SPEED: f32 = 8.0; // units per second counted as "not moving"
pub const BOT_STUCK_TIME: f32 = 0.4; // seconds of no progress before the override
pub const BOT_UNSTUCK_DURATION: f32 = 0.9; // seconds spent sweeping
pub const BOT_UNSTUCK_SWEEP_RATE: f32 = 4.0; // radians per second of full-circle sweep

pub const BOT_FIRE_RANGE_MULTIPLIER: f32 = 1.1; // may fire slightly past weapon range
pub const BOT_AIM_LEAD_FACTOR: f32 = 0.35;
// Primary difficulty lever: chance an otherwise-valid trigger pull happens.
pub const BOT_ACCURACY: f64 = 0.7;

// ============================================================================
// Networking
// ============================================================================

// Client gives up if the host never delivers Init.
pub const CONNECT_TIMEOUT: f32 = 10.0; // seconds
// Host decays remote intent to neutral after this long without Input.
pub const INPUT_GRACE: f32 = 1.0; // seconds
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;
