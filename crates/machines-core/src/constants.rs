//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Screen ---

/// Default playfield width (px).
pub const SCREEN_WIDTH: f64 = 1280.0;

/// Default playfield height (px).
pub const SCREEN_HEIGHT: f64 = 720.0;

/// Distance past a screen edge before an entity counts as off-screen.
pub const OFFSCREEN_MARGIN: f64 = 100.0;

/// Enemies enter this far above the top edge.
pub const SPAWN_Y_OFFSET: f64 = 50.0;

/// Horizontal keep-out from the screen edges for random spawn columns.
pub const SPAWN_X_MARGIN: f64 = 50.0;

/// Default cap on live registry entities.
pub const DEFAULT_MAX_ENTITIES: usize = 1024;

// --- Player ---

pub const PLAYER_WIDTH: f64 = 50.0;
pub const PLAYER_HEIGHT: f64 = 60.0;

/// Lives at session start.
pub const PLAYER_LIVES: u32 = 3;

/// Ship rotation speed (rad/s), 90 degrees per second.
pub const PLAYER_ROTATION_SPEED: f64 = std::f64::consts::FRAC_PI_2;

/// Maximum ship rotation either side of straight up (rad).
pub const PLAYER_MAX_ROTATION: f64 = std::f64::consts::FRAC_PI_2;

/// Player starts this far above the bottom edge.
pub const PLAYER_START_OFFSET_Y: f64 = 100.0;

// --- Primary weapon ---

/// Seconds between primary volleys.
pub const PRIMARY_COOLDOWN: f64 = 0.5;

/// Damage per primary projectile.
pub const PRIMARY_DAMAGE: i32 = 20;

/// Default primary projectile speed (px/s).
pub const PROJECTILE_SPEED: f64 = 500.0;

/// Projectile speed for the single_medium pattern (px/s).
pub const PROJECTILE_SPEED_MEDIUM: f64 = 650.0;

pub const PROJECTILE_WIDTH: f64 = 4.0;
pub const PROJECTILE_HEIGHT: f64 = 12.0;

/// Perpendicular offset of each barrel in the double pattern (px).
pub const DOUBLE_SHOT_OFFSET: f64 = 10.0;

/// Spread of the outer shots in the triple pattern (rad).
pub const TRIPLE_SPREAD: f64 = 20.0 * std::f64::consts::PI / 180.0;

/// Spread of the side shots in the quad pattern (rad).
pub const QUAD_SPREAD: f64 = 15.0 * std::f64::consts::PI / 180.0;

/// Inner and outer spread of the five pattern (rad).
pub const FIVE_SPREAD_INNER: f64 = 12.0 * std::f64::consts::PI / 180.0;
pub const FIVE_SPREAD_OUTER: f64 = 24.0 * std::f64::consts::PI / 180.0;

// --- Missiles ---

pub const MISSILE_DAMAGE: i32 = 30;
pub const MISSILE_SPEED: f64 = 400.0;

/// Missile steering limit (rad/s).
pub const MISSILE_TURN_RATE: f64 = 4.0;

pub const MISSILE_WIDTH: f64 = 10.0;
pub const MISSILE_HEIGHT: f64 = 25.0;

/// Lateral offset of each missile in a two-missile salvo (px).
pub const MISSILE_PAIR_OFFSET: f64 = 15.0;

/// Score multiplier for missile kills.
pub const MISSILE_KILL_SCORE_MULT: u32 = 2;

// --- Enemies ---

/// Multiplicative stat jitter, applied as 1 +/- this value.
pub const ENEMY_STAT_JITTER: f64 = 0.15;

/// Level contribution to the difficulty curve, per level above 1.
pub const DIFFICULTY_PER_LEVEL: f64 = 0.1;

/// Time contribution to the difficulty curve, per minute of level time.
pub const DIFFICULTY_PER_MINUTE: f64 = 0.05;

/// Damage dealt to the player by ramming (all kinds).
pub const ENEMY_CONTACT_DAMAGE: i32 = 10;

pub const ENEMY_PROJECTILE_SPEED: f64 = 200.0;
pub const ENEMY_PROJECTILE_DAMAGE: i32 = 5;
pub const ENEMY_PROJECTILE_WIDTH: f64 = 6.0;
pub const ENEMY_PROJECTILE_HEIGHT: f64 = 15.0;

/// Width of the shield bearer's protected arc (rad).
pub const SHIELD_ARC: f64 = 120.0 * std::f64::consts::PI / 180.0;

/// Blocked hits are divided by this factor (minimum 1 damage).
pub const SHIELD_DAMAGE_DIVISOR: i32 = 5;

/// Shield facing re-targets after a random delay in this range (s).
pub const SHIELD_RETARGET_MIN: f64 = 3.0;
pub const SHIELD_RETARGET_MAX: f64 = 6.0;

// --- Formations ---

/// Default spacing between formation slots (px).
pub const FORMATION_SPACING: f64 = 60.0;

/// Largest member count a content directive may request.
pub const MAX_FORMATION_MEMBERS: usize = 64;

/// Downward drift of a formation center (px/s).
pub const FORMATION_DRIFT_SPEED: f64 = 40.0;

/// Angular rate of a rotating formation (rad/s).
pub const FORMATION_ROTATE_RATE: f64 = 0.8;

/// Horizontal sway of a wave formation (px) and its angular frequency (rad/s).
pub const FORMATION_WAVE_AMPLITUDE: f64 = 120.0;
pub const FORMATION_WAVE_FREQUENCY: f64 = 0.8;

/// Split: hold time before widening, widening time, final horizontal scale.
pub const FORMATION_SPLIT_DELAY: f64 = 1.0;
pub const FORMATION_SPLIT_DURATION: f64 = 2.0;
pub const FORMATION_SPLIT_SCALE: f64 = 2.5;

/// Converge: shrink time and the final offset scale of the tight cluster.
pub const FORMATION_CONVERGE_DURATION: f64 = 2.0;
pub const FORMATION_CONVERGE_SCALE: f64 = 0.25;

// --- Collectibles ---

pub const COLLECTIBLE_SIZE: f64 = 20.0;

/// Drop chance for a primary-weapon kill.
pub const DROP_CHANCE: f64 = 0.3;

/// Drop chance for a missile kill.
pub const DROP_CHANCE_MISSILE: f64 = 0.5;

/// Relative weights of star / health / shield drops.
pub const DROP_WEIGHTS: [u32; 3] = [70, 20, 10];

pub const STAR_VALUE_MIN: u32 = 5;
pub const STAR_VALUE_MAX: u32 = 15;
pub const HEALTH_PACK_VALUE: u32 = 25;
pub const SHIELD_PACK_VALUE: u32 = 50;

/// Fall speeds (px/s).
pub const STAR_FALL_SPEED: f64 = 80.0;
pub const PACK_FALL_SPEED: f64 = 100.0;

/// Wobble of falling pickups: amplitude range (px) and frequency range (rad/s).
pub const WOBBLE_AMOUNT_MIN: f64 = 10.0;
pub const WOBBLE_AMOUNT_MAX: f64 = 20.0;
pub const WOBBLE_SPEED_MIN: f64 = 1.5;
pub const WOBBLE_SPEED_MAX: f64 = 3.0;

/// Peak magnet pull (px/s) at zero distance; falls off linearly to the radius.
pub const MAGNET_STRENGTH: f64 = 300.0;

// --- Obstacles ---

/// Damage dealt to the player when an obstacle shatters against it.
pub const OBSTACLE_CONTACT_DAMAGE: i32 = 15;

// --- Particles ---

pub const PARTICLES_PER_KILL: usize = 8;
pub const PARTICLE_LIFETIME: f64 = 0.5;
pub const PARTICLE_SPEED_MIN: f64 = 60.0;
pub const PARTICLE_SPEED_MAX: f64 = 180.0;
pub const PARTICLE_SIZE: f64 = 4.0;

// --- Spatial grid ---

/// Broad-phase cell edge (px).
pub const COLLISION_CELL_SIZE: f64 = 64.0;

// --- Flocking ---

pub const FLOCK_NEIGHBOR_RADIUS: f64 = 120.0;
pub const FLOCK_SEPARATION_RADIUS: f64 = 45.0;
pub const FLOCK_SEPARATION_WEIGHT: f64 = 1.6;
pub const FLOCK_ALIGNMENT_WEIGHT: f64 = 0.6;
pub const FLOCK_COHESION_WEIGHT: f64 = 0.4;
pub const FLOCK_GOAL_WEIGHT: f64 = 0.8;

/// How quickly a flocking entity turns toward its desired heading (1/s).
pub const FLOCK_RESPONSE: f64 = 4.0;

// --- Level ---

/// Level duration is this plus LEVEL_DURATION_PER_LEVEL per level above 1 (s).
pub const LEVEL_BASE_DURATION: f64 = 90.0;
pub const LEVEL_DURATION_PER_LEVEL: f64 = 15.0;

/// Floor on the spawn interval of generated waves (s).
pub const MIN_SPAWN_INTERVAL: f64 = 0.5;

/// Interval decay per level for generated waves.
pub const SPAWN_INTERVAL_DECAY: f64 = 0.8;
