//! Simulation constants and tuning parameters.
//!
//! Distances are in world units, angles in radians, speeds in units per second.

use std::f32::consts::TAU;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Planets ---

/// Atmosphere thickness above the ground height.
pub const ATM_HEIGHT: f32 = 14.0;

/// Largest ground height a planet may be generated with.
pub const MAX_GROUND_HEIGHT: f32 = 25.0;

/// Camera distance above the ground at which a planet expands its objects.
pub const MAX_SKY_HEIGHT: f32 = 1.5 * ATM_HEIGHT;

/// Size of a tile in the outermost ground row.
pub const TOP_TILE_SIZE: f32 = 2.0;

/// Landing spots recorded for every expanded planet.
pub const LANDING_PLACE_COUNT: usize = 10;

/// Linear orbit speed of a planet around its sun, converted per planet to an angular rate.
pub const PLANET_ORBIT_SPEED: f32 = 0.2;

/// Linear speed of a planet's surface spin, converted per planet to an angular rate.
pub const GROUND_SPEED: f32 = 0.2;

// --- Systems ---

/// Radius of a star, also the radial step of the placement search ring.
pub const SUN_RADIUS: f32 = 2.0 * (MAX_GROUND_HEIGHT + ATM_HEIGHT);

/// Radius inside which the sun's gravity is clamped.
pub const SUN_HOT_RADIUS: f32 = 0.75 * SUN_RADIUS;

/// Gravity constant of every sun.
pub const SUN_GRAV_CONST: f32 = 2000.0;

/// Free space reserved on each side of a planet or belt slot.
pub const PLANET_GAP: f32 = 8.0;

/// Orbital slots per system.
pub const PLANETS_PER_SYSTEM: usize = 5;

/// Half radial width of an asteroid belt.
pub const BELT_HALF_WIDTH: f32 = 20.0;

/// Chance that an eligible inner slot becomes the system's belt.
pub const BELT_CHANCE: f32 = 0.6;

/// Mazes generated per requested system.
pub const MAZES_PER_SYSTEM: usize = 2;

/// Largest maze radius.
pub const MAX_MAZE_RADIUS: f32 = 40.0;

/// Clearance kept between a maze and its neighbours.
pub const MAZE_GAP: f32 = 10.0;

/// Allowed drift between a system's declared radius and its slot accounting.
pub const RADIUS_EPSILON: f32 = 1e-3;

// --- Placement ---

/// Random angles sampled per search ring or per flat-place search.
pub const PLACEMENT_TRIES: usize = 20;

/// Search rings tried before exclusion placement settles for its best candidate.
pub const MAX_RING_STEPS: usize = 64;

// --- Planet objects ---

pub const CLOUD_DENSITY: f32 = 0.2;
pub const MAX_CLOUD_PIECE_SIZE: f32 = 1.5;
/// Spin of a single cloud piece (rad/s).
pub const MAX_CLOUD_PIECE_ROT_SPEED: f32 = 0.087;
/// Tilt of a single cloud piece.
pub const MAX_CLOUD_PIECE_TILT: f32 = std::f32::consts::FRAC_PI_6;
pub const MAX_CLOUD_PIECE_COUNT: usize = 30;
pub const MAX_CLOUD_PIECE_DIST_SHIFT: f32 = 1.0;
pub const MAX_CLOUD_LINEAR_SPEED: f32 = 0.1;
pub const AVG_CLOUD_LINEAR_WIDTH: f32 = 3.0;

/// Radial quantization of decoration packs.
pub const DECO_PACK_SIZE: f32 = 5.0;

/// Angular quantization of decoration packs, the pack size seen from the largest ground height.
pub const DECO_PACK_ANGULAR_WIDTH: f32 = TAU * DECO_PACK_SIZE / (TAU * MAX_GROUND_HEIGHT);

/// Attempts to find an unconsumed angle for one decoration.
pub const DECO_PLACE_TRIES: usize = 5;

/// Atmosphere band `(offset, width)` populated by low-orbit enemies, as fractions of `ATM_HEIGHT`.
pub const LOW_ORBIT_BAND: (f32, f32) = (0.0, 0.1);

/// Atmosphere band `(offset, width)` populated by high-orbit enemies.
pub const HIGH_ORBIT_BAND: (f32, f32) = (0.1, 0.6);

// --- Streaming ---

/// Fastest speed any entity may travel. Bounds far-entity wake-up delays.
pub const MAX_MOVE_SPEED: f32 = 8.0;

/// Live entities farther than `FAR_BEGIN_FACTOR * far end` are demoted.
pub const FAR_BEGIN_FACTOR: f32 = 1.33;

/// Far entities closer than `FAR_END_FACTOR * view distance` are promoted.
pub const FAR_END_FACTOR: f32 = 1.5;

/// Seconds between live radius recalculations.
pub const RADIUS_RECALC_PERIOD: f32 = 1.0;

// --- Random streams ---

/// Generator stream used by galaxy layout.
pub const GALAXY_STREAM: u64 = 0;

/// Generator stream used for cosmetic choices (texture variants, flips).
pub const COSMETIC_STREAM: u64 = u64::MAX;
