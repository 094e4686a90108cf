// walls_bot/bot/src/core/constants.rs
use std::time::Duration;

// Navigator behaviour
pub const DEFAULT_FIRE_POWER: f64 = 2.0;
pub const DEFAULT_NUDGE_DISTANCE: f64 = 100.0; // Back off / push past distance on bot collision
pub const WALL_TURN_DEGREES: f64 = 90.0;

// Bot physics (mirrors the arena rules the bot is played under)
pub const MAX_SPEED: f64 = 8.0;
pub const MAX_TURN_RATE: f64 = 10.0;
pub const MAX_GUN_TURN_RATE: f64 = 20.0;
pub const MIN_FIREPOWER: f64 = 0.1;
pub const MAX_FIREPOWER: f64 = 3.0;
pub const INITIAL_GUN_HEAT: f64 = 3.0;
pub const GUN_COOLING_RATE: f64 = 0.1;
pub const BOT_BOUNDING_CIRCLE_RADIUS: f64 = 18.0;
pub const RADAR_RADIUS: f64 = 1200.0;
pub const RADAR_ARC_DEGREES: f64 = 45.0;

// Practice arena defaults
pub const DEFAULT_ARENA_WIDTH: f64 = 800.0;
pub const DEFAULT_ARENA_HEIGHT: f64 = 600.0;
pub const DEFAULT_MAX_TURNS: u64 = 2_000;

// Runtime
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 0; // 0 = free running
pub const DEFAULT_MAX_SETTLE_PASSES: usize = 16;
pub const SLOW_TICK_LOG: Duration = Duration::from_millis(30);

pub const NEAR_ZERO: f64 = 0.00001;
