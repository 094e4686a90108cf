// walls_bot/bot/src/core/config.rs
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use super::constants::*;
use super::error::{BotError, BotResult};
use super::types::{Color, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotIdentity {
    pub name: String,
    pub version: String,
    pub authors: Vec<String>,
}

impl Default for BotIdentity {
    fn default() -> Self {
        BotIdentity {
            name: "Walls".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            authors: vec!["Mathew Nelson".to_string(), "Flemming N. Larsen".to_string()],
        }
    }
}

/// Cosmetic only. Applied once when the bot starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotColors {
    pub body: Color,
    pub turret: Color,
    pub radar: Color,
    pub bullet: Color,
    pub scan: Color,
}

impl Default for BotColors {
    fn default() -> Self {
        BotColors {
            body: Color::BLACK,
            turret: Color::BLACK,
            radar: Color::ORANGE,
            bullet: Color::CYAN,
            scan: Color::CYAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub fire_power: f64,
    pub nudge_distance: f64,
    pub colors: BotColors,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        NavigatorConfig {
            fire_power: DEFAULT_FIRE_POWER,
            nudge_distance: DEFAULT_NUDGE_DISTANCE,
            colors: BotColors::default(),
        }
    }
}

/// What happens to an in-flight command when another command targets the
/// same slot (movement, body turn or gun turn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptPolicy {
    /// The new amount replaces the remaining one; the old waiter resolves as superseded.
    #[default]
    Override,
    /// The new command waits until the slot is free.
    Queue,
}

impl FromStr for InterruptPolicy {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "override" => Ok(InterruptPolicy::Override),
            "queue" => Ok(InterruptPolicy::Queue),
            other => Err(BotError::ConfigError(format!("Unknown interrupt policy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tick_interval_ms: u64,
    pub interrupt_policy: InterruptPolicy,
    pub max_settle_passes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            interrupt_policy: InterruptPolicy::default(),
            max_settle_passes: DEFAULT_MAX_SETTLE_PASSES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    pub arena_width: f64,
    pub arena_height: f64,
    pub start_position: Option<Vec2>,
    pub start_direction: Option<f64>,
    pub start_gun_direction: Option<f64>,
    /// Stationary opponents. When empty, `random_opponents` are placed using `seed`.
    pub opponents: Vec<Vec2>,
    pub random_opponents: usize,
    pub max_turns: u64,
    pub seed: u64,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        PracticeConfig {
            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            start_position: None,
            start_direction: None,
            start_gun_direction: None,
            opponents: Vec::new(),
            random_opponents: 3,
            max_turns: DEFAULT_MAX_TURNS,
            seed: 0x5EED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub identity: BotIdentity,
    pub navigator: NavigatorConfig,
    pub runtime: RuntimeConfig,
    pub practice: PracticeConfig,
}

impl BotConfig {
    pub fn from_yaml_str(yaml: &str) -> BotResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| BotError::ConfigError(e.to_string()))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> BotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Loads `WALLS_CONFIG` if set, otherwise defaults, then applies env overrides.
    pub fn load() -> BotResult<Self> {
        let mut config = match std::env::var("WALLS_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> BotResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = non_blank("BOT_NAME") {
            self.identity.name = name;
        }
        if let Some(version) = non_blank("BOT_VERSION") {
            self.identity.version = version;
        }
        if let Some(authors) = non_blank("BOT_AUTHORS") {
            self.identity.authors = authors.split(',').map(|a| a.trim().to_string()).collect();
        }
        if let Some(power) = non_blank("WALLS_FIRE_POWER") {
            self.navigator.fire_power = parse_number("WALLS_FIRE_POWER", &power)?;
        }
        if let Some(nudge) = non_blank("WALLS_NUDGE_DISTANCE") {
            self.navigator.nudge_distance = parse_number("WALLS_NUDGE_DISTANCE", &nudge)?;
        }
        if let Some(policy) = non_blank("WALLS_INTERRUPT_POLICY") {
            self.runtime.interrupt_policy = policy.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> BotResult<()> {
        if self.identity.name.trim().is_empty() {
            return Err(BotError::ConfigError("Bot name must not be blank".into()));
        }
        let power = self.navigator.fire_power;
        if !(MIN_FIREPOWER..=MAX_FIREPOWER).contains(&power) {
            return Err(BotError::ConfigError(format!(
                "fire_power {} outside [{}, {}]",
                power, MIN_FIREPOWER, MAX_FIREPOWER
            )));
        }
        if !(self.navigator.nudge_distance > 0.0 && self.navigator.nudge_distance.is_finite()) {
            return Err(BotError::ConfigError("nudge_distance must be positive".into()));
        }
        let p = &self.practice;
        if !(p.arena_width > 0.0 && p.arena_height > 0.0 && p.arena_width.is_finite() && p.arena_height.is_finite()) {
            return Err(BotError::ConfigError(format!(
                "Arena size must be positive, got {}x{}",
                p.arena_width, p.arena_height
            )));
        }
        if p.arena_width < 4.0 * BOT_BOUNDING_CIRCLE_RADIUS || p.arena_height < 4.0 * BOT_BOUNDING_CIRCLE_RADIUS {
            return Err(BotError::ConfigError("Arena too small for a bot".into()));
        }
        let angles = [("start_direction", p.start_direction), ("start_gun_direction", p.start_gun_direction)];
        if let Some((field, angle)) = angles.iter().find(|(_, a)| a.is_some_and(|a| !a.is_finite())) {
            return Err(BotError::ConfigError(format!("{} must be finite, got {:?}", field, angle)));
        }
        if let Some(point) = p.start_position.iter().chain(&p.opponents).find(|v| !(v.x.is_finite() && v.y.is_finite())) {
            return Err(BotError::ConfigError(format!("Positions must be finite, got {:?}", point)));
        }
        if self.runtime.max_settle_passes == 0 {
            return Err(BotError::ConfigError("max_settle_passes must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> BotResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| BotError::ConfigError(format!("{} is not a number: '{}'", key, raw)))
}
