// walls_bot/bot/src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{BotError, BotResult};

pub type BotId = u32;

// --- Basic Geometric Types ---
#[derive(Clone, Debug, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self { Vec2 { x, y } }

    pub fn distance_to(&self, other: Vec2) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

// --- Colors ---
/// RGB color, written as `#RRGGBB` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const ORANGE: Color = Color::rgb(0xFF, 0x80, 0x00);
    pub const CYAN: Color = Color::rgb(0x00, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn from_hex(hex: &str) -> BotResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(BotError::ConfigError(format!("Invalid color '{}'", hex))),
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| BotError::ConfigError(format!("Invalid color '{}'", hex)))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = BotError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// --- Perception Events ---
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedBotEvent {
    pub scanned_bot_id: BotId,
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitBotEvent {
    pub victim_id: BotId,
    pub x: f64,
    pub y: f64,
    pub rammed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BotEvent {
    ScannedBot(ScannedBotEvent),
    HitBot(HitBotEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ScannedBot,
    HitBot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPriority {
    High,
    Normal,
}

impl BotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BotEvent::ScannedBot(_) => EventKind::ScannedBot,
            BotEvent::HitBot(_) => EventKind::HitBot,
        }
    }

    /// Collisions are handled before detections delivered in the same tick.
    pub fn priority(&self) -> EventPriority {
        match self {
            BotEvent::HitBot(_) => EventPriority::High,
            BotEvent::ScannedBot(_) => EventPriority::Normal,
        }
    }
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ScannedBot => "scanned_bot",
            EventKind::HitBot => "hit_bot",
        }
    }
}

// --- Commands ---
/// Movement, aim and fire primitives. Turning left is counter-clockwise,
/// i.e. it increases the heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Forward(f64),
    Back(f64),
    TurnLeft(f64),
    TurnRight(f64),
    TurnGunLeft(f64),
    TurnGunRight(f64),
    Fire(f64),
    Rescan,
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Forward(_) => "forward",
            Command::Back(_) => "back",
            Command::TurnLeft(_) => "turn_left",
            Command::TurnRight(_) => "turn_right",
            Command::TurnGunLeft(_) => "turn_gun_left",
            Command::TurnGunRight(_) => "turn_gun_right",
            Command::Fire(_) => "fire",
            Command::Rescan => "rescan",
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match *self {
            Command::Forward(v)
            | Command::Back(v)
            | Command::TurnLeft(v)
            | Command::TurnRight(v)
            | Command::TurnGunLeft(v)
            | Command::TurnGunRight(v)
            | Command::Fire(v) => Some(v),
            Command::Rescan => None,
        }
    }

    /// Rejects NaN and infinite arguments.
    pub fn validate(&self) -> BotResult<()> {
        match self.amount() {
            Some(v) if !v.is_finite() => Err(BotError::InvalidCommand(format!(
                "{} requires a finite argument, got {}",
                self.kind(),
                v
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandOutcome {
    /// The requested distance or angle was fully covered.
    Completed,
    /// Movement stopped early on a wall or another bot.
    Blocked,
    /// A later command on the same slot replaced this one.
    Superseded,
    /// The gun was still hot.
    NotFired,
}

// --- Snapshot of the controlled bot, as seen by queries ---
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotSnapshot {
    pub turn: u64,
    pub position: Vec2,
    pub direction: f64,
    pub gun_direction: f64,
    pub speed: f64,
    pub gun_heat: f64,
    pub arena_width: f64,
    pub arena_height: f64,
    pub running: bool,
}
