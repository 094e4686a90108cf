// walls_bot/bot/src/runtime/simulation.rs
use crate::core::config::BotColors;
use crate::core::types::{BotEvent, BotSnapshot};

/// What the bot asks for during one tick. Amounts are signed: positive
/// moves forward / turns left (counter-clockwise).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickIntent {
    pub distance_remaining: f64,
    pub turn_remaining: f64,
    pub gun_turn_remaining: f64,
    pub firepower: Option<f64>,
    pub rescan: bool,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub snapshot: BotSnapshot,
    pub distance_moved: f64,
    pub body_turned: f64,
    pub gun_turned: f64,
    /// Movement was halted by a wall or another bot.
    pub movement_blocked: bool,
    /// `Some(true)` if a requested shot left the gun, `Some(false)` if it was refused.
    pub fired: Option<bool>,
    pub events: Vec<BotEvent>,
    pub round_over: bool,
}

/// The arena side of a round: advances the world one tick at a time.
pub trait Simulation {
    fn snapshot(&self) -> BotSnapshot;

    fn step(&mut self, intent: &TickIntent) -> TickReport;

    fn set_colors(&mut self, _colors: &BotColors) {}
}
