// walls_bot/bot/src/api.rs
//! The seam between bot logic and the runtime that plays it.

use crate::core::config::BotColors;
use crate::core::error::BotResult;
use crate::core::types::{Command, CommandOutcome, HitBotEvent, ScannedBotEvent};

/// Queries and commands a bot issues against the arena.
///
/// Every command suspends the caller until the arena reports the command's
/// outcome, but never blocks event delivery: handlers may issue their own
/// commands while another command is still pending.
#[allow(async_fn_in_trait)]
pub trait BotApi {
    fn arena_width(&self) -> f64;
    fn arena_height(&self) -> f64;
    /// Current heading in degrees, counter-clockwise from east.
    fn direction(&self) -> f64;
    fn is_running(&self) -> bool;
    /// Signed bearing from the current heading to a point, in (-180, 180].
    fn bearing_to(&self, x: f64, y: f64) -> f64;
    fn set_colors(&self, colors: &BotColors);

    async fn execute(&self, command: Command) -> BotResult<CommandOutcome>;

    async fn forward(&self, distance: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::Forward(distance)).await
    }

    async fn back(&self, distance: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::Back(distance)).await
    }

    async fn turn_left(&self, degrees: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::TurnLeft(degrees)).await
    }

    async fn turn_right(&self, degrees: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::TurnRight(degrees)).await
    }

    async fn turn_gun_left(&self, degrees: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::TurnGunLeft(degrees)).await
    }

    async fn turn_gun_right(&self, degrees: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::TurnGunRight(degrees)).await
    }

    async fn fire(&self, firepower: f64) -> BotResult<CommandOutcome> {
        self.execute(Command::Fire(firepower)).await
    }

    async fn rescan(&self) -> BotResult<CommandOutcome> {
        self.execute(Command::Rescan).await
    }
}

/// Callbacks a runtime drives: one long-lived control task plus one
/// handler invocation per delivered event.
#[allow(async_fn_in_trait)]
pub trait Bot {
    async fn run(&self) -> BotResult<()>;

    async fn on_scanned_bot(&self, event: ScannedBotEvent) -> BotResult<()>;

    async fn on_hit_bot(&self, event: HitBotEvent) -> BotResult<()>;
}
