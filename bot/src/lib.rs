// walls_bot/bot/src/lib.rs

pub mod api;
pub mod concurrent;
pub mod core;
pub mod operational;
pub mod runtime;
pub mod systems;

pub use crate::api::{Bot, BotApi};
pub use crate::core::config::BotConfig;
pub use crate::core::error::{BotError, BotResult};
pub use crate::runtime::{ArenaHandle, BotRuntime, RoundSummary};
pub use crate::systems::navigator::Navigator;
