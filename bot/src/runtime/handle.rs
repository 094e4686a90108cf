// walls_bot/bot/src/runtime/handle.rs
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::api::BotApi;
use crate::core::config::BotColors;
use crate::core::error::{BotError, BotResult};
use crate::core::geometry;
use crate::core::types::{BotSnapshot, Command, CommandOutcome, Vec2};

use super::slots::Reply;

pub(crate) struct CommandRequest {
    pub command: Command,
    pub reply: Reply,
}

pub(crate) struct SharedState {
    pub snapshot: RwLock<BotSnapshot>,
    pub colors: Mutex<Option<BotColors>>,
}

/// Cheap-to-clone `BotApi` backed by a running `BotRuntime`.
#[derive(Clone)]
pub struct ArenaHandle {
    shared: Arc<SharedState>,
    commands: mpsc::UnboundedSender<CommandRequest>,
}

impl ArenaHandle {
    pub(crate) fn new(shared: Arc<SharedState>, commands: mpsc::UnboundedSender<CommandRequest>) -> Self {
        ArenaHandle { shared, commands }
    }

    pub fn snapshot(&self) -> BotSnapshot {
        self.shared.snapshot.read().clone()
    }
}

impl BotApi for ArenaHandle {
    fn arena_width(&self) -> f64 {
        self.shared.snapshot.read().arena_width
    }

    fn arena_height(&self) -> f64 {
        self.shared.snapshot.read().arena_height
    }

    fn direction(&self) -> f64 {
        self.shared.snapshot.read().direction
    }

    fn is_running(&self) -> bool {
        self.shared.snapshot.read().running
    }

    fn bearing_to(&self, x: f64, y: f64) -> f64 {
        let snapshot = self.shared.snapshot.read();
        geometry::bearing_to(snapshot.position, snapshot.direction, Vec2::new(x, y))
    }

    fn set_colors(&self, colors: &BotColors) {
        *self.shared.colors.lock() = Some(*colors);
    }

    async fn execute(&self, command: Command) -> BotResult<CommandOutcome> {
        command.validate()?;
        if !self.is_running() {
            return Err(BotError::RoundEnded);
        }
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(CommandRequest { command, reply })
            .map_err(|_| BotError::RoundEnded)?;
        outcome.await.map_err(|_| BotError::RoundEnded)?
    }
}
