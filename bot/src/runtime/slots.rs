// walls_bot/bot/src/runtime/slots.rs
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tracing::debug;

use crate::core::config::InterruptPolicy;
use crate::core::constants::NEAR_ZERO;
use crate::core::error::{BotError, BotResult};
use crate::core::types::{Command, CommandOutcome};

pub(crate) type Reply = oneshot::Sender<BotResult<CommandOutcome>>;

pub(crate) struct Pending {
    pub command: Command,
    pub remaining: f64,
    pub reply: Reply,
}

impl Pending {
    fn resolve(self, result: BotResult<CommandOutcome>) {
        // The issuing task may be gone already; nothing to tell it then.
        let _ = self.reply.send(result);
    }
}

/// One independently progressing actuator: movement, body turn or gun turn.
pub(crate) struct CommandSlot {
    name: &'static str,
    active: Option<Pending>,
    queued: VecDeque<Pending>,
}

impl CommandSlot {
    pub fn new(name: &'static str) -> Self {
        CommandSlot { name, active: None, queued: VecDeque::new() }
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn remaining(&self) -> f64 {
        self.active.as_ref().map_or(0.0, |p| p.remaining)
    }

    /// Returns true if an in-flight command was superseded.
    pub fn submit(&mut self, pending: Pending, policy: InterruptPolicy) -> bool {
        let Some(current) = self.active.take() else {
            self.active = Some(pending);
            return false;
        };
        match policy {
            InterruptPolicy::Override => {
                debug!(
                    slot = self.name,
                    old = ?current.command,
                    new = ?pending.command,
                    left = current.remaining,
                    "Command superseded"
                );
                current.resolve(Ok(CommandOutcome::Superseded));
                self.active = Some(pending);
                true
            }
            InterruptPolicy::Queue => {
                self.active = Some(current);
                self.queued.push_back(pending);
                false
            }
        }
    }

    /// Applies one tick of progress. `blocked` ends the active command early.
    pub fn progress(&mut self, delta: f64, blocked: bool) {
        let Some(mut current) = self.active.take() else {
            return;
        };
        if blocked {
            current.resolve(Ok(CommandOutcome::Blocked));
        } else if current.remaining.abs() <= delta.abs() + NEAR_ZERO {
            current.resolve(Ok(CommandOutcome::Completed));
        } else {
            current.remaining -= delta;
            self.active = Some(current);
            return;
        }
        self.active = self.queued.pop_front();
    }

    pub fn abort(&mut self) {
        if let Some(current) = self.active.take() {
            current.resolve(Err(BotError::RoundEnded));
        }
        for pending in self.queued.drain(..) {
            pending.resolve(Err(BotError::RoundEnded));
        }
    }
}
