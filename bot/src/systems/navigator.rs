// walls_bot/bot/src/systems/navigator.rs
//! Perimeter navigation: hug the walls with the gun pointed at the arena
//! interior, shoot whatever the radar sweeps over, shove other bots aside.

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::api::{Bot, BotApi};
use crate::core::config::NavigatorConfig;
use crate::core::constants::WALL_TURN_DEGREES;
use crate::core::error::BotResult;
use crate::core::geometry::wall_alignment_turn;
use crate::core::types::{Command, HitBotEvent, ScannedBotEvent};

/// State shared between the control loop and the event handlers.
///
/// Only the control loop writes it; handlers only read `peek`.
#[derive(Debug, Default)]
pub struct AgentState {
    peek: AtomicBool,
    move_amount: OnceCell<f64>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a detection should force an immediate rescan.
    pub fn peek(&self) -> bool {
        self.peek.load(Ordering::Acquire)
    }

    fn set_peek(&self, peek: bool) {
        self.peek.store(peek, Ordering::Release);
    }

    /// Fixed straight-line distance, set once per round.
    pub fn move_amount(&self) -> Option<f64> {
        self.move_amount.get().copied()
    }

    fn init_move_amount(&self, amount: f64) -> f64 {
        *self.move_amount.get_or_init(|| amount)
    }
}

/// Response to bumping into another bot: back off from one in front,
/// push on past one behind or beside.
pub fn hit_response(bearing: f64, nudge_distance: f64) -> Command {
    if bearing > -90.0 && bearing < 90.0 {
        Command::Back(nudge_distance)
    } else {
        Command::Forward(nudge_distance)
    }
}

pub struct Navigator<A> {
    api: A,
    state: Arc<AgentState>,
    config: Arc<NavigatorConfig>,
}

impl<A: Clone> Clone for Navigator<A> {
    fn clone(&self) -> Self {
        Navigator {
            api: self.api.clone(),
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A: BotApi> Navigator<A> {
    pub fn new(api: A, config: NavigatorConfig) -> Self {
        Navigator {
            api,
            state: Arc::new(AgentState::new()),
            config: Arc::new(config),
        }
    }

    pub fn state(&self) -> Arc<AgentState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    async fn start_perimeter(&self) -> BotResult<f64> {
        self.api.set_colors(&self.config.colors);

        let move_amount = self.state.init_move_amount(self.api.arena_width().max(self.api.arena_height()));
        self.state.set_peek(false);

        let alignment = wall_alignment_turn(self.api.direction());
        debug!(move_amount, alignment, "Facing the nearest wall");
        self.api.turn_right(alignment).await?;
        self.api.forward(move_amount).await?;

        // The gun turns with the body, so swinging it the same way as the
        // corner turn leaves it facing the arena interior. Detections during
        // the swing are live.
        self.state.set_peek(true);
        self.api.turn_gun_left(WALL_TURN_DEGREES).await?;
        self.state.set_peek(false);
        self.api.turn_left(WALL_TURN_DEGREES).await?;

        Ok(move_amount)
    }
}

impl<A: BotApi> Bot for Navigator<A> {
    async fn run(&self) -> BotResult<()> {
        let move_amount = self.start_perimeter().await?;
        info!(move_amount, "On the perimeter");

        let mut legs: u64 = 0;
        while self.api.is_running() {
            self.state.set_peek(true);
            self.api.forward(move_amount).await?;
            self.state.set_peek(false);
            self.api.turn_left(WALL_TURN_DEGREES).await?;
            legs += 1;
            trace!(legs, "Turned onto the next wall");
        }

        debug!(legs, "Control loop finished");
        Ok(())
    }

    async fn on_scanned_bot(&self, event: ScannedBotEvent) -> BotResult<()> {
        trace!(target_bot = event.scanned_bot_id, distance = event.distance, "Scanned bot, firing");
        self.api.fire(self.config.fire_power).await?;
        if self.state.peek() {
            self.api.rescan().await?;
        }
        Ok(())
    }

    async fn on_hit_bot(&self, event: HitBotEvent) -> BotResult<()> {
        let bearing = self.api.bearing_to(event.x, event.y);
        let response = hit_response(bearing, self.config.nudge_distance);
        trace!(victim = event.victim_id, bearing, ?response, "Hit bot");
        self.api.execute(response).await?;
        Ok(())
    }
}
