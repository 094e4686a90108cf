// walls_bot/bot/src/runtime/mod.rs
//! Tick driver that plays a `Bot` against a `Simulation`.
//!
//! Everything runs on one `LocalSet`: the control task, one task per
//! delivered event, and the driver itself. Each command gets its own
//! completion channel, resolved by the driver once the simulation reports
//! the command finished, was blocked, or was replaced.

pub mod handle;
pub mod simulation;
mod slots;

pub use handle::ArenaHandle;
pub use simulation::{Simulation, TickIntent, TickReport};

use metrics::counter;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, LocalSet};
use tracing::{debug, info, trace, warn};

use crate::api::Bot;
use crate::concurrent::event_queue::PriorityEventQueue;
use crate::core::config::{BotColors, RuntimeConfig};
use crate::core::constants::SLOW_TICK_LOG;
use crate::core::error::{BotError, BotResult};
use crate::core::geometry::clamp_firepower;
use crate::core::types::{BotEvent, BotSnapshot, Command, CommandOutcome, EventKind};

use handle::{CommandRequest, SharedState};
use slots::{CommandSlot, Pending, Reply};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundSummary {
    pub turns: u64,
    pub final_snapshot: Option<BotSnapshot>,
    pub colors: Option<BotColors>,
    pub commands: BTreeMap<String, u64>,
    pub superseded: u64,
    pub shots_fired: u64,
    pub shots_refused: u64,
    pub rescans: u64,
    pub events_delivered: BTreeMap<String, u64>,
    pub events_dropped: u64,
    pub control_error: Option<String>,
}

impl RoundSummary {
    pub fn command_count(&self, kind: &str) -> u64 {
        self.commands.get(kind).copied().unwrap_or(0)
    }

    pub fn delivered(&self, kind: EventKind) -> u64 {
        self.events_delivered.get(kind.as_str()).copied().unwrap_or(0)
    }
}

pub struct BotRuntime<S> {
    simulation: S,
    config: RuntimeConfig,
}

struct Actuators {
    movement: CommandSlot,
    body_turn: CommandSlot,
    gun_turn: CommandSlot,
    fire: Vec<(f64, Reply)>,
    rescan: Vec<Reply>,
}

impl Actuators {
    fn new() -> Self {
        Actuators {
            movement: CommandSlot::new("movement"),
            body_turn: CommandSlot::new("body_turn"),
            gun_turn: CommandSlot::new("gun_turn"),
            fire: Vec::new(),
            rescan: Vec::new(),
        }
    }

    fn abort_all(&mut self) {
        self.movement.abort();
        self.body_turn.abort();
        self.gun_turn.abort();
        for (_, reply) in self.fire.drain(..) {
            let _ = reply.send(Err(BotError::RoundEnded));
        }
        for reply in self.rescan.drain(..) {
            let _ = reply.send(Err(BotError::RoundEnded));
        }
    }
}

impl<S: Simulation> BotRuntime<S> {
    pub fn new(simulation: S, config: RuntimeConfig) -> Self {
        BotRuntime { simulation, config }
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    /// Plays one round. `make_bot` receives the handle the bot commands
    /// the arena through.
    pub async fn run_round<B, F>(&mut self, make_bot: F) -> BotResult<RoundSummary>
    where
        B: Bot + Clone + 'static,
        F: FnOnce(ArenaHandle) -> B,
    {
        let local = LocalSet::new();
        local.run_until(self.drive(make_bot)).await
    }

    async fn drive<B, F>(&mut self, make_bot: F) -> BotResult<RoundSummary>
    where
        B: Bot + Clone + 'static,
        F: FnOnce(ArenaHandle) -> B,
    {
        let mut initial = self.simulation.snapshot();
        initial.running = true;
        let shared = Arc::new(SharedState {
            snapshot: RwLock::new(initial),
            colors: Mutex::new(None),
        });
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<CommandRequest>();
        let bot = make_bot(ArenaHandle::new(Arc::clone(&shared), command_tx));

        let control_bot = bot.clone();
        let control: JoinHandle<BotResult<()>> = tokio::task::spawn_local(async move { control_bot.run().await });

        let mut summary = RoundSummary::default();
        let mut actuators = Actuators::new();
        let mut handlers: HashMap<EventKind, JoinHandle<()>> = HashMap::new();
        let events = PriorityEventQueue::new();
        let tick_interval = Duration::from_millis(self.config.tick_interval_ms);
        let mut ticker = (!tick_interval.is_zero()).then(|| tokio::time::interval(tick_interval));

        info!("Round started");

        loop {
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }
            let tick_start = Instant::now();

            for request in self.settle(&mut command_rx).await {
                self.accept(request, &mut actuators, &mut summary);
            }

            if let Some(colors) = shared.colors.lock().take() {
                self.simulation.set_colors(&colors);
                summary.colors = Some(colors);
            }

            let intent = TickIntent {
                distance_remaining: actuators.movement.remaining(),
                turn_remaining: actuators.body_turn.remaining(),
                gun_turn_remaining: actuators.gun_turn.remaining(),
                firepower: actuators.fire.first().map(|(power, _)| *power),
                rescan: !actuators.rescan.is_empty(),
            };
            let report = self.simulation.step(&intent);
            summary.turns = report.snapshot.turn;
            *shared.snapshot.write() = BotSnapshot { running: !report.round_over, ..report.snapshot.clone() };

            actuators.movement.progress(report.distance_moved, report.movement_blocked);
            actuators.body_turn.progress(report.body_turned, false);
            actuators.gun_turn.progress(report.gun_turned, false);
            self.resolve_one_tick_commands(&mut actuators, &report, &mut summary);

            if report.round_over {
                summary.final_snapshot = Some(report.snapshot);
                break;
            }

            // Let handlers that just got their outcomes finish before new events arrive.
            for request in self.settle(&mut command_rx).await {
                self.accept(request, &mut actuators, &mut summary);
            }

            handlers.retain(|_, task| !task.is_finished());
            for event in report.events {
                events.push(event);
            }
            for event in events.drain() {
                let kind = event.kind();
                if handlers.contains_key(&kind) {
                    trace!(kind = kind.as_str(), "Handler still running, event dropped");
                    summary.events_dropped += 1;
                    continue;
                }
                counter!("bot_events_total", "kind" => kind.as_str()).increment(1);
                *summary.events_delivered.entry(kind.as_str().to_string()).or_insert(0) += 1;
                handlers.insert(kind, Self::dispatch(bot.clone(), event));
            }

            let elapsed = tick_start.elapsed();
            if elapsed > SLOW_TICK_LOG {
                warn!(turn = summary.turns, ?elapsed, "Slow tick");
            }
        }

        let in_flight = [&actuators.movement, &actuators.body_turn, &actuators.gun_turn]
            .iter()
            .filter(|slot| slot.is_busy())
            .count();
        info!(turns = summary.turns, in_flight, "Round over");
        actuators.abort_all();
        command_rx.close();
        while let Ok(request) = command_rx.try_recv() {
            let _ = request.reply.send(Err(BotError::RoundEnded));
        }

        // Every suspended task now sees RoundEnded; give them a chance to unwind.
        for _ in 0..self.config.max_settle_passes {
            tokio::task::yield_now().await;
        }
        for (_, task) in handlers.drain() {
            task.abort();
        }

        if control.is_finished() {
            match control.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.is_round_end() => {}
                Ok(Err(e)) => {
                    warn!(error = %e, "Control loop failed");
                    summary.control_error = Some(e.to_string());
                }
                Err(e) => {
                    let e = BotError::Internal(e.to_string());
                    warn!(error = %e, "Control task panicked");
                    summary.control_error = Some(e.to_string());
                }
            }
        } else {
            control.abort();
        }

        Ok(summary)
    }

    /// Yields until the bot's tasks stop issuing commands.
    async fn settle(&self, commands: &mut mpsc::UnboundedReceiver<CommandRequest>) -> Vec<CommandRequest> {
        let mut collected = Vec::new();
        let mut quiet_passes = 0;
        for _ in 0..self.config.max_settle_passes {
            tokio::task::yield_now().await;
            let before = collected.len();
            while let Ok(request) = commands.try_recv() {
                collected.push(request);
            }
            if collected.len() == before {
                quiet_passes += 1;
                if quiet_passes >= 2 {
                    break;
                }
            } else {
                quiet_passes = 0;
            }
        }
        collected
    }

    fn accept(&self, request: CommandRequest, actuators: &mut Actuators, summary: &mut RoundSummary) {
        let CommandRequest { command, reply } = request;
        counter!("bot_commands_total", "kind" => command.kind()).increment(1);
        *summary.commands.entry(command.kind().to_string()).or_insert(0) += 1;
        debug!(?command, "Command accepted");

        let policy = self.config.interrupt_policy;
        let superseded = match command {
            Command::Forward(d) => actuators.movement.submit(Pending { command, remaining: d, reply }, policy),
            Command::Back(d) => actuators.movement.submit(Pending { command, remaining: -d, reply }, policy),
            Command::TurnLeft(a) => actuators.body_turn.submit(Pending { command, remaining: a, reply }, policy),
            Command::TurnRight(a) => actuators.body_turn.submit(Pending { command, remaining: -a, reply }, policy),
            Command::TurnGunLeft(a) => actuators.gun_turn.submit(Pending { command, remaining: a, reply }, policy),
            Command::TurnGunRight(a) => actuators.gun_turn.submit(Pending { command, remaining: -a, reply }, policy),
            Command::Fire(power) => {
                actuators.fire.push((clamp_firepower(power), reply));
                false
            }
            Command::Rescan => {
                actuators.rescan.push(reply);
                false
            }
        };
        if superseded {
            summary.superseded += 1;
        }
    }

    fn resolve_one_tick_commands(&self, actuators: &mut Actuators, report: &TickReport, summary: &mut RoundSummary) {
        let mut first = true;
        for (_, reply) in actuators.fire.drain(..) {
            let fired = first && report.fired == Some(true);
            first = false;
            if fired {
                summary.shots_fired += 1;
                counter!("bot_shots_fired_total").increment(1);
            } else {
                summary.shots_refused += 1;
            }
            let outcome = if fired { CommandOutcome::Completed } else { CommandOutcome::NotFired };
            let _ = reply.send(Ok(outcome));
        }
        for reply in actuators.rescan.drain(..) {
            summary.rescans += 1;
            let _ = reply.send(Ok(CommandOutcome::Completed));
        }
    }

    fn dispatch<B: Bot + 'static>(bot: B, event: BotEvent) -> JoinHandle<()> {
        tokio::task::spawn_local(async move {
            let kind = event.kind();
            let result = match event {
                BotEvent::ScannedBot(e) => bot.on_scanned_bot(e).await,
                BotEvent::HitBot(e) => bot.on_hit_bot(e).await,
            };
            if let Err(e) = result {
                if !e.is_round_end() {
                    warn!(kind = kind.as_str(), error = %e, "Event handler failed");
                }
            }
        })
    }
}
