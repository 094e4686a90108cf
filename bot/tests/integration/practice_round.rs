// walls_bot/bot/tests/integration/practice_round.rs

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use walls_bot_core::core::config::{InterruptPolicy, NavigatorConfig, PracticeConfig, RuntimeConfig};
use walls_bot_core::core::constants::BOT_BOUNDING_CIRCLE_RADIUS;
use walls_bot_core::core::geometry::normalize_relative_angle;
use walls_bot_core::core::types::{Color, CommandOutcome, EventKind, HitBotEvent, ScannedBotEvent, Vec2};
use walls_bot_core::systems::physics::PracticeArena;
use walls_bot_core::{ArenaHandle, Bot, BotApi, BotResult, BotRuntime, Navigator, RoundSummary};

const EPS: f64 = 1e-6;

fn practice(start: Vec2, direction: f64, opponents: Vec<Vec2>, max_turns: u64) -> PracticeConfig {
    PracticeConfig {
        start_position: Some(start),
        start_direction: Some(direction),
        opponents,
        random_opponents: 0,
        max_turns,
        ..PracticeConfig::default()
    }
}

async fn play_walls(config: PracticeConfig) -> (RoundSummary, BotRuntime<PracticeArena>) {
    let mut runtime = BotRuntime::new(PracticeArena::new(&config), RuntimeConfig::default());
    let summary = runtime
        .run_round(|handle| Navigator::new(handle, NavigatorConfig::default()))
        .await
        .expect("round should complete");
    (summary, runtime)
}

fn on_perimeter(p: Vec2, width: f64, height: f64) -> bool {
    let r = BOT_BOUNDING_CIRCLE_RADIUS;
    (p.x - r).abs() < EPS || (p.x - (width - r)).abs() < EPS || (p.y - r).abs() < EPS || (p.y - (height - r)).abs() < EPS
}

#[tokio::test]
async fn walls_settles_onto_the_perimeter_with_gun_inward() {
    let (summary, runtime) = play_walls(practice(Vec2::new(400.0, 300.0), 37.0, vec![], 600)).await;

    assert_eq!(summary.turns, 600);
    assert_eq!(summary.control_error, None);
    assert_eq!(summary.command_count("turn_right"), 1);
    assert_eq!(summary.command_count("turn_gun_left"), 1);
    assert!(summary.command_count("forward") >= 3, "{:?}", summary.commands);
    assert!(summary.command_count("turn_left") >= 2, "{:?}", summary.commands);
    assert_eq!(summary.command_count("back"), 0);

    let end = summary.final_snapshot.clone().expect("final snapshot");
    assert!(on_perimeter(end.position, 800.0, 600.0), "ended at {:?}", end.position);
    let gun_offset = normalize_relative_angle(end.gun_direction - end.direction);
    assert!((gun_offset - 90.0).abs() < EPS, "gun offset {}", gun_offset);

    let colors = runtime.simulation().colors().expect("colors applied");
    assert_eq!(colors.radar, Color::ORANGE);
    assert_eq!(summary.colors, Some(colors));
}

#[tokio::test]
async fn opponent_inside_the_arena_draws_fire_and_rescans() {
    let (summary, runtime) =
        play_walls(practice(Vec2::new(400.0, 100.0), 0.0, vec![Vec2::new(400.0, 300.0)], 400)).await;

    assert!(summary.delivered(EventKind::ScannedBot) >= 1);
    assert!(summary.command_count("fire") >= 1);
    assert!(summary.command_count("rescan") >= 1, "{:?}", summary.commands);
    assert!(summary.shots_fired >= 1);
    assert_eq!(summary.shots_fired, runtime.simulation().bullets_fired());
    assert_eq!(summary.control_error, None);
}

#[tokio::test]
async fn ramming_an_opponent_backs_off() {
    let (summary, _) = play_walls(practice(Vec2::new(400.0, 300.0), 0.0, vec![Vec2::new(600.0, 300.0)], 200)).await;

    assert!(summary.delivered(EventKind::HitBot) >= 1);
    assert!(summary.command_count("back") >= 1, "{:?}", summary.commands);
}

#[tokio::test]
async fn round_end_unwinds_every_task() {
    let (summary, _) = play_walls(practice(Vec2::new(100.0, 100.0), 123.0, vec![], 50)).await;

    assert_eq!(summary.turns, 50);
    assert_eq!(summary.control_error, None);
    let end = summary.final_snapshot.expect("final snapshot");
    assert!(!end.running);
    assert_eq!(end.turn, 50);
}

/// Issues a long forward and a short back from the same task without
/// waiting in between.
#[derive(Clone)]
struct Overlapping {
    api: ArenaHandle,
    outcomes: Arc<Mutex<Vec<CommandOutcome>>>,
}

impl Bot for Overlapping {
    async fn run(&self) -> BotResult<()> {
        let (forward, back) = futures::join!(self.api.forward(200.0), async {
            tokio::task::yield_now().await;
            self.api.back(100.0).await
        });
        self.outcomes.lock().extend([forward?, back?]);
        Ok(())
    }

    async fn on_scanned_bot(&self, _event: ScannedBotEvent) -> BotResult<()> {
        Ok(())
    }

    async fn on_hit_bot(&self, _event: HitBotEvent) -> BotResult<()> {
        Ok(())
    }
}

async fn play_overlapping(policy: InterruptPolicy) -> (Vec<CommandOutcome>, RoundSummary, f64) {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let runtime_config = RuntimeConfig { interrupt_policy: policy, ..RuntimeConfig::default() };
    let mut runtime = BotRuntime::new(
        PracticeArena::new(&practice(Vec2::new(400.0, 300.0), 0.0, vec![], 100)),
        runtime_config,
    );
    let recorded = Arc::clone(&outcomes);
    let summary = runtime
        .run_round(move |api| Overlapping { api, outcomes: recorded })
        .await
        .unwrap();
    let x = runtime.simulation().position().x;
    let outcomes = outcomes.lock().clone();
    (outcomes, summary, x)
}

#[tokio::test]
async fn override_policy_supersedes_the_in_flight_move() {
    let (outcomes, summary, x) = play_overlapping(InterruptPolicy::Override).await;

    assert_eq!(outcomes, vec![CommandOutcome::Superseded, CommandOutcome::Completed]);
    assert_eq!(summary.superseded, 1);
    assert!(x < 400.0 - 90.0, "x = {}", x);
}

#[tokio::test]
async fn queue_policy_runs_moves_back_to_back() {
    let (outcomes, summary, x) = play_overlapping(InterruptPolicy::Queue).await;

    assert_eq!(outcomes, vec![CommandOutcome::Completed, CommandOutcome::Completed]);
    assert_eq!(summary.superseded, 0);
    assert!((x - 500.0).abs() < EPS, "x = {}", x);
}

#[tokio::test]
async fn queries_reflect_the_latest_tick() {
    #[derive(Clone)]
    struct Probe {
        api: ArenaHandle,
        seen: Arc<Mutex<Vec<(f64, f64, f64, f64)>>>,
    }

    impl Bot for Probe {
        async fn run(&self) -> BotResult<()> {
            self.api.turn_left(30.0).await?;
            self.seen.lock().push((
                self.api.arena_width(),
                self.api.arena_height(),
                self.api.direction(),
                self.api.bearing_to(500.0, 300.0),
            ));
            Ok(())
        }

        async fn on_scanned_bot(&self, _event: ScannedBotEvent) -> BotResult<()> {
            Ok(())
        }

        async fn on_hit_bot(&self, _event: HitBotEvent) -> BotResult<()> {
            Ok(())
        }
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let mut runtime = BotRuntime::new(
        PracticeArena::new(&practice(Vec2::new(400.0, 300.0), 0.0, vec![], 20)),
        RuntimeConfig::default(),
    );
    runtime.run_round(move |api| Probe { api, seen: recorded }).await.unwrap();

    let seen = seen.lock().clone();
    assert_eq!(seen.len(), 1);
    let (width, height, direction, bearing) = seen[0];
    assert_eq!((width, height), (800.0, 600.0));
    assert!((direction - 30.0).abs() < EPS);
    assert!((bearing + 30.0).abs() < EPS);
}

/// Fires into a hot gun, waits for it to cool, then fires twice in one tick.
#[derive(Clone)]
struct Gunner {
    api: ArenaHandle,
    outcomes: Arc<Mutex<Vec<CommandOutcome>>>,
}

impl Bot for Gunner {
    async fn run(&self) -> BotResult<()> {
        let hot = self.api.fire(1.0).await?;
        self.outcomes.lock().push(hot);

        while self.api.snapshot().gun_heat > 0.0 {
            self.api.rescan().await?;
        }

        let (first, second) = futures::join!(self.api.fire(1.0), self.api.fire(1.0));
        self.outcomes.lock().extend([first?, second?]);
        Ok(())
    }

    async fn on_scanned_bot(&self, _event: ScannedBotEvent) -> BotResult<()> {
        Ok(())
    }

    async fn on_hit_bot(&self, _event: HitBotEvent) -> BotResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn hot_gun_and_second_shot_in_a_tick_are_refused() {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&outcomes);
    let mut runtime = BotRuntime::new(
        PracticeArena::new(&practice(Vec2::new(400.0, 300.0), 0.0, vec![], 100)),
        RuntimeConfig::default(),
    );
    let summary = runtime
        .run_round(move |api| Gunner { api, outcomes: recorded })
        .await
        .unwrap();

    assert_eq!(
        *outcomes.lock(),
        vec![CommandOutcome::NotFired, CommandOutcome::Completed, CommandOutcome::NotFired]
    );
    assert_eq!(summary.command_count("fire"), 3);
    assert_eq!(summary.shots_fired, 1);
    assert_eq!(summary.shots_refused, 2);
    assert_eq!(runtime.simulation().bullets_fired(), 1);
    assert_eq!(summary.control_error, None);
}

/// Spins the radar over an opponent while its scan handler never returns.
#[derive(Clone)]
struct StuckScanner {
    api: ArenaHandle,
    scans_handled: Arc<AtomicUsize>,
}

impl Bot for StuckScanner {
    async fn run(&self) -> BotResult<()> {
        self.api.turn_gun_left(3600.0).await?;
        Ok(())
    }

    async fn on_scanned_bot(&self, _event: ScannedBotEvent) -> BotResult<()> {
        self.scans_handled.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }

    async fn on_hit_bot(&self, _event: HitBotEvent) -> BotResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn scans_are_dropped_while_the_scan_handler_is_busy() {
    let scans_handled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&scans_handled);
    let mut runtime = BotRuntime::new(
        PracticeArena::new(&practice(Vec2::new(400.0, 300.0), 0.0, vec![Vec2::new(600.0, 300.0)], 100)),
        RuntimeConfig::default(),
    );
    let summary = runtime
        .run_round(move |api| StuckScanner { api, scans_handled: counter })
        .await
        .unwrap();

    assert_eq!(scans_handled.load(Ordering::SeqCst), 1);
    assert_eq!(summary.delivered(EventKind::ScannedBot), 1);
    assert!(summary.events_dropped >= 2, "dropped {}", summary.events_dropped);
    assert_eq!(summary.delivered(EventKind::HitBot), 0);
}
