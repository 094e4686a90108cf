// walls_bot/bot/src/main.rs
use tracing::{error, info};

use walls_bot_core::operational::monitoring::{describe_metrics, init_logging};
use walls_bot_core::systems::physics::PracticeArena;
use walls_bot_core::{BotConfig, BotRuntime, Navigator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        if let Some(location) = panic_info.location() {
            eprintln!("Location: {}:{}:{}", location.file(), location.line(), location.column());
        }
        eprintln!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
    }));

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {:?}", e);
        return Err(e);
    }
    describe_metrics();

    let config = match BotConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    info!(
        name = %config.identity.name,
        version = %config.identity.version,
        policy = ?config.runtime.interrupt_policy,
        "Bot starting up"
    );

    let arena = PracticeArena::new(&config.practice);
    let mut runtime = BotRuntime::new(arena, config.runtime.clone());
    let navigator_config = config.navigator.clone();
    let summary = runtime
        .run_round(move |handle| Navigator::new(handle, navigator_config))
        .await?;

    info!(
        turns = summary.turns,
        shots = summary.shots_fired,
        bullets = runtime.simulation().bullets_fired(),
        "Practice round finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
