// walls_bot/bot/src/operational/monitoring.rs
use anyhow::{Context, Result};
use metrics::{describe_counter, Unit};

const DEFAULT_LOG_FILTER: &str = "walls_bot_core=info,walls_bot=info,warn";

/// Describes the counters the runtime records. No exporter is installed here;
/// without a recorder the counters are no-ops.
pub fn describe_metrics() {
    describe_counter!("bot_commands_total", Unit::Count, "Commands issued by the bot, by kind");
    describe_counter!("bot_events_total", Unit::Count, "Perception events delivered to handlers, by kind");
    describe_counter!("bot_shots_fired_total", Unit::Count, "Shots that left the gun");
}

// Logging setup
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
