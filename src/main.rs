//! Meditation Timer - a countdown whose completion chime survives host suspension
//!
//! This is the main entry point for the meditation-timer application.

use std::sync::Arc;
use tracing::info;

use meditation_timer::{
    audio::default_output,
    config::Config,
    console::{console_task, display_task, HELP},
    signal::{build_with_fallback, SignalContext},
    state::{AppState, SystemClock, TimerController},
    tasks::{
        resume_signal_task, tick_channel, timer_task, wake_up_recovery_task, IntervalHeartbeat,
    },
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.validate().map_err(anyhow::Error::msg)?;

    // Logs go to stderr so the countdown display owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("meditation_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting meditation-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: duration={}s, strategy={}, fallback={}",
        config.duration, config.strategy, config.fallback
    );

    let (tick_tx, tick_rx) = tick_channel();

    let output = default_output();
    info!("Audio output: {}", output.name());
    let signal_ctx = SignalContext {
        output,
        tone: config.tone(),
        ticks: tick_tx.clone(),
        progress_interval: config.progress_period(),
    };
    let signal = build_with_fallback(config.strategy, config.fallback, &signal_ctx);

    let controller = TimerController::new(
        config.duration,
        Arc::new(SystemClock),
        signal,
        Box::new(IntervalHeartbeat::new(tick_tx.clone(), config.heartbeat_period())),
    );
    let state = Arc::new(AppState::new(controller));

    // Single consumer of every tick source
    tokio::spawn(timer_task(Arc::clone(&state), tick_rx));

    // Independent re-evaluation sources besides the heartbeat
    tokio::spawn(wake_up_recovery_task(tick_tx.clone(), config.wake_check_period()));
    tokio::spawn(resume_signal_task(tick_tx));

    tokio::spawn(display_task(Arc::clone(&state)));

    println!("{}", HELP);

    tokio::select! {
        _ = console_task(Arc::clone(&state)) => {
            info!("Console closed");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Release wake locks, loops and scheduled chimes before exiting
    if let Err(e) = state.shutdown() {
        tracing::error!("Failed to stop timer cleanly: {}", e);
    }

    println!();
    info!("Shutdown complete");

    // The stdin reader may still be parked in a blocking read
    std::process::exit(0)
}
