//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    audio::ToneConfig,
    signal::SignalKind,
    state::timer_state::{DEFAULT_DURATION_SECS, MAX_DURATION_SECS, MIN_DURATION_SECS},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "meditation-timer")]
#[command(about = "A countdown meditation timer whose chime survives host suspension")]
#[command(version)]
pub struct Config {
    /// Countdown length in seconds
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_DURATION_SECS,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_DURATION_SECS)..=i64::from(MAX_DURATION_SECS))
    )]
    pub duration: u32,

    /// How the completion chime is delivered
    #[arg(short, long, value_enum, default_value_t = SignalKind::Scheduled)]
    pub strategy: SignalKind,

    /// Strategy used when the primary one is unavailable on this host
    #[arg(long, value_enum, default_value_t = SignalKind::Tone)]
    pub fallback: SignalKind,

    /// Heartbeat period in milliseconds
    #[arg(long, default_value = "1000")]
    pub heartbeat_ms: u64,

    /// Keep-alive progress event period in milliseconds
    #[arg(long, default_value = "500")]
    pub progress_ms: u64,

    /// How often to look for a host wake-up, in seconds
    #[arg(long, default_value = "5")]
    pub wake_check_secs: u64,

    /// Chime partials in Hz
    #[arg(long, value_delimiter = ',', default_values_t = ToneConfig::default().frequencies)]
    pub frequencies: Vec<f32>,

    /// Chime attack in milliseconds
    #[arg(long, default_value = "20")]
    pub attack_ms: u64,

    /// Chime decay in milliseconds
    #[arg(long, default_value = "4000")]
    pub decay_ms: u64,

    /// Chime peak amplitude between 0.0 and 1.0
    #[arg(long, default_value = "0.3")]
    pub gain: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Check the chime arguments make sense
    pub fn validate(&self) -> Result<(), String> {
        if let Some(freq) = self.frequencies.iter().find(|f| !f.is_finite() || **f <= 0.0) {
            return Err(format!("Invalid chime frequency: {}", freq));
        }
        if !(0.0..=1.0).contains(&self.gain) {
            return Err(format!("Chime gain must be between 0.0 and 1.0, got {}", self.gain));
        }
        Ok(())
    }

    pub fn heartbeat_period(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms.max(1))
    }

    pub fn progress_period(&self) -> Duration {
        Duration::from_millis(self.progress_ms.max(1))
    }

    pub fn wake_check_period(&self) -> Duration {
        Duration::from_secs(self.wake_check_secs.max(1))
    }

    /// Chime shape assembled from the tone arguments
    pub fn tone(&self) -> ToneConfig {
        ToneConfig {
            frequencies: self.frequencies.clone(),
            attack: Duration::from_millis(self.attack_ms),
            decay: Duration::from_millis(self.decay_ms),
            gain: self.gain.clamp(0.0, 1.0),
        }
    }
}
