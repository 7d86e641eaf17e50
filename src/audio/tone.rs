//! Chime synthesis parameters and rendering

use std::{f32::consts::PI, time::Duration};

use serde::{Deserialize, Serialize};

/// Sample rate used when rendering the chime
pub const SAMPLE_RATE: u32 = 44_100;

/// Shape of the completion chime: a few sine partials sounded together
/// under a linear attack and an exponential decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Partials in Hz, played simultaneously
    pub frequencies: Vec<f32>,
    pub attack: Duration,
    pub decay: Duration,
    /// Peak amplitude, 0.0..=1.0
    pub gain: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequencies: vec![261.63, 329.63, 392.00],
            attack: Duration::from_millis(20),
            decay: Duration::from_secs(4),
            gain: 0.3,
        }
    }
}

impl ToneConfig {
    /// Total length of the chime
    pub fn length(&self) -> Duration {
        self.attack + self.decay
    }

    /// Amplitude envelope at `t` seconds into the chime
    fn envelope(&self, t: f32) -> f32 {
        let attack = self.attack.as_secs_f32();
        if t < attack {
            return t / attack;
        }
        // Falls to about 1% of peak by the end of the decay
        let decay = self.decay.as_secs_f32().max(f32::EPSILON);
        (-(t - attack) * 4.6 / decay).exp()
    }
}

/// Render the chime as mono `f32` samples
pub fn render_chime(tone: &ToneConfig, sample_rate: u32) -> Vec<f32> {
    let len = (tone.length().as_secs_f32() * sample_rate as f32).round() as usize;
    if tone.frequencies.is_empty() {
        return vec![0.0; len];
    }

    let gain = tone.gain.clamp(0.0, 1.0);
    let partials = tone.frequencies.len() as f32;

    (0..len)
        .map(|n| {
            let t = n as f32 / sample_rate as f32;
            let mix: f32 = tone
                .frequencies
                .iter()
                .map(|freq| (2.0 * PI * freq * t).sin())
                .sum();
            gain * tone.envelope(t) * mix / partials
        })
        .collect()
}
