//! rfcli-dummy - in-memory SDR emulator for testing
//!
//! This crate provides a dummy SDR that emulates device behavior in
//! memory. It's useful for testing and development without real hardware,
//! and it models the one hardware behavior that matters to callers:
//! rate and frequency requests are coerced to what the "synthesizer"
//! can actually produce.

use rfcli_core::{Error, GainMap, Hz, Result, Sdr};

/// Configuration for the dummy SDR
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Discrete sample rates the device supports; requests coerce to the
    /// nearest entry.
    pub sample_rates: Vec<u32>,
    /// Synthesizer step in Hz; frequency requests quantize to a multiple.
    pub frequency_step: f64,
    /// Known gain stage names. Unknown stages are rejected.
    pub stages: Vec<String>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            // rtl-dongle-ish discrete rate table
            sample_rates: vec![
                240_000, 960_000, 1_024_000, 1_920_000, 2_048_000, 2_400_000, 3_200_000,
            ],
            frequency_step: 1.0,
            stages: vec!["LNA".to_string(), "MIX".to_string(), "IF".to_string()],
        }
    }
}

/// Dummy SDR
///
/// Emulates a receiver in memory for testing purposes. All applied
/// state is observable through accessors.
pub struct DummySdr {
    config: DummyConfig,
    sample_rate: u32,
    frequency: Hz,
    automatic_gain: Option<bool>,
    gains: GainMap,
}

impl DummySdr {
    /// Create a new dummy SDR with the given configuration.
    pub fn new(config: DummyConfig) -> Self {
        let sample_rate = config.sample_rates.first().copied().unwrap_or(0);
        Self {
            config,
            sample_rate,
            frequency: Hz::default(),
            automatic_gain: None,
            gains: GainMap::new(),
        }
    }

    /// Create a new dummy SDR with the default configuration.
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Automatic gain state, `None` if it was never set.
    pub fn automatic_gain(&self) -> Option<bool> {
        self.automatic_gain
    }

    /// Gain applied to a stage, `None` if it was never set.
    pub fn gain(&self, stage: &str) -> Option<f32> {
        self.gains.get(stage).copied()
    }
}

impl Sdr for DummySdr {
    fn set_sample_rate(&mut self, rate: u32) -> Result<()> {
        let coerced = self
            .config
            .sample_rates
            .iter()
            .copied()
            .min_by_key(|supported| supported.abs_diff(rate))
            .ok_or_else(|| Error::device("dummy: no supported sample rates configured"))?;
        if coerced != rate {
            log::debug!("dummy: coercing sample rate {} -> {}", rate, coerced);
        }
        self.sample_rate = coerced;
        Ok(())
    }

    fn sample_rate(&mut self) -> Result<u32> {
        Ok(self.sample_rate)
    }

    fn set_center_frequency(&mut self, freq: Hz) -> Result<()> {
        let step = self.config.frequency_step;
        self.frequency = Hz::new((freq.as_f64() / step).round() * step);
        Ok(())
    }

    fn center_frequency(&mut self) -> Result<Hz> {
        Ok(self.frequency)
    }

    fn set_automatic_gain(&mut self, enabled: bool) -> Result<()> {
        self.automatic_gain = Some(enabled);
        Ok(())
    }

    fn set_gain_stages(&mut self, gains: &GainMap) -> Result<()> {
        for (stage, value) in gains {
            if !self.config.stages.iter().any(|s| s == stage) {
                return Err(Error::device(format!("dummy: unknown gain stage: {}", stage)));
            }
            self.gains.insert(stage.clone(), *value);
        }
        Ok(())
    }
}
