//! The SDR device capability trait

use crate::error::Result;
use crate::gain::GainMap;
use crate::units::Hz;

/// Capability set every rfcli backend must provide.
///
/// Handles are used as `Box<dyn Sdr>`, owned exclusively by whoever
/// constructed them; dropping the box releases the device.
///
/// SDR hardware almost universally quantizes rate and frequency to
/// discrete synthesizer steps, so the getters exist to read back the
/// *effective* value after a set. Callers doing signal math must use the
/// read-back value, never the one they requested.
pub trait Sdr: Send {
    /// Request a sample rate in samples per second. Hardware may coerce
    /// to the nearest supported rate.
    fn set_sample_rate(&mut self, rate: u32) -> Result<()>;

    /// Effective sample rate in samples per second.
    fn sample_rate(&mut self) -> Result<u32>;

    /// Request a center frequency. Hardware may coerce.
    fn set_center_frequency(&mut self, freq: Hz) -> Result<()>;

    /// Effective center frequency.
    fn center_frequency(&mut self) -> Result<Hz>;

    /// Enable or disable hardware-managed gain control.
    fn set_automatic_gain(&mut self, enabled: bool) -> Result<()>;

    /// Apply gains to the named stages. Stage names are backend-specific;
    /// unknown names are a backend error.
    fn set_gain_stages(&mut self, gains: &GainMap) -> Result<()>;
}
