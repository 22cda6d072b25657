//! Backend registry and device construction
//!
//! The registry decouples "which radios exist" from how a CLI wires up
//! flags and constructs one. Each backend contributes a flag registrar
//! and a constructor; the registry declares the shared flags (selector,
//! gains, agc, frequency, sample rate) plus every backend's own flags
//! under a caller-chosen prefix, and later realizes whichever backend the
//! user selected.
//!
//! The registry is an explicit object owned by the application's
//! composition root: build it once (usually via [`Registry::builtin`]),
//! declare flags, parse, construct. It is never mutated after flag
//! parsing begins.

use std::collections::BTreeMap;
use std::fmt;

use clap::{ArgMatches, Command};
use rfcli_core::{parse_gain_map, Error, Hz, Result, Sdr};

use crate::flags::{self, FlagSet};

/// Declares backend-specific flags under a prefix. Never performs I/O.
pub type FlagRegistrar = Box<dyn Fn(&mut FlagSet, &str)>;

/// Opens a device from parsed flag values.
pub type Constructor = Box<dyn Fn(&ArgMatches, &str) -> Result<Box<dyn Sdr>>>;

struct BackendEntry {
    flags: FlagRegistrar,
    construct: Constructor,
}

/// A constructed device plus the effective (post-coercion) tuning state.
pub struct LoadedSdr {
    pub device: Box<dyn Sdr>,
    /// Effective center frequency; zero if the frequency flag was unset.
    pub frequency: Hz,
    /// Effective sample rate in samples per second.
    pub sample_rate: u32,
}

// `Box<dyn Sdr>` has no Debug, so show the tuning state only.
impl fmt::Debug for LoadedSdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSdr")
            .field("frequency", &self.frequency)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

/// Table of selectable device backends.
#[derive(Default)]
pub struct Registry {
    backends: BTreeMap<String, BackendEntry>,
    default: Option<String>,
}

impl Registry {
    /// An empty registry. Most callers want [`Registry::builtin`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every backend compiled into this build.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "dummy")]
        crate::backends::dummy::register(&mut registry);

        #[cfg(feature = "rtltcp")]
        {
            crate::backends::rtltcp::register(&mut registry);
            registry.set_default("rtltcp");
        }

        registry
    }

    /// Add a backend, replacing any prior entry with the same name.
    pub fn register<F, C>(&mut self, name: impl Into<String>, flags: F, construct: C)
    where
        F: Fn(&mut FlagSet, &str) + 'static,
        C: Fn(&ArgMatches, &str) -> Result<Box<dyn Sdr>> + 'static,
    {
        self.backends.insert(
            name.into(),
            BackendEntry {
                flags: Box::new(flags),
                construct: Box::new(construct),
            },
        );
    }

    /// Set the backend the selector flag defaults to.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default = Some(name.into());
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }

    fn default_name(&self) -> &str {
        self.default
            .as_deref()
            .or_else(|| self.names().first().copied())
            .unwrap_or("")
    }

    /// Declare the SDR flags on `cmd` under `prefix`.
    ///
    /// Call once per logical device slot: an empty prefix for single-device
    /// tools, or e.g. "rx-" and "tx-" to drive two devices from one
    /// process. Every flag also reads an `RF_`-prefixed environment
    /// variable as its default (see [`FlagSet::env_defaults`]).
    pub fn declare_flags(&self, cmd: Command, prefix: &str) -> Command {
        let mut flags = FlagSet::new();

        flags.string(
            format!("{prefix}sdr"),
            self.default_name(),
            format!("[{}]", self.names().join("|")),
        );
        flags.string(format!("{prefix}gains"), "", "NAME=1.0,NAME2=2.5");
        flags.string(format!("{prefix}agc"), "", "[on|manual]");
        flags.string(
            format!("{prefix}frequency"),
            "",
            "frequency to tune the SDR to",
        );
        flags.uint(format!("{prefix}sample-rate"), 2_500_000, "samples per second");

        for entry in self.backends.values() {
            (entry.flags)(&mut flags, prefix);
        }

        flags.env_defaults("RF_");
        flags.attach(cmd)
    }

    /// Construct and configure the device selected by the parsed flags.
    ///
    /// Configuration order is fixed: gain mode, gain stages, sample rate,
    /// center frequency. Gain mode comes first so a backend cannot
    /// silently overwrite a manual stage gain applied moments earlier;
    /// rate and frequency are read back after setting because hardware
    /// coerces both, and callers need the true values.
    ///
    /// Any failure aborts the whole operation. If the device was already
    /// open, its handle is dropped (releasing it) before the error
    /// propagates.
    pub fn construct(&self, matches: &ArgMatches, prefix: &str) -> Result<LoadedSdr> {
        let name = flags::str_flag(matches, &format!("{prefix}sdr"))?;
        let entry = self
            .backends
            .get(name)
            .ok_or_else(|| Error::UnknownBackend(name.to_string()))?;

        let mut device = (entry.construct)(matches, prefix)?;
        let (frequency, sample_rate) = configure(device.as_mut(), matches, prefix)?;

        Ok(LoadedSdr {
            device,
            frequency,
            sample_rate,
        })
    }
}

/// Post-construction configuration, uniform across backends.
fn configure(device: &mut dyn Sdr, matches: &ArgMatches, prefix: &str) -> Result<(Hz, u32)> {
    let agc = flags::str_flag(matches, &format!("{prefix}agc"))?;
    match agc {
        "manual" => device.set_automatic_gain(false)?,
        "on" => device.set_automatic_gain(true)?,
        "" => {}
        other => return Err(Error::InvalidGainMode(other.to_string())),
    }

    let gains = parse_gain_map(flags::str_flag(matches, &format!("{prefix}gains"))?)?;
    if !gains.is_empty() {
        device.set_gain_stages(&gains)?;
    }

    let mut sample_rate = flags::u32_flag(matches, &format!("{prefix}sample-rate"))?;
    if sample_rate != 0 {
        device.set_sample_rate(sample_rate)?;
        match device.sample_rate() {
            Ok(effective) => sample_rate = effective,
            Err(e) => log::debug!("sample rate read-back failed, reporting requested: {}", e),
        }
    }

    let mut frequency = Hz::default();
    let freq_text = flags::str_flag(matches, &format!("{prefix}frequency"))?;
    if !freq_text.is_empty() {
        frequency = freq_text.parse()?;
        device.set_center_frequency(frequency)?;
        match device.center_frequency() {
            Ok(effective) => frequency = effective,
            Err(e) => log::debug!("frequency read-back failed, reporting requested: {}", e),
        }
        log::info!(
            "center frequency set to {} ({})",
            frequency,
            frequency.itu_band_name()
        );
    }

    Ok((frequency, sample_rate))
}
