//! rfcli-core - driver-agnostic vocabulary for SDR CLI tooling
//!
//! This crate defines the small set of types every rfcli backend and every
//! rfcli consumer share:
//!
//! - [`Sdr`] - the capability trait a device handle must implement
//!   (sample rate, center frequency, automatic gain, gain stages)
//! - [`Hz`] - frequency with unit-suffix parsing ("101.1MHz", "2.4GHz")
//! - [`GainMap`] - named gain stages parsed from "NAME=VALUE,..." text
//! - [`Error`] - the shared error taxonomy
//!
//! Backend crates depend only on this crate, never on the CLI layer.

pub mod error;
pub mod gain;
pub mod sdr;
pub mod units;

pub use error::{Error, Result};
pub use gain::{parse_gain_map, GainMap};
pub use sdr::Sdr;
pub use units::Hz;
