//! Frequency units
//!
//! SDR flags take frequencies as text with an optional unit suffix
//! ("101.1MHz", "2.4GHz", "455khz"). [`Hz`] keeps the parsed value and
//! renders back with the largest suffix that keeps the mantissa >= 1.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// A frequency in Hertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Hz(f64);

/// Unit suffixes, longest first so "khz" is matched before "hz".
const UNITS: [(&str, f64); 5] = [
    ("thz", 1e12),
    ("ghz", 1e9),
    ("mhz", 1e6),
    ("khz", 1e3),
    ("hz", 1.0),
];

impl Hz {
    pub const fn new(hz: f64) -> Self {
        Hz(hz)
    }

    pub const fn as_f64(self) -> f64 {
        self.0
    }

    pub fn khz(v: f64) -> Self {
        Hz(v * 1e3)
    }

    pub fn mhz(v: f64) -> Self {
        Hz(v * 1e6)
    }

    pub fn ghz(v: f64) -> Self {
        Hz(v * 1e9)
    }

    /// Name of the ITU band this frequency falls in, for log annotation.
    /// Returns "out of band" below 3 Hz and above 3 THz.
    pub fn itu_band_name(self) -> &'static str {
        const BANDS: [(f64, &str); 12] = [
            (3.0, "ELF"),
            (30.0, "SLF"),
            (300.0, "ULF"),
            (3e3, "VLF"),
            (30e3, "LF"),
            (300e3, "MF"),
            (3e6, "HF"),
            (30e6, "VHF"),
            (300e6, "UHF"),
            (3e9, "SHF"),
            (30e9, "EHF"),
            (300e9, "THF"),
        ];
        let mut name = "out of band";
        for (lower, band) in BANDS {
            if self.0 < lower {
                return name;
            }
            name = band;
        }
        if self.0 < 3e12 {
            name
        } else {
            "out of band"
        }
    }
}

impl From<f64> for Hz {
    fn from(hz: f64) -> Self {
        Hz(hz)
    }
}

impl FromStr for Hz {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let lower = s.trim().to_ascii_lowercase();
        for (suffix, multiplier) in UNITS {
            if let Some(number) = lower.strip_suffix(suffix) {
                let value: f64 = number
                    .trim_end()
                    .parse()
                    .map_err(|_| Error::InvalidFrequency(s.to_string()))?;
                return Ok(Hz(value * multiplier));
            }
        }
        lower
            .parse()
            .map(Hz)
            .map_err(|_| Error::InvalidFrequency(s.to_string()))
    }
}

impl fmt::Display for Hz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        let (scaled, unit) = if magnitude >= 1e12 {
            (self.0 / 1e12, "THz")
        } else if magnitude >= 1e9 {
            (self.0 / 1e9, "GHz")
        } else if magnitude >= 1e6 {
            (self.0 / 1e6, "MHz")
        } else if magnitude >= 1e3 {
            (self.0 / 1e3, "kHz")
        } else {
            (self.0, "Hz")
        };
        let text = format!("{:.3}", scaled);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        write!(f, "{}{}", text, unit)
    }
}
