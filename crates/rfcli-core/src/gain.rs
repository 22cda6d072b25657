//! Gain-stage specifications
//!
//! Gain flags look like `LNA=10,MIX=-3.5`: a comma-separated list of
//! stage name / gain value pairs. Order is irrelevant; when a stage name
//! repeats, the last occurrence wins.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Stage name to gain value (dB), as understood by [`Sdr::set_gain_stages`].
///
/// [`Sdr::set_gain_stages`]: crate::Sdr::set_gain_stages
pub type GainMap = BTreeMap<String, f32>;

/// Parse a `NAME=VALUE,...` gain specification.
///
/// An empty string yields an empty map. A token without `=` or with a
/// non-numeric value fails with [`Error::InvalidGainSpec`] naming the
/// offending token.
pub fn parse_gain_map(spec: &str) -> Result<GainMap> {
    let mut gains = GainMap::new();
    if spec.is_empty() {
        return Ok(gains);
    }

    for token in spec.split(',') {
        let (name, value) = token
            .split_once('=')
            .ok_or_else(|| Error::InvalidGainSpec(token.to_string()))?;
        let value: f32 = value
            .parse()
            .map_err(|_| Error::InvalidGainSpec(token.to_string()))?;
        gains.insert(name.to_string(), value);
    }

    Ok(gains)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stage_list() {
        let gains = parse_gain_map("LNA=10,MIX=-3.5").unwrap();
        assert_eq!(gains.len(), 2);
        assert_eq!(gains["LNA"], 10.0);
        assert_eq!(gains["MIX"], -3.5);
    }

    #[test]
    fn empty_spec_is_empty_map() {
        assert!(parse_gain_map("").unwrap().is_empty());
    }

    #[test]
    fn last_duplicate_wins() {
        let gains = parse_gain_map("LNA=10,LNA=20").unwrap();
        assert_eq!(gains.len(), 1);
        assert_eq!(gains["LNA"], 20.0);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            parse_gain_map("LNA"),
            Err(Error::InvalidGainSpec(t)) if t == "LNA"
        ));
        assert!(matches!(
            parse_gain_map("LNA=10,MIX=loud"),
            Err(Error::InvalidGainSpec(t)) if t == "MIX=loud"
        ));
    }
}
