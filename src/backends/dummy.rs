//! Dummy backend registration

use crate::registry::Registry;

pub(crate) fn register(registry: &mut Registry) {
    registry.register(
        "dummy",
        |_flags, _prefix| {},
        |_matches, _prefix| Ok(Box::new(rfcli_dummy::DummySdr::new_default())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    #[test]
    fn constructs_without_hardware() {
        let mut registry = Registry::new();
        register(&mut registry);

        let cmd = registry.declare_flags(Command::new("test"), "");
        let matches = cmd
            .try_get_matches_from([
                "test",
                "--sdr",
                "dummy",
                "--agc",
                "manual",
                "--gains",
                "LNA=10",
                "--frequency",
                "101.1MHz",
            ])
            .unwrap();

        let loaded = registry.construct(&matches, "").unwrap();
        // 2.5 Msps default coerces to the dummy's nearest supported rate.
        assert_eq!(loaded.sample_rate, 2_400_000);
        assert_eq!(loaded.frequency.as_f64(), 101_100_000.0);
    }
}
