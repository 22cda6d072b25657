//! rtl_tcp backend registration

use rfcli_core::Error;

use crate::flags;
use crate::registry::Registry;

pub(crate) fn register(registry: &mut Registry) {
    registry.register(
        "rtltcp",
        |flags, prefix| {
            flags.string(
                format!("{prefix}rtltcp-host"),
                "localhost",
                "rtl_tcp server to connect to",
            );
            flags.uint(format!("{prefix}rtltcp-port"), 1234, "remote port to use");
        },
        |matches, prefix| {
            let host = flags::str_flag(matches, &format!("{prefix}rtltcp-host"))?;
            let port = flags::u32_flag(matches, &format!("{prefix}rtltcp-port"))?;
            let port = u16::try_from(port)
                .map_err(|_| Error::device(format!("rtltcp: invalid port: {}", port)))?;
            let dev = rfcli_rtltcp::RtlTcp::connect(host, port).map_err(Error::device)?;
            Ok(Box::new(dev))
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    #[test]
    fn declares_host_and_port_flags() {
        let mut registry = Registry::new();
        register(&mut registry);

        let cmd = registry.declare_flags(Command::new("test"), "rx-");
        let matches = cmd
            .try_get_matches_from(["test", "--rx-rtltcp-port", "41234"])
            .unwrap();

        assert_eq!(
            flags::str_flag(&matches, "rx-rtltcp-host").unwrap(),
            "localhost"
        );
        assert_eq!(flags::u32_flag(&matches, "rx-rtltcp-port").unwrap(), 41234);
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let mut registry = Registry::new();
        register(&mut registry);

        let cmd = registry.declare_flags(Command::new("test"), "");
        let matches = cmd
            .try_get_matches_from(["test", "--rtltcp-port", "70000"])
            .unwrap();

        let err = registry.construct(&matches, "").unwrap_err();
        assert!(err.to_string().contains("invalid port"));
    }
}
