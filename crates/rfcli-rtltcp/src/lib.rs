//! rfcli-rtltcp - rtl_tcp network client backend
//!
//! Drives an rtl-sdr dongle attached to a remote `rtl_tcp` server. Only
//! the control channel is modeled here: rfcli configures gain, rate, and
//! frequency, then hands the raw socket to whoever wants the IQ byte
//! stream (see [`RtlTcp::into_stream`]).
//!
//! rtl_tcp has no read-back commands, so the [`Sdr`] getters report the
//! last requested values; the protocol offers nothing better.

pub mod error;
pub mod protocol;

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use rfcli_core::{Error, GainMap, Hz, Result, Sdr};

pub use error::RtlTcpError;
use protocol::{commands, encode_command, Greeting};

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A connected rtl_tcp client.
pub struct RtlTcp {
    stream: TcpStream,
    greeting: Greeting,
    frequency: u32,
    sample_rate: u32,
}

impl RtlTcp {
    /// Connect to an rtl_tcp server and validate its greeting.
    pub fn connect(host: &str, port: u16) -> error::Result<Self> {
        let addr = format!("{}:{}", host, port);
        log::info!("connecting to rtl_tcp server at {}", addr);

        let mut stream = TcpStream::connect(&addr)
            .map_err(|e| RtlTcpError::ConnectionFailed(format!("{}: {}", addr, e)))?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;

        let mut buf = [0u8; 12];
        stream.read_exact(&mut buf)?;
        let greeting = protocol::parse_greeting(&buf)?;

        log::info!(
            "connected to {}: {} tuner, {} gain values",
            addr,
            protocol::tuner_name(greeting.tuner_type),
            greeting.gain_count
        );

        Ok(Self {
            stream,
            greeting,
            frequency: 0,
            sample_rate: 0,
        })
    }

    /// Tuner type reported by the server greeting.
    pub fn tuner_type(&self) -> u32 {
        self.greeting.tuner_type
    }

    /// Number of tuner gain values reported by the server greeting.
    pub fn gain_count(&self) -> u32 {
        self.greeting.gain_count
    }

    /// Give up the control handle and return the raw socket carrying the
    /// IQ byte stream (unsigned 8-bit I/Q pairs).
    pub fn into_stream(self) -> TcpStream {
        self.stream
    }

    fn command(&mut self, command: u8, param: u32) -> std::io::Result<()> {
        self.stream.write_all(&encode_command(command, param))
    }
}

impl Sdr for RtlTcp {
    fn set_sample_rate(&mut self, rate: u32) -> Result<()> {
        self.command(commands::SET_SAMPLE_RATE, rate)?;
        self.sample_rate = rate;
        Ok(())
    }

    fn sample_rate(&mut self) -> Result<u32> {
        Ok(self.sample_rate)
    }

    fn set_center_frequency(&mut self, freq: Hz) -> Result<()> {
        let hz = freq.as_f64().round();
        if hz < 0.0 || hz > u32::MAX as f64 {
            return Err(Error::InvalidFrequency(freq.to_string()));
        }
        self.command(commands::SET_FREQUENCY, hz as u32)?;
        self.frequency = hz as u32;
        Ok(())
    }

    fn center_frequency(&mut self) -> Result<Hz> {
        Ok(Hz::new(self.frequency as f64))
    }

    fn set_automatic_gain(&mut self, enabled: bool) -> Result<()> {
        // Tuner gain mode is inverted on the wire: 0 = auto, 1 = manual.
        self.command(commands::SET_GAIN_MODE, if enabled { 0 } else { 1 })?;
        self.command(commands::SET_AGC_MODE, enabled as u32)?;
        Ok(())
    }

    fn set_gain_stages(&mut self, gains: &GainMap) -> Result<()> {
        for (stage, value) in gains {
            if !stage.eq_ignore_ascii_case("tuner") {
                return Err(Error::device(format!(
                    "rtltcp: unknown gain stage: {} (only \"tuner\")",
                    stage
                )));
            }
            // Wire format is tenths of a dB.
            let tenths = (value * 10.0).round() as i32;
            self.command(commands::SET_GAIN, tenths as u32)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    fn greeting_bytes(magic: &[u8; 4], tuner_type: u32, gain_count: u32) -> [u8; 12] {
        let mut buf = [0u8; 12];
        buf[..4].copy_from_slice(magic);
        buf[4..8].copy_from_slice(&tuner_type.to_be_bytes());
        buf[8..12].copy_from_slice(&gain_count.to_be_bytes());
        buf
    }

    /// One-shot fake rtl_tcp server: sends the greeting, then forwards
    /// everything the client wrote once the client hangs up.
    fn fake_server(greeting: [u8; 12]) -> (u16, mpsc::Receiver<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(&greeting).unwrap();
            let mut received = Vec::new();
            sock.read_to_end(&mut received).ok();
            tx.send(received).ok();
        });
        (port, rx)
    }

    #[test]
    fn connects_and_reads_greeting() {
        let (port, _rx) = fake_server(greeting_bytes(b"RTL0", 5, 29));
        let dev = RtlTcp::connect("127.0.0.1", port).unwrap();
        assert_eq!(dev.tuner_type(), 5);
        assert_eq!(dev.gain_count(), 29);
    }

    #[test]
    fn rejects_non_rtl_tcp_server() {
        let (port, _rx) = fake_server(greeting_bytes(b"HTTP", 0, 0));
        assert!(matches!(
            RtlTcp::connect("127.0.0.1", port),
            Err(RtlTcpError::BadGreeting(_))
        ));
    }

    #[test]
    fn setters_emit_wire_commands() {
        let (port, rx) = fake_server(greeting_bytes(b"RTL0", 5, 29));
        let mut dev = RtlTcp::connect("127.0.0.1", port).unwrap();

        dev.set_sample_rate(2_400_000).unwrap();
        dev.set_center_frequency(Hz::mhz(101.1)).unwrap();
        dev.set_automatic_gain(false).unwrap();

        let mut gains = GainMap::new();
        gains.insert("tuner".to_string(), 28.0);
        dev.set_gain_stages(&gains).unwrap();

        assert_eq!(dev.sample_rate().unwrap(), 2_400_000);
        assert_eq!(dev.center_frequency().unwrap(), Hz::new(101_100_000.0));

        drop(dev);
        let wire = rx.recv().unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&encode_command(commands::SET_SAMPLE_RATE, 2_400_000));
        expected.extend_from_slice(&encode_command(commands::SET_FREQUENCY, 101_100_000));
        expected.extend_from_slice(&encode_command(commands::SET_GAIN_MODE, 1));
        expected.extend_from_slice(&encode_command(commands::SET_AGC_MODE, 0));
        expected.extend_from_slice(&encode_command(commands::SET_GAIN, 280));
        assert_eq!(wire, expected);
    }

    #[test]
    fn rejects_unknown_gain_stage() {
        let (port, _rx) = fake_server(greeting_bytes(b"RTL0", 5, 29));
        let mut dev = RtlTcp::connect("127.0.0.1", port).unwrap();
        let mut gains = GainMap::new();
        gains.insert("LNA".to_string(), 10.0);
        let err = dev.set_gain_stages(&gains).unwrap_err();
        assert!(err.to_string().contains("unknown gain stage"));
    }
}
