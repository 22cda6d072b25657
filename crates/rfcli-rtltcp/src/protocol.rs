//! rtl_tcp wire protocol
//!
//! The server opens with a 12-byte greeting: the magic `"RTL0"`, the tuner
//! type, and the number of tuner gain values (both u32 big-endian). After
//! that the client sends 5-byte control commands (command byte plus a u32
//! big-endian argument) and the server streams raw IQ bytes back.

use crate::error::{Result, RtlTcpError};

/// Greeting magic
pub const MAGIC: [u8; 4] = *b"RTL0";

/// Control command bytes
pub mod commands {
    pub const SET_FREQUENCY: u8 = 0x01;
    pub const SET_SAMPLE_RATE: u8 = 0x02;
    pub const SET_GAIN_MODE: u8 = 0x03;
    pub const SET_GAIN: u8 = 0x04;
    pub const SET_AGC_MODE: u8 = 0x08;
}

/// Encode a control command as sent on the wire.
pub fn encode_command(command: u8, param: u32) -> [u8; 5] {
    let p = param.to_be_bytes();
    [command, p[0], p[1], p[2], p[3]]
}

/// Parsed server greeting
#[derive(Debug, Clone, Copy)]
pub struct Greeting {
    pub tuner_type: u32,
    pub gain_count: u32,
}

/// Parse and validate the 12-byte server greeting.
pub fn parse_greeting(buf: &[u8; 12]) -> Result<Greeting> {
    let magic = [buf[0], buf[1], buf[2], buf[3]];
    if magic != MAGIC {
        return Err(RtlTcpError::BadGreeting(magic));
    }
    Ok(Greeting {
        tuner_type: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        gain_count: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
    })
}

/// Human-readable tuner name for the greeting's tuner type.
pub fn tuner_name(tuner_type: u32) -> &'static str {
    match tuner_type {
        1 => "E4000",
        2 => "FC0012",
        3 => "FC0013",
        4 => "FC2580",
        5 => "R820T",
        6 => "R828D",
        _ => "unknown",
    }
}
