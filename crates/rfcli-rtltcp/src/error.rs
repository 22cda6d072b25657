//! Error types for rtl_tcp operations

use thiserror::Error;

/// rtl_tcp-specific errors
#[derive(Debug, Error)]
pub enum RtlTcpError {
    /// Failed to connect to the server
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server greeting did not carry the "RTL0" magic
    #[error("not an rtl_tcp server: bad greeting magic {0:02X?}")]
    BadGreeting([u8; 4]),

    /// I/O error during communication
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, RtlTcpError>;
