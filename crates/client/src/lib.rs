//! Client for PAP file transfer servers.
//!
//! Each operation opens its own connection, performs the unlock and
//! identity preamble, and runs exactly one request.

mod client;
mod error;

pub use client::PapClient;
pub use error::ClientError;

use std::time::Duration;

/// Timeout for the TCP connection attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
