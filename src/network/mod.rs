//! # Network abstraction layer
//!
//! This module defines the capability traits through which the MQTT client
//! reaches its transport. The client never opens sockets itself: the caller
//! establishes a connection (TCP, TLS, a serial modem link, ...) and hands it
//! over as an implementation of [`Connection`].
//!
//! ## Design Philosophy
//!
//! - **Protocol Agnostic**: the traits work with any ordered byte stream
//! - **Zero-Cost Abstractions**: the traits compile down to direct calls
//! - **Embedded-First**: designed for `no_std` environments with limited
//!   resources
//!
//! All operations carry an explicit deadline in milliseconds. Implementations
//! are expected to block for at most that long and report how many bytes they
//! actually moved; the client treats partial transfers as protocol errors
//! where the MQTT framing requires completeness.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use libmqtt::network::Read;
//!
//! fn probe<C: Read>(conn: &mut C) -> Result<usize, C::Error> {
//!     let mut buf = [0u8; 64];
//!     conn.read(&mut buf, 1000)
//! }
//! ```

#![allow(missing_docs)]

/// Common error types for client and codec operations
pub mod error;

/// Re-exports of the transport traits for convenient importing
pub mod prelude {
    pub use super::{Close, Connection, Read, Write};
}

/// Trait for reading data from a network connection.
///
/// The single required method reads with a deadline; the provided [`peek`]
/// method lets transports that can report queued bytes opt into non-blocking
/// polling.
///
/// [`peek`]: Read::peek
pub trait Read {
    /// Associated error type for read operations
    type Error: core::fmt::Debug;

    /// Read data from the connection into the provided buffer.
    ///
    /// Waits at most `timeout_ms` milliseconds for data to arrive. Returns
    /// the number of bytes read; `Ok(0)` means the deadline passed without
    /// any data.
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer to read data into
    /// * `timeout_ms` - Deadline for the operation, `0` meaning "do not wait"
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;

    /// Report the number of bytes queued for reading without consuming them.
    ///
    /// Must not block. Returns `Ok(None)` when the transport cannot peek;
    /// the default implementation does exactly that. `Ok(Some(0))` means
    /// "nothing queued right now".
    fn peek(&mut self) -> Result<Option<usize>, Self::Error> {
        Ok(None)
    }
}

/// Trait for writing data to a network connection.
pub trait Write {
    /// Associated error type for write operations
    type Error: core::fmt::Debug;

    /// Write data to the connection.
    ///
    /// Waits at most `timeout_ms` milliseconds for the transport to accept
    /// the bytes. Returns the number of bytes written, which may be fewer
    /// than requested.
    ///
    /// # Arguments
    ///
    /// * `buf` - Data to write
    /// * `timeout_ms` - Deadline for the operation, `0` meaning "do not wait"
    fn write(&mut self, buf: &[u8], timeout_ms: u32) -> Result<usize, Self::Error>;

    /// Flush any buffered write data.
    ///
    /// Some implementations may be no-ops if no buffering is used.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Trait for closing network connections.
///
/// Provides a clean way to close a connection and free associated resources.
pub trait Close {
    /// Associated error type for close operations
    type Error: core::fmt::Debug;

    /// Close the connection and free any associated resources.
    ///
    /// After calling this method, the connection must not be used for
    /// further operations.
    fn close(self) -> Result<(), Self::Error>;
}

/// A complete network connection usable by the MQTT client.
///
/// This trait combines reading, writing, and closing capabilities into a
/// single unified interface. Any type implementing it can be handed to
/// [`Client::new`](crate::client::Client::new).
pub trait Connection: Read + Write + Close {}
