//! Common error types for MQTT client operations

/// A common error type for client and codec operations.
///
/// This enum defines the errors that can occur while framing MQTT packets
/// or driving a command against the broker. It is designed to be simple and
/// portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The connection was closed by the remote end.
    ConnectionClosed,
    /// The broker refused the connection.
    ConnectionRefused,
    /// The broker rejected a subscription request.
    SubscriptionRefused,
    /// The command timeout expired before the expected acknowledgement.
    Timeout,
    /// A ping was due while a previous PINGREQ was still unanswered.
    PingTimeout,
    /// The transport transferred fewer bytes than the packet requires.
    NotEnoughData,
    /// A buffer is too small to hold the packet being coded.
    BufferTooShort,
    /// A packet violates the MQTT framing rules.
    MalformedPacket,
    /// A packet carries an unknown type or reserved flag bits.
    InvalidPacket,
    /// The broker sent a response that does not match the request.
    ProtocolError,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reason = match self {
            Error::WriteError => "write failed",
            Error::ReadError => "read failed",
            Error::ConnectionClosed => "connection closed",
            Error::ConnectionRefused => "connection refused",
            Error::SubscriptionRefused => "subscription refused",
            Error::Timeout => "command timed out",
            Error::PingTimeout => "ping unanswered",
            Error::NotEnoughData => "not enough data",
            Error::BufferTooShort => "buffer too short",
            Error::MalformedPacket => "malformed packet",
            Error::InvalidPacket => "invalid packet",
            Error::ProtocolError => "protocol error",
        };
        f.write_str(reason)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::SubscriptionRefused => defmt::write!(f, "SubscriptionRefused"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::PingTimeout => defmt::write!(f, "PingTimeout"),
            Error::NotEnoughData => defmt::write!(f, "NotEnoughData"),
            Error::BufferTooShort => defmt::write!(f, "BufferTooShort"),
            Error::MalformedPacket => defmt::write!(f, "MalformedPacket"),
            Error::InvalidPacket => defmt::write!(f, "InvalidPacket"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
