//! CONNECT and CONNACK packet coding.

use super::codec::{Reader, Writer};
use super::PacketType;
use super::publish::QoS;
use crate::network::error::Error;

/// MQTT protocol name as defined in the specification.
const PROTOCOL_NAME: &[u8] = b"MQTT";
/// MQTT protocol level for version 3.1.1.
const PROTOCOL_LEVEL: u8 = 4;

/// Options for configuring the MQTT client connection.
#[derive(Debug, Clone)]
pub struct Options<'a> {
    /// The client identifier, must be unique within the broker.
    pub client_id: &'a str,
    /// The keep-alive time in seconds. A value of 0 disables keep-alive.
    pub keep_alive_seconds: u16,
    /// Whether to start a clean session.
    ///
    /// - `true`: the broker discards any previous session state
    /// - `false`: the broker resumes the previous session if one exists
    pub clean_session: bool,
    /// Optional username for authentication.
    pub username: Option<&'a str>,
    /// Optional password for authentication. Requires a username.
    pub password: Option<&'a [u8]>,
}

impl<'a> Options<'a> {
    /// Options for a clean session with the given client id and keep-alive.
    pub fn new(client_id: &'a str, keep_alive_seconds: u16) -> Self {
        Self {
            client_id,
            keep_alive_seconds,
            clean_session: true,
            username: None,
            password: None,
        }
    }
}

/// A will message the broker publishes if the client disappears.
#[derive(Debug, Clone)]
pub struct Will<'a> {
    /// Topic the will is published on.
    pub topic: &'a str,
    /// Will message payload.
    pub payload: &'a [u8],
    /// Delivery guarantee for the will message.
    pub qos: QoS,
    /// Whether the broker should retain the will message.
    pub retained: bool,
}

/// CONNACK return codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReturnCode {
    /// Connection accepted.
    Accepted = 0,
    /// The broker does not support this protocol level.
    UnacceptableProtocol = 1,
    /// The client identifier is not allowed by the broker.
    IdentifierRejected = 2,
    /// The broker is unavailable.
    ServerUnavailable = 3,
    /// The user name or password is malformed.
    BadCredentials = 4,
    /// The client is not authorized to connect.
    NotAuthorized = 5,
}

impl ReturnCode {
    fn from_byte(byte: u8) -> Result<Self, Error> {
        match byte {
            0 => Ok(ReturnCode::Accepted),
            1 => Ok(ReturnCode::UnacceptableProtocol),
            2 => Ok(ReturnCode::IdentifierRejected),
            3 => Ok(ReturnCode::ServerUnavailable),
            4 => Ok(ReturnCode::BadCredentials),
            5 => Ok(ReturnCode::NotAuthorized),
            _ => Err(Error::ProtocolError),
        }
    }
}

/// A decoded CONNACK packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Connack {
    /// Whether the broker has session state for this client id.
    pub session_present: bool,
    /// The broker's verdict on the connection request.
    pub return_code: ReturnCode,
}

/// Encode a CONNECT packet into `out`, returning the number of bytes written.
pub fn encode_connect(
    out: &mut [u8],
    options: &Options<'_>,
    will: Option<&Will<'_>>,
) -> Result<usize, Error> {
    // variable header: protocol name, level, flags, keep-alive
    let mut rem_len = 10 + 2 + options.client_id.len();

    let mut connect_flags = 0u8;
    if options.clean_session {
        connect_flags |= 0x02;
    }
    if let Some(will) = will {
        connect_flags |= 0x04 | (will.qos as u8) << 3;
        if will.retained {
            connect_flags |= 0x20;
        }
        rem_len += 2 + will.topic.len() + 2 + will.payload.len();
    }
    if let Some(username) = options.username {
        connect_flags |= 0x80;
        rem_len += 2 + username.len();
    }
    if let Some(password) = options.password {
        connect_flags |= 0x40;
        rem_len += 2 + password.len();
    }

    let mut w = Writer::new(out);
    w.put_u8((PacketType::Connect as u8) << 4)?;
    w.put_remaining_length(rem_len)?;
    w.put_string(PROTOCOL_NAME)?;
    w.put_u8(PROTOCOL_LEVEL)?;
    w.put_u8(connect_flags)?;
    w.put_u16(options.keep_alive_seconds)?;
    w.put_string(options.client_id.as_bytes())?;
    if let Some(will) = will {
        w.put_string(will.topic.as_bytes())?;
        w.put_string(will.payload)?;
    }
    if let Some(username) = options.username {
        w.put_string(username.as_bytes())?;
    }
    if let Some(password) = options.password {
        w.put_string(password)?;
    }
    Ok(w.position())
}

/// Decode a CONNACK packet from the start of `buf`.
pub fn decode_connack(buf: &[u8]) -> Result<Connack, Error> {
    let mut r = Reader::new(buf);
    let first = r.take_u8()?;
    if first != (PacketType::Connack as u8) << 4 {
        return Err(Error::InvalidPacket);
    }
    if r.take_remaining_length()? != 2 {
        return Err(Error::ProtocolError);
    }
    let ack_flags = r.take_u8()?;
    let return_code = ReturnCode::from_byte(r.take_u8()?)?;
    Ok(Connack {
        session_present: ack_flags & 0x01 != 0,
        return_code,
    })
}
