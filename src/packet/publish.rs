//! PUBLISH packet coding.

use super::codec::{Reader, Writer};
use super::{PacketType, detect_remaining_length};
use crate::network::error::Error;

/// Quality of Service levels for MQTT messages.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QoS {
    /// At most once delivery.
    AtMostOnce = 0,
    /// At least once delivery.
    AtLeastOnce = 1,
    /// Exactly once delivery.
    ExactlyOnce = 2,
}

impl QoS {
    fn from_bits(bits: u8) -> Result<Self, Error> {
        match bits {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _ => Err(Error::InvalidPacket),
        }
    }
}

/// An application message, as published or received.
///
/// The payload is borrowed, not copied. For inbound messages it points into
/// the client's read buffer and is only valid until that buffer is reused.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Message<'a> {
    /// Delivery guarantee requested for (or granted to) the message.
    pub qos: QoS,
    /// Whether the broker should retain (or did retain) the message.
    pub retained: bool,
    /// The application payload.
    pub payload: &'a [u8],
}

/// A decoded inbound PUBLISH packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Publish<'a> {
    /// Redelivery marker.
    pub dup: bool,
    /// Packet identifier; zero for QoS 0 messages.
    pub packet_id: u16,
    /// The topic the message was published on.
    pub topic: &'a str,
    /// The message itself.
    pub message: Message<'a>,
}

/// Encode a PUBLISH packet into `out`, returning the number of bytes written.
///
/// A packet identifier is only written for QoS 1 and 2.
pub fn encode_publish(
    out: &mut [u8],
    dup: bool,
    packet_id: u16,
    topic: &str,
    message: &Message<'_>,
) -> Result<usize, Error> {
    let mut rem_len = 2 + topic.len() + message.payload.len();
    if message.qos != QoS::AtMostOnce {
        rem_len += 2;
    }

    let mut flags = (PacketType::Publish as u8) << 4;
    if dup {
        flags |= 0x08;
    }
    flags |= (message.qos as u8) << 1;
    if message.retained {
        flags |= 0x01;
    }

    let mut w = Writer::new(out);
    w.put_u8(flags)?;
    w.put_remaining_length(rem_len)?;
    w.put_string(topic.as_bytes())?;
    if message.qos != QoS::AtMostOnce {
        w.put_u16(packet_id)?;
    }
    w.put_slice(message.payload)?;
    Ok(w.position())
}

/// Decode a PUBLISH packet from the start of `buf`.
///
/// DUP, QoS and RETAIN are recovered from the flag nibble; the payload view
/// points into `buf`.
pub fn decode_publish(buf: &[u8]) -> Result<Publish<'_>, Error> {
    let mut r = Reader::new(buf);
    let first = r.take_u8()?;
    if PacketType::detect(first)? != PacketType::Publish {
        return Err(Error::InvalidPacket);
    }
    let dup = first & 0x08 != 0;
    let qos = QoS::from_bits((first >> 1) & 0x03)?;
    let retained = first & 0x01 != 0;

    let (rem_len, var_len) = match detect_remaining_length(&buf[1..])? {
        Some(header) => header,
        None => return Err(Error::BufferTooShort),
    };
    let body_offset = 1 + var_len;
    if buf.len() < body_offset + rem_len {
        return Err(Error::BufferTooShort);
    }

    let mut r = Reader::new(&buf[body_offset..body_offset + rem_len]);
    let topic = r.take_string()?;
    let packet_id = if qos == QoS::AtMostOnce { 0 } else { r.take_u16()? };
    let payload = r.take_rest();

    Ok(Publish {
        dup,
        packet_id,
        topic,
        message: Message {
            qos,
            retained,
            payload,
        },
    })
}
