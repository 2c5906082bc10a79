//! SUBSCRIBE, SUBACK and UNSUBSCRIBE packet coding.

use super::codec::{Reader, Writer};
use super::{PacketType, detect_remaining_length};
use super::publish::QoS;
use crate::network::error::Error;

/// A per-filter SUBACK return code.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SubackCode {
    /// Subscription granted at QoS 0.
    AtMostOnce,
    /// Subscription granted at QoS 1.
    AtLeastOnce,
    /// Subscription granted at QoS 2.
    ExactlyOnce,
    /// Subscription refused by the broker.
    Failure,
}

impl SubackCode {
    fn from_byte(byte: u8) -> Result<Self, Error> {
        match byte {
            0x00 => Ok(SubackCode::AtMostOnce),
            0x01 => Ok(SubackCode::AtLeastOnce),
            0x02 => Ok(SubackCode::ExactlyOnce),
            0x80 => Ok(SubackCode::Failure),
            _ => Err(Error::ProtocolError),
        }
    }

    /// The granted QoS, or `None` for a refused subscription.
    pub fn granted_qos(self) -> Option<QoS> {
        match self {
            SubackCode::AtMostOnce => Some(QoS::AtMostOnce),
            SubackCode::AtLeastOnce => Some(QoS::AtLeastOnce),
            SubackCode::ExactlyOnce => Some(QoS::ExactlyOnce),
            SubackCode::Failure => None,
        }
    }
}

/// Encode a SUBSCRIBE packet for one or more topic filters.
///
/// Returns the number of bytes written. An empty filter list is not a legal
/// packet.
pub fn encode_subscribe(
    out: &mut [u8],
    packet_id: u16,
    filters: &[(&str, QoS)],
) -> Result<usize, Error> {
    if filters.is_empty() {
        return Err(Error::MalformedPacket);
    }

    let mut rem_len = 2;
    for (filter, _) in filters {
        rem_len += 2 + filter.len() + 1;
    }

    let mut w = Writer::new(out);
    // the standard fixes the SUBSCRIBE flag bits to 0010
    w.put_u8((PacketType::Subscribe as u8) << 4 | 0x02)?;
    w.put_remaining_length(rem_len)?;
    w.put_u16(packet_id)?;
    for (filter, qos) in filters {
        w.put_string(filter.as_bytes())?;
        w.put_u8(*qos as u8)?;
    }
    Ok(w.position())
}

/// Decode a SUBACK packet from the start of `buf`.
///
/// Writes one return code per requested filter into `codes` and returns the
/// packet identifier together with the number of codes. A reply carrying
/// more codes than `codes` can hold is [`Error::BufferTooShort`].
pub fn decode_suback(buf: &[u8], codes: &mut [SubackCode]) -> Result<(u16, usize), Error> {
    let mut r = Reader::new(buf);
    let first = r.take_u8()?;
    if first != (PacketType::Suback as u8) << 4 {
        return Err(Error::InvalidPacket);
    }
    let (rem_len, var_len) = match detect_remaining_length(&buf[1..])? {
        Some(header) => header,
        None => return Err(Error::BufferTooShort),
    };
    let body_offset = 1 + var_len;
    if rem_len < 3 {
        return Err(Error::ProtocolError);
    }
    if buf.len() < body_offset + rem_len {
        return Err(Error::BufferTooShort);
    }

    let mut r = Reader::new(&buf[body_offset..body_offset + rem_len]);
    let packet_id = r.take_u16()?;
    let count = r.remaining();
    if count > codes.len() {
        return Err(Error::BufferTooShort);
    }
    for slot in codes.iter_mut().take(count) {
        *slot = SubackCode::from_byte(r.take_u8()?)?;
    }
    Ok((packet_id, count))
}

/// Encode an UNSUBSCRIBE packet for one or more topic filters.
pub fn encode_unsubscribe(
    out: &mut [u8],
    packet_id: u16,
    filters: &[&str],
) -> Result<usize, Error> {
    if filters.is_empty() {
        return Err(Error::MalformedPacket);
    }

    let mut rem_len = 2;
    for filter in filters {
        rem_len += 2 + filter.len();
    }

    let mut w = Writer::new(out);
    // the standard fixes the UNSUBSCRIBE flag bits to 0010
    w.put_u8((PacketType::Unsubscribe as u8) << 4 | 0x02)?;
    w.put_remaining_length(rem_len)?;
    w.put_u16(packet_id)?;
    for filter in filters {
        w.put_string(filter.as_bytes())?;
    }
    Ok(w.position())
}
