//! Fixed-size acknowledgement and empty packet coding.
//!
//! PUBACK, PUBREC, PUBREL, PUBCOMP and UNSUBACK share one shape: a fixed
//! header plus a two-byte packet identifier. PINGREQ, PINGRESP and
//! DISCONNECT carry nothing at all.

use super::codec::{Reader, Writer};
use super::PacketType;
use crate::network::error::Error;

/// A decoded acknowledgement packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Ack {
    /// Which acknowledgement this is.
    pub packet_type: PacketType,
    /// The identifier of the exchange being acknowledged.
    pub packet_id: u16,
}

fn ack_flags(packet_type: PacketType) -> Result<u8, Error> {
    match packet_type {
        // the standard fixes the PUBREL flag bits to 0010
        PacketType::Pubrel => Ok(0x02),
        PacketType::Puback
        | PacketType::Pubrec
        | PacketType::Pubcomp
        | PacketType::Unsuback => Ok(0x00),
        _ => Err(Error::InvalidPacket),
    }
}

/// Encode an acknowledgement packet into `out`.
///
/// `packet_type` must be one of PUBACK, PUBREC, PUBREL, PUBCOMP or UNSUBACK.
pub fn encode_ack(out: &mut [u8], packet_type: PacketType, packet_id: u16) -> Result<usize, Error> {
    let flags = ack_flags(packet_type)?;
    let mut w = Writer::new(out);
    w.put_u8((packet_type as u8) << 4 | flags)?;
    w.put_remaining_length(2)?;
    w.put_u16(packet_id)?;
    Ok(w.position())
}

/// Decode an acknowledgement packet from the start of `buf`.
pub fn decode_ack(buf: &[u8]) -> Result<Ack, Error> {
    let mut r = Reader::new(buf);
    let first = r.take_u8()?;
    let packet_type = PacketType::detect(first)?;
    if first & 0x0F != ack_flags(packet_type)? {
        return Err(Error::InvalidPacket);
    }
    if r.take_remaining_length()? != 2 {
        return Err(Error::ProtocolError);
    }
    let packet_id = r.take_u16()?;
    Ok(Ack {
        packet_type,
        packet_id,
    })
}

/// Encode a packet with no variable header or payload into `out`.
///
/// `packet_type` must be one of PINGREQ, PINGRESP or DISCONNECT.
pub fn encode_empty(out: &mut [u8], packet_type: PacketType) -> Result<usize, Error> {
    match packet_type {
        PacketType::Pingreq | PacketType::Pingresp | PacketType::Disconnect => {}
        _ => return Err(Error::InvalidPacket),
    }
    let mut w = Writer::new(out);
    w.put_u8((packet_type as u8) << 4)?;
    w.put_remaining_length(0)?;
    Ok(w.position())
}
