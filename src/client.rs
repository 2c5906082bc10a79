//! Blocking MQTT 3.1.1 protocol engine.
//!
//! The [`Client`] sequences request/response exchanges against a broker over
//! a caller-provided [`Connection`]: CONNECT/CONNACK, SUBSCRIBE/SUBACK,
//! PUBLISH at QoS 0, 1 and 2, PINGREQ/PINGRESP and DISCONNECT. It owns no
//! threads and performs no allocation; all working memory is a pair of
//! caller-supplied buffers borrowed for the client's lifetime.
//!
//! Inbound PUBLISH packets that arrive while a command waits for its
//! acknowledgement are decoded and handed to the message callback before the
//! wait continues, so subscriptions keep flowing even during synchronous
//! commands. Between commands, [`Client::poll`] drains inbound traffic for a
//! bounded amount of time.
//!
//! Every command takes a timeout in milliseconds, measured by the
//! caller-provided [`Timer`] pair. The engine never retries: any error
//! aborts the current command and is returned verbatim, and after a failure
//! the session may be desynchronized - the caller decides whether to
//! reconnect.
//!
//! # Examples
//!
//! ```rust,no_run
//! use libmqtt::client::{Client, Message, Options, QoS};
//! # use libmqtt::network::{Close, Connection, Read, Write};
//! # use libmqtt::time::Timer;
//! # struct TcpConnection;
//! # impl Read for TcpConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8], _t: u32) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for TcpConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8], _t: u32) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for TcpConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connection for TcpConnection {}
//! # struct TickTimer;
//! # impl Timer for TickTimer {
//! #     fn set(&mut self, _millis: u32) {}
//! #     fn remaining(&mut self) -> u32 { 0 }
//! # }
//!
//! let mut write_buf = [0u8; 256];
//! let mut read_buf = [0u8; 256];
//! let connection = TcpConnection; // established by the caller
//!
//! let mut client = Client::new(
//!     connection,
//!     TickTimer,
//!     TickTimer,
//!     &mut write_buf,
//!     &mut read_buf,
//! );
//!
//! let options = Options::new("sensor_device_01", 60);
//! // client.connect(&options, None, 5000)?;
//! // client.publish("sensors/temperature", &Message { qos: QoS::AtMostOnce,
//! //     retained: false, payload: b"23.5" }, 1000)?;
//! ```

use crate::network::error::Error;
use crate::network::Connection;
use crate::packet::{self, PacketType, ack, publish, subscribe};
use crate::time::Timer;

pub use crate::packet::connect::{Connack, Options, ReturnCode, Will};
pub use crate::packet::publish::{Message, QoS};
pub use crate::packet::subscribe::SubackCode;

/// An MQTT 3.1.1 client.
///
/// Generic over the transport `C` and the timer implementation `T`. Two
/// timer instances are required: one tracks the keep-alive window, the other
/// the in-flight command deadline. Both buffers must be large enough for the
/// biggest packet the session will carry; a packet that does not fit fails
/// with [`Error::BufferTooShort`] before any network traffic.
pub struct Client<'a, C: Connection, T: Timer> {
    connection: C,
    keep_alive_timer: T,
    command_timer: T,
    write_buf: &'a mut [u8],
    read_buf: &'a mut [u8],
    callback: Option<&'a mut dyn FnMut(&str, &Message<'_>)>,
    next_packet_id: u16,
    keep_alive_interval: u16,
    ping_outstanding: bool,
    is_connected: bool,
}

impl<C: Connection, T: Timer> core::fmt::Debug for Client<'_, C, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("next_packet_id", &self.next_packet_id)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("ping_outstanding", &self.ping_outstanding)
            .field("is_connected", &self.is_connected)
            .finish_non_exhaustive()
    }
}

impl<'a, C: Connection, T: Timer> Client<'a, C, T> {
    /// Create a client over an established connection.
    ///
    /// Both timers are reset to expired. The buffers are borrowed for the
    /// client's whole lifetime and never grown or reallocated.
    pub fn new(
        connection: C,
        mut keep_alive_timer: T,
        mut command_timer: T,
        write_buf: &'a mut [u8],
        read_buf: &'a mut [u8],
    ) -> Self {
        keep_alive_timer.set(0);
        command_timer.set(0);
        Self {
            connection,
            keep_alive_timer,
            command_timer,
            write_buf,
            read_buf,
            callback: None,
            next_packet_id: 1,
            keep_alive_interval: 0,
            ping_outstanding: false,
            is_connected: false,
        }
    }

    /// Install the handler invoked for every inbound PUBLISH packet.
    ///
    /// The handler observes the topic and message as views into the read
    /// buffer; both are only valid for the duration of the call. To keep a
    /// message around, copy it out - for example into a
    /// [`MessageQueue`](crate::queue::MessageQueue) - and process it after
    /// the running command returns.
    pub fn set_callback(&mut self, callback: &'a mut dyn FnMut(&str, &Message<'_>)) {
        self.callback = Some(callback);
    }

    /// Whether a CONNECT handshake has completed on this client.
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    /// Connect to the broker and wait for its acknowledgement.
    ///
    /// Remembers the keep-alive interval from `options` and primes the
    /// keep-alive timer when it is nonzero.
    ///
    /// # Returns
    ///
    /// * `Ok(connack)` - the broker accepted the connection
    /// * `Err(Error::ConnectionRefused)` - the broker answered with a
    ///   non-accepted return code
    /// * `Err(Error::Timeout)` - no CONNACK within `timeout_ms`
    pub fn connect(
        &mut self,
        options: &Options<'_>,
        will: Option<&Will<'_>>,
        timeout_ms: u32,
    ) -> Result<Connack, Error> {
        self.command_timer.set(timeout_ms);

        self.keep_alive_interval = options.keep_alive_seconds;
        if self.keep_alive_interval > 0 {
            self.keep_alive_timer
                .set(u32::from(self.keep_alive_interval) * 1000);
        }

        let len = packet::connect::encode_connect(self.write_buf, options, will)?;
        self.send_packet(len)?;

        let packet_type = self.cycle_until(Some(PacketType::Connack))?;
        if packet_type != Some(PacketType::Connack) {
            return Err(Error::Timeout);
        }

        let connack = packet::connect::decode_connack(self.read_buf)?;
        if connack.return_code != ReturnCode::Accepted {
            return Err(Error::ConnectionRefused);
        }

        self.is_connected = true;
        Ok(connack)
    }

    /// Publish a message to a topic.
    ///
    /// QoS 0 returns as soon as the packet is on the wire. QoS 1 waits for
    /// the broker's PUBACK, QoS 2 for the full PUBREC/PUBREL/PUBCOMP
    /// handshake. Messages received while waiting are delivered to the
    /// callback in arrival order.
    pub fn publish(
        &mut self,
        topic: &str,
        message: &Message<'_>,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        self.command_timer.set(timeout_ms);

        let packet_id = if message.qos == QoS::AtMostOnce {
            0
        } else {
            self.next_packet_id()
        };

        let len = publish::encode_publish(self.write_buf, false, packet_id, topic, message)?;
        self.send_packet(len)?;

        let ack_type = match message.qos {
            QoS::AtMostOnce => return Ok(()),
            QoS::AtLeastOnce => PacketType::Puback,
            QoS::ExactlyOnce => PacketType::Pubcomp,
        };

        let packet_type = self.cycle_until(Some(ack_type))?;
        if packet_type != Some(ack_type) {
            return Err(Error::Timeout);
        }

        let ack = ack::decode_ack(self.read_buf)?;
        if ack.packet_id != packet_id {
            return Err(Error::ProtocolError);
        }
        Ok(())
    }

    /// Subscribe to a topic filter and wait for the broker's verdict.
    ///
    /// # Returns
    ///
    /// * `Ok(qos)` - the QoS level the broker actually granted, which may be
    ///   lower than the one requested
    /// * `Err(Error::SubscriptionRefused)` - the broker rejected the filter
    pub fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: QoS,
        timeout_ms: u32,
    ) -> Result<QoS, Error> {
        self.command_timer.set(timeout_ms);

        let packet_id = self.next_packet_id();
        let len =
            subscribe::encode_subscribe(self.write_buf, packet_id, &[(topic_filter, qos)])?;
        self.send_packet(len)?;

        let packet_type = self.cycle_until(Some(PacketType::Suback))?;
        if packet_type != Some(PacketType::Suback) {
            return Err(Error::Timeout);
        }

        let mut codes = [SubackCode::Failure];
        let (ack_id, _) = subscribe::decode_suback(self.read_buf, &mut codes)?;
        if ack_id != packet_id {
            return Err(Error::ProtocolError);
        }
        codes[0].granted_qos().ok_or(Error::SubscriptionRefused)
    }

    /// Unsubscribe from a topic filter and wait for the acknowledgement.
    pub fn unsubscribe(&mut self, topic_filter: &str, timeout_ms: u32) -> Result<(), Error> {
        self.command_timer.set(timeout_ms);

        let packet_id = self.next_packet_id();
        let len = subscribe::encode_unsubscribe(self.write_buf, packet_id, &[topic_filter])?;
        self.send_packet(len)?;

        let packet_type = self.cycle_until(Some(PacketType::Unsuback))?;
        if packet_type != Some(PacketType::Unsuback) {
            return Err(Error::Timeout);
        }

        let ack = ack::decode_ack(self.read_buf)?;
        if ack.packet_id != packet_id {
            return Err(Error::ProtocolError);
        }
        Ok(())
    }

    /// Send a DISCONNECT packet.
    ///
    /// The broker does not acknowledge a disconnect, so this returns as soon
    /// as the packet is on the wire.
    pub fn disconnect(&mut self, timeout_ms: u32) -> Result<(), Error> {
        self.command_timer.set(timeout_ms);

        let len = ack::encode_empty(self.write_buf, PacketType::Disconnect)?;
        self.send_packet(len)?;
        self.is_connected = false;
        Ok(())
    }

    /// Process inbound traffic for up to `timeout_ms` milliseconds.
    ///
    /// Drains whatever the broker pushed - application messages go to the
    /// callback, QoS handshake packets are answered, PINGRESP clears the
    /// outstanding-ping flag.
    pub fn poll(&mut self, timeout_ms: u32) -> Result<(), Error> {
        self.command_timer.set(timeout_ms);
        self.cycle_until(None)?;
        Ok(())
    }

    /// Send a PINGREQ if the keep-alive window has elapsed.
    ///
    /// Does nothing while the interval is zero or the window is still open.
    /// Fails with [`Error::PingTimeout`] when a ping is due but the previous
    /// PINGREQ is still unanswered, which means the broker has gone quiet.
    pub fn keep_alive(&mut self, timeout_ms: u32) -> Result<(), Error> {
        self.command_timer.set(timeout_ms);

        if self.keep_alive_interval == 0 {
            return Ok(());
        }
        if self.keep_alive_timer.remaining() > 0 {
            return Ok(());
        }

        // a ping is due
        if self.ping_outstanding {
            return Err(Error::PingTimeout);
        }

        let len = ack::encode_empty(self.write_buf, PacketType::Pingreq)?;
        self.send_packet(len)?;
        self.ping_outstanding = true;
        Ok(())
    }

    /// Allocate the next packet identifier, wrapping 65535 back to 1.
    ///
    /// Zero is reserved by the protocol and never produced.
    fn next_packet_id(&mut self) -> u16 {
        let packet_id = self.next_packet_id;
        self.next_packet_id = if packet_id == u16::MAX { 1 } else { packet_id + 1 };
        packet_id
    }

    /// Write `len` bytes from the write buffer to the transport.
    ///
    /// A short write is fatal. Any successful send resets the keep-alive
    /// window, since the broker saw traffic from us.
    fn send_packet(&mut self, len: usize) -> Result<(), Error> {
        let deadline = self.command_timer.remaining();
        let sent = self
            .connection
            .write(&self.write_buf[..len], deadline)
            .map_err(|_| Error::WriteError)?;
        if sent != len {
            return Err(Error::NotEnoughData);
        }
        self.connection.flush().map_err(|_| Error::WriteError)?;

        self.keep_alive_timer
            .set(u32::from(self.keep_alive_interval) * 1000);
        Ok(())
    }

    /// Read one whole packet into the read buffer.
    ///
    /// Returns `Ok(None)` when nothing is queued: either the transport's
    /// peek reported zero bytes, or the first-byte read came back empty at
    /// the deadline. Once a header byte has arrived the rest of the packet
    /// must follow; a short read mid-packet is [`Error::NotEnoughData`].
    fn read_packet(&mut self) -> Result<Option<PacketType>, Error> {
        if let Some(available) = self.connection.peek().map_err(|_| Error::ReadError)? {
            if available == 0 {
                return Ok(None);
            }
        }

        let deadline = self.command_timer.remaining();
        let read = self
            .connection
            .read(&mut self.read_buf[..1], deadline)
            .map_err(|_| Error::ReadError)?;
        if read == 0 {
            return Ok(None);
        }

        let packet_type = PacketType::detect(self.read_buf[0])?;

        // pull the remaining-length varint one byte at a time
        let mut header_len = 1;
        let rem_len = loop {
            if header_len >= self.read_buf.len() {
                return Err(Error::BufferTooShort);
            }
            let deadline = self.command_timer.remaining();
            let read = self
                .connection
                .read(&mut self.read_buf[header_len..header_len + 1], deadline)
                .map_err(|_| Error::ReadError)?;
            if read != 1 {
                return Err(Error::NotEnoughData);
            }
            header_len += 1;
            if let Some((value, _)) = packet::detect_remaining_length(&self.read_buf[1..header_len])? {
                break value;
            }
        };

        if self.read_buf.len() < header_len + rem_len {
            return Err(Error::BufferTooShort);
        }
        if rem_len > 0 {
            let deadline = self.command_timer.remaining();
            let read = self
                .connection
                .read(&mut self.read_buf[header_len..header_len + rem_len], deadline)
                .map_err(|_| Error::ReadError)?;
            if read != rem_len {
                return Err(Error::NotEnoughData);
            }
        }

        Ok(Some(packet_type))
    }

    /// Read and dispatch a single inbound packet.
    ///
    /// Application messages are delivered to the callback and acknowledged
    /// according to their QoS; handshake packets are answered; everything
    /// else passes through to the caller untouched.
    fn cycle(&mut self) -> Result<Option<PacketType>, Error> {
        let packet_type = match self.read_packet()? {
            Some(packet_type) => packet_type,
            None => return Ok(None),
        };

        match packet_type {
            PacketType::Publish => {
                let inbound = publish::decode_publish(self.read_buf)?;
                let qos = inbound.message.qos;
                let packet_id = inbound.packet_id;

                if let Some(callback) = self.callback.as_mut() {
                    callback(inbound.topic, &inbound.message);
                }

                match qos {
                    QoS::AtMostOnce => {}
                    QoS::AtLeastOnce => self.send_ack(PacketType::Puback, packet_id)?,
                    QoS::ExactlyOnce => self.send_ack(PacketType::Pubrec, packet_id)?,
                }
            }
            PacketType::Pubrec => {
                let ack = ack::decode_ack(self.read_buf)?;
                self.send_ack(PacketType::Pubrel, ack.packet_id)?;
            }
            PacketType::Pubrel => {
                let ack = ack::decode_ack(self.read_buf)?;
                self.send_ack(PacketType::Pubcomp, ack.packet_id)?;
            }
            PacketType::Pingresp => {
                self.ping_outstanding = false;
            }
            _ => {}
        }

        Ok(Some(packet_type))
    }

    /// Run [`cycle`](Self::cycle) until `target` is seen or the command
    /// timer expires; `None` drains until the timer expires.
    ///
    /// Returns the last packet type observed.
    fn cycle_until(&mut self, target: Option<PacketType>) -> Result<Option<PacketType>, Error> {
        loop {
            let packet_type = self.cycle()?;
            if target.is_some() && packet_type == target {
                return Ok(packet_type);
            }
            if self.command_timer.remaining() == 0 {
                return Ok(packet_type);
            }
        }
    }

    fn send_ack(&mut self, packet_type: PacketType, packet_id: u16) -> Result<(), Error> {
        let len = ack::encode_ack(self.write_buf, packet_type, packet_id)?;
        self.send_packet(len)
    }
}
