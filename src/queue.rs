//! Bounded queue for holding received messages.
//!
//! The client's message callback observes borrowed views into the read
//! buffer, which die as soon as the callback returns. Code that wants to
//! act on a message after the running command completes should copy it into
//! a [`MessageQueue`] from inside the callback and drain the queue
//! afterwards:
//!
//! ```rust
//! use libmqtt::client::{Message, QoS};
//! use libmqtt::queue::MessageQueue;
//!
//! let mut queue: MessageQueue<8> = MessageQueue::new();
//!
//! let mut on_message = |topic: &str, message: &Message<'_>| {
//!     let _ = queue.push(topic, message);
//! };
//!
//! // client.set_callback(&mut on_message);
//! // client.poll(100)?;
//! // drop(client);
//!
//! on_message("sensors/temperature", &Message {
//!     qos: QoS::AtMostOnce,
//!     retained: false,
//!     payload: b"23.5",
//! });
//!
//! while let Some(packet) = queue.pop() {
//!     // process packet.topic / packet.payload
//! }
//! ```

use crate::network::error::Error;
use crate::packet::publish::{Message, QoS};
use heapless::{Deque, String, Vec};

/// An owned copy of a received publish message.
///
/// Topic and payload sizes are capped to fit embedded memory budgets: 256
/// characters of topic and 1024 bytes of payload. Larger messages are
/// rejected at [`MessageQueue::push`] time.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PublishPacket {
    /// The topic on which the message was published.
    pub topic: String<256>,
    /// The message payload data.
    pub payload: Vec<u8, 1024>,
    /// Delivery guarantee the message arrived with.
    pub qos: QoS,
    /// Whether the broker flagged the message as retained.
    pub retained: bool,
}

/// A fixed-capacity FIFO of received messages.
///
/// `N` is the maximum number of queued messages. Push never blocks and
/// never allocates; a full queue or an oversized message fails with
/// [`Error::BufferTooShort`] and the message is dropped.
pub struct MessageQueue<const N: usize> {
    packets: Deque<PublishPacket, N>,
}

impl<const N: usize> core::fmt::Debug for MessageQueue<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MessageQueue")
            .field("len", &self.packets.len())
            .field("capacity", &N)
            .finish()
    }
}

impl<const N: usize> Default for MessageQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageQueue<N> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            packets: Deque::new(),
        }
    }

    /// Copy a message into the queue.
    pub fn push(&mut self, topic: &str, message: &Message<'_>) -> Result<(), Error> {
        let packet = PublishPacket {
            topic: String::try_from(topic).map_err(|_| Error::BufferTooShort)?,
            payload: Vec::from_slice(message.payload).map_err(|_| Error::BufferTooShort)?,
            qos: message.qos,
            retained: message.retained,
        };
        self.packets
            .push_back(packet)
            .map_err(|_| Error::BufferTooShort)
    }

    /// Take the oldest queued message.
    pub fn pop(&mut self) -> Option<PublishPacket> {
        self.packets.pop_front()
    }

    /// The number of queued messages.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}
