//! # libmqtt - lightweight MQTT 3.1.1 client
//!
//! A small MQTT 3.1.1 client library for constrained and embedded devices.
//! The crate owns no threads, performs no allocation and opens no sockets:
//! the caller provides the transport, two countdown timers and a pair of
//! byte buffers, and drives the client from a single thread.
//!
//! ## Features
//!
//! - MQTT 3.1.1 protocol compliance
//! - Quality of Service (QoS) levels 0, 1, and 2 support
//! - Clean session and persistent session support
//! - Configurable keep-alive with PINGREQ/PINGRESP tracking
//! - Last-will, username and password connect options
//! - Fixed caller-owned buffers for predictable memory usage
//! - Transport agnostic (works over any ordered byte stream)
//!
//! ## Architecture
//!
//! The crate is organized in three layers, each depending only on those
//! below it:
//!
//! 1. **Capability traits** ([`network`], [`time`]) - how the client
//!    reaches the outside world
//! 2. **Wire codec** ([`packet`]) - serialization of every MQTT 3.1.1
//!    control packet against caller buffers
//! 3. **Protocol engine** ([`client`]) - session state, handshake
//!    sequencing and callback dispatch
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libmqtt = "0.1.0"
//! ```
//!
//! Establish a connection with your platform's networking, implement
//! [`network::Connection`] and [`time::Timer`] for it, and hand both to
//! [`client::Client::new`] together with two buffers. See the [`client`]
//! module for a complete example.
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Transport abstraction the client talks to the broker through.
pub mod network;

/// Countdown timer abstraction used for all deadlines.
pub mod time;

/// MQTT 3.1.1 packet serialization and deserialization.
pub mod packet;

/// The blocking protocol engine.
pub mod client;

/// Bounded queue for holding received messages beyond the callback.
pub mod queue;
