// MIT License
// Rust port of the node.js ad2usb module

//! Transport layer for the alarm core.
//!
//! The core consumes an abstract line source and command sink; this module
//! provides the concrete TCP wiring. Reconnection and backoff are out of
//! scope — on disconnect the monitor emits `AlarmEvent::Disconnected` and
//! stops, and the caller reconstructs it if desired.

pub mod direct;

pub use direct::AlarmMonitor;
