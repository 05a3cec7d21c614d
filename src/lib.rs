// MIT License
// Rust port of the node.js ad2usb module

//! # ad2usb-bridge
//!
//! TCP/IP communication with Honeywell/Ademco Vista alarm panels through the
//! AD2USB AlarmDecoder interface.
//!
//! The interface broadcasts the keypad's status as newline-delimited text
//! lines; this library decodes them into a deduplicated stream of typed
//! events and encodes arm/disarm/bypass keypad commands. No external
//! dependencies beyond tokio, thiserror, tracing, bitflags, and regex.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ad2usb_bridge::{AlarmConfig, AlarmEvent, AlarmMonitor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AlarmConfig::builder()
//!         .host("192.168.0.50")
//!         .port(4999)
//!         .build();
//!
//!     let mut monitor = AlarmMonitor::connect(config).await?;
//!
//!     let mut events = monitor.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             match event {
//!                 AlarmEvent::ArmedAway => println!("armed (away)"),
//!                 AlarmEvent::Disarmed => println!("disarmed"),
//!                 AlarmEvent::Fault(zone) => println!("fault on zone {}", zone),
//!                 _ => {}
//!             }
//!         }
//!     });
//!
//!     monitor.arm_away("1234").await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     monitor.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Using the core without the TCP transport
//!
//! The decoding core ([`Alarm`]) is synchronous and transport-agnostic: hand
//! it an event sender and a command sink and feed it lines from any source
//! (serial port, test fixture, recorded capture).

pub mod alarm;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod protocol;
pub mod state;
pub mod transport;

// Re-exports for convenience
pub use alarm::{AckReceiver, Alarm, CommandSink};
pub use codec::{PanelFlags, PanelStatus, RfStatusFlags};
pub use config::{AlarmConfig, AlarmConfigBuilder};
pub use error::{AlarmError, Result};
pub use event::{event_channel, AlarmEvent, EventReceiver, EventSender};
pub use protocol::{Command, LineKind, PanelSections};
pub use state::StateStore;
pub use transport::AlarmMonitor;
