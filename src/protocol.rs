// MIT License
// Rust port of the node.js ad2usb module

//! Wire-level protocol knowledge: line classification, panel message
//! sectioning, RF message splitting, and outbound keypad command encoding.
//!
//! # Wire formats
//!
//! - Panel message: `[<bitfield>],<3-char code>,[<hex diagnostics>],"<display>"`
//! - RF message: `!RFX:<serial>,<2 hex digits>`
//! - Command acknowledgment: `!Sending` followed by zero or more `.` and `done`

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AlarmError, Result};

/// Prefix of a panel (keypad) status message.
pub const PANEL_PREFIX: char = '[';

/// Prefix of a wireless sensor status message.
pub const RF_PREFIX: &str = "!RFX";

/// Acknowledgment marker the interface prints while relaying a command.
static SENDING_ACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!Sending\.*done").expect("valid ack pattern"));

/// How a received line should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Keypad status broadcast
    PanelStatus,
    /// Wireless sensor status broadcast
    RfStatus,
    /// Command acknowledgment
    SendAck,
    /// Unrecognized traffic, silently ignored
    Other,
}

/// Classify a decoded protocol line (no trailing newline required).
pub fn classify(line: &str) -> LineKind {
    if line.starts_with(PANEL_PREFIX) {
        LineKind::PanelStatus
    } else if line.starts_with(RF_PREFIX) {
        LineKind::RfStatus
    } else if SENDING_ACK.is_match(line) {
        LineKind::SendAck
    } else {
        LineKind::Other
    }
}

/// The four comma-separated sections of a panel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSections {
    /// Bitfield section, brackets stripped
    pub status: String,
    /// 3-character fault zone code, verbatim
    pub fault: String,
    /// Hex diagnostic payload, brackets stripped, not interpreted
    pub diagnostics: String,
    /// Quoted 32-character display text, quotes retained, not interpreted
    pub display: String,
}

/// Split a panel message into its four sections.
///
/// The display text is fixed-width and never contains a comma, so a plain
/// comma split is safe; any sections beyond the fourth are ignored.
pub fn split_panel_line(line: &str) -> Result<PanelSections> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 4 {
        return Err(AlarmError::MalformedPanelMessage {
            details: format!("expected 4 sections, got {}", parts.len()),
        });
    }

    Ok(PanelSections {
        status: strip_brackets(parts[0]),
        fault: parts[1].to_string(),
        diagnostics: strip_brackets(parts[2]),
        display: parts[3].to_string(),
    })
}

/// Split an RF message into (serial, status byte hex).
pub fn split_rf_line(line: &str) -> Result<(String, String)> {
    let body = line
        .strip_prefix(RF_PREFIX)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| AlarmError::MalformedRfMessage {
            details: format!("missing {}: prefix", RF_PREFIX),
        })?;

    let (serial, status) = body.split_once(',').ok_or_else(|| {
        AlarmError::MalformedRfMessage {
            details: "missing status byte".to_string(),
        }
    })?;

    Ok((serial.to_string(), status.to_string()))
}

fn strip_brackets(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

/// Keypad commands that can be sent through the interface.
///
/// Commands are the user's access code followed by the keypad key sequence;
/// the interface relays them to the panel as keypresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `<code>2` — arm in away mode
    ArmAway { code: String },
    /// `<code>3` — arm in stay mode
    ArmStay { code: String },
    /// `<code>1` — disarm
    Disarm { code: String },
    /// `<code>6<zone>` — bypass a zone
    Bypass { code: String, zone: String },
}

impl Command {
    /// Convert the command to its wire string representation. Commands are
    /// written as-is, with no terminator.
    pub fn to_wire_string(&self) -> String {
        match self {
            Command::ArmAway { code } => format!("{}2", code),
            Command::ArmStay { code } => format!("{}3", code),
            Command::Disarm { code } => format!("{}1", code),
            Command::Bypass { code, zone } => format!("{}6{}", code, zone),
        }
    }
}
