// MIT License
// Rust port of the node.js ad2usb module

/// All events that can be emitted by the alarm interface.
///
/// Users subscribe via `AlarmMonitor::subscribe()` to receive a
/// `tokio::sync::broadcast::Receiver<AlarmEvent>`.
///
/// Flag-carrying events (`Bypass`, `Power`, ...) fire only when the flag
/// actually changes; the keypad re-broadcasts its full status every few
/// seconds and unchanged flags are suppressed by the state store. `Raw` and
/// `Beep` are the exceptions: `Raw` fires for every panel message and `Beep`
/// fires whenever the decoded count is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmEvent {
    /// TCP connection to the AD2USB interface established
    Connected,
    /// TCP connection lost
    Disconnected,
    /// The four sections of a panel message, verbatim (brackets stripped from
    /// the bitfield and diagnostic sections, quotes retained on the display
    /// text). Emitted for every panel message, changed or not.
    Raw {
        status: String,
        fault: String,
        diagnostics: String,
        display: String,
    },
    /// Panel transitioned to disarmed
    Disarmed,
    /// Panel transitioned to armed-away
    ArmedAway,
    /// Panel transitioned to armed-stay
    ArmedStay,
    /// Keypad beeped (count 1-9). Re-emitted on every message with a
    /// non-zero count.
    Beep(u8),
    /// Keypad backlight on/off
    Backlight(bool),
    /// Installer programming mode
    Programming(bool),
    /// One or more zones bypassed
    Bypass(bool),
    /// AC power present
    Power(bool),
    /// Chime mode enabled
    ChimeMode(bool),
    /// An alarm occurred and is sticky until reviewed
    AlarmOccurred(bool),
    /// Alarm currently sounding
    AlarmActive(bool),
    /// System battery low
    BatteryLow(bool),
    /// Entry delay disabled
    EntryDelayOff(bool),
    /// Fire alarm active
    FireAlarm(bool),
    /// System check (trouble) on a zone
    CheckZone(bool),
    /// Perimeter-only arming
    PerimeterOnly(bool),
    /// Fault zone code changed (3-character zone code)
    Fault(String),
    /// Wireless sensor supervision state (ok = true means supervised)
    RfSupervision { serial: String, ok: bool },
    /// Wireless sensor battery state (ok = true means battery healthy)
    RfBattery { serial: String, ok: bool },
    /// Wireless sensor loop state, loop_no 1-4 (ok = true means loop closed)
    RfLoop { serial: String, loop_no: u8, ok: bool },
    /// The interface acknowledged a previously written command
    Sent,
    /// A panel or RF line failed to decode. Processing continues with the
    /// next line.
    Error { detail: String },
}

/// Type alias for the broadcast sender.
pub type EventSender = tokio::sync::broadcast::Sender<AlarmEvent>;

/// Type alias for the broadcast receiver.
pub type EventReceiver = tokio::sync::broadcast::Receiver<AlarmEvent>;

/// Create a new event channel with the given capacity.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    tokio::sync::broadcast::channel(capacity)
}
