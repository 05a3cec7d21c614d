// MIT License
// Rust port of the node.js ad2usb module

//! The core alarm object: routes incoming lines to the panel/RF decoders,
//! tracks state through the [`StateStore`], and encodes outbound keypad
//! commands.
//!
//! `Alarm` is fully synchronous and single-threaded by construction: one line
//! is decoded to completion before the next arrives. It does not own a
//! transport; lines are fed in via [`Alarm::handle_line`] and commands leave
//! through the sink channel handed in at construction. A multi-task host must
//! serialize access externally (the TCP transport does so with a mutex).

use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::codec::{PanelFlags, PanelStatus, RfStatusFlags};
use crate::error::{AlarmError, Result};
use crate::event::{AlarmEvent, EventSender};
use crate::protocol::{classify, split_panel_line, split_rf_line, Command, LineKind};
use crate::state::StateStore;

/// Sink for encoded command strings. The transport drains this channel and
/// performs the actual write; write failures are the transport's concern.
pub type CommandSink = mpsc::UnboundedSender<String>;

/// Resolves when the interface acknowledges the corresponding command.
///
/// The AD2USB never times an acknowledgment out: if no `!Sending...done`
/// marker arrives, the receiver stays pending forever. Callers that need a
/// bound can wrap it in `tokio::time::timeout`.
pub type AckReceiver = oneshot::Receiver<()>;

/// Decodes the AD2USB line protocol into events and encodes keypad commands.
pub struct Alarm {
    state: StateStore,
    // Arm mode is tri-state with its own precedence rules, so the three
    // booleans bypass the state store and are diffed by hand.
    disarmed: bool,
    armed_away: bool,
    armed_stay: bool,
    // Acknowledgments carry no correlation id on the wire; they resolve
    // pending commands strictly in send order.
    pending_acks: VecDeque<oneshot::Sender<()>>,
    cmd_tx: CommandSink,
}

impl Alarm {
    /// Create an alarm core publishing on `event_tx` and writing commands to
    /// `cmd_tx`.
    pub fn new(event_tx: EventSender, cmd_tx: CommandSink) -> Self {
        Self {
            state: StateStore::new(event_tx),
            disarmed: false,
            armed_away: false,
            armed_stay: false,
            pending_acks: VecDeque::new(),
            cmd_tx,
        }
    }

    /// Handle one decoded protocol line.
    ///
    /// Decode failures are published as a single [`AlarmEvent::Error`] and
    /// never propagate; unrecognized line types are ignored without comment.
    pub fn handle_line(&mut self, line: &str) {
        let result = match classify(line) {
            LineKind::PanelStatus => self.handle_panel_status(line),
            LineKind::RfStatus => self.handle_rf_status(line),
            LineKind::SendAck => {
                self.handle_send_ack();
                Ok(())
            }
            LineKind::Other => Ok(()),
        };

        if let Err(e) = result {
            warn!("Failed to decode line {:?}: {}", line, e);
            self.state.publish(AlarmEvent::Error {
                detail: e.to_string(),
            });
        }
    }

    /// Decode a keypad status broadcast and fan its fields out through the
    /// state store.
    fn handle_panel_status(&mut self, line: &str) -> Result<()> {
        let sections = split_panel_line(line)?;
        let status = PanelStatus::from_bitfield(&sections.status)?;
        let flags = status.flags;

        let disarmed = flags.contains(PanelFlags::DISARMED);
        let armed_away = flags.contains(PanelFlags::ARMED_AWAY);
        let armed_stay = flags.contains(PanelFlags::ARMED_STAY);

        // Arm-mode precedence: disarmed > armedAway > armedStay, first mode
        // that is set and newly set wins; the stored values are then updated
        // unconditionally. When no mode bit is set (e.g. "Hit * for faults"
        // screens) the previous arm state is left untouched.
        if disarmed || armed_away || armed_stay {
            if disarmed && !self.disarmed {
                self.state.publish(AlarmEvent::Disarmed);
            } else if armed_away && !self.armed_away {
                self.state.publish(AlarmEvent::ArmedAway);
            } else if armed_stay && !self.armed_stay {
                self.state.publish(AlarmEvent::ArmedStay);
            }
            self.disarmed = disarmed;
            self.armed_away = armed_away;
            self.armed_stay = armed_stay;
        }

        self.state
            .set_bool("backlight", flags.contains(PanelFlags::BACKLIGHT), AlarmEvent::Backlight);
        self.state.set_bool(
            "programming",
            flags.contains(PanelFlags::PROGRAMMING),
            AlarmEvent::Programming,
        );

        if status.beeps > 0 {
            self.state.publish(AlarmEvent::Beep(status.beeps));
        }

        self.state
            .set_bool("bypass", flags.contains(PanelFlags::BYPASS), AlarmEvent::Bypass);
        self.state
            .set_bool("power", flags.contains(PanelFlags::AC_POWER), AlarmEvent::Power);
        self.state
            .set_bool("chimeMode", flags.contains(PanelFlags::CHIME_MODE), AlarmEvent::ChimeMode);
        self.state.set_bool(
            "alarmOccurred",
            flags.contains(PanelFlags::ALARM_OCCURRED),
            AlarmEvent::AlarmOccurred,
        );
        self.state.set_bool(
            "alarm",
            flags.contains(PanelFlags::ALARM_ACTIVE),
            AlarmEvent::AlarmActive,
        );
        self.state.set_bool(
            "batteryLow",
            flags.contains(PanelFlags::BATTERY_LOW),
            AlarmEvent::BatteryLow,
        );
        self.state.set_bool(
            "entryDelayOff",
            flags.contains(PanelFlags::ENTRY_DELAY_OFF),
            AlarmEvent::EntryDelayOff,
        );
        self.state
            .set_bool("fireAlarm", flags.contains(PanelFlags::FIRE_ALARM), AlarmEvent::FireAlarm);
        self.state
            .set_bool("checkZone", flags.contains(PanelFlags::CHECK_ZONE), AlarmEvent::CheckZone);
        self.state.set_bool(
            "perimeterOnly",
            flags.contains(PanelFlags::PERIMETER_ONLY),
            AlarmEvent::PerimeterOnly,
        );

        self.state
            .set_text("fault", &sections.fault, |code| AlarmEvent::Fault(code.to_string()));

        // Raw pass-through for debugging and consumers that want the
        // uninterpreted sections. Always emitted.
        self.state.publish(AlarmEvent::Raw {
            status: sections.status,
            fault: sections.fault,
            diagnostics: sections.diagnostics,
            display: sections.display,
        });

        Ok(())
    }

    /// Decode a wireless sensor status broadcast into the per-serial slots.
    fn handle_rf_status(&mut self, line: &str) -> Result<()> {
        let (serial, status_hex) = split_rf_line(line)?;
        let status = RfStatusFlags::from_hex(&status_hex)?;

        self.state.set_bool(
            &format!("supervision:{}", serial),
            status.supervision_ok(),
            |ok| AlarmEvent::RfSupervision {
                serial: serial.clone(),
                ok,
            },
        );
        self.state
            .set_bool(&format!("battery:{}", serial), status.battery_ok(), |ok| {
                AlarmEvent::RfBattery {
                    serial: serial.clone(),
                    ok,
                }
            });
        for loop_no in 1..=4u8 {
            self.state.set_bool(
                &format!("loop:{}:{}", serial, loop_no),
                status.loop_ok(loop_no),
                |ok| AlarmEvent::RfLoop {
                    serial: serial.clone(),
                    loop_no,
                    ok,
                },
            );
        }

        Ok(())
    }

    /// The interface acknowledged a command: publish the sent signal and
    /// resolve the oldest pending acknowledgment.
    fn handle_send_ack(&mut self) {
        debug!("Command acknowledged by interface");
        self.state.publish(AlarmEvent::Sent);
        if let Some(tx) = self.pending_acks.pop_front() {
            let _ = tx.send(());
        }
    }

    /// Arm the panel in away mode. A missing access code is a silent no-op
    /// (`Ok(None)`), mirroring keypad behavior.
    pub fn arm_away(&mut self, code: &str) -> Result<Option<AckReceiver>> {
        if code.is_empty() {
            return Ok(None);
        }
        self.send(Command::ArmAway {
            code: code.to_string(),
        })
        .map(Some)
    }

    /// Arm the panel in stay mode.
    pub fn arm_stay(&mut self, code: &str) -> Result<Option<AckReceiver>> {
        if code.is_empty() {
            return Ok(None);
        }
        self.send(Command::ArmStay {
            code: code.to_string(),
        })
        .map(Some)
    }

    /// Disarm the panel.
    pub fn disarm(&mut self, code: &str) -> Result<Option<AckReceiver>> {
        if code.is_empty() {
            return Ok(None);
        }
        self.send(Command::Disarm {
            code: code.to_string(),
        })
        .map(Some)
    }

    /// Bypass a zone.
    pub fn bypass(&mut self, code: &str, zone: &str) -> Result<Option<AckReceiver>> {
        if code.is_empty() {
            return Ok(None);
        }
        self.send(Command::Bypass {
            code: code.to_string(),
            zone: zone.to_string(),
        })
        .map(Some)
    }

    /// Whether the panel is armed in stay or away mode.
    pub fn is_armed(&self) -> bool {
        self.armed_stay || self.armed_away
    }

    /// Encode and queue a command, registering an acknowledgment receiver
    /// resolved by the next sent signal.
    fn send(&mut self, command: Command) -> Result<AckReceiver> {
        let wire = command.to_wire_string();
        debug!("Sending command: {:?}", command);

        let (tx, rx) = oneshot::channel();
        self.pending_acks.push_back(tx);

        if self.cmd_tx.send(wire).is_err() {
            self.pending_acks.pop_back();
            return Err(AlarmError::Disconnected);
        }

        Ok(rx)
    }
}
