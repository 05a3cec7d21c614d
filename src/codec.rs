// MIT License
// Rust port of the node.js ad2usb module

//! Pure decoders for the fixed-format bitfields carried by keypad and RF
//! messages. No state is kept here; the differential logic lives in
//! [`crate::state`] and [`crate::alarm`].

use bitflags::bitflags;

use crate::error::{AlarmError, Result};

bitflags! {
    /// Panel status flags decoded from the first section of a keypad message.
    ///
    /// The section is a bracketed run of at least 16 characters, e.g.
    /// `[1000000100000000----]`. Positions are fixed; `1` means set. The
    /// sixth position is not a flag but the beep count digit (see
    /// [`PanelStatus`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PanelFlags: u16 {
        /// Position 1 - disarmed and ready
        const DISARMED        = 1 << 0;
        /// Position 2 - armed away
        const ARMED_AWAY      = 1 << 1;
        /// Position 3 - armed stay
        const ARMED_STAY      = 1 << 2;
        /// Position 4 - keypad backlight
        const BACKLIGHT       = 1 << 3;
        /// Position 5 - installer programming mode
        const PROGRAMMING     = 1 << 4;
        /// Position 7 - a zone is bypassed
        const BYPASS          = 1 << 5;
        /// Position 8 - AC power present
        const AC_POWER        = 1 << 6;
        /// Position 9 - chime mode
        const CHIME_MODE      = 1 << 7;
        /// Position 10 - alarm occurred (sticky)
        const ALARM_OCCURRED  = 1 << 8;
        /// Position 11 - alarm sounding
        const ALARM_ACTIVE    = 1 << 9;
        /// Position 12 - system battery low
        const BATTERY_LOW     = 1 << 10;
        /// Position 13 - entry delay off
        const ENTRY_DELAY_OFF = 1 << 11;
        /// Position 14 - fire alarm
        const FIRE_ALARM      = 1 << 12;
        /// Position 15 - system trouble / check zone
        const CHECK_ZONE      = 1 << 13;
        /// Position 16 - perimeter only
        const PERIMETER_ONLY  = 1 << 14;
    }
}

/// The flags in bitfield position order. Position 5 (0-based) is the beep
/// digit and is skipped here.
const PANEL_FLAG_POSITIONS: [PanelFlags; 15] = [
    PanelFlags::DISARMED,
    PanelFlags::ARMED_AWAY,
    PanelFlags::ARMED_STAY,
    PanelFlags::BACKLIGHT,
    PanelFlags::PROGRAMMING,
    PanelFlags::BYPASS,
    PanelFlags::AC_POWER,
    PanelFlags::CHIME_MODE,
    PanelFlags::ALARM_OCCURRED,
    PanelFlags::ALARM_ACTIVE,
    PanelFlags::BATTERY_LOW,
    PanelFlags::ENTRY_DELAY_OFF,
    PanelFlags::FIRE_ALARM,
    PanelFlags::CHECK_ZONE,
    PanelFlags::PERIMETER_ONLY,
];

/// Number of bitfield characters consumed (15 flags + 1 beep digit).
const PANEL_BITFIELD_LEN: usize = 16;

/// Decoded first section of a keypad message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelStatus {
    pub flags: PanelFlags,
    /// Beep count digit (0-9). Transient: the panel re-reports it on every
    /// message and it is never diffed against the previous value.
    pub beeps: u8,
}

impl PanelStatus {
    /// Decode the bracket-stripped bitfield section of a keypad message.
    ///
    /// Consumes the first 16 characters strictly left to right; trailing
    /// characters (the keypad pads the section out with `-`) are ignored.
    pub fn from_bitfield(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() < PANEL_BITFIELD_LEN {
            return Err(AlarmError::MalformedPanelMessage {
                details: format!(
                    "status bitfield too short: {} chars (need {})",
                    chars.len(),
                    PANEL_BITFIELD_LEN
                ),
            });
        }

        let mut flags = PanelFlags::empty();
        let mut pos = 0;
        for (i, flag) in PANEL_FLAG_POSITIONS.iter().enumerate() {
            // Beep digit sits between PROGRAMMING and BYPASS
            if i == 5 {
                pos += 1;
            }
            if chars[pos] == '1' {
                flags |= *flag;
            }
            pos += 1;
        }

        let beep_char = chars[5];
        let beeps = beep_char
            .to_digit(10)
            .ok_or_else(|| AlarmError::MalformedPanelMessage {
                details: format!("beep count is not a digit: {:?}", beep_char),
            })? as u8;

        Ok(Self { flags, beeps })
    }
}

bitflags! {
    /// RF sensor status flags decoded from the 2-hex-digit status byte of an
    /// `!RFX` message.
    ///
    /// A set bit signals a fault/alert condition; a clear bit signals normal
    /// operation. The bit assignments follow the AD2USB wire format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RfStatusFlags: u8 {
        /// Bit 1 - sensor battery low
        const BATTERY_FAULT     = 0x02;
        /// Bit 2 - supervision lost
        const SUPERVISION_FAULT = 0x04;
        /// Bit 4 - loop 3 open
        const LOOP3_FAULT       = 0x10;
        /// Bit 5 - loop 2 open
        const LOOP2_FAULT       = 0x20;
        /// Bit 6 - loop 4 open
        const LOOP4_FAULT       = 0x40;
        /// Bit 7 - loop 1 open
        const LOOP1_FAULT       = 0x80;
    }
}

impl RfStatusFlags {
    /// Decode the 2-hex-digit status byte. Trailing whitespace/newline is
    /// tolerated (serial transports often leave a `\r` behind).
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let byte =
            u8::from_str_radix(trimmed, 16).map_err(|_| AlarmError::MalformedRfMessage {
                details: format!("undecodable status byte: {:?}", trimmed),
            })?;
        Ok(Self::from_bits_retain(byte))
    }

    pub fn supervision_ok(&self) -> bool {
        !self.contains(Self::SUPERVISION_FAULT)
    }

    pub fn battery_ok(&self) -> bool {
        !self.contains(Self::BATTERY_FAULT)
    }

    /// Whether the given loop (1-4) is closed. Loops outside 1-4 report true.
    pub fn loop_ok(&self, loop_no: u8) -> bool {
        let fault = match loop_no {
            1 => Self::LOOP1_FAULT,
            2 => Self::LOOP2_FAULT,
            3 => Self::LOOP3_FAULT,
            4 => Self::LOOP4_FAULT,
            _ => return true,
        };
        !self.contains(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_bitfield_disarmed_power() {
        let status = PanelStatus::from_bitfield("1000000100000000----").unwrap();
        assert!(status.flags.contains(PanelFlags::DISARMED));
        assert!(status.flags.contains(PanelFlags::AC_POWER));
        assert!(!status.flags.contains(PanelFlags::ARMED_AWAY));
        assert!(!status.flags.contains(PanelFlags::ARMED_STAY));
        assert_eq!(status.beeps, 0);
    }

    #[test]
    fn test_panel_bitfield_armed_stay() {
        let status = PanelStatus::from_bitfield("0010000100000000----").unwrap();
        assert!(status.flags.contains(PanelFlags::ARMED_STAY));
        assert!(!status.flags.contains(PanelFlags::DISARMED));
    }

    #[test]
    fn test_panel_bitfield_beep_digit() {
        let status = PanelStatus::from_bitfield("1000030100000000----").unwrap();
        assert_eq!(status.beeps, 3);
        // The beep position must not leak into the flag decoding
        assert!(status.flags.contains(PanelFlags::DISARMED));
        assert!(status.flags.contains(PanelFlags::AC_POWER));
        assert!(!status.flags.contains(PanelFlags::BYPASS));
    }

    #[test]
    fn test_panel_bitfield_all_flags() {
        let status = PanelStatus::from_bitfield("1111101111111111").unwrap();
        assert_eq!(status.flags, PanelFlags::all());
        assert_eq!(status.beeps, 0);
    }

    #[test]
    fn test_panel_bitfield_too_short() {
        let err = PanelStatus::from_bitfield("100000010000000").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_panel_bitfield_bad_beep_digit() {
        let err = PanelStatus::from_bitfield("10000x0100000000----").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_rf_battery_fault() {
        let status = RfStatusFlags::from_hex("02").unwrap();
        assert!(!status.battery_ok());
        assert!(status.supervision_ok());
        assert!(status.loop_ok(1));
    }

    #[test]
    fn test_rf_supervision_fault() {
        let status = RfStatusFlags::from_hex("04").unwrap();
        assert!(!status.supervision_ok());
        assert!(status.battery_ok());
    }

    #[test]
    fn test_rf_loop_faults() {
        for (hex, loop_no) in [("80", 1), ("20", 2), ("10", 3), ("40", 4)] {
            let status = RfStatusFlags::from_hex(hex).unwrap();
            assert!(!status.loop_ok(loop_no), "loop {} should fault for {}", loop_no, hex);
            for other in 1..=4u8 {
                if other != loop_no {
                    assert!(status.loop_ok(other), "loop {} should be ok for {}", other, hex);
                }
            }
            assert!(status.battery_ok());
            assert!(status.supervision_ok());
        }
    }

    #[test]
    fn test_rf_trailing_newline_tolerated() {
        let status = RfStatusFlags::from_hex("02\n").unwrap();
        assert!(!status.battery_ok());
    }

    #[test]
    fn test_rf_bad_hex() {
        let err = RfStatusFlags::from_hex("zz").unwrap_err();
        assert!(err.is_parse_error());
    }
}
