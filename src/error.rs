// MIT License
// Rust port of the node.js ad2usb module

/// All errors that can occur in the ad2usb-bridge library.
#[derive(Debug, thiserror::Error)]
pub enum AlarmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("Malformed panel message: {details}")]
    MalformedPanelMessage { details: String },

    #[error("Malformed RF message: {details}")]
    MalformedRfMessage { details: String },

    #[error("Transport disconnected")]
    Disconnected,
}

impl AlarmError {
    /// Whether this error came from decoding a protocol line (as opposed to
    /// the transport). Parse errors are reported through the event stream and
    /// never abort line processing.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            AlarmError::MalformedPanelMessage { .. } | AlarmError::MalformedRfMessage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AlarmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_classification() {
        let e = AlarmError::MalformedPanelMessage {
            details: "2 sections".to_string(),
        };
        assert!(e.is_parse_error());
        assert!(!AlarmError::Disconnected.is_parse_error());
        assert!(!AlarmError::ConnectionTimeout.is_parse_error());
    }
}
