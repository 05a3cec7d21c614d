// MIT License
// Rust port of the node.js ad2usb module

/// Configuration for connecting to an AD2USB interface over TCP.
///
/// The interface is usually exposed through a serial-to-IP bridge; 4999 is
/// the conventional port for those devices.
#[derive(Debug, Clone)]
pub struct AlarmConfig {
    /// Interface IP address or hostname
    pub host: String,
    /// Interface TCP port (default: 4999)
    pub port: u16,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Capacity of the broadcast event channel
    pub event_capacity: usize,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.100".to_string(),
            port: 4999,
            connect_timeout_ms: 10_000,
            event_capacity: 256,
        }
    }
}

impl AlarmConfig {
    /// Create a new config builder starting from defaults.
    pub fn builder() -> AlarmConfigBuilder {
        AlarmConfigBuilder::default()
    }
}

/// Builder for AlarmConfig.
#[derive(Debug, Clone, Default)]
pub struct AlarmConfigBuilder {
    config: AlarmConfig,
}

impl AlarmConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn build(self) -> AlarmConfig {
        self.config
    }
}
