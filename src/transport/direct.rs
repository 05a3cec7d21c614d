// MIT License
// Rust port of the node.js ad2usb module

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

use crate::alarm::{AckReceiver, Alarm};
use crate::config::AlarmConfig;
use crate::error::{AlarmError, Result};
use crate::event::{event_channel, AlarmEvent, EventReceiver, EventSender};

/// TCP-connected alarm monitor.
///
/// Owns the [`Alarm`] core and the reader/writer tasks that bridge it to the
/// socket: the reader splits the byte stream into newline-delimited records
/// and feeds them to the core one at a time; the writer drains the core's
/// command channel. The core itself never touches the socket.
pub struct AlarmMonitor {
    alarm: Arc<Mutex<Alarm>>,
    event_tx: EventSender,
    reader_handle: Option<tokio::task::JoinHandle<()>>,
    writer_handle: Option<tokio::task::JoinHandle<()>>,
}

impl AlarmMonitor {
    /// Connect to the AD2USB interface and start processing its line stream.
    pub async fn connect(config: AlarmConfig) -> Result<Self> {
        info!("Connecting to interface at {}:{}", config.host, config.port);

        let connect = TcpStream::connect((config.host.as_str(), config.port));
        let stream = timeout(Duration::from_millis(config.connect_timeout_ms), connect)
            .await
            .map_err(|_| AlarmError::ConnectionTimeout)?
            .map_err(|e| {
                error!("TCP connect failed: {}", e);
                AlarmError::Io(e)
            })?;

        debug!("TCP socket connected");

        let (reader, writer) = stream.into_split();
        let (event_tx, _event_rx) = event_channel(config.event_capacity);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let alarm = Arc::new(Mutex::new(Alarm::new(event_tx.clone(), cmd_tx)));

        let reader_handle = spawn_reader_task(reader, alarm.clone(), event_tx.clone());
        let writer_handle = spawn_writer_task(writer, cmd_rx);

        let _ = event_tx.send(AlarmEvent::Connected);

        Ok(Self {
            alarm,
            event_tx,
            reader_handle: Some(reader_handle),
            writer_handle: Some(writer_handle),
        })
    }

    /// Subscribe to alarm events.
    pub fn subscribe(&self) -> EventReceiver {
        self.event_tx.subscribe()
    }

    /// Arm the panel in away mode. `Ok(None)` if the code is empty.
    pub async fn arm_away(&self, code: &str) -> Result<Option<AckReceiver>> {
        self.alarm.lock().await.arm_away(code)
    }

    /// Arm the panel in stay mode.
    pub async fn arm_stay(&self, code: &str) -> Result<Option<AckReceiver>> {
        self.alarm.lock().await.arm_stay(code)
    }

    /// Disarm the panel.
    pub async fn disarm(&self, code: &str) -> Result<Option<AckReceiver>> {
        self.alarm.lock().await.disarm(code)
    }

    /// Bypass a zone.
    pub async fn bypass(&self, code: &str, zone: &str) -> Result<Option<AckReceiver>> {
        self.alarm.lock().await.bypass(code, zone)
    }

    /// Whether the panel is armed in stay or away mode.
    pub async fn is_armed(&self) -> bool {
        self.alarm.lock().await.is_armed()
    }

    /// Disconnect from the interface and stop the reader/writer tasks.
    pub async fn disconnect(&mut self) {
        info!("Disconnecting from interface");
        let _ = self.event_tx.send(AlarmEvent::Disconnected);
        if let Some(h) = self.reader_handle.take() {
            h.abort();
        }
        if let Some(h) = self.writer_handle.take() {
            h.abort();
        }
    }
}

impl Drop for AlarmMonitor {
    fn drop(&mut self) {
        if let Some(h) = self.reader_handle.take() {
            h.abort();
        }
        if let Some(h) = self.writer_handle.take() {
            h.abort();
        }
    }
}

/// Spawn the reader task: split the socket into lines and feed the core.
fn spawn_reader_task(
    reader: OwnedReadHalf,
    alarm: Arc<Mutex<Alarm>>,
    event_tx: EventSender,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    alarm.lock().await.handle_line(&line);
                }
                Ok(None) => {
                    debug!("Reader: connection closed");
                    let _ = event_tx.send(AlarmEvent::Disconnected);
                    break;
                }
                Err(e) => {
                    error!("Reader: read error: {}", e);
                    let _ = event_tx.send(AlarmEvent::Disconnected);
                    break;
                }
            }
        }
    })
}

/// Spawn the writer task: drain the command channel into the socket.
/// Commands are written verbatim, with no terminator.
fn spawn_writer_task(
    mut writer: OwnedWriteHalf,
    mut cmd_rx: mpsc::UnboundedReceiver<String>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if let Err(e) = writer.write_all(cmd.as_bytes()).await {
                error!("Writer: failed to write command: {}", e);
                break;
            }
        }
    })
}
