//! Example: connect to an AD2USB interface and print alarm events.

use ad2usb_bridge::{AlarmConfig, AlarmEvent, AlarmMonitor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let host = std::env::args().nth(1).unwrap_or_else(|| "192.168.0.50".to_string());

    let config = AlarmConfig::builder().host(host).port(4999).build();

    println!("Connecting to interface...");
    let mut monitor = AlarmMonitor::connect(config).await?;
    let mut events = monitor.subscribe();

    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                AlarmEvent::Raw { .. } => {} // one per keypad message, too chatty
                AlarmEvent::Disarmed => println!("panel disarmed"),
                AlarmEvent::ArmedAway => println!("panel armed (away)"),
                AlarmEvent::ArmedStay => println!("panel armed (stay)"),
                AlarmEvent::Fault(zone) => println!("fault on zone {}", zone),
                AlarmEvent::Beep(n) => println!("keypad beeped {}x", n),
                AlarmEvent::RfBattery { serial, ok } => {
                    println!("sensor {} battery ok={}", serial, ok)
                }
                AlarmEvent::RfLoop { serial, loop_no, ok } => {
                    println!("sensor {} loop {} ok={}", serial, loop_no, ok)
                }
                other => println!("{:?}", other),
            }
        }
    });

    println!("Press Ctrl+C to disconnect...");
    tokio::signal::ctrl_c().await?;
    monitor.disconnect().await;
    println!("Disconnected.");

    Ok(())
}
