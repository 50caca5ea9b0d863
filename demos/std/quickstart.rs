//! Quickstart: poll a simulated charge controller, print the decoded readings
//! and the two uplink frames a node would send.

use std::collections::VecDeque;

use rtu_telemetry::config::NodeConfig;
use rtu_telemetry::infra::codec::crc::crc16_bytes;
use rtu_telemetry::protocol::{
    node::{DownlinkFrame, TelemetryNode, UplinkSink, UplinkStatus},
    status::{ErrorCategory, LoadStatus},
    telemetry::{EnvironmentReadings, SnapshotField},
    transport::traits::{rtu_timer::RtuTimer, serial_channel::SerialChannel},
};

/// Controller answering every read with a value derived from the register address.
struct DemoController {
    rx: VecDeque<u8>,
    load_on: bool,
}

impl SerialChannel for DemoController {
    type Error = ();

    async fn write<'a>(&'a mut self, bytes: &'a [u8]) -> Result<(), Self::Error> {
        let register = u16::from_be_bytes([bytes[2], bytes[3]]);
        let operand = u16::from_be_bytes([bytes[4], bytes[5]]);
        let mut reply = Vec::new();
        match bytes[1] {
            0x03 => {
                reply.extend_from_slice(&[bytes[0], 0x03, (operand * 2) as u8]);
                for offset in 0..operand {
                    let value = match register + offset {
                        0x0100 => 87,
                        0x0101 => 131,
                        0x0102 => 310,
                        0x0107 => 182,
                        0x0108 => 250,
                        0x0109 => 45,
                        0x0120 => 0x0002 | if self.load_on { 0x8000 } else { 0 },
                        _ => 0,
                    };
                    reply.extend_from_slice(&u16::to_be_bytes(value));
                }
            }
            0x06 => {
                self.load_on = operand != 0;
                reply.extend_from_slice(&bytes[..6]);
            }
            _ => return Ok(()),
        }
        let crc = crc16_bytes(&reply);
        reply.extend_from_slice(&crc);
        self.rx.extend(reply);
        Ok(())
    }

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

struct StdTimer;

impl RtuTimer for StdTimer {
    async fn delay_ms(&mut self, millis: u32) {
        tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
    }
}

/// Prints every payload instead of transmitting it.
struct PrintUplink;

impl UplinkSink for PrintUplink {
    async fn send<'a>(&'a mut self, payload: &'a [u8]) -> UplinkStatus {
        let hex: Vec<String> = payload.iter().map(|byte| format!("{:02X}", byte)).collect();
        println!("  uplink ({} bytes): {}", payload.len(), hex.join(" "));
        UplinkStatus::Queued
    }
}

#[tokio::main]
async fn main() {
    println!("=== rtu-telemetry quickstart ===\n");

    let config = NodeConfig::default();
    let controller = DemoController {
        rx: VecDeque::new(),
        load_on: false,
    };
    let mut node = TelemetryNode::from_config(controller, StdTimer, PrintUplink, &config);

    let readings = EnvironmentReadings {
        battery_mv: 3712,
        humidity: 45.5,
        temperature: 21.5,
        gnss: None,
    };

    println!("1. First tick:");
    let outcome = node.tick(&readings).await.expect("payload fits");
    println!("  outcome: {:?}\n", outcome);

    println!("2. Decoded snapshot:");
    let snapshot = *node.snapshot();
    for field in [
        SnapshotField::PanelVoltage,
        SnapshotField::PanelCurrent,
        SnapshotField::PanelPower,
        SnapshotField::BatteryVoltage,
        SnapshotField::BatteryCurrent,
        SnapshotField::BatteryPercent,
    ] {
        println!(
            "  {:<16} {:>7.2} {}",
            field.name(),
            snapshot.reading(field),
            field.unit().unwrap_or("")
        );
    }
    println!("  Load status      {:?}", LoadStatus::from_raw(snapshot.load_status));
    println!("  Error            {}\n", ErrorCategory::decode(snapshot.error_status));

    println!("3. Downlink 'load on' on the command port:");
    node.on_tx_finished(true);
    let outcome = node
        .on_downlink(&DownlinkFrame::new(config.command_port, &[0x00, 0x69]))
        .await;
    println!("  outcome: {:?}\n", outcome);

    println!("4. Next tick reports the downlink and the load state:");
    node.tick(&readings).await.expect("payload fits");
    println!(
        "  Load status      {:?}",
        LoadStatus::from_raw(node.snapshot().load_status)
    );
}
