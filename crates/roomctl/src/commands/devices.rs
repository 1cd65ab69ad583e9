//! Device command handlers.

use tabled::Tabled;

use roomctl_core::{Console, Device};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{self, or_dash};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Humidity %")]
    humidity: String,
    #[tabled(rename = "CO₂ ppm")]
    co2: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let latest = d.latest_measurement();
        Self {
            id: d.id,
            mac: d.mac_address.clone(),
            room: or_dash(d.room_id),
            temperature: or_dash(latest.map(|m| format!("{:.1}", m.temperature))),
            humidity: or_dash(latest.map(|m| format!("{:.1}", m.humidity))),
            co2: or_dash(latest.map(|m| format!("{:.0}", m.co2))),
            last_seen: or_dash(latest.map(|m| m.timestamp.format("%Y-%m-%d %H:%M"))),
        }
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("ID:       {}", d.id),
        format!("MAC:      {}", d.mac_address),
        format!("Room:     {}", or_dash(d.room_id)),
        format!("Configs:  {}", d.configs.len()),
    ];
    if let Some(m) = d.latest_measurement() {
        lines.push(format!("Measured: {}", m.timestamp.to_rfc3339()));
        lines.push(format!("  Temp:     {:.1} °C", m.temperature));
        lines.push(format!("  Humidity: {:.1} %", m.humidity));
        lines.push(format!("  CO₂:      {:.0} ppm", m.co2));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = console.devices().load().await?;
            let out = output::render_list(
                &global.output,
                devices.as_slice(),
                |d| DeviceRow::from(d),
                |d| d.mac_address.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { mac } => {
            let device = console.devices().get(&mac).await?;
            let out = output::render_single(&global.output, &device, detail, |d| {
                d.mac_address.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { mac } => {
            let device = console.devices().add(&mac).await?;
            if !global.quiet {
                eprintln!("Device registered with ID {}", device.id);
            }
            Ok(())
        }

        DevicesCommand::Remove { mac } => {
            if !util::confirm(&format!("Remove device {mac}?"), global.yes)? {
                return Ok(());
            }
            console.devices().remove(&mac).await?;
            Ok(())
        }
    }
}
