//! Measurement export handler.

use tabled::Tabled;

use roomctl_core::{Console, MeasurementExport};

use crate::cli::{GlobalOpts, MeasurementsArgs, MeasurementsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct MeasurementRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Device")]
    device_id: i64,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Humidity %")]
    humidity: String,
    #[tabled(rename = "CO₂ ppm")]
    co2: String,
}

impl From<&MeasurementExport> for MeasurementRow {
    fn from(m: &MeasurementExport) -> Self {
        Self {
            id: m.id,
            device_id: m.device_id,
            timestamp: m.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            temperature: format!("{:.1}", m.temperature),
            humidity: format!("{:.1}", m.humidity),
            co2: format!("{:.0}", m.co2),
        }
    }
}

pub async fn handle(
    console: &Console,
    args: MeasurementsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MeasurementsCommand::Export => {
            let rows = console.export_measurements().await?;
            let out = output::render_list(
                &global.output,
                &rows,
                |m| MeasurementRow::from(m),
                |m| m.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
