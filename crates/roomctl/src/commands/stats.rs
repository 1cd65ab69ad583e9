//! Statistics command handler.

use chrono::{DateTime, Duration, Utc};
use tabled::Tabled;

use roomctl_core::{Aggregate, Console, StatisticsReport, TimeRange};

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;
use crate::output;

use super::util::or_dash;

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "CO₂ avg/med/dev")]
    co2: String,
    #[tabled(rename = "Temp avg/med/dev")]
    temperature: String,
    #[tabled(rename = "Humidity avg/med/dev")]
    humidity: String,
    #[tabled(rename = "Productivity avg/med/dev")]
    productivity: String,
}

fn aggregate_cell(a: &Aggregate) -> String {
    if a.is_empty() {
        return "-".into();
    }
    let cell = |v: Option<f64>| or_dash(v.map(|v| format!("{v:.1}")));
    format!("{} / {} / {}", cell(a.avg), cell(a.median), cell(a.deviation))
}

impl From<&StatisticsReport> for StatsRow {
    fn from(r: &StatisticsReport) -> Self {
        Self {
            device: or_dash(r.device_id),
            room: or_dash(r.room_id),
            co2: aggregate_cell(&r.co2),
            temperature: aggregate_cell(&r.temperature),
            humidity: aggregate_cell(&r.humidity),
            productivity: aggregate_cell(&r.productivity),
        }
    }
}

fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("'{raw}' is not an RFC 3339 timestamp: {e}"),
        })
}

/// `--from/--to` when both are given, otherwise the last `--days` days.
fn time_range(args: &StatsArgs, now: DateTime<Utc>) -> Result<TimeRange, CliError> {
    let range = match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            TimeRange::new(parse_instant("from", from)?, parse_instant("to", to)?)
        }
        _ => TimeRange::ending_at(now, Duration::days(i64::from(args.days))),
    };
    range.map_err(CliError::from)
}

pub async fn handle(console: &Console, args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let range = time_range(&args, Utc::now())?;
    let reports = console.statistics().load(range, args.device).await?;

    let out = output::render_list(
        &global.output,
        reports.as_slice(),
        |r| StatsRow::from(r),
        |r| or_dash(r.device_id),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
