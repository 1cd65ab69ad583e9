// ── Aggregate statistics ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Half-open interval `[from, to)`; never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, CoreError> {
        if from >= to {
            return Err(CoreError::validation(
                "time range",
                format!("start ({from}) must be before end ({to})"),
            ));
        }
        Ok(Self { from, to })
    }

    /// The `duration` immediately before `to`.
    pub fn ending_at(to: DateTime<Utc>, duration: chrono::Duration) -> Result<Self, CoreError> {
        Self::new(to - duration, to)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.to
    }
}

/// Average, median and standard deviation of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub avg: Option<f64>,
    pub median: Option<f64>,
    pub deviation: Option<f64>,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.avg.is_none() && self.median.is_none() && self.deviation.is_none()
    }
}

/// Per-device aggregates over a [`TimeRange`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub device_id: Option<i64>,
    pub room_id: Option<i64>,
    pub co2: Aggregate,
    pub temperature: Aggregate,
    pub humidity: Aggregate,
    pub productivity: Aggregate,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn rejects_empty_or_inverted_range() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert!(TimeRange::new(t, t).is_err());
        assert!(TimeRange::new(t, t - chrono::Duration::hours(1)).is_err());

        let range = TimeRange::ending_at(t, chrono::Duration::days(7)).unwrap();
        assert_eq!(range.end(), t);
        assert_eq!(range.start(), Utc.with_ymd_and_hms(2024, 4, 24, 0, 0, 0).unwrap());
    }
}
