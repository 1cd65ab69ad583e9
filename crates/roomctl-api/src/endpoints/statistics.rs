// Aggregate statistics endpoint

use chrono::{DateTime, SecondsFormat, Utc};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::StatisticsReportResponse;

/// Parameters of a statistics request over `[time_from, time_to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsQuery {
    pub time_from: DateTime<Utc>,
    pub time_to: DateTime<Utc>,
    pub device_id: Option<i64>,
}

impl StatisticsQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("timeFrom", self.time_from.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("timeTo", self.time_to.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        if let Some(id) = self.device_id {
            params.push(("device_id", id.to_string()));
        }
        params
    }
}

impl ApiClient {
    /// Per-device aggregates over a time range.
    ///
    /// `GET {statistics}?timeFrom=...&timeTo=...[&device_id=...]`
    pub async fn statistics(&self, query: &StatisticsQuery) -> Result<Vec<StatisticsReportResponse>, Error> {
        let url = self.url(&self.paths().statistics)?;
        self.get_with_params(url, &query.params()).await
    }
}
