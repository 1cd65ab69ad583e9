// ── Aggregate statistics ──

use std::sync::Arc;

use roomctl_api::{ApiClient, StatisticsQuery};

use super::{Snapshot, surface};
use crate::error::CoreError;
use crate::model::{StatisticsReport, TimeRange};
use crate::notices::Notices;

pub struct StatisticsView {
    client: ApiClient,
    notices: Notices,
    snapshot: Snapshot<Vec<StatisticsReport>>,
}

impl StatisticsView {
    pub(crate) fn new(client: ApiClient, notices: Notices) -> Self {
        Self {
            client,
            notices,
            snapshot: Snapshot::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Arc<Vec<StatisticsReport>> {
        self.snapshot.current()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Arc<Vec<StatisticsReport>>> {
        self.snapshot.subscribe()
    }

    /// Fetch aggregates for `range`, optionally for a single device.
    pub async fn load(
        &self,
        range: TimeRange,
        device_id: Option<i64>,
    ) -> Result<Arc<Vec<StatisticsReport>>, CoreError> {
        let query = StatisticsQuery {
            time_from: range.start(),
            time_to: range.end(),
            device_id,
        };
        match self.client.statistics(&query).await {
            Ok(reports) => Ok(self
                .snapshot
                .replace(reports.into_iter().map(StatisticsReport::from).collect())),
            Err(e) => Err(surface(&self.notices, "Failed to load statistics", e.into())),
        }
    }
}
