use std::collections::HashSet;
use std::sync::Arc;

use ahash::RandomState as AHashRandomState;
use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::engine::core::event::RawEventRecord;
use crate::engine::core::rollup::fallback::FallbackProvider;
use crate::engine::core::rollup::{RollupPlan, RollupResult, aggregate_with};
use crate::engine::errors::{FetchError, RefreshError};
use crate::engine::panels::Panel;
use crate::engine::source::{EventQuery, EventStore, SessionGate, TimeWindow};
use crate::shared::config::RollupSettings;

/// Turns panel requests into rollup results: checks the session, fetches the
/// panel's records from the store and runs one aggregation pass over them.
pub struct DashboardRefresher<S: EventStore, G: SessionGate> {
    store: Arc<S>,
    gate: G,
    settings: RollupSettings,
    /// Fixed window; `None` means the trailing `window_days` as of each refresh
    window: Option<TimeWindow>,
}

impl<S: EventStore, G: SessionGate> DashboardRefresher<S, G> {
    /// Fetches the trailing `window_days` of events from `settings`, measured
    /// from the moment of each refresh.
    pub fn new(store: Arc<S>, gate: G, settings: RollupSettings) -> Self {
        Self {
            store,
            gate,
            settings,
            window: None,
        }
    }

    /// Pins every refresh to `window`.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Window a refresh started now would query.
    pub fn window(&self) -> TimeWindow {
        self.window
            .unwrap_or_else(|| TimeWindow::trailing_days(Utc::now(), self.settings.window_days))
    }

    pub async fn refresh_panel(&self, panel: Panel) -> Result<RollupResult, RefreshError> {
        self.refresh_within(panel, self.window()).await
    }

    /// Refreshes panels concurrently over one shared window; the first failure
    /// aborts the batch.
    pub async fn refresh(&self, panels: &[Panel]) -> Result<Vec<RollupResult>, RefreshError> {
        let window = self.window();
        try_join_all(panels.iter().map(|p| self.refresh_within(*p, window))).await
    }

    pub async fn refresh_all(&self) -> Result<Vec<RollupResult>, RefreshError> {
        self.refresh(&Panel::ALL).await
    }

    async fn refresh_within(
        &self,
        panel: Panel,
        window: TimeWindow,
    ) -> Result<RollupResult, RefreshError> {
        let plan = panel.plan();
        if !self.gate.is_open() {
            info!(target: "rollup::dashboard", panel = %panel, "no session, showing fallback");
            let top_n = plan.resolve_top_n(self.settings.top_n);
            return Ok(FallbackProvider::new(&plan, top_n).provide());
        }

        let records = self
            .fetch_records(&plan, window)
            .await
            .map_err(|source| RefreshError::Fetch {
                panel: panel.as_str().to_string(),
                source,
            })?;

        Ok(aggregate_with(&records, &plan, &self.settings))
    }

    /// Runs one query per plan selector concurrently and merges the pages,
    /// keeping the first copy of any record id seen twice. The merged records
    /// are in ascending timestamp order, ties in query order.
    async fn fetch_records(
        &self,
        plan: &RollupPlan,
        window: TimeWindow,
    ) -> Result<Vec<RawEventRecord>, FetchError> {
        let queries: Vec<EventQuery> = plan
            .selectors
            .iter()
            .map(|s| EventQuery::for_selector(s, window, self.settings.page_size))
            .collect();
        let batches = try_join_all(queries.iter().map(|q| self.fetch_pages(q))).await?;

        let mut seen: HashSet<String, AHashRandomState> = HashSet::default();
        let mut merged = Vec::new();
        let mut duplicates = 0usize;
        for record in batches.into_iter().flatten() {
            if !record.id.is_empty() && !seen.insert(record.id.clone()) {
                duplicates += 1;
                continue;
            }
            merged.push(record);
        }
        merged.sort_by_key(|r| r.timestamp);

        debug!(
            target: "rollup::dashboard",
            rollup = %plan.name,
            queries = queries.len(),
            records = merged.len(),
            duplicates,
            "fetched panel records"
        );
        Ok(merged)
    }

    async fn fetch_pages(&self, query: &EventQuery) -> Result<Vec<RawEventRecord>, FetchError> {
        let mut query = query.clone();
        let mut records = Vec::new();
        loop {
            let page = match self.store.fetch(&query).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(target: "rollup::dashboard", page = query.page, error = %e, "fetch failed");
                    return Err(e);
                }
            };
            let more = page.has_more() && !page.data.is_empty();
            records.extend(page.data);
            if !more {
                return Ok(records);
            }
            query.page += 1;
        }
    }
}
