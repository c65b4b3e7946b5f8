pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{DateTime, Utc};
use models::{
    metrics::MetricsReport,
    movement::RawMovement,
    query::{MetricsQuery, MovementFilter, MovementPage},
    settings::Settings,
};
use providers::traits::MovementSource;
use services::metrics_service::MetricsService;

use errors::CoreError;

/// Compute a metrics report straight from raw movements, with default settings.
///
/// The caller is responsible for having filtered `movements` to one user
/// and to the requested window.
#[must_use]
pub fn compute_movement_metrics(
    movements: &[RawMovement],
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> MetricsReport {
    MetricsService::default().compute(movements, start_date, end_date)
}

/// Main entry point for the cash-flow metrics core.
/// Holds the movement source and the settings the engine runs with.
#[must_use]
pub struct CashFlowTracker {
    source: Box<dyn MovementSource>,
    settings: Settings,
    metrics_service: MetricsService,
}

impl std::fmt::Debug for CashFlowTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashFlowTracker")
            .field("source", &self.source.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl CashFlowTracker {
    /// Create a tracker over `source` with default settings.
    pub fn new(source: Box<dyn MovementSource>) -> Self {
        Self::with_settings(source, Settings::default())
    }

    pub fn with_settings(source: Box<dyn MovementSource>, settings: Settings) -> Self {
        let metrics_service = MetricsService::new(&settings);
        Self {
            source,
            settings,
            metrics_service,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. The engine is rebuilt so labels take effect at once.
    pub fn set_settings(&mut self, settings: Settings) {
        self.metrics_service = MetricsService::new(&settings);
        self.settings = settings;
    }

    // ── Movements ───────────────────────────────────────────────────

    /// List a user's movements, one page at a time.
    pub async fn list_movements(
        &self,
        user_id: i64,
        filter: &MovementFilter,
    ) -> Result<MovementPage, CoreError> {
        self.source
            .fetch_movements(user_id, filter)
            .await
            .inspect_err(|e| {
                tracing::warn!(source = self.source.name(), user_id, error = %e, "movement listing failed");
            })
    }

    /// First page of a user's movements using the configured page size.
    pub async fn recent_movements(&self, user_id: i64) -> Result<MovementPage, CoreError> {
        let filter = MovementFilter {
            limit: self.settings.default_page_limit,
            ..MovementFilter::default()
        };
        self.list_movements(user_id, &filter).await
    }

    // ── Metrics ─────────────────────────────────────────────────────

    /// Full metrics report for one user over the query's window.
    pub async fn movement_metrics(
        &self,
        user_id: i64,
        query: &MetricsQuery,
    ) -> Result<MetricsReport, CoreError> {
        let page = self
            .list_movements(user_id, &MovementFilter::unpaginated(query))
            .await?;
        tracing::debug!(
            source = self.source.name(),
            user_id,
            fetched = page.data.len(),
            "computing movement metrics"
        );

        Ok(self
            .metrics_service
            .compute(&page.data, query.start_date, query.end_date))
    }

    /// Same as [`movement_metrics`](Self::movement_metrics), serialized to JSON.
    pub async fn movement_metrics_json(
        &self,
        user_id: i64,
        query: &MetricsQuery,
    ) -> Result<String, CoreError> {
        let report = self.movement_metrics(user_id, query).await?;
        Ok(serde_json::to_string(&report)?)
    }
}
