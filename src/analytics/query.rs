//! Metric query types and their wire representation.
//!
//! [`MetricQuery`] is the caller-facing description of a time-series
//! request; [`TimeSeriesRequest`] is its exact JSON body. Keeping the two
//! apart means callers never deal with wire field names and the body shape
//! is pinned down by serialization tests.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::ApiError;

/// Fixed row cap when grouping by a dimension. The service returns the top
/// values of the dimension ranked by descending metric value.
const GROUP_LIMIT: u32 = 10;

/// A time-series metrics query over one app and one date window.
#[derive(Debug, Clone)]
pub struct MetricQuery {
    /// The app's numeric Apple identifier (adam id).
    pub app_id: String,
    /// Measure names to fetch, e.g. `units` or `pageViewCount`.
    pub metrics: Vec<String>,
    /// Optional dimension to group by, e.g. `source`.
    pub dimension: Option<String>,
    /// First day of the window (inclusive, UTC midnight).
    pub start_date: NaiveDate,
    /// Last day of the window (interpreted by the service).
    pub end_date: NaiveDate,
}

impl MetricQuery {
    /// Creates an ungrouped query.
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        metrics: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            metrics,
            dimension: None,
            start_date,
            end_date,
        }
    }

    /// Groups the results by `dimension`.
    #[must_use]
    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }
}

/// The JSON body of a time-series request, field names as the service
/// expects them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimeSeriesRequest {
    adam_id: Vec<String>,
    measures: Vec<String>,
    // No skip_serializing_if: an ungrouped query sends an explicit
    // `"group": null`, not an absent key.
    group: Option<GroupSpec>,
    frequency: &'static str,
    start_time: String,
    end_time: String,
}

#[derive(Debug, Serialize)]
struct GroupSpec {
    dimension: String,
    metric: Vec<String>,
    limit: u32,
    rank: &'static str,
}

impl TimeSeriesRequest {
    /// Builds the wire body for a query.
    ///
    /// Fails without touching the network when the query names no metrics;
    /// the service would reject an empty `measures` list anyway, but the
    /// local error is actionable.
    pub(crate) fn from_query(query: &MetricQuery) -> Result<Self, ApiError> {
        if query.metrics.is_empty() {
            return Err(ApiError::invalid_query("at least one metric is required"));
        }

        let group = query.dimension.as_ref().map(|dimension| GroupSpec {
            dimension: dimension.clone(),
            metric: query.metrics.clone(),
            limit: GROUP_LIMIT,
            rank: "DESCENDING",
        });

        Ok(Self {
            adam_id: vec![query.app_id.clone()],
            measures: query.metrics.clone(),
            group,
            frequency: "day",
            start_time: day_start_utc(query.start_date),
            end_time: day_start_utc(query.end_date),
        })
    }
}

/// Expands a calendar date to its UTC-midnight instant, the format the
/// time-series endpoint expects for both window bounds.
fn day_start_utc(date: NaiveDate) -> String {
    format!("{date}T00:00:00Z")
}
