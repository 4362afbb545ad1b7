//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::charts::{ChartContext, ChartRegistry};
use crate::data::DatasetStore;
use crate::error::{ChartError, RenderError};
use crate::metrics;
use crate::render::{pipeline, PngImage};

/// Application state shared with handlers. Everything here is read-only
/// once the server is up, so it is shared without locking.
#[derive(Clone)]
pub struct AppState {
    /// Datasets loaded at startup.
    pub data: Arc<DatasetStore>,
    /// Route-to-chart registry.
    pub registry: Arc<ChartRegistry>,
    /// Optional RNG seed for the random-data routes.
    pub seed: Option<u64>,
    /// Prometheus handle backing the /metrics endpoint.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state over a loaded store and registry.
    pub fn new(data: DatasetStore, registry: ChartRegistry, seed: Option<u64>) -> Self {
        Self {
            data: Arc::new(data),
            registry: Arc::new(registry),
            seed,
            metrics_handle: None,
        }
    }

    /// Attach the Prometheus handle serving /metrics.
    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether datasets are loaded and routes can render.
    pub ready: bool,
    /// Loaded datasets.
    pub datasets: Vec<DatasetSummary>,
}

/// Shape of one loaded dataset.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    /// Dataset identifier.
    pub name: String,
    /// Number of data rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler. The store is populated before the router
/// exists, so this reports ready with the dataset shapes.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let datasets: Vec<DatasetSummary> = state
        .data
        .summaries()
        .into_iter()
        .map(|(name, rows, columns)| DatasetSummary {
            name,
            rows,
            columns,
        })
        .collect();

    Json(ReadyResponse {
        ready: !datasets.is_empty(),
        datasets,
    })
}

/// Landing page: a plain list of every registered chart route.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut items = String::new();
    for chart in state.registry.iter() {
        items.push_str(&format!(
            "<li><a href=\"/{name}.plot\">{name}.plot</a> - {title}</li>\n",
            name = chart.name(),
            title = chart.title(),
        ));
    }

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>plotboard</title></head>\n\
         <body>\n<h1>plotboard</h1>\n<p>Pre-built charts over the mpg and \
         midwest datasets:</p>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    ))
}

/// Prometheus exposition endpoint.
pub async fn metrics_text(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed",
        )
            .into_response(),
    }
}

/// Render one registered chart to a PNG response.
///
/// The chart callback and the encode both run on the blocking pool; the
/// request's worker stays free. Errors surface as 500 with no body
/// bytes from the failed render.
pub async fn render_chart(state: AppState, name: &'static str) -> Response {
    let start = Instant::now();

    let registry = state.registry.clone();
    let data = state.data.clone();
    let seed = state.seed;

    let result = tokio::task::spawn_blocking(move || -> Result<PngImage, ChartError> {
        let chart = registry
            .get(name)
            .ok_or_else(|| RenderError::UnknownChart(name.to_string()))?;
        let ctx = ChartContext::new(&data, seed);
        let figure = chart.figure(&ctx)?;
        pipeline::render(name, figure)
    })
    .await;

    metrics::record_render_latency(start, name);

    match result {
        Ok(Ok(png)) => {
            metrics::inc_charts_rendered(name);
            metrics::record_png_bytes(name, png.bytes.len());
            png.into_response()
        }
        Ok(Err(err)) => {
            metrics::inc_render_failures(name);
            err.into_response()
        }
        Err(join_err) => {
            metrics::inc_render_failures(name);
            ChartError::Render(RenderError::Task(join_err.to_string())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    #[test]
    fn app_state_starts_without_a_metrics_handle() {
        let state = AppState::new(DatasetStore::new(), ChartRegistry::builtin(), Some(3));
        assert!(state.metrics_handle.is_none());
        assert_eq!(state.seed, Some(3));
    }

    #[tokio::test]
    async fn ready_reports_loaded_dataset_shapes() {
        let mut store = DatasetStore::new();
        store.insert(Dataset::from_csv("mpg", "cty,hwy\n18,29\n16,26\n").unwrap());
        let state = AppState::new(store, ChartRegistry::builtin(), None);

        let response = ready(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
