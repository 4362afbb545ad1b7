//! Unified error types for the chart server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Dataset loading errors. These occur at startup and are fatal: every
/// route depends on the datasets being present.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to build the HTTP client used for dataset fetches.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The dataset source could not be fetched.
    #[error("failed to fetch dataset {name} from {url}: {source}")]
    Fetch {
        /// Dataset identifier.
        name: &'static str,
        /// Source URL.
        url: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read as text.
    #[error("failed to read dataset {name} body: {source}")]
    Body {
        /// Dataset identifier.
        name: &'static str,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// The CSV payload is malformed.
    #[error("failed to parse dataset {name}: {source}")]
    Csv {
        /// Dataset identifier.
        name: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The CSV payload parsed but contains no data rows.
    #[error("dataset {name} is empty")]
    Empty {
        /// Dataset identifier.
        name: String,
    },
}

/// Lookup failures against the read-only dataset store.
#[derive(Error, Debug)]
pub enum DataError {
    /// The requested dataset identifier is not registered.
    #[error("unknown dataset: {name}")]
    DatasetNotFound {
        /// The identifier that was requested.
        name: String,
    },

    /// The dataset has no column with the requested name.
    #[error("dataset {dataset} has no column {column}")]
    ColumnNotFound {
        /// Dataset identifier.
        dataset: String,
        /// Requested column name.
        column: String,
    },

    /// The column exists but holds a different type than requested.
    #[error("column {column} of dataset {dataset} is not {expected}")]
    ColumnType {
        /// Dataset identifier.
        dataset: String,
        /// Requested column name.
        column: String,
        /// The type the caller asked for.
        expected: &'static str,
    },
}

/// Figure construction and rasterization errors.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No chart is registered under the requested name.
    #[error("unknown chart: {0}")]
    UnknownChart(String),

    /// The chart's draw closure failed.
    #[error("chart {chart} failed to draw: {source}")]
    Draw {
        /// Chart name.
        chart: &'static str,
        /// Underlying drawing error.
        #[source]
        source: anyhow::Error,
    },

    /// The chart selected no data to draw.
    #[error("chart {chart} produced no drawable series")]
    EmptySeries {
        /// Chart name.
        chart: &'static str,
    },

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
}

/// PNG serialization errors.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The PNG encoder rejected the pixel buffer.
    #[error("png encoding failed: {0}")]
    Png(#[from] image::ImageError),

    /// The pixel buffer does not match the figure dimensions.
    #[error("pixel buffer is {got} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        /// Actual buffer length.
        got: usize,
        /// Expected buffer length.
        expected: usize,
        /// Figure width in pixels.
        width: u32,
        /// Figure height in pixels.
        height: u32,
    },
}

/// Umbrella error for a single chart request. Every variant maps to an
/// HTTP 500; failures never produce partial image bytes.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Dataset or column lookup failed.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Figure construction or rasterization failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// PNG encoding failed.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "chart request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("chart rendering failed: {self}"),
        )
            .into_response()
    }
}

/// Convenient Result type alias for per-request operations.
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_error_maps_to_internal_server_error() {
        let err = ChartError::Data(DataError::DatasetNotFound {
            name: "nope".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_messages_name_the_offending_input() {
        let err = DataError::ColumnNotFound {
            dataset: "mpg".to_string(),
            column: "cty".to_string(),
        };
        assert_eq!(err.to_string(), "dataset mpg has no column cty");

        let err = RenderError::UnknownChart("mystery".to_string());
        assert_eq!(err.to_string(), "unknown chart: mystery");
    }
}
