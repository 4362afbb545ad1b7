//! Startup fetch of the dataset sources.

use tracing::info;

use crate::config::Config;
use crate::error::LoadError;
use crate::metrics;

use super::store::{DatasetStore, MIDWEST, MPG};
use super::table::Dataset;

/// Fetch and parse both datasets. Any failure here is fatal to startup,
/// since every chart route depends on the store.
pub async fn load_datasets(config: &Config) -> Result<DatasetStore, LoadError> {
    let _timer = metrics::timer_dataset_fetch();

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
        .connect_timeout(std::time::Duration::from_millis(
            config.http_timeout_ms.min(5_000),
        ))
        .build()
        .map_err(LoadError::Client)?;

    let (mpg_text, midwest_text) = tokio::try_join!(
        fetch_csv(&http, MPG, &config.mpg_url),
        fetch_csv(&http, MIDWEST, &config.midwest_url),
    )?;

    let mut store = DatasetStore::new();
    store.insert(Dataset::from_csv(MPG, &mpg_text)?);
    store.insert(Dataset::from_csv(MIDWEST, &midwest_text)?);

    for (name, rows, cols) in store.summaries() {
        info!("Loaded dataset {}: {} rows x {} columns", name, rows, cols);
    }

    Ok(store)
}

async fn fetch_csv(
    http: &reqwest::Client,
    name: &'static str,
    url: &str,
) -> Result<String, LoadError> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| LoadError::Fetch {
            name,
            url: url.to_string(),
            source,
        })?;

    response
        .text()
        .await
        .map_err(|source| LoadError::Body { name, source })
}
