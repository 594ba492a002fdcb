use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;
use url::Url;

/// Fetch the published CSV text from `source_url`.
///
/// Single-shot by contract: a non-2xx status or network fault is returned as
/// an error with no retry and no fallback, and the caller decides whether the
/// session is reloadable.
pub async fn fetch_csv(client: &Client, source_url: &str) -> Result<String> {
    let url =
        Url::parse(source_url).with_context(|| format!("invalid csv source url: {source_url}"))?;

    info!(url = %url, "fetching csv");
    let body = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()
        .context("csv source returned an error status")?
        .text()
        .await
        .context("failed to read csv response body")?;
    info!(bytes = body.len(), "fetched csv");
    Ok(body)
}
