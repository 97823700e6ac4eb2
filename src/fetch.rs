use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::USER_AGENT;
use url::Url;

/// Bound on the whole page-fetch round trip.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const PAGELENS_USER_AGENT: &str = concat!("pagelens/", env!("CARGO_PKG_VERSION"));

pub fn client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("build page http client")
}

/// Downloads the page HTML. Only http/https URLs are accepted; anything
/// else (browser-internal schemes, file URLs) is rejected up front.
pub async fn page_html(client: &reqwest::Client, raw_url: &str) -> anyhow::Result<String> {
    let url = Url::parse(raw_url).with_context(|| format!("parse page url: {raw_url}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!(
            "cannot analyze {} pages; navigate to an http(s) web page",
            url.scheme()
        );
    }

    tracing::debug!(url = %url, "fetch page");
    let response = client
        .get(url.clone())
        .header(USER_AGENT, PAGELENS_USER_AGENT)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("page fetch failed ({status}): {url}");
    }
    response.text().await.context("read page body")
}

pub fn file_html(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read html file: {}", path.display()))
}
