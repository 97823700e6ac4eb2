use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use chrono::Utc;

use crate::analyze::{AnalysisInput, AnalysisResult, AnalysisType, AnalyzeData, ConnectionReport};
use crate::cli;
use crate::config::{self, AnalysisConfig};
use crate::fetch;
use crate::gallery::Gallery;
use crate::message::{self, Request};
use crate::page::DomPage;
use crate::provider::ProviderClient;
use crate::report;

/// At most two extraction attempts with a short backoff, absorbing
/// transient fetch failures.
const MAX_LOAD_ATTEMPTS: usize = 2;
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

pub async fn summarize(args: cli::AnalyzeArgs) -> anyhow::Result<()> {
    run_analysis(args, AnalysisType::Summary).await
}

pub async fn sentiment(args: cli::AnalyzeArgs) -> anyhow::Result<()> {
    run_analysis(args, AnalysisType::Sentiment).await
}

async fn run_analysis(args: cli::AnalyzeArgs, analysis_type: AnalysisType) -> anyhow::Result<()> {
    let cli::AnalyzeArgs {
        page,
        provider,
        length,
        language,
    } = args;

    let path = settings_path(provider.settings.as_deref())?;
    let settings = config::load(&path)?;
    if !settings.is_configured() {
        anyhow::bail!("Please configure your AI settings first");
    }

    let mut analysis_config = AnalysisConfig::from_settings(&settings);
    if let Some(length) = length {
        analysis_config.summary_length = length;
    }
    if let Some(language) = language {
        analysis_config.response_language = language;
    }

    let source = page_source(&page)?;
    let client = fetch::client()?;
    let (html, url) = load_page(&client, &source).await?;

    // Extraction strictly precedes analysis; the parsed DOM is dropped
    // before the provider round trip.
    let request = {
        let dom = DomPage::parse(&html, &url);
        let extract_request = match analysis_type {
            AnalysisType::Summary => Request::ExtractPageContent,
            AnalysisType::Sentiment => Request::ExtractTextForSentiment,
        };
        let envelope = expect_success(message::handle_content(&extract_request, &dom))?;
        let content = match analysis_type {
            AnalysisType::Summary => AnalysisInput::Page(
                serde_json::from_value(envelope["content"].clone()).context("decode page content")?,
            ),
            AnalysisType::Sentiment => AnalysisInput::Sentiment(
                serde_json::from_value(envelope).context("decode sentiment text")?,
            ),
        };
        Request::AnalyzeWithAi {
            data: AnalyzeData {
                content,
                analysis_type,
                config: analysis_config,
            },
        }
    };

    let provider_client =
        ProviderClient::new(&provider.openai_base_url, &provider.anthropic_base_url)?;
    let envelope = expect_success(message::handle_background(&request, &provider_client).await)?;
    let result: AnalysisResult =
        serde_json::from_value(envelope["result"].clone()).context("decode analysis result")?;

    print!("{}", report::analysis(&result));
    Ok(())
}

pub async fn images(args: cli::ImagesArgs) -> anyhow::Result<()> {
    let path = settings_path(args.settings.as_deref())?;
    let settings = config::load(&path)?;

    let source = page_source(&args.page)?;
    let client = fetch::client()?;
    let (html, url) = load_page(&client, &source).await?;

    let mut images: Vec<crate::extract::ImageDescriptor> = {
        let dom = DomPage::parse(&html, &url);
        let envelope = expect_success(message::handle_content(&Request::ExtractImages, &dom))?;
        serde_json::from_value(envelope["images"].clone()).context("decode images")?
    };

    let max = args.max.unwrap_or(settings.max_images).max(1);
    images.truncate(max);

    let mut gallery = Gallery::new(images);
    gallery.select(args.index);
    print!("{}", report::gallery(&gallery));
    Ok(())
}

pub async fn test_connection(args: cli::TestArgs) -> anyhow::Result<()> {
    let path = settings_path(args.provider.settings.as_deref())?;
    let settings = config::load(&path)?;
    let analysis_config = AnalysisConfig::from_settings(&settings);

    let provider_client = ProviderClient::new(
        &args.provider.openai_base_url,
        &args.provider.anthropic_base_url,
    )?;
    let request = Request::TestApiConnection {
        config: analysis_config,
    };
    let envelope = expect_success(message::handle_background(&request, &provider_client).await)?;
    let connection: ConnectionReport =
        serde_json::from_value(envelope).context("decode connection report")?;

    print!("{}", report::connection(&connection));
    Ok(())
}

pub fn config_show(args: cli::ConfigPathArgs) -> anyhow::Result<()> {
    let path = settings_path(args.settings.as_deref())?;
    let mut settings = config::load(&path)?;
    if !settings.api_key.is_empty() {
        settings.api_key = mask_key(&settings.api_key);
    }
    let yaml = serde_yaml::to_string(&settings).context("render settings")?;
    print!("{yaml}");
    Ok(())
}

pub fn config_set(args: cli::ConfigSetArgs) -> anyhow::Result<()> {
    let path = settings_path(args.settings.as_deref())?;
    let mut settings = config::load(&path)?;

    if let Some(provider) = args.provider {
        settings.ai_provider = provider;
    }
    if let Some(model) = args.model {
        settings.ai_model = model;
    }
    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
    }
    if let Some(summary_length) = args.summary_length {
        settings.summary_length = summary_length;
    }
    if let Some(max_images) = args.max_images {
        settings.max_images = max_images;
    }
    if let Some(language) = args.language {
        settings.response_language = language;
    }
    settings.updated_at = Some(Utc::now());

    config::save(&path, &settings)?;
    println!("Settings saved: {}", path.display());
    Ok(())
}

pub fn config_reset(args: cli::ConfigPathArgs) -> anyhow::Result<()> {
    let path = settings_path(args.settings.as_deref())?;
    config::reset(&path)?;
    println!("Settings reset: {}", path.display());
    Ok(())
}

/// Keeps enough of the key to recognize it without printing the secret.
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}****")
}

enum PageSource {
    Url(String),
    File(PathBuf),
}

fn page_source(args: &cli::PageArgs) -> anyhow::Result<PageSource> {
    match (&args.url, &args.file) {
        (Some(url), None) => Ok(PageSource::Url(url.clone())),
        (None, Some(path)) => Ok(PageSource::File(path.clone())),
        _ => anyhow::bail!("exactly one of --url or --file is required"),
    }
}

fn settings_path(explicit: Option<&std::path::Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_owned()),
        None => config::default_settings_path(),
    }
}

async fn load_page(
    client: &reqwest::Client,
    source: &PageSource,
) -> anyhow::Result<(String, String)> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let loaded = match source {
            PageSource::Url(url) => fetch::page_html(client, url)
                .await
                .map(|html| (html, url.clone())),
            PageSource::File(path) => fetch::file_html(path).map(|html| (html, String::new())),
        };
        match loaded {
            Ok(page) => return Ok(page),
            Err(err) if attempt < MAX_LOAD_ATTEMPTS => {
                tracing::warn!(
                    error = format!("{err:#}"),
                    attempt,
                    "page load failed; retrying"
                );
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Unwraps a message envelope, surfacing the carried error verbatim.
fn expect_success(envelope: serde_json::Value) -> anyhow::Result<serde_json::Value> {
    if envelope.get("success").and_then(serde_json::Value::as_bool) == Some(true) {
        return Ok(envelope);
    }
    let error = envelope
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown error");
    anyhow::bail!("{error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_success_passes_envelopes_through() {
        let envelope = serde_json::json!({ "success": true, "text": "hi" });
        let value = expect_success(envelope).unwrap();
        assert_eq!(value["text"], "hi");
    }

    #[test]
    fn expect_success_surfaces_the_error_verbatim() {
        let envelope = serde_json::json!({ "success": false, "error": "Missing AI configuration" });
        let err = expect_success(envelope).unwrap_err();
        assert_eq!(err.to_string(), "Missing AI configuration");
    }

    #[test]
    fn mask_key_keeps_only_a_prefix() {
        assert_eq!(mask_key("sk-abcdef123456"), "sk-a****");
    }
}
