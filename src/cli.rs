use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SummaryLength;
use crate::provider;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize the main content of a page with the configured AI provider.
    Summarize(AnalyzeArgs),
    /// Classify the emotional tone of a page as joyful, neutral, or toxic.
    Sentiment(AnalyzeArgs),
    /// List the significant images found on a page.
    Images(ImagesArgs),
    /// Send a fixed test prompt to verify the provider configuration.
    Test(TestArgs),
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PageArgs {
    /// Page URL to analyze (http/https only).
    #[arg(long)]
    pub url: Option<String>,

    /// Local HTML file to analyze instead of fetching a URL.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProviderArgs {
    /// Settings file path (default: the per-user config directory).
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Base URL for the OpenAI-compatible endpoint.
    #[arg(long, default_value = provider::OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Base URL for the Anthropic-compatible endpoint.
    #[arg(long, default_value = provider::ANTHROPIC_BASE_URL)]
    pub anthropic_base_url: String,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Summary length (overrides the stored setting).
    #[arg(long)]
    pub length: Option<SummaryLength>,

    /// Response language code (overrides the stored setting).
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Debug, Args)]
pub struct ImagesArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Settings file path (default: the per-user config directory).
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Maximum images to list (overrides the stored setting).
    #[arg(long)]
    pub max: Option<usize>,

    /// Index of the image to show in detail.
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}

#[derive(Debug, Args)]
pub struct TestArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Show(ConfigPathArgs),
    Set(ConfigSetArgs),
    Reset(ConfigPathArgs),
}

#[derive(Debug, Args)]
pub struct ConfigPathArgs {
    /// Settings file path (default: the per-user config directory).
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    /// Settings file path (default: the per-user config directory).
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// AI provider (openai or anthropic).
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name, e.g. gpt-4 or claude-3-haiku-20240307.
    #[arg(long)]
    pub model: Option<String>,

    /// API key for the selected provider.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Default summary length.
    #[arg(long)]
    pub summary_length: Option<SummaryLength>,

    /// Maximum images shown by the gallery.
    #[arg(long)]
    pub max_images: Option<usize>,

    /// Language used for prompts and explanations.
    #[arg(long)]
    pub language: Option<String>,
}
