use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted user settings. The on-disk keys mirror the original storage
/// schema (camelCase), so a settings file survives reimplementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub ai_provider: String,
    pub ai_model: String,
    pub api_key: String,
    pub summary_length: SummaryLength,
    pub max_images: usize,
    pub response_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_provider: String::new(),
            ai_model: String::new(),
            api_key: String::new(),
            summary_length: SummaryLength::Medium,
            max_images: 20,
            response_language: "en".to_owned(),
            updated_at: None,
        }
    }
}

impl Settings {
    pub fn is_configured(&self) -> bool {
        !self.ai_provider.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

impl Default for SummaryLength {
    fn default() -> Self {
        Self::Medium
    }
}

/// The configuration slice an analysis request carries across the message
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    #[serde(default)]
    pub summary_length: SummaryLength,
    #[serde(default = "default_language")]
    pub response_language: String,
}

fn default_language() -> String {
    "en".to_owned()
}

impl AnalysisConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            provider: settings.ai_provider.clone(),
            model: settings.ai_model.clone(),
            api_key: settings.api_key.clone(),
            summary_length: settings.summary_length,
            response_language: settings.response_language.clone(),
        }
    }

    /// Provider, model, and key must all be present before any prompt is
    /// built or network call issued.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.trim().is_empty()
            || self.model.trim().is_empty()
            || self.api_key.trim().is_empty()
        {
            anyhow::bail!("Missing AI configuration");
        }
        Ok(())
    }
}

pub fn default_settings_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine the user config directory"))?;
    Ok(config_dir.join("pagelens").join("settings.yaml"))
}

/// Loads settings, treating a missing file as defaults.
pub fn load(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file; using defaults");
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read settings: {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parse settings: {}", path.display()))
}

pub fn save(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create settings dir: {}", parent.display()))?;
    }
    let yaml = serde_yaml::to_string(settings).context("serialize settings")?;
    std::fs::write(path, yaml).with_context(|| format!("write settings: {}", path.display()))?;
    Ok(())
}

/// Clears all stored settings by deleting the file.
pub fn reset(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("remove settings: {}", path.display()))?;
    }
    Ok(())
}
