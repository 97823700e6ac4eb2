use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::extract::{PageContent, SentimentText, truncate_chars, word_count};
use crate::locale::{self, LocaleBundle};
use crate::prompt;
use crate::provider::{Provider, ProviderClient};

pub const TEST_PROMPT: &str = "Respond with 'Connection successful!' to test the API.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Summary,
    Sentiment,
}

/// The extracted content an analysis request carries: full page content for
/// summaries, cleaned text for sentiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisInput {
    Sentiment(SentimentText),
    Page(PageContent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeData {
    pub content: AnalysisInput,
    #[serde(rename = "analysisType")]
    pub analysis_type: AnalysisType,
    pub config: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisResult {
    Summary {
        content: String,
        #[serde(rename = "wordCount")]
        word_count: usize,
    },
    Sentiment {
        sentiment: SentimentCategory,
        confidence: f64,
        explanation: String,
        #[serde(rename = "wordCount")]
        word_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Joyful,
    Neutral,
    Toxic,
}

impl SentimentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joyful => "joyful",
            Self::Neutral => "neutral",
            Self::Toxic => "toxic",
        }
    }

    /// Maps a category name from a provider reply, accepting the Spanish
    /// names too. Anything unrecognized is neutral.
    fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "joyful" | "alegre" => Self::Joyful,
            "toxic" | "tóxico" | "toxico" => Self::Toxic,
            _ => Self::Neutral,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub message: String,
    /// First 100 chars of the raw provider reply.
    pub response: String,
}

/// Single analysis entry point: validates the configuration, builds the
/// localized prompt, calls the selected provider, and shapes the result.
pub async fn analyze_with_ai(
    client: &ProviderClient,
    data: &AnalyzeData,
) -> anyhow::Result<AnalysisResult> {
    let config = &data.config;
    config.validate()?;
    let provider = Provider::parse(&config.provider)?;
    let bundle = locale::bundle(&config.response_language);

    match data.analysis_type {
        AnalysisType::Summary => {
            let content = match &data.content {
                AnalysisInput::Page(content) => content,
                AnalysisInput::Sentiment(_) => {
                    anyhow::bail!("summary analysis requires page content")
                }
            };
            let prompt = prompt::summary(content, config.summary_length, bundle);
            tracing::debug!(provider = %config.provider, model = %config.model, "summary request");
            let response = client
                .complete(provider, &config.model, &config.api_key, &prompt)
                .await?;
            Ok(AnalysisResult::Summary {
                content: response,
                word_count: word_count(&content.text),
            })
        }
        AnalysisType::Sentiment => {
            let (text, words) = match &data.content {
                AnalysisInput::Sentiment(input) => (input.text.as_str(), input.word_count),
                AnalysisInput::Page(content) => (content.text.as_str(), 0),
            };
            let prompt = prompt::sentiment(text, bundle);
            tracing::debug!(provider = %config.provider, model = %config.model, "sentiment request");
            let response = client
                .complete(provider, &config.model, &config.api_key, &prompt)
                .await?;
            let verdict = parse_sentiment_response(&response, bundle);
            Ok(AnalysisResult::Sentiment {
                sentiment: verdict.category,
                confidence: verdict.confidence,
                explanation: verdict.explanation,
                word_count: words,
            })
        }
    }
}

/// Sends a fixed prompt through the regular dispatch path and reports the
/// start of whatever came back.
pub async fn test_connection(
    client: &ProviderClient,
    config: &AnalysisConfig,
) -> anyhow::Result<ConnectionReport> {
    config.validate()?;
    let provider = Provider::parse(&config.provider)?;
    let response = client
        .complete(provider, &config.model, &config.api_key, TEST_PROMPT)
        .await?;
    Ok(ConnectionReport {
        message: "API connection successful!".to_owned(),
        response: truncate_chars(&response, 100),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentVerdict {
    pub category: SentimentCategory,
    pub confidence: f64,
    pub explanation: String,
}

/// Reads the model's sentiment reply: the span from the first `{` to the
/// last `}` is tried as JSON; anything unparseable degrades to keyword
/// matching with fixed confidences. The fallback is best-effort, not a
/// guarantee.
pub fn parse_sentiment_response(response: &str, bundle: &LocaleBundle) -> SentimentVerdict {
    if let Some(start) = response.find('{')
        && let Some(end) = response.rfind('}')
        && end > start
    {
        match serde_json::from_str::<serde_json::Value>(&response[start..=end]) {
            Ok(value) => {
                let category = value
                    .get("category")
                    .and_then(|v| v.as_str())
                    .map(SentimentCategory::from_name)
                    .unwrap_or(SentimentCategory::Neutral);
                let confidence = value
                    .get("confidence")
                    .and_then(serde_json::Value::as_f64)
                    .filter(|c| *c != 0.0)
                    .unwrap_or(0.5);
                let explanation = value
                    .get("explanation")
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(bundle.no_explanation)
                    .to_owned();
                return SentimentVerdict {
                    category,
                    confidence,
                    explanation,
                };
            }
            Err(err) => {
                tracing::warn!(?err, "failed to parse sentiment JSON, using keyword fallback");
            }
        }
    }

    let lower = response.to_lowercase();
    if bundle.positive_keywords.iter().any(|k| lower.contains(k)) {
        SentimentVerdict {
            category: SentimentCategory::Joyful,
            confidence: 0.7,
            explanation: bundle.positive_explanation.to_owned(),
        }
    } else if bundle.negative_keywords.iter().any(|k| lower.contains(k)) {
        SentimentVerdict {
            category: SentimentCategory::Toxic,
            confidence: 0.7,
            explanation: bundle.negative_explanation.to_owned(),
        }
    } else {
        SentimentVerdict {
            category: SentimentCategory::Neutral,
            confidence: 0.6,
            explanation: bundle.neutral_explanation.to_owned(),
        }
    }
}
