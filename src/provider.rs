use anyhow::Context as _;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.3;

/// The closed set of supported providers. Dispatch is an exhaustive match,
/// so adding a variant forces every call site to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Parses the stored provider string. Unknown values fail here, before
    /// any prompt is built or network call made.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => anyhow::bail!("Unsupported AI provider: {other}"),
        }
    }
}

/// HTTP client over both provider APIs. Base URLs are injectable so tests
/// can point at a local stub.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    openai_base: String,
    anthropic_base: String,
}

impl ProviderClient {
    pub fn new(openai_base: &str, anthropic_base: &str) -> anyhow::Result<Self> {
        // Provider calls carry no client-side timeout; generation can be slow.
        let http = reqwest::Client::builder()
            .build()
            .context("build provider http client")?;
        Ok(Self {
            http,
            openai_base: openai_base.to_owned(),
            anthropic_base: anthropic_base.to_owned(),
        })
    }

    /// Sends one user-role prompt and returns the raw response text.
    pub async fn complete(
        &self,
        provider: Provider,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> anyhow::Result<String> {
        match provider {
            Provider::OpenAi => self.call_openai(model, api_key, prompt).await,
            Provider::Anthropic => self.call_anthropic(model, api_key, prompt).await,
        }
    }

    async fn call_openai(&self, model: &str, api_key: &str, prompt: &str) -> anyhow::Result<String> {
        let endpoint = chat_completions_endpoint(&self.openai_base);
        let body = serde_json::json!({
            "model": model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {endpoint}"))?;

        let status = response.status();
        let raw = response.text().await.context("read OpenAI response body")?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or_else(|| "Unknown error".to_owned());
            anyhow::bail!("OpenAI API error ({status}): {message}");
        }

        let value: serde_json::Value =
            serde_json::from_str(&raw).context("parse OpenAI response")?;
        extract_chat_content(&value).context("extract OpenAI message content")
    }

    async fn call_anthropic(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> anyhow::Result<String> {
        let endpoint = messages_endpoint(&self.anthropic_base);
        let body = serde_json::json!({
            "model": model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .http
            .post(&endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {endpoint}"))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .context("read Anthropic response body")?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or_else(|| "Unknown error".to_owned());
            anyhow::bail!("Anthropic API error ({status}): {message}");
        }

        let value: serde_json::Value =
            serde_json::from_str(&raw).context("parse Anthropic response")?;
        extract_message_text(&value).context("extract Anthropic content text")
    }
}

pub fn chat_completions_endpoint(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/chat/completions")
}

pub fn messages_endpoint(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/messages")
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}

/// choices[0].message.content from a chat-completions response.
fn extract_chat_content(value: &serde_json::Value) -> anyhow::Result<String> {
    value
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow::anyhow!("missing `choices[0].message.content` in response"))
}

/// content[0].text from a messages response.
fn extract_message_text(value: &serde_json::Value) -> anyhow::Result<String> {
    value
        .pointer("/content/0/text")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow::anyhow!("missing `content[0].text` in response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parse_accepts_known_values() {
        assert_eq!(Provider::parse("openai").unwrap(), Provider::OpenAi);
        assert_eq!(Provider::parse("anthropic").unwrap(), Provider::Anthropic);
    }

    #[test]
    fn provider_parse_rejects_unknown_values() {
        let err = Provider::parse("gemini").unwrap_err();
        assert!(err.to_string().contains("Unsupported AI provider"));
    }

    #[test]
    fn endpoints_trim_trailing_slashes() {
        assert_eq!(
            chat_completions_endpoint("http://127.0.0.1:9000/v1/"),
            "http://127.0.0.1:9000/v1/chat/completions"
        );
        assert_eq!(
            messages_endpoint("https://api.anthropic.com/v1"),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn chat_content_is_read_from_the_first_choice() {
        let value = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Summary text." } }
            ]
        });
        assert_eq!(extract_chat_content(&value).unwrap(), "Summary text.");
    }

    #[test]
    fn message_text_is_read_from_the_first_block() {
        let value = serde_json::json!({
            "content": [ { "type": "text", "text": "Claude says hi." } ]
        });
        assert_eq!(extract_message_text(&value).unwrap(), "Claude says hi.");
    }

    #[test]
    fn upstream_error_message_is_extracted_when_present() {
        let raw = r#"{"error":{"message":"invalid api key"}}"#;
        assert_eq!(parse_error_message(raw).as_deref(), Some("invalid api key"));
        assert_eq!(parse_error_message("not json"), None);
    }
}
