use crate::config::TextGenConfig;
use crate::fallback::FallbackReason;

const MAX_NEW_TOKENS: u32 = 220;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Generated(String),
    Fallback(FallbackReason),
}

impl Enrichment {
    pub fn text(&self) -> Option<&str> {
        match self {
            Enrichment::Generated(text) => Some(text.as_str()),
            Enrichment::Fallback(_) => None,
        }
    }
}

pub fn prompt(topic: &str) -> String {
    format!(
        "Write two concise paragraphs (max 180 words total) explaining why \"{topic}\" matters \
         for modern web developers. Use an inclusive, encouraging tone."
    )
}

/// Asks the text-generation endpoint for two short paragraphs about `topic`.
/// Never fails: every problem is reported as [`Enrichment::Fallback`].
pub async fn generate(
    client: &reqwest::Client,
    config: Option<&TextGenConfig>,
    topic: &str,
) -> Enrichment {
    let Some(config) = config else {
        return Enrichment::Fallback(FallbackReason::MissingCredentials("HF_ACCESS_TOKEN"));
    };

    tracing::info!(model = %config.model, endpoint = %config.endpoint, "text enrichment");
    match request_text(client, config, topic).await {
        Ok(text) => Enrichment::Generated(text),
        Err(reason) => {
            tracing::warn!(%reason, "text enrichment failed; using fallback content");
            Enrichment::Fallback(reason)
        }
    }
}

async fn request_text(
    client: &reqwest::Client,
    config: &TextGenConfig,
    topic: &str,
) -> Result<String, FallbackReason> {
    let prompt = prompt(topic);
    let body = serde_json::json!({
        "inputs": prompt,
        "max_new_tokens": MAX_NEW_TOKENS,
        "temperature": TEMPERATURE,
    });

    let response = client
        .post(&config.endpoint)
        .bearer_auth(&config.token)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let raw = response.text().await?;
    if !status.is_success() {
        tracing::debug!(%status, body = %raw, "text generation error response");
        return Err(FallbackReason::Status(status.as_u16()));
    }

    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|err| FallbackReason::InvalidResponse(err.to_string()))?;
    let text = extract_generated_text(&value)
        .ok_or(FallbackReason::MissingField("generated_text"))?;

    let text = text.replace(&prompt, "").trim().to_owned();
    if text.is_empty() {
        return Err(FallbackReason::EmptyOutput);
    }
    Ok(text)
}

/// Accepts `[{"generated_text": ...}]`, `{"summary_text": ...}`, `"..."` and
/// the other combinations of those shapes.
fn extract_generated_text(value: &serde_json::Value) -> Option<String> {
    let candidate = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    if let Some(text) = candidate.as_str() {
        return Some(text.to_owned());
    }
    ["generated_text", "summary_text"]
        .iter()
        .find_map(|key| candidate.get(*key).and_then(|v| v.as_str()))
        .map(str::to_owned)
}
