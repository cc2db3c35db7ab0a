//! OpenAI chat-completions oracle.
//!
//! Sends one request per text, asking for a JSON object
//! `{ "label": ..., "score": ..., "confidence": ... }` in the assistant message.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sentiscope_core::SentimentLabel;

use crate::oracle::{OracleError, OracleVerdict, SentimentOracle};

pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are a sentiment analysis expert. Analyze the sentiment of the text and \
provide a label (positive, negative, or neutral), a score between -1 (very negative) and 1 (very positive), \
and a confidence score between 0 and 1. Respond with JSON in this format: \
{ \"label\": string, \"score\": number, \"confidence\": number }";

/// Maximum number of response-body bytes echoed into an error.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Applied to the whole HTTP exchange.
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: crate::scorer::DEFAULT_ORACLE_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Oracle backed by the OpenAI chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiOracle {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Shape the model is asked to answer with.
#[derive(Debug, Deserialize)]
struct Verdict {
    label: String,
    score: f64,
    confidence: f64,
}

#[async_trait]
impl SentimentOracle for OpenAiOracle {
    fn name(&self) -> &str {
        "openai"
    }

    async fn classify(&self, text: &str) -> Result<OracleVerdict, OracleError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut body, ERROR_BODY_LIMIT);
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| map_reqwest_error(e, self.config.timeout))?;

        parse_completion(completion)
    }
}

fn parse_completion(completion: ChatCompletion) -> Result<OracleVerdict, OracleError> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| OracleError::Malformed("completion has no message content".to_string()))?;

    parse_verdict(&content)
}

/// Parse the assistant message body into a verdict. Ranges are not checked here.
pub(crate) fn parse_verdict(content: &str) -> Result<OracleVerdict, OracleError> {
    let verdict: Verdict = serde_json::from_str(content)
        .map_err(|e| OracleError::Malformed(format!("verdict is not valid JSON: {e}")))?;

    let label: SentimentLabel = verdict
        .label
        .parse()
        .map_err(|e: sentiscope_core::DomainError| OracleError::Malformed(e.to_string()))?;

    Ok(OracleVerdict {
        label,
        score: verdict.score,
        confidence: verdict.confidence,
    })
}

fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> OracleError {
    if e.is_timeout() {
        OracleError::Timeout(timeout)
    } else if e.is_decode() {
        OracleError::Malformed(e.to_string())
    } else {
        OracleError::Transport(e.to_string())
    }
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(content: Option<&str>) -> ChatCompletion {
        serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        }))
        .unwrap()
    }

    #[test]
    fn parses_well_formed_verdict() {
        let v = parse_completion(completion(Some(
            r#"{"label":"negative","score":-0.8,"confidence":0.9}"#,
        )))
        .unwrap();
        assert_eq!(v.label, SentimentLabel::Negative);
        assert_eq!(v.score, -0.8);
        assert_eq!(v.confidence, 0.9);
    }

    #[test]
    fn out_of_range_numbers_pass_through_unclamped() {
        let v = parse_verdict(r#"{"label":"Positive","score":5,"confidence":3}"#).unwrap();
        assert_eq!(v.label, SentimentLabel::Positive);
        assert_eq!(v.score, 5.0);
        assert_eq!(v.confidence, 3.0);
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(matches!(
            parse_completion(completion(None)),
            Err(OracleError::Malformed(_))
        ));

        let empty: ChatCompletion = serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(matches!(parse_completion(empty), Err(OracleError::Malformed(_))));
    }

    #[test]
    fn unknown_label_or_missing_field_is_malformed() {
        assert!(matches!(
            parse_verdict(r#"{"label":"mixed","score":0.1,"confidence":0.5}"#),
            Err(OracleError::Malformed(_))
        ));
        assert!(matches!(
            parse_verdict(r#"{"label":"neutral","confidence":0.5}"#),
            Err(OracleError::Malformed(_))
        ));
        assert!(matches!(parse_verdict("not json"), Err(OracleError::Malformed(_))));
    }

    #[test]
    fn request_body_asks_for_json_object() {
        let req = ChatRequest {
            model: "gpt-5",
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: "hello" },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["response_format"]["type"], "json_object");
        assert_eq!(v["messages"][1]["content"], "hello");
        assert_eq!(v["model"], "gpt-5");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let cfg = OpenAiConfig::new("k").with_base_url("http://localhost:9999/v1/");
        assert_eq!(cfg.completions_url(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn error_bodies_are_truncated_on_char_boundaries() {
        let mut s = "é".repeat(400);
        truncate_on_char_boundary(&mut s, ERROR_BODY_LIMIT);
        assert!(s.len() <= ERROR_BODY_LIMIT);
        assert!(s.chars().all(|c| c == 'é'));
    }
}
