//! HTTP model adapter
//!
//! Talks to an Ollama or OpenAI-compatible endpoint and asks for a JSON
//! verdict `{"score": 0-100, "reasoning": "..."}`.

use super::adapter::{AdapterVerdict, ModelAdapter};
use crate::config::{AdapterConfig, AdapterKind};
use crate::error::AdapterError;
use crate::sanitize::sanitize_claim;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a mathematical proof evaluator. Analyze the provided proof step \
and provide a score from 0-100 based on logical soundness and correctness. \
Respond in JSON format with 'score' (integer 0-100) and 'reasoning' (string) fields.";

/// Build the user prompt for one claim
pub fn build_prompt(claim: &str) -> String {
    format!(
        "Evaluate this mathematical claim for logical soundness:\n\n\
         **Claim**: {}\n\n\
         Provide a score from 0-100 where:\n\
         - 0-30: Major logical errors or incorrect reasoning\n\
         - 31-60: Some issues but partially correct\n\
         - 61-85: Mostly correct with minor issues\n\
         - 86-100: Logically sound and correct\n\n\
         Respond in JSON format with:\n\
         - \"score\": integer from 0-100\n\
         - \"reasoning\": brief explanation of your evaluation\n",
        sanitize_claim(claim)
    )
}

#[derive(Debug, Deserialize)]
struct StructuredVerdict {
    score: f64,
    #[serde(default, alias = "rationale")]
    reasoning: Option<String>,
}

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)"?score"?\s*[:=]\s*(-?\d+(?:\.\d+)?)"#).expect("static regex")
    })
}

/// Parse a model's text output into a verdict
///
/// Strict JSON first, then a `score: N` scan for models that wrap the JSON
/// in prose.
pub fn parse_verdict(text: &str) -> Result<AdapterVerdict, AdapterError> {
    let trimmed = text.trim();

    if let Ok(parsed) = serde_json::from_str::<StructuredVerdict>(trimmed) {
        return finite(AdapterVerdict {
            score: parsed.score,
            reasoning: parsed.reasoning,
        });
    }

    let captures = score_pattern()
        .captures(trimmed)
        .ok_or_else(|| AdapterError::Malformed("no score in model output".to_string()))?;

    let score = captures[1]
        .parse::<f64>()
        .map_err(|e| AdapterError::Malformed(format!("unparseable score: {}", e)))?;

    finite(AdapterVerdict {
        score,
        reasoning: None,
    })
}

fn finite(verdict: AdapterVerdict) -> Result<AdapterVerdict, AdapterError> {
    if verdict.score.is_finite() {
        Ok(verdict)
    } else {
        Err(AdapterError::Malformed("non-finite score".to_string()))
    }
}

/// Adapter backed by an LLM HTTP endpoint
pub struct HttpModelAdapter {
    config: AdapterConfig,
    client: reqwest::Client,
}

impl HttpModelAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdapterError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn map_send_error(&self, e: reqwest::Error) -> AdapterError {
        if e.is_timeout() {
            AdapterError::Timeout(self.config.timeout_secs)
        } else if e.is_connect() {
            AdapterError::Unreachable(e.to_string())
        } else {
            AdapterError::Http(format!("request failed: {}", e))
        }
    }

    async fn call_ollama(&self, prompt: &str) -> Result<String, AdapterError> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.config.model,
            "system": SYSTEM_PROMPT,
            "prompt": prompt,
            "stream": false,
            "format": "json",
            "options": { "temperature": 0.3 },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "HTTP {} from Ollama",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AdapterError::Malformed(format!("failed to parse response: {}", e)))?;

        json.get("response")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AdapterError::Malformed("empty response".to_string()))
    }

    async fn call_openai_compatible(&self, prompt: &str) -> Result<String, AdapterError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "temperature": 0.3,
            "max_tokens": 300,
            "response_format": {"type": "json_object"},
        });

        let mut request = self.client.post(&url).json(&body);

        if let Some(var) = &self.config.api_key_env {
            let key = std::env::var(var).map_err(|_| AdapterError::MissingApiKey(var.clone()))?;
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "HTTP {} from OpenAI-compatible API",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AdapterError::Malformed(format!("failed to parse response: {}", e)))?;

        json.get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AdapterError::Malformed("empty response".to_string()))
    }
}

#[async_trait]
impl ModelAdapter for HttpModelAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn evaluate(&self, claim: &str) -> Result<AdapterVerdict, AdapterError> {
        let prompt = build_prompt(claim);
        debug!(adapter = %self.config.name, model = %self.config.model, "querying model adapter");

        let text = match self.config.kind {
            AdapterKind::Ollama => self.call_ollama(&prompt).await?,
            AdapterKind::Openai => self.call_openai_compatible(&prompt).await?,
        };

        parse_verdict(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_json() {
        let verdict = parse_verdict(r#"{"score": 87, "reasoning": "sound"}"#).unwrap();
        assert_eq!(verdict.score, 87.0);
        assert_eq!(verdict.reasoning.as_deref(), Some("sound"));
    }

    #[test]
    fn test_parse_rationale_alias() {
        let verdict = parse_verdict(r#"{"score": 40.5, "rationale": "gap"}"#).unwrap();
        assert_eq!(verdict.score, 40.5);
        assert_eq!(verdict.reasoning.as_deref(), Some("gap"));
    }

    #[test]
    fn test_parse_score_wrapped_in_prose() {
        let verdict =
            parse_verdict("Here is my evaluation:\n```json\n{\"score\": 72, \"reasoning\": \"ok\"\n```")
                .unwrap();
        assert_eq!(verdict.score, 72.0);
        assert_eq!(verdict.reasoning, None);

        let verdict = parse_verdict("Score: 55").unwrap();
        assert_eq!(verdict.score, 55.0);
    }

    #[test]
    fn test_parse_rejects_missing_score() {
        assert!(matches!(
            parse_verdict("I cannot evaluate this."),
            Err(AdapterError::Malformed(_))
        ));
    }

    #[test]
    fn test_prompt_embeds_trimmed_claim() {
        let prompt = build_prompt("   x + x = 2x by collecting terms  ");
        assert!(prompt.contains("**Claim**: x + x = 2x by collecting terms\n"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let mut config = AdapterConfig::ollama("local", "llama3.1:8b");
        config.endpoint = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 2;

        let adapter = HttpModelAdapter::new(config).unwrap();
        assert_eq!(adapter.name(), "local");
        assert!(adapter.evaluate("x = x").await.is_err());
    }
}
