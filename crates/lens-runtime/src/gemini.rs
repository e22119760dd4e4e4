//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Google generative-language
//! REST API (`v1beta/models/{model}:generateContent`).

use std::time::Duration;

use async_trait::async_trait;
use lens_core::{
    error::{CollaboratorError, Result},
    message::{Message, Role, split_system},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Gemini provider configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,

    /// Model used when the caller does not name one
    pub model: String,

    /// API root, without a trailing slash
    pub base_url: String,

    /// Transport-level timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }

    /// Read `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    ///
    /// A missing or blank key is [`CollaboratorError::NotConfigured`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(CollaboratorError::NotConfigured)?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(base) = lookup("GEMINI_BASE_URL").filter(|b| !b.trim().is_empty()) {
            config.base_url = base.trim_end_matches('/').to_string();
        }
        Ok(config)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    display_name: Option<String>,
    input_token_limit: Option<u32>,
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| CollaboratorError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models?key={}", self.config.base_url, self.config.api_key)
    }

    /// Convert messages to a Gemini request body.
    ///
    /// System messages go to `systemInstruction`; assistant turns use the
    /// `model` role.
    fn build_request(messages: &[Message], options: &GenerationOptions) -> GenerateContentRequest {
        let (system, turns) = split_system(messages);

        let contents = turns
            .into_iter()
            .map(|m| Content {
                role: Some(match m.role {
                    Role::Assistant => "model",
                    Role::User | Role::System => "user",
                }),
                parts: vec![Part { text: m.content.clone() }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
                top_p: options.top_p,
                response_mime_type: options.json_response.then_some("application/json"),
            },
        }
    }

    fn convert_completion(response: GenerateContentResponse, model: &str) -> Result<Completion> {
        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| CollaboratorError::Provider("response had no candidates".into()))?;

        let finish_reason = candidate.finish_reason.as_deref().map(|reason| match reason {
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                FinishReason::ContentFilter
            }
            "STOP" => FinishReason::Stop,
            _ => FinishReason::Error,
        });

        let content: String = candidate
            .content
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if content.is_empty() && finish_reason == Some(FinishReason::ContentFilter) {
            return Err(CollaboratorError::Provider("response blocked by content filter".into()));
        }

        let usage = response.usage_metadata.map(|u| {
            let prompt = u.prompt_token_count.unwrap_or(0);
            let completion = u.candidates_token_count.unwrap_or(0);
            TokenUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: u.total_token_count.unwrap_or(prompt + completion),
            }
        });

        Ok(Completion {
            content,
            model: model.to_string(),
            usage,
            finish_reason,
        })
    }
}

/// Map an unsuccessful HTTP status to a collaborator error
fn status_error(status: u16, body: &str) -> CollaboratorError {
    let excerpt: String = body.chars().take(200).collect();
    match status {
        401 | 403 => CollaboratorError::Auth(format!("HTTP {status}")),
        429 => CollaboratorError::RateLimited(excerpt),
        500..=599 => CollaboratorError::ProviderUnavailable(format!("HTTP {status}")),
        _ => CollaboratorError::Provider(format!("HTTP {status}: {excerpt}")),
    }
}

fn transport_error(e: &reqwest::Error) -> CollaboratorError {
    if e.is_timeout() || e.is_connect() {
        CollaboratorError::ProviderUnavailable(e.to_string())
    } else {
        CollaboratorError::Provider(e.to_string())
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Gemini".into(),
            models,
            supports_json_mode: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.models_url()).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let model = if options.model.is_empty() {
            self.config.model.as_str()
        } else {
            options.model.as_str()
        };
        let body = Self::build_request(messages, options);

        let response = self
            .client
            .post(self.generate_url(model))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Provider(format!("invalid response body: {e}")))?;

        Self::convert_completion(data, model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.models_url())
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Provider(e.to_string()))?;

        Ok(list
            .models
            .into_iter()
            .map(|m| {
                let id = m.name.trim_start_matches("models/").to_string();
                ModelInfo {
                    name: m.display_name.unwrap_or_else(|| id.clone()),
                    id,
                    context_length: m.input_token_limit,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        let mut config = GeminiConfig::new("test-key");
        config.base_url = "http://127.0.0.1:9".into();
        GeminiProvider::from_config(config).unwrap()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = GeminiConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("abc".into()),
            "GEMINI_BASE_URL" => Some("http://proxy.local/".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.base_url, "http://proxy.local");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let err = GeminiConfig::from_lookup(|key| {
            (key == "GEMINI_API_KEY").then(|| "  ".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, CollaboratorError::NotConfigured));
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![
            Message::system("Answer in JSON."),
            Message::user("Analyze"),
            Message::new(Role::Assistant, "{}"),
        ];
        let body = GeminiProvider::build_request(&messages, &GenerationOptions::default());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Answer in JSON.");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"].as_array().unwrap().len(), 2);
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4096);
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_plain_text_mode_omits_mime_type() {
        let options = GenerationOptions {
            json_response: false,
            ..GenerationOptions::default()
        };
        let body = GeminiProvider::build_request(&[Message::user("hi")], &options);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert!(json["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_completion_extraction() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{\"portfolio"}, {"text": "Health\": \"ok\"}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let completion = GeminiProvider::convert_completion(response, "gemini-1.5-flash").unwrap();

        assert_eq!(completion.content, r#"{"portfolioHealth": "ok"}"#);
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_max_tokens_marks_truncation() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "{"}]}, "finishReason": "MAX_TOKENS"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let completion = GeminiProvider::convert_completion(response, "m").unwrap();
        assert!(completion.truncated());
        assert!(completion.usage.is_none());
    }

    #[test]
    fn test_empty_candidates_is_error() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(GeminiProvider::convert_completion(response, "m").is_err());

        let blocked = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(blocked).unwrap();
        assert!(GeminiProvider::convert_completion(response, "m").is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status_error(401, ""), CollaboratorError::Auth(_)));
        assert!(matches!(status_error(403, ""), CollaboratorError::Auth(_)));
        assert!(matches!(status_error(429, "quota"), CollaboratorError::RateLimited(_)));
        assert!(matches!(status_error(503, ""), CollaboratorError::ProviderUnavailable(_)));
        assert!(matches!(status_error(400, "bad"), CollaboratorError::Provider(_)));
    }

    #[test]
    fn test_urls() {
        let p = provider();
        assert_eq!(
            p.generate_url("gemini-1.5-pro"),
            "http://127.0.0.1:9/v1beta/models/gemini-1.5-pro:generateContent?key=test-key"
        );
        assert_eq!(p.models_url(), "http://127.0.0.1:9/v1beta/models?key=test-key");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unhealthy() {
        assert!(!provider().health_check().await.unwrap());
        assert_eq!(provider().name(), "gemini");
    }
}
