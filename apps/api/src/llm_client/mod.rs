/// LLM Client — the single point of entry for all model calls in FluentDog.
///
/// ARCHITECTURAL RULE: No other module may call OpenRouter directly.
/// All model interactions MUST go through this module.
///
/// One request per call. Failures are surfaced to the caller as-is; there is
/// no retry or backoff.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenRouter API key not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No response from AI model")]
    EmptyContent,
}

/// Audio attached to a prompt as an `input_audio` content part.
#[derive(Debug, Clone, Copy)]
pub struct AudioPart<'a> {
    /// Base64 payload, forwarded verbatim.
    pub data: &'a str,
    /// Container tag understood by the provider (`wav`, `mp3`, `webm`).
    pub format: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    InputAudio { input_audio: InputAudio<'a> },
}

#[derive(Debug, Serialize)]
struct InputAudio<'a> {
    data: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    /// Usually a string; some providers return structured parts instead.
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl LlmResponse {
    /// Extracts the first choice's content as text. Non-string content is
    /// serialized back to JSON text. Empty content yields `None`.
    pub fn text(&self) -> Option<String> {
        let content = &self.choices.first()?.message.content;
        let text = match content {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenRouterError {
    error: OpenRouterErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenRouterErrorBody {
    message: String,
}

/// Wraps the OpenRouter chat-completions API for multimodal prompts.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one user message made of `prompt` followed by `audio`.
    pub async fn call_with_audio(
        &self,
        prompt: &str,
        audio: AudioPart<'_>,
    ) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::InputAudio {
                        input_audio: InputAudio {
                            data: audio.data,
                            format: audio.format,
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenRouterError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(llm_response)
    }

    /// Like `call_with_audio`, but returns only the text content.
    pub async fn call_with_audio_text(
        &self,
        prompt: &str,
        audio: AudioPart<'_>,
    ) -> Result<String, LlmError> {
        let response = self.call_with_audio(prompt, audio).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Strips Markdown code fences from model output.
///
/// A leading "```json" or "```" and a trailing "```" are removed
/// independently, then whitespace is trimmed. Clean input is returned
/// unchanged, so the function is idempotent.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_trailing_only() {
        let input = "  {\"key\": 1}\n```  ";
        assert_eq!(strip_json_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_strip_json_fences_is_idempotent() {
        for input in [
            "```json\n{\"a\": [1, 2]}\n```",
            "```{\"a\": true}```",
            "{\"a\": null}",
            "",
        ] {
            let once = strip_json_fences(input);
            assert_eq!(strip_json_fences(once), once);
        }
    }

    #[test]
    fn test_response_text_string_content() {
        let json = r#"{"choices":[{"message":{"content":"{\"isDogBark\":false}"}}],
                       "usage":{"prompt_tokens":10,"completion_tokens":5}}"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"isDogBark\":false}"));
    }

    #[test]
    fn test_response_text_empty_or_missing() {
        let empty: LlmResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(empty.text().is_none());

        let no_choices: LlmResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(no_choices.text().is_none());

        let null_content: LlmResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null_content.text().is_none());
    }

    #[test]
    fn test_request_serializes_input_audio_part() {
        let body = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: "hi" },
                    ContentPart::InputAudio {
                        input_audio: InputAudio {
                            data: "AAAA",
                            format: "webm",
                        },
                    },
                ],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        let parts = &value["messages"][0]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "input_audio");
        assert_eq!(parts[1]["input_audio"]["format"], "webm");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let client = LlmClient::new(None, "m".into()).unwrap();
        let err = client
            .call_with_audio(
                "prompt",
                AudioPart {
                    data: "AAAA",
                    format: "wav",
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }
}
