//! Bark analyzer — turns one audio clip into a validated `BarkAnalysisResult`.
//!
//! Pipeline: input checks → container selection → prompt → one model call →
//! fence stripping → JSON parse → invariant validation.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::{info, warn};

use crate::analysis::audio_format::{select_format, sniff_format, FormatSelection};
use crate::analysis::models::BarkAnalysisResult;
use crate::analysis::prompts::build_prompt;
use crate::analysis::validation::validate_result;
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, AudioPart, LlmClient, LlmError};

/// The classification backend. Implement this to swap model providers
/// without touching the handler.
///
/// Carried in `AppState` as `Arc<dyn BarkClassifier>`.
#[async_trait]
pub trait BarkClassifier: Send + Sync {
    /// Sends the prompt and audio to the model and returns its raw text.
    async fn classify(&self, prompt: &str, audio: AudioPart<'_>) -> Result<String, LlmError>;
}

/// Default backend: a multimodal model behind OpenRouter.
pub struct LlmBarkClassifier(pub LlmClient);

#[async_trait]
impl BarkClassifier for LlmBarkClassifier {
    async fn classify(&self, prompt: &str, audio: AudioPart<'_>) -> Result<String, LlmError> {
        self.0.call_with_audio_text(prompt, audio).await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBarkRequest {
    #[serde(default)]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Decoded, non-empty audio plus the container tag it will be sent as.
pub struct PreparedAudio<'a> {
    pub base64: &'a str,
    pub bytes: Vec<u8>,
    pub selection: FormatSelection,
}

/// Validates the payload and picks its container tag. Shared with the
/// persistence path, which uploads the same bytes to object storage.
pub fn prepare_audio<'a>(
    audio_base64: Option<&'a str>,
    mime_type: Option<&str>,
) -> Result<PreparedAudio<'a>, AppError> {
    let base64 = audio_base64
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("No audio data provided".to_string()))?;

    let bytes = STANDARD
        .decode(base64)
        .map_err(|e| AppError::Validation(format!("audioBase64 is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("No audio data provided".to_string()));
    }

    let selection = select_format(mime_type);
    if selection.defaulted {
        warn!(
            mime_type = mime_type.unwrap_or("<none>"),
            "No audio format matched; defaulting to {}",
            selection.format.as_str()
        );
    }
    if let Some(sniffed) = sniff_format(&bytes) {
        if sniffed != selection.format {
            warn!(
                mime_type = mime_type.unwrap_or("<none>"),
                selected = selection.format.as_str(),
                sniffed = sniffed.as_str(),
                "Audio content does not match the selected format"
            );
        }
    }

    Ok(PreparedAudio {
        base64,
        bytes,
        selection,
    })
}

/// Runs one analysis end to end.
pub async fn analyze_bark(
    classifier: &dyn BarkClassifier,
    request: &AnalyzeBarkRequest,
) -> Result<BarkAnalysisResult, AppError> {
    let audio = prepare_audio(request.audio_base64.as_deref(), request.mime_type.as_deref())?;
    let prompt = build_prompt(request.context.as_deref());

    let raw = classifier
        .classify(
            &prompt,
            AudioPart {
                data: audio.base64,
                format: audio.selection.format.as_str(),
            },
        )
        .await
        .map_err(|e| match e {
            LlmError::NotConfigured => AppError::Configuration(e.to_string()),
            LlmError::EmptyContent => AppError::upstream("No response from AI model", e),
            other => AppError::upstream("Analysis failed", other),
        })?;

    let result = parse_model_output(&raw)?;

    info!(
        is_dog_bark = result.is_dog_bark,
        emotion = result.emotion_type.map(|e| e.as_str()).unwrap_or("-"),
        anxiety = result.anxiety_score.unwrap_or(0),
        audio_bytes = audio.bytes.len(),
        "Bark analysis complete"
    );

    Ok(result)
}

/// Strips fences, parses, and validates the model's text output.
pub fn parse_model_output(raw: &str) -> Result<BarkAnalysisResult, AppError> {
    let cleaned = strip_json_fences(raw);

    let result: BarkAnalysisResult =
        serde_json::from_str(cleaned).map_err(|e| AppError::ModelOutput {
            message: "Failed to parse AI response".to_string(),
            raw_response: raw.to_string(),
            violations: vec![e.to_string()],
        })?;

    let validation = validate_result(&result);
    if !validation.passed {
        return Err(AppError::ModelOutput {
            message: "AI response violates the analysis schema".to_string(),
            raw_response: raw.to_string(),
            violations: validation.violations,
        });
    }

    Ok(result)
}
