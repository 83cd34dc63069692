use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::models::{EmotionType, TriggerCandidate};

/// A stored analysis. Columns mirror `BarkAnalysisResult` in snake_case.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BarkAnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dog_id: Uuid,
    pub is_dog_bark: bool,
    pub dog_bark_confidence: Option<f64>,
    pub non_bark_sound: Option<String>,
    pub emotion_type: Option<String>,
    pub emotion_confidence: Option<f64>,
    pub anxiety_score: Option<i16>,
    pub anxiety_rationale: Option<String>,
    pub trigger_candidates: Json<Vec<TriggerCandidate>>,
    pub needs_more_context: bool,
    pub follow_up_questions: Vec<String>,
    /// Clip length in seconds, as reported by the client.
    pub duration: Option<f64>,
    /// Object-storage key of the uploaded clip.
    pub audio_url: Option<String>,
    pub reviewed: bool,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BarkAnalysisRow {
    /// Unknown emotion strings read back as `None`.
    pub fn emotion(&self) -> Option<EmotionType> {
        self.emotion_type.as_deref().and_then(|s| s.parse().ok())
    }
}
