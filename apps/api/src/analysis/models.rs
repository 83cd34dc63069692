use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Emotion behind a classified bark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionType {
    /// Alert, guarding, startled warning.
    Alert,
    /// Anxious, fearful, separation stress.
    Anxiety,
    /// Excited, play invitation.
    Playful,
    /// Seeking attention or interaction.
    Attention,
    /// Repetitive barking from lack of stimulation.
    Boredom,
}

impl EmotionType {
    pub const ALL: [EmotionType; 5] = [
        EmotionType::Alert,
        EmotionType::Anxiety,
        EmotionType::Playful,
        EmotionType::Attention,
        EmotionType::Boredom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionType::Alert => "alert",
            EmotionType::Anxiety => "anxiety",
            EmotionType::Playful => "playful",
            EmotionType::Attention => "attention",
            EmotionType::Boredom => "boredom",
        }
    }
}

impl fmt::Display for EmotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionType::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown emotion type '{s}'"))
    }
}

/// A hypothesised cause of a bark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCandidate {
    pub trigger: String,
    pub confidence: f64,
    pub rationale: String,
}

/// One classification outcome for one audio clip, as returned by the model
/// and by `POST /api/analyze-bark`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarkAnalysisResult {
    pub is_dog_bark: bool,
    pub dog_bark_confidence: f64,
    #[serde(default)]
    pub non_bark_sound: Option<String>,
    #[serde(default)]
    pub emotion_type: Option<EmotionType>,
    #[serde(default)]
    pub emotion_confidence: Option<f64>,
    #[serde(default)]
    pub anxiety_score: Option<u8>,
    #[serde(default)]
    pub anxiety_rationale: Option<String>,
    #[serde(default)]
    pub trigger_candidates: Vec<TriggerCandidate>,
    #[serde(default)]
    pub needs_more_context: bool,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_type_serde_lowercase() {
        let e: EmotionType = serde_json::from_str(r#""attention""#).unwrap();
        assert_eq!(e, EmotionType::Attention);
        assert_eq!(serde_json::to_string(&EmotionType::Boredom).unwrap(), r#""boredom""#);
    }

    #[test]
    fn test_emotion_type_rejects_unknown() {
        assert!(serde_json::from_str::<EmotionType>(r#""sad""#).is_err());
        assert!("sad".parse::<EmotionType>().is_err());
    }

    #[test]
    fn test_emotion_type_from_str_matches_as_str() {
        for e in EmotionType::ALL {
            assert_eq!(e.as_str().parse::<EmotionType>().unwrap(), e);
        }
    }

    #[test]
    fn test_result_deserializes_camel_case() {
        let json = r#"{
            "isDogBark": true,
            "dogBarkConfidence": 0.92,
            "nonBarkSound": null,
            "emotionType": "alert",
            "emotionConfidence": 0.8,
            "anxietyScore": 4,
            "anxietyRationale": "Short, sharp barks",
            "triggerCandidates": [
                {"trigger": "doorbell", "confidence": 0.7, "rationale": "Pattern matches arrival"}
            ],
            "needsMoreContext": false,
            "followUpQuestions": []
        }"#;
        let result: BarkAnalysisResult = serde_json::from_str(json).unwrap();
        assert!(result.is_dog_bark);
        assert_eq!(result.emotion_type, Some(EmotionType::Alert));
        assert_eq!(result.anxiety_score, Some(4));
        assert_eq!(result.trigger_candidates[0].trigger, "doorbell");
    }

    #[test]
    fn test_result_rejects_fractional_anxiety_score() {
        let json = r#"{"isDogBark": true, "dogBarkConfidence": 0.9, "anxietyScore": 5.5}"#;
        assert!(serde_json::from_str::<BarkAnalysisResult>(json).is_err());
    }

    #[test]
    fn test_result_serializes_camel_case_keys() {
        let result = BarkAnalysisResult {
            is_dog_bark: false,
            dog_bark_confidence: 0.1,
            non_bark_sound: Some("vacuum cleaner".into()),
            emotion_type: None,
            emotion_confidence: None,
            anxiety_score: None,
            anxiety_rationale: None,
            trigger_candidates: vec![],
            needs_more_context: false,
            follow_up_questions: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isDogBark"], false);
        assert_eq!(value["nonBarkSound"], "vacuum cleaner");
        assert!(value["emotionType"].is_null());
        assert!(value["triggerCandidates"].as_array().unwrap().is_empty());
    }
}
