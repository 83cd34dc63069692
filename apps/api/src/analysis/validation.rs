use serde::{Deserialize, Serialize};

use crate::analysis::models::BarkAnalysisResult;

pub const MIN_ANXIETY_SCORE: u8 = 1;
pub const MAX_ANXIETY_SCORE: u8 = 10;
pub const MAX_TRIGGER_CANDIDATES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaValidationResult {
    pub passed: bool,
    pub violations: Vec<String>,
}

/// Checks a parsed model result against the bark-analysis invariants.
///
/// Non-bark results must carry no emotion, anxiety or trigger data. Bark
/// results must not name a non-bark sound and must list 1 to 3 triggers.
/// Every confidence lies in [0, 1] and the anxiety score in [1, 10].
pub fn validate_result(result: &BarkAnalysisResult) -> SchemaValidationResult {
    let mut violations = Vec::new();

    check_confidence(&mut violations, "dogBarkConfidence", result.dog_bark_confidence);
    if let Some(c) = result.emotion_confidence {
        check_confidence(&mut violations, "emotionConfidence", c);
    }
    for (i, candidate) in result.trigger_candidates.iter().enumerate() {
        check_confidence(
            &mut violations,
            &format!("triggerCandidates[{i}].confidence"),
            candidate.confidence,
        );
        if candidate.trigger.trim().is_empty() {
            violations.push(format!("triggerCandidates[{i}].trigger is empty"));
        }
    }

    if let Some(score) = result.anxiety_score {
        if !(MIN_ANXIETY_SCORE..=MAX_ANXIETY_SCORE).contains(&score) {
            violations.push(format!(
                "anxietyScore {score} is outside {MIN_ANXIETY_SCORE}-{MAX_ANXIETY_SCORE}"
            ));
        }
    }

    if result.is_dog_bark {
        if result.non_bark_sound.is_some() {
            violations.push("nonBarkSound must be null when isDogBark is true".to_string());
        }
        let n = result.trigger_candidates.len();
        if n == 0 || n > MAX_TRIGGER_CANDIDATES {
            violations.push(format!(
                "expected 1-{MAX_TRIGGER_CANDIDATES} triggerCandidates when isDogBark is true, got {n}"
            ));
        }
    } else {
        for (field, present) in [
            ("emotionType", result.emotion_type.is_some()),
            ("emotionConfidence", result.emotion_confidence.is_some()),
            ("anxietyScore", result.anxiety_score.is_some()),
            ("anxietyRationale", result.anxiety_rationale.is_some()),
        ] {
            if present {
                violations.push(format!("{field} must be null when isDogBark is false"));
            }
        }
        if !result.trigger_candidates.is_empty() {
            violations.push("triggerCandidates must be empty when isDogBark is false".to_string());
        }
    }

    SchemaValidationResult {
        passed: violations.is_empty(),
        violations,
    }
}

fn check_confidence(violations: &mut Vec<String>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        violations.push(format!("{field} {value} is outside 0-1"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{EmotionType, TriggerCandidate};

    fn trigger(name: &str, confidence: f64) -> TriggerCandidate {
        TriggerCandidate {
            trigger: name.to_string(),
            confidence,
            rationale: "heard it".to_string(),
        }
    }

    fn bark() -> BarkAnalysisResult {
        BarkAnalysisResult {
            is_dog_bark: true,
            dog_bark_confidence: 0.95,
            non_bark_sound: None,
            emotion_type: Some(EmotionType::Anxiety),
            emotion_confidence: Some(0.7),
            anxiety_score: Some(7),
            anxiety_rationale: Some("Persistent high-pitched barking".to_string()),
            trigger_candidates: vec![trigger("owner leaving", 0.6)],
            needs_more_context: true,
            follow_up_questions: vec!["Does this happen when you leave?".to_string()],
        }
    }

    fn not_bark() -> BarkAnalysisResult {
        BarkAnalysisResult {
            is_dog_bark: false,
            dog_bark_confidence: 0.05,
            non_bark_sound: Some("doorbell".to_string()),
            emotion_type: None,
            emotion_confidence: None,
            anxiety_score: None,
            anxiety_rationale: None,
            trigger_candidates: vec![],
            needs_more_context: false,
            follow_up_questions: vec![],
        }
    }

    #[test]
    fn test_valid_bark_passes() {
        let r = validate_result(&bark());
        assert!(r.passed, "{:?}", r.violations);
    }

    #[test]
    fn test_valid_non_bark_passes() {
        assert!(validate_result(&not_bark()).passed);
    }

    #[test]
    fn test_non_bark_with_emotion_fails() {
        let mut r = not_bark();
        r.emotion_type = Some(EmotionType::Playful);
        r.anxiety_score = Some(3);
        let v = validate_result(&r);
        assert!(!v.passed);
        assert_eq!(v.violations.len(), 2);
    }

    #[test]
    fn test_non_bark_with_triggers_fails() {
        let mut r = not_bark();
        r.trigger_candidates = vec![trigger("mail carrier", 0.4)];
        assert!(!validate_result(&r).passed);
    }

    #[test]
    fn test_bark_without_triggers_fails() {
        let mut r = bark();
        r.trigger_candidates.clear();
        let v = validate_result(&r);
        assert!(!v.passed);
        assert!(v.violations[0].contains("got 0"));
    }

    #[test]
    fn test_bark_with_four_triggers_fails() {
        let mut r = bark();
        r.trigger_candidates = (0..4).map(|i| trigger(&format!("t{i}"), 0.2)).collect();
        assert!(!validate_result(&r).passed);
    }

    #[test]
    fn test_bark_with_three_triggers_passes() {
        let mut r = bark();
        r.trigger_candidates = (0..3).map(|i| trigger(&format!("t{i}"), 0.3)).collect();
        assert!(validate_result(&r).passed);
    }

    #[test]
    fn test_bark_with_non_bark_sound_fails() {
        let mut r = bark();
        r.non_bark_sound = Some("cat".to_string());
        assert!(!validate_result(&r).passed);
    }

    #[test]
    fn test_anxiety_score_bounds() {
        for (score, ok) in [(0, false), (1, true), (10, true), (11, false)] {
            let mut r = bark();
            r.anxiety_score = Some(score);
            assert_eq!(validate_result(&r).passed, ok, "score {score}");
        }
    }

    #[test]
    fn test_confidence_out_of_range_fails() {
        let mut r = bark();
        r.dog_bark_confidence = 1.2;
        assert!(!validate_result(&r).passed);

        let mut r = bark();
        r.trigger_candidates[0].confidence = -0.1;
        assert!(!validate_result(&r).passed);
    }

    #[test]
    fn test_nan_confidence_fails() {
        let mut r = bark();
        r.emotion_confidence = Some(f64::NAN);
        assert!(!validate_result(&r).passed);
    }
}
