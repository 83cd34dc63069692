//! Per-dog aggregates over stored bark analyses: lifetime stats and a
//! week-over-week report.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::analysis::models::EmotionType;
use crate::models::analysis::BarkAnalysisRow;

/// The fields aggregation needs from a stored analysis.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSample {
    pub is_dog_bark: bool,
    pub emotion: Option<EmotionType>,
    pub anxiety_score: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl From<&BarkAnalysisRow> for AnalysisSample {
    fn from(row: &BarkAnalysisRow) -> Self {
        Self {
            is_dog_bark: row.is_dog_bark,
            emotion: row.emotion(),
            anxiety_score: row.anxiety_score.and_then(|s| u8::try_from(s).ok()),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DogAnalysisStats {
    pub total_analyses: usize,
    pub emotion_counts: BTreeMap<EmotionType, usize>,
    /// Mean over analyses that carry a score; 0 when none do.
    pub average_anxiety: f64,
    pub top_emotion: Option<EmotionType>,
}

/// Lifetime stats. Non-bark samples are ignored.
pub fn compute_stats(samples: &[AnalysisSample]) -> DogAnalysisStats {
    let barks: Vec<&AnalysisSample> = samples.iter().filter(|s| s.is_dog_bark).collect();
    let emotion_counts = count_emotions(&barks);
    DogAnalysisStats {
        total_analyses: barks.len(),
        top_emotion: top_emotion(&emotion_counts),
        average_anxiety: average_anxiety(&barks),
        emotion_counts,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionShare {
    pub emotion: EmotionType,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_barks: usize,
    pub previous_total_barks: usize,
    /// Rounded percent change against the previous week; 0 when it was empty.
    pub bark_change_percent: i64,
    pub average_anxiety: f64,
    pub previous_average_anxiety: f64,
    pub anxiety_change_percent: i64,
    /// Emotions seen this week, most frequent first.
    pub emotion_breakdown: Vec<EmotionShare>,
    pub most_common_emotion: Option<EmotionType>,
}

/// Compares the 7 days ending at `now` with the 7 days before them.
pub fn compute_weekly_report(samples: &[AnalysisSample], now: DateTime<Utc>) -> WeeklyReport {
    let week_start = now - Duration::days(7);
    let prev_start = week_start - Duration::days(7);

    let barks = samples.iter().filter(|s| s.is_dog_bark);
    let current: Vec<&AnalysisSample> = barks
        .clone()
        .filter(|s| s.created_at > week_start && s.created_at <= now)
        .collect();
    let previous: Vec<&AnalysisSample> = barks
        .filter(|s| s.created_at > prev_start && s.created_at <= week_start)
        .collect();

    let avg = average_anxiety(&current);
    let prev_avg = average_anxiety(&previous);

    let counts = count_emotions(&current);
    let total: usize = counts.values().sum();
    let mut emotion_breakdown: Vec<EmotionShare> = counts
        .iter()
        .map(|(&emotion, &count)| EmotionShare {
            emotion,
            count,
            percent: (count as f64 / total as f64 * 100.0).round(),
        })
        .collect();
    emotion_breakdown.sort_by(|a, b| b.count.cmp(&a.count).then(a.emotion.cmp(&b.emotion)));

    WeeklyReport {
        period_start: week_start,
        period_end: now,
        total_barks: current.len(),
        previous_total_barks: previous.len(),
        bark_change_percent: percent_change(current.len() as f64, previous.len() as f64),
        average_anxiety: avg,
        previous_average_anxiety: prev_avg,
        anxiety_change_percent: percent_change(avg, prev_avg),
        most_common_emotion: emotion_breakdown.first().map(|s| s.emotion),
        emotion_breakdown,
    }
}

fn count_emotions(samples: &[&AnalysisSample]) -> BTreeMap<EmotionType, usize> {
    let mut counts = BTreeMap::new();
    for emotion in samples.iter().filter_map(|s| s.emotion) {
        *counts.entry(emotion).or_insert(0) += 1;
    }
    counts
}

/// Highest count wins; ties go to the earlier emotion in `EmotionType::ALL`.
fn top_emotion(counts: &BTreeMap<EmotionType, usize>) -> Option<EmotionType> {
    let mut best: Option<(EmotionType, usize)> = None;
    for emotion in EmotionType::ALL {
        if let Some(&count) = counts.get(&emotion) {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((emotion, count));
            }
        }
    }
    best.map(|(e, _)| e)
}

fn average_anxiety(samples: &[&AnalysisSample]) -> f64 {
    let scores: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.anxiety_score)
        .map(f64::from)
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn percent_change(current: f64, previous: f64) -> i64 {
    if previous > 0.0 {
        ((current - previous) / previous * 100.0).round() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(emotion: EmotionType, anxiety: u8, days_ago: i64, now: DateTime<Utc>) -> AnalysisSample {
        AnalysisSample {
            is_dog_bark: true,
            emotion: Some(emotion),
            anxiety_score: Some(anxiety),
            created_at: now - Duration::days(days_ago) + Duration::minutes(1),
        }
    }

    fn non_bark(now: DateTime<Utc>) -> AnalysisSample {
        AnalysisSample {
            is_dog_bark: false,
            emotion: None,
            anxiety_score: None,
            created_at: now,
        }
    }

    #[test]
    fn test_stats_empty() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.average_anxiety, 0.0);
        assert!(stats.top_emotion.is_none());
    }

    #[test]
    fn test_stats_ignore_non_barks() {
        let now = Utc::now();
        let samples = vec![
            sample(EmotionType::Anxiety, 8, 0, now),
            sample(EmotionType::Anxiety, 6, 1, now),
            sample(EmotionType::Playful, 1, 2, now),
            non_bark(now),
        ];
        let stats = compute_stats(&samples);
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.emotion_counts[&EmotionType::Anxiety], 2);
        assert_eq!(stats.top_emotion, Some(EmotionType::Anxiety));
        assert!((stats.average_anxiety - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_average_skips_missing_scores() {
        let now = Utc::now();
        let mut unscored = sample(EmotionType::Alert, 1, 0, now);
        unscored.anxiety_score = None;
        let samples = vec![unscored, sample(EmotionType::Alert, 4, 0, now)];
        assert!((compute_stats(&samples).average_anxiety - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_emotion_tie_prefers_declaration_order() {
        let now = Utc::now();
        let samples = vec![
            sample(EmotionType::Boredom, 2, 0, now),
            sample(EmotionType::Alert, 2, 0, now),
        ];
        assert_eq!(compute_stats(&samples).top_emotion, Some(EmotionType::Alert));
    }

    #[test]
    fn test_stats_serialize_camel_case_with_emotion_keys() {
        let now = Utc::now();
        let stats = compute_stats(&[sample(EmotionType::Playful, 2, 0, now)]);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalAnalyses"], 1);
        assert_eq!(value["emotionCounts"]["playful"], 1);
        assert_eq!(value["topEmotion"], "playful");
    }

    #[test]
    fn test_weekly_report_splits_periods() {
        let now = Utc::now();
        let samples = vec![
            sample(EmotionType::Anxiety, 6, 1, now),
            sample(EmotionType::Anxiety, 6, 2, now),
            sample(EmotionType::Alert, 3, 3, now),
            sample(EmotionType::Anxiety, 8, 9, now),
            sample(EmotionType::Anxiety, 8, 10, now),
            sample(EmotionType::Anxiety, 8, 11, now),
            sample(EmotionType::Anxiety, 8, 12, now),
            sample(EmotionType::Boredom, 1, 30, now),
        ];
        let report = compute_weekly_report(&samples, now);
        assert_eq!(report.total_barks, 3);
        assert_eq!(report.previous_total_barks, 4);
        assert_eq!(report.bark_change_percent, -25);
        assert!((report.average_anxiety - 5.0).abs() < 1e-9);
        assert!((report.previous_average_anxiety - 8.0).abs() < 1e-9);
        assert_eq!(report.anxiety_change_percent, -38);
        assert_eq!(report.most_common_emotion, Some(EmotionType::Anxiety));
        assert_eq!(report.emotion_breakdown[0].count, 2);
        assert_eq!(report.emotion_breakdown[0].percent, 67.0);
        assert_eq!(report.emotion_breakdown[1].emotion, EmotionType::Alert);
    }

    #[test]
    fn test_weekly_report_empty_previous_week_has_zero_change() {
        let now = Utc::now();
        let samples = vec![sample(EmotionType::Playful, 2, 1, now)];
        let report = compute_weekly_report(&samples, now);
        assert_eq!(report.previous_total_barks, 0);
        assert_eq!(report.bark_change_percent, 0);
        assert_eq!(report.anxiety_change_percent, 0);
    }

    #[test]
    fn test_weekly_report_no_data() {
        let report = compute_weekly_report(&[], Utc::now());
        assert_eq!(report.total_barks, 0);
        assert!(report.emotion_breakdown.is_empty());
        assert!(report.most_common_emotion.is_none());
    }
}
