use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::BarkAnalysisResult;
use crate::models::analysis::BarkAnalysisRow;

/// Parameters for inserting a new analysis row.
pub struct NewAnalysis<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dog_id: Uuid,
    pub result: &'a BarkAnalysisResult,
    pub duration: Option<f64>,
    pub audio_url: Option<&'a str>,
}

/// Persists a result verbatim. The row is never changed afterwards except
/// by `mark_reviewed`.
pub async fn insert_analysis(
    pool: &PgPool,
    params: NewAnalysis<'_>,
) -> Result<BarkAnalysisRow, sqlx::Error> {
    let NewAnalysis {
        id,
        user_id,
        dog_id,
        result,
        duration,
        audio_url,
    } = params;

    let row = sqlx::query_as::<_, BarkAnalysisRow>(
        r#"
        INSERT INTO bark_analyses
            (id, user_id, dog_id, is_dog_bark, dog_bark_confidence, non_bark_sound,
             emotion_type, emotion_confidence, anxiety_score, anxiety_rationale,
             trigger_candidates, needs_more_context, follow_up_questions, duration, audio_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(dog_id)
    .bind(result.is_dog_bark)
    .bind(result.dog_bark_confidence)
    .bind(result.non_bark_sound.as_deref())
    .bind(result.emotion_type.map(|e| e.as_str()))
    .bind(result.emotion_confidence)
    .bind(result.anxiety_score.map(i16::from))
    .bind(result.anxiety_rationale.as_deref())
    .bind(Json(&result.trigger_candidates))
    .bind(result.needs_more_context)
    .bind(&result.follow_up_questions)
    .bind(duration)
    .bind(audio_url)
    .fetch_one(pool)
    .await?;

    info!("Stored bark analysis {id} for dog {dog_id}");
    Ok(row)
}

/// Newest first. `dog_id` narrows the list to one dog.
pub async fn list_analyses(
    pool: &PgPool,
    user_id: Uuid,
    dog_id: Option<Uuid>,
) -> Result<Vec<BarkAnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, BarkAnalysisRow>(
        r#"
        SELECT * FROM bark_analyses
        WHERE user_id = $1 AND ($2::uuid IS NULL OR dog_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(dog_id)
    .fetch_all(pool)
    .await
}

/// Bark-only rows for one dog created at or after `since`, newest first.
pub async fn list_barks_since(
    pool: &PgPool,
    user_id: Uuid,
    dog_id: Uuid,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<BarkAnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, BarkAnalysisRow>(
        r#"
        SELECT * FROM bark_analyses
        WHERE user_id = $1 AND dog_id = $2 AND is_dog_bark
          AND ($3::timestamptz IS NULL OR created_at >= $3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(dog_id)
    .bind(since)
    .fetch_all(pool)
    .await
}

pub async fn get_analysis(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<BarkAnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, BarkAnalysisRow>(
        "SELECT * FROM bark_analyses WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn mark_reviewed(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<BarkAnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, BarkAnalysisRow>(
        r#"
        UPDATE bark_analyses
        SET reviewed = true, reviewed_at = now(), updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Returns false when no row matched.
pub async fn delete_analysis(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bark_analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
