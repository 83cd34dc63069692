//! Axum route handlers for bark analysis and stored analyses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::analysis::analyzer::{analyze_bark, prepare_audio, AnalyzeBarkRequest};
use crate::analysis::clips::{clip_key, delete_clip, upload_clip};
use crate::analysis::models::BarkAnalysisResult;
use crate::analysis::stats::{
    compute_stats, compute_weekly_report, AnalysisSample, DogAnalysisStats, WeeklyReport,
};
use crate::analysis::store::{
    delete_analysis, get_analysis, insert_analysis, list_analyses, list_barks_since,
    mark_reviewed, NewAnalysis,
};
use crate::analysis::validation::validate_result;
use crate::dogs::store::get_dog;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::analysis::BarkAnalysisRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListAnalysesQuery {
    pub user_id: Uuid,
    pub dog_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnalysisRequest {
    pub user_id: Uuid,
    pub dog_id: Uuid,
    pub result: BarkAnalysisResult,
    /// Seconds, as measured by the client.
    pub duration: Option<f64>,
    pub audio_base64: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub user_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-bark
///
/// Classifies one clip. Nothing is stored.
pub async fn handle_analyze_bark(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeBarkRequest>,
) -> Result<Json<BarkAnalysisResult>, AppError> {
    let result = analyze_bark(state.classifier.as_ref(), &request).await?;
    Ok(Json(result))
}

/// POST /api/analyses
///
/// Stores a result for one of the user's dogs. The result is re-checked
/// against the schema; an attached clip is uploaded to object storage and
/// removed again if the row cannot be written.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateAnalysisRequest>,
) -> Result<(StatusCode, Json<BarkAnalysisRow>), AppError> {
    let validation = validate_result(&req.result);
    if !validation.passed {
        return Err(AppError::Validation(validation.violations.join("; ")));
    }
    if req.duration.is_some_and(|d| !d.is_finite() || d < 0.0) {
        return Err(AppError::Validation(
            "duration must be a non-negative number of seconds".to_string(),
        ));
    }

    let audio = match req.audio_base64.as_deref().filter(|a| !a.trim().is_empty()) {
        Some(encoded) => Some(prepare_audio(Some(encoded), req.mime_type.as_deref())?),
        None => None,
    };

    get_dog(&state.db, req.user_id, req.dog_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Dog {} not found", req.dog_id)))?;

    let id = Uuid::new_v4();
    let audio_url = match audio {
        Some(audio) => {
            let format = audio.selection.format;
            let key = clip_key(req.user_id, id, format);
            upload_clip(
                &state.s3,
                &state.config.s3_bucket,
                &key,
                format,
                Bytes::from(audio.bytes),
            )
            .await?;
            Some(key)
        }
        None => None,
    };

    let inserted = insert_analysis(
        &state.db,
        NewAnalysis {
            id,
            user_id: req.user_id,
            dog_id: req.dog_id,
            result: &req.result,
            duration: req.duration,
            audio_url: audio_url.as_deref(),
        },
    )
    .await;

    let row = match inserted {
        Ok(row) => row,
        Err(e) => {
            if let Some(key) = audio_url.as_deref() {
                if let Err(cleanup) = delete_clip(&state.s3, &state.config.s3_bucket, key).await {
                    error!("Orphaned clip {key} after failed insert: {cleanup}");
                }
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Query(params): Query<ListAnalysesQuery>,
) -> Result<Json<Vec<BarkAnalysisRow>>, AppError> {
    let rows = list_analyses(&state.db, params.user_id, params.dog_id).await?;
    Ok(Json(rows))
}

/// GET /api/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<BarkAnalysisRow>, AppError> {
    get_analysis(&state.db, params.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}

/// POST /api/analyses/:id/review
pub async fn handle_mark_reviewed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<ReviewRequest>,
) -> Result<Json<BarkAnalysisRow>, AppError> {
    mark_reviewed(&state.db, req.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}

/// DELETE /api/analyses/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if delete_analysis(&state.db, params.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Analysis {id} not found")))
    }
}

/// GET /api/dogs/:id/stats
pub async fn handle_dog_stats(
    State(state): State<AppState>,
    Path(dog_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DogAnalysisStats>, AppError> {
    let rows = list_barks_since(&state.db, params.user_id, dog_id, None).await?;
    let samples: Vec<AnalysisSample> = rows.iter().map(AnalysisSample::from).collect();
    Ok(Json(compute_stats(&samples)))
}

/// GET /api/dogs/:id/weekly-report
pub async fn handle_weekly_report(
    State(state): State<AppState>,
    Path(dog_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<WeeklyReport>, AppError> {
    let now = Utc::now();
    let rows = list_barks_since(
        &state.db,
        params.user_id,
        dog_id,
        Some(now - Duration::days(14)),
    )
    .await?;
    let samples: Vec<AnalysisSample> = rows.iter().map(AnalysisSample::from).collect();
    Ok(Json(compute_weekly_report(&samples, now)))
}
