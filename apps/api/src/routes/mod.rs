pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::billing::handlers as billing;
use crate::dogs::handlers as dogs;
use crate::state::AppState;

/// Request body cap for routes carrying base64 audio. Encoding inflates a
/// clip by a third, so this admits roughly 18 MB of raw audio.
pub const MAX_AUDIO_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Bark analysis
    let audio_routes: Router<AppState> = Router::new()
        .route("/api/analyze-bark", post(analysis::handle_analyze_bark))
        .route(
            "/api/analyses",
            get(analysis::handle_list_analyses).post(analysis::handle_create_analysis),
        )
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BODY_BYTES));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(audio_routes)
        .route(
            "/api/analyses/:id",
            get(analysis::handle_get_analysis).delete(analysis::handle_delete_analysis),
        )
        .route(
            "/api/analyses/:id/review",
            post(analysis::handle_mark_reviewed),
        )
        // Dogs
        .route(
            "/api/dogs",
            get(dogs::handle_list_dogs).post(dogs::handle_create_dog),
        )
        .route(
            "/api/dogs/:id",
            get(dogs::handle_get_dog)
                .patch(dogs::handle_update_dog)
                .delete(dogs::handle_delete_dog),
        )
        .route("/api/dogs/:id/stats", get(analysis::handle_dog_stats))
        .route(
            "/api/dogs/:id/weekly-report",
            get(analysis::handle_weekly_report),
        )
        // Billing
        .route("/api/plans", get(billing::handle_list_plans))
        .route(
            "/api/paypal/create-order",
            post(billing::handle_create_order),
        )
        .route(
            "/api/paypal/capture-order",
            post(billing::handle_capture_order),
        )
        .route("/api/subscription", get(billing::handle_get_subscription))
        .with_state(state)
}
