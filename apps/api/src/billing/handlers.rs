use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::billing::paypal::PaymentError;
use crate::billing::plans::{find_plan, SubscriptionPlan, SUBSCRIPTION_PLANS};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::subscription::SubscriptionRow;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub plan_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    /// The paying user. Without it the payment is captured but no
    /// subscription is recorded.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderResponse {
    pub success: bool,
    pub capture_id: Option<String>,
    pub status: String,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

fn payment_error(public_message: &str, e: PaymentError) -> AppError {
    match e {
        PaymentError::NotConfigured => AppError::Configuration(e.to_string()),
        other => AppError::upstream(public_message, other),
    }
}

/// GET /api/plans
pub async fn handle_list_plans() -> Json<&'static [SubscriptionPlan]> {
    Json(SUBSCRIPTION_PLANS)
}

/// POST /api/paypal/create-order
///
/// Unknown plans are rejected before PayPal is contacted.
pub async fn handle_create_order(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let plan = req
        .plan_id
        .as_deref()
        .and_then(find_plan)
        .ok_or_else(|| AppError::Validation("Invalid plan ID".to_string()))?;

    let order_id = state
        .payments
        .create_order(plan)
        .await
        .map_err(|e| payment_error("Failed to create PayPal order", e))?;

    info!("Created order {order_id} for plan {}", plan.id);
    Ok(Json(CreateOrderResponse { order_id }))
}

/// POST /api/paypal/capture-order
///
/// Unknown plans are rejected before capture. A completed capture is
/// reported as success even if recording the subscription fails; that
/// failure is only logged.
pub async fn handle_capture_order(
    State(state): State<AppState>,
    AppJson(req): AppJson<CaptureOrderRequest>,
) -> Result<Json<CaptureOrderResponse>, AppError> {
    let order_id = req
        .order_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Order ID is required".to_string()))?;

    // A plan id, when sent, must name a known plan before any money moves.
    let plan = match req.plan_id.as_deref() {
        Some(plan_id) => Some(
            find_plan(plan_id)
                .ok_or_else(|| AppError::Validation("Invalid plan ID".to_string()))?,
        ),
        None => None,
    };

    let outcome = state
        .payments
        .capture_order(order_id)
        .await
        .map_err(|e| payment_error("Failed to capture PayPal order", e))?;

    if !outcome.is_completed() {
        warn!("Order {order_id} captured with status {}", outcome.status);
        return Err(AppError::PaymentNotCompleted(outcome.status));
    }

    match (req.user_id, plan) {
        (Some(user_id), Some(plan)) => {
            if let Err(e) = state
                .subscriptions
                .upsert_active(user_id, plan.id, order_id)
                .await
            {
                error!("Failed to save subscription for user {user_id} (order {order_id}): {e}");
            }
        }
        (Some(user_id), None) => {
            warn!("Order {order_id} completed for user {user_id} without a plan id; subscription not recorded");
        }
        (None, _) => {
            warn!("Order {order_id} completed without a user id; subscription not recorded");
        }
    }

    Ok(Json(CaptureOrderResponse {
        success: true,
        capture_id: outcome.capture_id,
        status: outcome.status,
    }))
}

/// GET /api/subscription
pub async fn handle_get_subscription(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SubscriptionRow>, AppError> {
    state
        .subscriptions
        .get(params.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No subscription for user {}", params.user_id)))
}
