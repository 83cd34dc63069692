//! PayPal REST client behind the `PaymentGateway` trait.
//!
//! Each operation fetches a fresh client-credentials token, then makes one
//! call. Nothing is cached or retried.

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::billing::plans::SubscriptionPlan;

const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";
const LIVE_API_BASE: &str = "https://api-m.paypal.com";
const BRAND_NAME: &str = "FluentDog";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const STATUS_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayPalMode {
    #[default]
    Sandbox,
    Live,
}

impl PayPalMode {
    pub fn api_base(&self) -> &'static str {
        match self {
            PayPalMode::Sandbox => SANDBOX_API_BASE,
            PayPalMode::Live => LIVE_API_BASE,
        }
    }
}

impl FromStr for PayPalMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PayPalMode::Sandbox),
            "live" => Ok(PayPalMode::Live),
            other => Err(anyhow::anyhow!(
                "PAYPAL_MODE must be 'sandbox' or 'live', got '{other}'"
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("PayPal credentials not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PayPal API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("PayPal response missing {0}")]
    MissingField(&'static str),
}

/// Result of a capture call. `status` is PayPal's order status verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    pub status: String,
    pub capture_id: Option<String>,
}

impl CaptureOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// The payment provider seam. Carried in `AppState` as
/// `Arc<dyn PaymentGateway>`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a capture-intent order for `plan` and returns its id.
    async fn create_order(&self, plan: &SubscriptionPlan) -> Result<String, PaymentError>;

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, PaymentError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
    status: Option<String>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
    id: String,
}

impl CaptureResponse {
    fn first_capture_id(&self) -> Option<String> {
        self.purchase_units
            .first()?
            .payments
            .as_ref()?
            .captures
            .first()
            .map(|c| c.id.clone())
    }
}

#[derive(Clone)]
pub struct PayPalClient {
    client: Client,
    credentials: Option<(String, String)>,
    mode: PayPalMode,
    app_url: String,
}

impl PayPalClient {
    pub fn new(
        client_id: Option<String>,
        secret_key: Option<String>,
        mode: PayPalMode,
        app_url: String,
    ) -> Result<Self, PaymentError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            credentials: client_id.zip(secret_key),
            mode,
            app_url: app_url.trim_end_matches('/').to_string(),
        })
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let (client_id, secret) = self.credentials.as_ref().ok_or(PaymentError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.mode.api_base()))
            .basic_auth(client_id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    fn order_payload(&self, plan: &SubscriptionPlan) -> serde_json::Value {
        json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": plan.currency,
                    "value": plan.price,
                },
                "description": plan.description,
            }],
            "application_context": {
                "brand_name": BRAND_NAME,
                "landing_page": "NO_PREFERENCE",
                "user_action": "PAY_NOW",
                "return_url": format!("{}/checkout/success", self.app_url),
                "cancel_url": format!("{}/checkout/cancel", self.app_url),
            },
        })
    }
}

#[async_trait]
impl PaymentGateway for PayPalClient {
    async fn create_order(&self, plan: &SubscriptionPlan) -> Result<String, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!("{}/v2/checkout/orders", self.mode.api_base()))
            .bearer_auth(token)
            .json(&self.order_payload(plan))
            .send()
            .await?;

        let order: OrderResponse = error_for_status(response).await?.json().await?;
        let id = order.id.ok_or(PaymentError::MissingField("order id"))?;
        debug!("Created PayPal order {id} for plan {}", plan.id);
        Ok(id)
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!(
                "{}/v2/checkout/orders/{order_id}/capture",
                self.mode.api_base()
            ))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let capture: CaptureResponse = error_for_status(response).await?.json().await?;
        let status = capture
            .status
            .clone()
            .ok_or(PaymentError::MissingField("status"))?;
        Ok(CaptureOutcome {
            capture_id: capture.first_capture_id(),
            status,
        })
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(PaymentError::Api {
        status: status.as_u16(),
        message,
    })
}
