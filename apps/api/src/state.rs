use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::analysis::analyzer::BarkClassifier;
use crate::billing::paypal::PaymentGateway;
use crate::billing::subscriptions::SubscriptionStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Object storage for recorded clips.
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable bark classifier. Default: LlmBarkClassifier over OpenRouter.
    pub classifier: Arc<dyn BarkClassifier>,
    pub payments: Arc<dyn PaymentGateway>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
}
