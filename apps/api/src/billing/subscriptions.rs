use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::subscription::SubscriptionRow;

pub const STATUS_ACTIVE: &str = "active";

/// Subscription bookkeeping. Carried in `AppState` as
/// `Arc<dyn SubscriptionStore>`.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Inserts or replaces the user's subscription with an active one.
    async fn upsert_active(
        &self,
        user_id: Uuid,
        plan: &str,
        paypal_order_id: &str,
    ) -> Result<(), sqlx::Error>;

    async fn get(&self, user_id: Uuid) -> Result<Option<SubscriptionRow>, sqlx::Error>;
}

pub struct PgSubscriptionStore(pub PgPool);

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn upsert_active(
        &self,
        user_id: Uuid,
        plan: &str,
        paypal_order_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, plan, paypal_order_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET plan = EXCLUDED.plan,
                paypal_order_id = EXCLUDED.paypal_order_id,
                status = EXCLUDED.status,
                updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(plan)
        .bind(paypal_order_id)
        .bind(STATUS_ACTIVE)
        .execute(&self.0)
        .await?;

        info!("Subscription for user {user_id} set to '{plan}' (order {paypal_order_id})");
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<SubscriptionRow>, sqlx::Error> {
        sqlx::query_as::<_, SubscriptionRow>("SELECT * FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.0)
            .await
    }
}
