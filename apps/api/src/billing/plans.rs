use serde::Serialize;

/// A purchasable plan. Prices are decimal strings as PayPal expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub currency: &'static str,
    pub description: &'static str,
}

pub const SUBSCRIPTION_PLANS: &[SubscriptionPlan] = &[
    SubscriptionPlan {
        id: "premium",
        name: "Premium",
        price: "19.90",
        currency: "USD",
        description: "FluentDog Premium - AI emotion classification, anxiety scoring, weekly reports",
    },
    SubscriptionPlan {
        id: "coach",
        name: "Coach",
        price: "49.90",
        currency: "USD",
        description: "FluentDog Coach - All Premium features + personalized training courses",
    },
];

pub fn find_plan(plan_id: &str) -> Option<&'static SubscriptionPlan> {
    SUBSCRIPTION_PLANS.iter().find(|p| p.id == plan_id)
}
