// Subscription billing: fixed plan table, PayPal order create/capture,
// and subscription bookkeeping. PayPal calls go through `PaymentGateway`.

pub mod handlers;
pub mod paypal;
pub mod plans;
pub mod subscriptions;
