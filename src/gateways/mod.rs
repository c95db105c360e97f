use crate::config::GatewayConfig;
use crate::domain::payment::{NotificationEvent, PaymentResource, RefundResource};
use crate::domain::transaction::PaymentTransaction;
use crate::error::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub mod payplug;
pub mod session;

/// Outcome of a login/password key exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Keys(HashMap<String, String>),
    AuthFailed,
}

impl AuthOutcome {
    /// Flattened view where a failed exchange reads as "no keys".
    pub fn into_keys(self) -> HashMap<String, String> {
        match self {
            AuthOutcome::Keys(keys) => keys,
            AuthOutcome::AuthFailed => HashMap::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AuthOutcome::AuthFailed)
    }
}

/// Client for an external payment processor.
///
/// Every operation is one-shot: it resolves credentials from `config`, opens a
/// session scoped to the call and performs a single remote round trip. Nothing
/// is cached and nothing is retried.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn authenticate(&self, login: &str, password: &str) -> AuthOutcome;

    async fn fetch_payment(&self, payment_id: &str, config: &GatewayConfig) -> Result<PaymentResource>;

    async fn list_refunds(
        &self,
        payment_id: &str,
        config: &GatewayConfig,
    ) -> Result<Vec<RefundResource>>;

    async fn compute_max_refund_amount(
        &self,
        payment_id: &str,
        config: &GatewayConfig,
    ) -> Result<Decimal>;

    /// `raw_body` is the inbound request body, read exactly once by the caller.
    async fn parse_notification(
        &self,
        raw_body: Vec<u8>,
        config: &GatewayConfig,
    ) -> Result<NotificationEvent>;

    async fn create_payment(
        &self,
        transaction: &PaymentTransaction,
        config: &GatewayConfig,
    ) -> Result<PaymentResource>;

    /// Not idempotent: every call issues a new refund request.
    async fn issue_refund(
        &self,
        transaction: &PaymentTransaction,
        config: &GatewayConfig,
        amount: Decimal,
    ) -> Result<RefundResource>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_auth_flattens_to_empty_keys() {
        assert!(AuthOutcome::AuthFailed.into_keys().is_empty());

        let keys = HashMap::from([("test".to_string(), "sk_test_1".to_string())]);
        let outcome = AuthOutcome::Keys(keys.clone());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.into_keys(), keys);
    }
}
