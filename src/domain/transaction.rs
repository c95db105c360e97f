use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Caller-owned payment transaction driving creation and refunds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub amount: Decimal,
    pub currency: String,
    pub entity_class: String,
    pub entity_id: String,
    pub access_identifier: String,
    pub access_token: String,
    /// Processor id of the original payment, set once the payment is created.
    #[serde(default)]
    pub reference: Option<String>,
}
