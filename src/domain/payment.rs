use crate::domain::amount::from_minor_units;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostedPayment {
    pub payment_url: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
    #[serde(default)]
    pub paid_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentFailure {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Payment as the processor reports it. Amounts are in minor units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentResource {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_refunded: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_refunded: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub hosted_payment: Option<HostedPayment>,
    #[serde(default)]
    pub failure: Option<PaymentFailure>,
    #[serde(default)]
    pub notification_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    PartiallyRefunded,
    Refunded,
    Failed,
}

impl PaymentResource {
    pub fn status(&self) -> PaymentStatus {
        if self.failure.is_some() {
            PaymentStatus::Failed
        } else if self.is_refunded {
            PaymentStatus::Refunded
        } else if self.amount_refunded.unwrap_or(0) > 0 {
            PaymentStatus::PartiallyRefunded
        } else if self.is_paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }

    pub fn payment_url(&self) -> Option<&str> {
        self.hosted_payment
            .as_ref()
            .and_then(|h| h.payment_url.as_deref())
    }

    /// Amount still refundable, in major units.
    pub fn max_refundable(&self) -> Decimal {
        match self.amount_refunded {
            Some(refunded) if refunded != 0 => from_minor_units(self.amount - refunded),
            _ => from_minor_units(self.amount),
        }
    }

    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.created_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    #[default]
    Succeeded,
    Pending,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefundResource {
    pub id: String,
    pub payment_id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub status: RefundStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefundList {
    #[serde(default)]
    pub data: Vec<RefundResource>,
}

/// Verified resource reconstructed from an inbound webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Payment(PaymentResource),
    Refund(RefundResource),
}

impl NotificationEvent {
    pub fn resource_id(&self) -> &str {
        match self {
            NotificationEvent::Payment(p) => &p.id,
            NotificationEvent::Refund(r) => &r.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn payment(value: serde_json::Value) -> PaymentResource {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn max_refundable_subtracts_refunded_amount() {
        let p = payment(json!({"id": "pay_1", "amount": 10000, "amount_refunded": 2500}));
        assert_eq!(p.max_refundable(), Decimal::from_str("75.00").unwrap());

        let p = payment(json!({"id": "pay_2", "amount": 5000, "amount_refunded": 0}));
        assert_eq!(p.max_refundable(), Decimal::from_str("50.00").unwrap());

        let p = payment(json!({"id": "pay_3", "amount": 5000}));
        assert_eq!(p.max_refundable(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn created_at_reads_as_utc() {
        let p = payment(json!({"id": "p", "amount": 1, "created_at": 1_700_000_000}));
        assert_eq!(p.created_at_utc().unwrap().timestamp(), 1_700_000_000);
        assert!(payment(json!({"id": "p", "amount": 1})).created_at_utc().is_none());
    }

    #[test]
    fn status_is_normalized() {
        assert_eq!(
            payment(json!({"id": "p", "amount": 1})).status(),
            PaymentStatus::Pending
        );
        assert_eq!(
            payment(json!({"id": "p", "amount": 1, "is_paid": true})).status(),
            PaymentStatus::Paid
        );
        assert_eq!(
            payment(json!({"id": "p", "amount": 10, "is_paid": true, "amount_refunded": 5}))
                .status(),
            PaymentStatus::PartiallyRefunded
        );
        assert_eq!(
            payment(json!({"id": "p", "amount": 10, "is_refunded": true, "amount_refunded": 10}))
                .status(),
            PaymentStatus::Refunded
        );
        assert_eq!(
            payment(json!({"id": "p", "amount": 1, "failure": {"code": "card_declined", "message": null}}))
                .status(),
            PaymentStatus::Failed
        );
    }

    #[test]
    fn refund_status_defaults_and_tolerates_unknown_values() {
        let r: RefundResource =
            serde_json::from_value(json!({"id": "re_1", "payment_id": "pay_1", "amount": 100}))
                .unwrap();
        assert_eq!(r.status, RefundStatus::Succeeded);

        let r: RefundResource = serde_json::from_value(
            json!({"id": "re_1", "payment_id": "pay_1", "amount": 100, "status": "reversed"}),
        )
        .unwrap();
        assert_eq!(r.status, RefundStatus::Unknown);
    }
}
