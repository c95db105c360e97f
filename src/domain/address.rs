use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Billing,
    Shipping,
}

impl FromStr for AddressType {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "billing" => Ok(AddressType::Billing),
            "shipping" => Ok(AddressType::Shipping),
            other => Err(GatewayError::InvalidArgument(format!(
                "invalid address type: {other}"
            ))),
        }
    }
}

/// Postal address as held by the order model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country_iso2: Option<String>,
}

/// Capability the surrounding order model exposes to the payload mapper.
pub trait HasAddresses: Send + Sync {
    fn billing_address(&self) -> Option<OrderAddress>;
    fn shipping_address(&self) -> Option<OrderAddress>;
    fn email(&self) -> Option<String>;
}

/// Address block of the outbound payment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPayload {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_address_types() {
        assert_eq!("billing".parse::<AddressType>().unwrap(), AddressType::Billing);
        assert_eq!("shipping".parse::<AddressType>().unwrap(), AddressType::Shipping);
    }

    #[test]
    fn rejects_unknown_address_type() {
        let err = "invoice".parse::<AddressType>().unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
    }
}
