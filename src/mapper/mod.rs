use crate::domain::address::{AddressPayload, AddressType, HasAddresses};
use crate::domain::amount::to_minor_units;
use crate::domain::transaction::PaymentTransaction;
use crate::error::Result;
use serde::{Serialize, Serializer};
use std::sync::Arc;

pub mod urls;

pub use urls::{CallbackRoute, StaticUrlGenerator, UrlGenerator};

/// Resolves the order-like entity a transaction was created for.
pub trait EntityResolver: Send + Sync {
    fn resolve(&self, entity_class: &str, entity_id: &str) -> Option<Arc<dyn HasAddresses>>;
}

#[derive(Default, Clone)]
pub struct InMemoryEntityResolver {
    entities: std::collections::HashMap<(String, String), Arc<dyn HasAddresses>>,
}

impl InMemoryEntityResolver {
    pub fn insert(
        &mut self,
        entity_class: impl Into<String>,
        entity_id: impl Into<String>,
        entity: Arc<dyn HasAddresses>,
    ) {
        self.entities
            .insert((entity_class.into(), entity_id.into()), entity);
    }
}

impl EntityResolver for InMemoryEntityResolver {
    fn resolve(&self, entity_class: &str, entity_id: &str) -> Option<Arc<dyn HasAddresses>> {
        self.entities
            .get(&(entity_class.to_string(), entity_id.to_string()))
            .cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackUrls {
    pub cancel_url: String,
    pub return_url: String,
}

/// Outbound body of a payment creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPayload {
    pub amount: i64,
    pub currency: String,
    #[serde(serialize_with = "address_or_empty")]
    pub shipping: Option<AddressPayload>,
    #[serde(serialize_with = "address_or_empty")]
    pub billing: Option<AddressPayload>,
    pub hosted_payment: CallbackUrls,
    pub notification_url: String,
}

fn address_or_empty<S: Serializer>(
    address: &Option<AddressPayload>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    match address {
        Some(a) => a.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[derive(Clone)]
pub struct PayloadMapper<R, U> {
    pub entities: R,
    pub urls: U,
    pub notification_host: Option<String>,
}

impl<R: EntityResolver, U: UrlGenerator> PayloadMapper<R, U> {
    pub fn new(entities: R, urls: U) -> Self {
        Self {
            entities,
            urls,
            notification_host: None,
        }
    }

    pub fn with_notification_host(mut self, host: Option<String>) -> Self {
        self.notification_host = host;
        self
    }

    /// Unresolvable entities and missing addresses degrade to `None`.
    pub fn address_payload(
        &self,
        address_type: AddressType,
        transaction: &PaymentTransaction,
    ) -> Option<AddressPayload> {
        let entity = self
            .entities
            .resolve(&transaction.entity_class, &transaction.entity_id)?;

        let address = match address_type {
            AddressType::Billing => entity.billing_address(),
            AddressType::Shipping => entity.shipping_address(),
        }?;

        // Shipping blocks are always tagged BILLING; kept as the upstream rule.
        let delivery_type = match address_type {
            AddressType::Shipping => Some("BILLING".to_string()),
            AddressType::Billing => None,
        };

        Some(AddressPayload {
            email: entity.email(),
            first_name: address.first_name,
            last_name: address.last_name,
            address1: address.street,
            address2: address.street2,
            city: address.city,
            postcode: address.postal_code,
            country: address.country_iso2,
            delivery_type,
        })
    }

    /// Same as [`Self::address_payload`] with the type given by name.
    pub fn address_payload_named(
        &self,
        address_type: &str,
        transaction: &PaymentTransaction,
    ) -> Result<Option<AddressPayload>> {
        let address_type = address_type.parse::<AddressType>()?;
        Ok(self.address_payload(address_type, transaction))
    }

    pub fn callback_urls(&self, transaction: &PaymentTransaction) -> CallbackUrls {
        let params = [("accessIdentifier", transaction.access_identifier.as_str())];
        CallbackUrls {
            cancel_url: self.urls.absolute_url(CallbackRoute::Error, &params),
            return_url: self.urls.absolute_url(CallbackRoute::Return, &params),
        }
    }

    pub fn notification_url(&self, transaction: &PaymentTransaction) -> String {
        let params = [
            ("accessIdentifier", transaction.access_identifier.as_str()),
            ("accessToken", transaction.access_token.as_str()),
        ];
        match &self.notification_host {
            Some(host) => format!(
                "{}{}",
                host.trim_end_matches('/'),
                self.urls.absolute_path(CallbackRoute::Notify, &params)
            ),
            None => self.urls.absolute_url(CallbackRoute::Notify, &params),
        }
    }

    pub fn payment_payload(&self, transaction: &PaymentTransaction) -> Result<PaymentPayload> {
        Ok(PaymentPayload {
            amount: to_minor_units(transaction.amount)?,
            currency: transaction.currency.clone(),
            shipping: self.address_payload(AddressType::Shipping, transaction),
            billing: self.address_payload(AddressType::Billing, transaction),
            hosted_payment: self.callback_urls(transaction),
            notification_url: self.notification_url(transaction),
        })
    }
}
