use crate::config::{ClientSettings, GatewayConfig};
use crate::domain::amount::to_minor_units;
use crate::domain::payment::{NotificationEvent, PaymentResource, RefundList, RefundResource};
use crate::domain::transaction::PaymentTransaction;
use crate::error::{GatewayError, Result};
use crate::gateways::session::{check_id, decode, ApiSession};
use crate::gateways::{AuthOutcome, PaymentGateway};
use crate::logging::GatewayLogger;
use crate::mapper::{EntityResolver, PayloadMapper, UrlGenerator};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncReadExt};

pub struct PayplugGateway<R, U> {
    pub settings: ClientSettings,
    pub client: reqwest::Client,
    pub mapper: PayloadMapper<R, U>,
}

#[derive(Deserialize)]
struct KeysResponse {
    #[serde(default)]
    secret_keys: Map<String, Value>,
}

impl<R: EntityResolver, U: UrlGenerator> PayplugGateway<R, U> {
    pub fn new(settings: ClientSettings, entities: R, urls: U) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()?;
        let mapper =
            PayloadMapper::new(entities, urls).with_notification_host(settings.notification_host.clone());
        Ok(Self {
            settings,
            client,
            mapper,
        })
    }

    fn open(&self, config: &GatewayConfig) -> (ApiSession, GatewayLogger) {
        let logger = GatewayLogger::for_config(config);
        let session = ApiSession::open(&self.client, &self.settings, config, &logger);
        (session, logger)
    }

    /// Drains `reader` once and hands the body to [`PaymentGateway::parse_notification`].
    pub async fn read_notification<Rd>(
        &self,
        mut reader: Rd,
        config: &GatewayConfig,
    ) -> Result<NotificationEvent>
    where
        Rd: AsyncRead + Unpin + Send,
    {
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .await
            .map_err(|e| GatewayError::Verification(format!("unreadable notification body: {e}")))?;
        self.parse_notification(body, config).await
    }

    async fn verify(&self, session: &ApiSession, body: &Value) -> Result<NotificationEvent> {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|v| check_id(v))
                .ok_or_else(|| GatewayError::Verification(format!("missing or invalid `{name}`")))
        };

        let id = field("id")?;
        match body.get("object").and_then(Value::as_str) {
            Some("payment") => {
                let payment: PaymentResource = session
                    .get(&format!("/v1/payments/{id}"))
                    .await
                    .map_err(|e| GatewayError::Verification(format!("payment {id}: {e}")))?;
                if payment.id != id {
                    return Err(GatewayError::Verification(format!(
                        "payment {id} resolved to {}",
                        payment.id
                    )));
                }
                Ok(NotificationEvent::Payment(payment))
            }
            Some("refund") => {
                let payment_id = field("payment_id")?;
                let refund: RefundResource = session
                    .get(&format!("/v1/payments/{payment_id}/refunds/{id}"))
                    .await
                    .map_err(|e| GatewayError::Verification(format!("refund {id}: {e}")))?;
                if refund.id != id {
                    return Err(GatewayError::Verification(format!(
                        "refund {id} resolved to {}",
                        refund.id
                    )));
                }
                Ok(NotificationEvent::Refund(refund))
            }
            Some(other) => Err(GatewayError::Verification(format!(
                "unsupported resource type `{other}`"
            ))),
            None => Err(GatewayError::Verification("missing `object`".to_string())),
        }
    }
}

fn payment_path(payment_id: &str) -> Result<String> {
    if !check_id(payment_id) {
        return Err(GatewayError::InvalidArgument(format!(
            "invalid payment id: {payment_id:?}"
        )));
    }
    Ok(format!("/v1/payments/{payment_id}"))
}

#[async_trait::async_trait]
impl<R: EntityResolver, U: UrlGenerator> PaymentGateway for PayplugGateway<R, U> {
    fn name(&self) -> &'static str {
        "payplug"
    }

    async fn authenticate(&self, login: &str, password: &str) -> AuthOutcome {
        let url = format!("{}/v1/keys", self.settings.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .header("PayPlug-Version", &self.settings.api_version)
            .json(&json!({"email": login, "password": password}))
            .send()
            .await;

        let keys: Result<KeysResponse> = match resp {
            Ok(r) => decode(r).await,
            Err(e) => Err(e.into()),
        };

        match keys {
            Ok(k) => AuthOutcome::Keys(
                k.secret_keys
                    .into_iter()
                    .filter_map(|(kind, key)| match key {
                        Value::String(s) if !s.is_empty() => Some((kind, s)),
                        _ => None,
                    })
                    .collect::<HashMap<_, _>>(),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "payplug key exchange failed");
                AuthOutcome::AuthFailed
            }
        }
    }

    async fn fetch_payment(&self, payment_id: &str, config: &GatewayConfig) -> Result<PaymentResource> {
        let (session, logger) = self.open(config);
        logger.debug("PayplugGateway::fetch_payment BEGIN");

        let payment = session.get(&payment_path(payment_id)?).await?;

        logger.debug("PayplugGateway::fetch_payment END");
        Ok(payment)
    }

    async fn list_refunds(
        &self,
        payment_id: &str,
        config: &GatewayConfig,
    ) -> Result<Vec<RefundResource>> {
        let (session, logger) = self.open(config);
        logger.debug("PayplugGateway::list_refunds BEGIN");

        let list: RefundList = session
            .get(&format!("{}/refunds", payment_path(payment_id)?))
            .await?;

        logger.debug("PayplugGateway::list_refunds END");
        Ok(list.data)
    }

    async fn compute_max_refund_amount(
        &self,
        payment_id: &str,
        config: &GatewayConfig,
    ) -> Result<Decimal> {
        let (session, logger) = self.open(config);
        logger.debug("PayplugGateway::compute_max_refund_amount BEGIN");

        let payment: PaymentResource = session.get(&payment_path(payment_id)?).await?;

        logger.debug("PayplugGateway::compute_max_refund_amount END");
        Ok(payment.max_refundable())
    }

    async fn parse_notification(
        &self,
        raw_body: Vec<u8>,
        config: &GatewayConfig,
    ) -> Result<NotificationEvent> {
        let (session, logger) = self.open(config);
        logger.debug("PayplugGateway::parse_notification BEGIN");

        let body: Value = serde_json::from_slice(&raw_body)
            .map_err(|e| GatewayError::Verification(format!("malformed notification body: {e}")))?;
        let event = self.verify(&session, &body).await?;

        logger.debug("PayplugGateway::parse_notification END");
        Ok(event)
    }

    async fn create_payment(
        &self,
        transaction: &PaymentTransaction,
        config: &GatewayConfig,
    ) -> Result<PaymentResource> {
        let (session, logger) = self.open(config);
        logger.debug("PayplugGateway::create_payment BEGIN");

        let payload = self.mapper.payment_payload(transaction)?;
        logger.debug(&format!(
            "Payment::create from data {}",
            logger.anonymize_and_json_encode(&payload)
        ));
        let payment: PaymentResource = session.post("/v1/payments", &payload).await?;

        logger.debug(&format!("Payment reference is {}", payment.id));
        logger.debug(&format!(
            "Payment url is {}",
            payment.payment_url().unwrap_or_default()
        ));
        logger.debug("PayplugGateway::create_payment END");
        Ok(payment)
    }

    async fn issue_refund(
        &self,
        transaction: &PaymentTransaction,
        config: &GatewayConfig,
        amount: Decimal,
    ) -> Result<RefundResource> {
        let (session, logger) = self.open(config);
        logger.debug("PayplugGateway::issue_refund BEGIN");

        let amount_to_refund = to_minor_units(amount)?;
        let reference = transaction.reference.as_deref().ok_or_else(|| {
            GatewayError::InvalidArgument("transaction has no processor reference".to_string())
        })?;
        let path = format!("{}/refunds", payment_path(reference)?);

        let refund: RefundResource = match session
            .post(&path, &json!({"amount": amount_to_refund}))
            .await
        {
            Ok(refund) => refund,
            Err(GatewayError::Remote { status, body }) => {
                logger.debug(&body);
                tracing::warn!(status, payment = reference, "refund rejected by processor");
                let diagnostic = serde_json::from_str(&body).unwrap_or(Value::String(body));
                return Err(GatewayError::Refund { status, diagnostic });
            }
            Err(e) => return Err(e),
        };

        logger.debug(&format!("Refund reference is {}", refund.id));
        logger.debug("PayplugGateway::issue_refund END");
        Ok(refund)
    }
}
