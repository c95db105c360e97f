use anyhow::{Context, Result};
use payplug_gateway::config::{ClientSettings, GatewayConfig};
use payplug_gateway::gateways::{AuthOutcome, PaymentGateway};
use payplug_gateway::mapper::{InMemoryEntityResolver, StaticUrlGenerator};
use payplug_gateway::PayplugGateway;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = ClientSettings::from_env();
    let config = GatewayConfig::from_env();
    let public_url =
        std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    let gateway = PayplugGateway::new(
        settings,
        InMemoryEntityResolver::default(),
        StaticUrlGenerator::new(public_url),
    )?;

    if let Ok(password) = std::env::var("PAYPLUG_PASSWORD") {
        match gateway.authenticate(&config.login, &password).await {
            AuthOutcome::Keys(keys) => {
                let mut kinds: Vec<_> = keys.keys().cloned().collect();
                kinds.sort();
                tracing::info!("key exchange returned: {}", kinds.join(", "));
            }
            AuthOutcome::AuthFailed => tracing::warn!("key exchange failed for {}", config.login),
        }
    }

    tracing::info!(
        "mode {} connected={}",
        config.mode.as_str(),
        config.is_connected()
    );

    let Some(payment_id) = std::env::args().nth(1) else {
        return Ok(());
    };

    let payment = gateway
        .fetch_payment(&payment_id, &config)
        .await
        .with_context(|| format!("fetching payment {payment_id}"))?;
    println!("{}", serde_json::to_string_pretty(&payment)?);
    println!("status: {:?}", payment.status());

    for refund in gateway.list_refunds(&payment_id, &config).await? {
        println!("refund {} amount={} status={:?}", refund.id, refund.amount, refund.status);
    }

    let max = gateway.compute_max_refund_amount(&payment_id, &config).await?;
    println!("max refundable: {max}");
    Ok(())
}
