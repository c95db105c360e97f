pub mod config;
pub mod domain {
    pub mod address;
    pub mod amount;
    pub mod payment;
    pub mod transaction;
}
pub mod error;
pub mod gateways;
pub mod logging;
pub mod mapper;

pub use config::{ClientSettings, GatewayConfig, Mode};
pub use error::{GatewayError, Result};
pub use gateways::payplug::PayplugGateway;
pub use gateways::{AuthOutcome, PaymentGateway};
