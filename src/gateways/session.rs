use crate::config::{resolve_secret_key, ClientSettings, GatewayConfig, SecretKey};
use crate::error::{GatewayError, Result};
use crate::logging::GatewayLogger;
use serde::de::DeserializeOwned;
use serde::Serialize;

const VERSION_HEADER: &str = "PayPlug-Version";

/// Authenticated handle valid for a single gateway call.
pub struct ApiSession {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    secret_key: SecretKey,
}

impl ApiSession {
    pub fn open(
        client: &reqwest::Client,
        settings: &ClientSettings,
        config: &GatewayConfig,
        logger: &GatewayLogger,
    ) -> Self {
        logger.debug(&format!("Payplug is in {} mode", config.mode.as_str()));
        Self {
            client: client.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
            secret_key: resolve_secret_key(config),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.client.get(format!("{}{}", self.base_url, path));
        self.send(req).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.send(req).await
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let req = req
            .bearer_auth(self.secret_key.expose())
            .header(VERSION_HEADER, &self.api_version);
        decode(req.send().await?).await
    }
}

/// Maps a processor response onto `T`, or `Remote` for any non-2xx status.
pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(GatewayError::Remote {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Processor ids are interpolated into paths, so only plain id characters pass.
pub(crate) fn check_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
