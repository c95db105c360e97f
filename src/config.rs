use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const LOGIN: &str = "login";
pub const API_KEY_TEST: &str = "api_key_test";
pub const API_KEY_LIVE: &str = "api_key_live";
pub const DEBUG_MODE: &str = "debug_mode";
pub const MODE: &str = "mode";

/// Processor environment. Anything other than exactly `live` falls back to `Test`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    #[default]
    Test,
}

impl Mode {
    pub fn parse(value: &str) -> Self {
        if value == "live" {
            Mode::Live
        } else {
            Mode::Test
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Live => "LIVE",
            Mode::Test => "TEST",
        }
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Mode::parse).unwrap_or_default())
    }
}

/// Merchant credentials for one payment method, loaded per call site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub api_key_test: String,
    #[serde(default)]
    pub api_key_live: String,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default)]
    pub mode: Mode,
}

/// Secret key selected for the configured mode. May be empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

pub fn resolve_secret_key(config: &GatewayConfig) -> SecretKey {
    match config.mode {
        Mode::Live => SecretKey(config.api_key_live.clone()),
        Mode::Test => SecretKey(config.api_key_test.clone()),
    }
}

pub fn is_connected(config: &GatewayConfig) -> bool {
    !config.api_key_live.is_empty() || !config.api_key_test.is_empty()
}

impl GatewayConfig {
    pub fn secret_key(&self) -> SecretKey {
        resolve_secret_key(self)
    }

    pub fn is_connected(&self) -> bool {
        is_connected(self)
    }

    /// Builds a config from a loosely typed parameter bag; missing keys read as empty.
    pub fn from_parameters(params: &Map<String, Value>) -> Self {
        Self {
            login: string_param(params, LOGIN),
            api_key_test: string_param(params, API_KEY_TEST),
            api_key_live: string_param(params, API_KEY_LIVE),
            debug_mode: params.get(DEBUG_MODE).map(truthy).unwrap_or(false),
            mode: Mode::parse(&string_param(params, MODE)),
        }
    }

    pub fn from_env() -> Self {
        Self {
            login: std::env::var("PAYPLUG_LOGIN").unwrap_or_default(),
            api_key_test: std::env::var("PAYPLUG_API_KEY_TEST").unwrap_or_default(),
            api_key_live: std::env::var("PAYPLUG_API_KEY_LIVE").unwrap_or_default(),
            debug_mode: std::env::var("PAYPLUG_DEBUG_MODE")
                .map(|v| truthy(&Value::String(v)))
                .unwrap_or(false),
            mode: Mode::parse(&std::env::var("PAYPLUG_MODE").unwrap_or_default()),
        }
    }
}

fn string_param(params: &Map<String, Value>, key: &str) -> String {
    match params.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

/// Loose boolean cast: only `""` and `"0"` are false among strings.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !matches!(s.as_str(), "" | "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

/// Transport settings shared by every call of a client.
#[derive(Clone, Debug)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_version: String,
    pub timeout_ms: u64,
    pub notification_host: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.payplug.com".to_string(),
            api_version: "2019-08-06".to_string(),
            timeout_ms: 10_000,
            notification_host: None,
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("PAYPLUG_BASE_URL").unwrap_or(defaults.base_url),
            api_version: std::env::var("PAYPLUG_API_VERSION").unwrap_or(defaults.api_version),
            timeout_ms: parse_timeout_ms(std::env::var("PAYPLUG_TIMEOUT_MS").ok())
                .unwrap_or(defaults.timeout_ms),
            notification_host: std::env::var("PAYPLUG_NOTIFICATION_HOST")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A zero timeout would fail every request, so it reads as unset.
fn parse_timeout_ms(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(mode: Mode, test: &str, live: &str) -> GatewayConfig {
        GatewayConfig {
            login: "merchant@example.com".to_string(),
            api_key_test: test.to_string(),
            api_key_live: live.to_string(),
            debug_mode: false,
            mode,
        }
    }

    #[test]
    fn live_mode_picks_live_key() {
        let cfg = config(Mode::Live, "sk_test_1", "sk_live_1");
        assert_eq!(resolve_secret_key(&cfg).expose(), "sk_live_1");
    }

    #[test]
    fn test_and_unknown_modes_pick_test_key() {
        let cfg = config(Mode::Test, "sk_test_1", "sk_live_1");
        assert_eq!(resolve_secret_key(&cfg).expose(), "sk_test_1");

        let cfg = config(Mode::parse("sandbox"), "sk_test_1", "sk_live_1");
        assert_eq!(cfg.mode, Mode::Test);
        assert_eq!(cfg.secret_key().expose(), "sk_test_1");
    }

    #[test]
    fn empty_key_is_returned_as_is() {
        let cfg = config(Mode::Live, "sk_test_1", "");
        assert!(resolve_secret_key(&cfg).is_empty());
    }

    #[test]
    fn connected_iff_any_key_present() {
        assert!(!is_connected(&config(Mode::Test, "", "")));
        assert!(is_connected(&config(Mode::Test, "t", "")));
        assert!(is_connected(&config(Mode::Test, "", "l")));
        assert!(is_connected(&config(Mode::Test, "t", "l")));
    }

    #[test]
    fn unknown_or_missing_mode_deserializes_to_test() {
        let cfg: GatewayConfig =
            serde_json::from_value(json!({"api_key_live": "l", "mode": "live"})).unwrap();
        assert_eq!(cfg.mode, Mode::Live);

        let cfg: GatewayConfig = serde_json::from_value(json!({"mode": "whatever"})).unwrap();
        assert_eq!(cfg.mode, Mode::Test);

        let cfg: GatewayConfig = serde_json::from_value(json!({"mode": null})).unwrap();
        assert_eq!(cfg.mode, Mode::Test);
    }

    #[test]
    fn live_mode_requires_exact_value() {
        for raw in ["LIVE", "Live", " live ", "live\n"] {
            let cfg: GatewayConfig = serde_json::from_value(
                json!({"api_key_test": "t", "api_key_live": "l", "mode": raw}),
            )
            .unwrap();
            assert_eq!(cfg.mode, Mode::Test, "{raw:?}");
            assert_eq!(cfg.secret_key().expose(), "t");
        }
    }

    #[test]
    fn debug_mode_cast_treats_only_empty_and_zero_as_false() {
        for (raw, expected) in [
            (json!(""), false),
            (json!("0"), false),
            (json!(0), false),
            (json!(null), false),
            (json!(false), false),
            (json!("false"), true),
            (json!(" 0"), true),
            (json!("1"), true),
            (json!(true), true),
        ] {
            let params = json!({"debug_mode": raw.clone()});
            let cfg = GatewayConfig::from_parameters(params.as_object().unwrap());
            assert_eq!(cfg.debug_mode, expected, "{raw}");
        }
    }

    #[test]
    fn zero_or_garbage_timeout_falls_back() {
        assert_eq!(parse_timeout_ms(Some("0".to_string())), None);
        assert_eq!(parse_timeout_ms(Some("soon".to_string())), None);
        assert_eq!(parse_timeout_ms(None), None);
        assert_eq!(parse_timeout_ms(Some("2500".to_string())), Some(2500));
    }

    #[test]
    fn parameter_bag_casts_loose_values() {
        let params = json!({
            "login": "merchant@example.com",
            "api_key_test": "sk_test_1",
            "debug_mode": "1",
            "mode": "live",
        });
        let cfg = GatewayConfig::from_parameters(params.as_object().unwrap());
        assert_eq!(cfg.login, "merchant@example.com");
        assert_eq!(cfg.api_key_live, "");
        assert!(cfg.debug_mode);
        assert_eq!(cfg.mode, Mode::Live);
        assert!(cfg.is_connected());
    }

    #[test]
    fn secret_key_debug_is_redacted() {
        let cfg = config(Mode::Test, "sk_test_secret", "");
        assert_eq!(format!("{:?}", cfg.secret_key()), "SecretKey(***)");
    }
}
