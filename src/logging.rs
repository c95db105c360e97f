use crate::config::GatewayConfig;
use serde::Serialize;
use serde_json::Value;

const MASKED_FIELDS: &[&str] = &[
    "email",
    "first_name",
    "last_name",
    "address1",
    "address2",
    "postcode",
    "city",
    "secret_key",
    "password",
    "live",
    "test",
];

/// Debug logger owned by a single gateway call.
///
/// Each call builds its own handle from its config, so two calls running with
/// different `debug_mode` values never observe each other's setting.
#[derive(Debug, Clone, Default)]
pub struct GatewayLogger {
    debug_mode: bool,
}

impl GatewayLogger {
    pub fn for_config(config: &GatewayConfig) -> Self {
        Self {
            debug_mode: config.debug_mode,
        }
    }

    pub fn set_debug_mode(&mut self, debug_mode: bool) {
        self.debug_mode = debug_mode;
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn debug(&self, message: &str) {
        if self.debug_mode {
            tracing::debug!(target: "payplug", "{}", message);
        }
    }

    pub fn anonymize_and_json_encode<T: Serialize>(&self, payload: &T) -> String {
        match serde_json::to_value(payload) {
            Ok(mut value) => {
                anonymize(&mut value);
                value.to_string()
            }
            Err(e) => format!("<unserializable payload: {e}>"),
        }
    }
}

fn anonymize(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if MASKED_FIELDS.contains(&key.as_str()) {
                    mask(v);
                } else {
                    anonymize(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(anonymize),
        _ => {}
    }
}

fn mask(value: &mut Value) {
    match value {
        Value::String(s) => {
            let masked: String = s
                .chars()
                .enumerate()
                .map(|(i, c)| if i == 0 { c } else { '*' })
                .collect();
            *s = masked;
        }
        Value::Object(_) | Value::Array(_) => anonymize(value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_personal_fields_recursively() {
        let logger = GatewayLogger::default();
        let payload = json!({
            "amount": 1999,
            "billing": {"email": "jane@example.com", "first_name": "Jane", "country": "FR"},
            "shipping": {},
        });
        let encoded = logger.anonymize_and_json_encode(&payload);
        let out: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(out["amount"], 1999);
        assert_eq!(out["billing"]["email"], format!("j{}", "*".repeat(15)));
        assert_eq!(out["billing"]["first_name"], "J***");
        assert_eq!(out["billing"]["country"], "FR");
    }

    #[test]
    fn masks_nested_key_maps() {
        let logger = GatewayLogger::default();
        let encoded =
            logger.anonymize_and_json_encode(&json!({"secret_keys": {"test": "sk_test_abc"}}));
        assert!(!encoded.contains("sk_test_abc"));
    }

    #[test]
    fn debug_mode_follows_config() {
        let cfg = GatewayConfig {
            debug_mode: true,
            ..GatewayConfig::default()
        };
        let mut logger = GatewayLogger::for_config(&cfg);
        assert!(logger.is_debug_mode());
        logger.set_debug_mode(false);
        assert!(!logger.is_debug_mode());
        assert!(GatewayLogger::for_config(&cfg).is_debug_mode());
    }
}
