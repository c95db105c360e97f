#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackRoute {
    Error,
    Return,
    Notify,
}

impl CallbackRoute {
    pub fn segment(&self) -> &'static str {
        match self {
            CallbackRoute::Error => "error",
            CallbackRoute::Return => "return",
            CallbackRoute::Notify => "notify",
        }
    }
}

/// Produces callback URLs for the three payment callback routes.
pub trait UrlGenerator: Send + Sync {
    fn absolute_url(&self, route: CallbackRoute, params: &[(&str, &str)]) -> String;
    fn absolute_path(&self, route: CallbackRoute, params: &[(&str, &str)]) -> String;
}

/// Generator rooted at a fixed public base URL:
/// `{base}/payment/callback/{route}/{param}...`, params in the given order.
#[derive(Debug, Clone)]
pub struct StaticUrlGenerator {
    base_url: String,
}

impl StaticUrlGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl UrlGenerator for StaticUrlGenerator {
    fn absolute_url(&self, route: CallbackRoute, params: &[(&str, &str)]) -> String {
        format!("{}{}", self.base_url, self.absolute_path(route, params))
    }

    fn absolute_path(&self, route: CallbackRoute, params: &[(&str, &str)]) -> String {
        params.iter().fold(
            format!("/payment/callback/{}", route.segment()),
            |mut path, (_, value)| {
                path.push('/');
                path.push_str(&encode_segment(value));
                path
            },
        )
    }
}

fn encode_segment(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}
