use std::env;

use anyhow::bail;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/globelens";
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:3001,https://www.sandbox.paypal.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    Sandbox,
    Live,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Sandbox => "sandbox",
            PaymentMode::Live => "live",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub paypal_client_id: String,
    pub paypal_secret_key: String,
    pub payment_mode: PaymentMode,
    pub google_client_id: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub reset_token_in_response: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = ["JWT_SECRET", "PAYPAL_CLIENT_ID", "PAYPAL_SECRET_KEY"]
            .into_iter()
            .filter(|key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let payment_mode = match get("PAYPAL_MODE").as_deref() {
            None | Some("sandbox") => PaymentMode::Sandbox,
            Some("live") => PaymentMode::Live,
            Some(other) => bail!("PAYPAL_MODE must be `sandbox` or `live`, got `{other}`"),
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: get("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: get("APP_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8848),
            jwt_secret: get("JWT_SECRET").unwrap_or_default(),
            jwt_expiry_hours: get("JWT_EXPIRY_HOURS")
                .and_then(|h| h.parse::<i64>().ok())
                .filter(|h| *h > 0)
                .unwrap_or(24),
            paypal_client_id: get("PAYPAL_CLIENT_ID").unwrap_or_default(),
            paypal_secret_key: get("PAYPAL_SECRET_KEY").unwrap_or_default(),
            payment_mode,
            google_client_id: get("GOOGLE_CLIENT_ID"),
            cors_allowed_origins,
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .and_then(|b| b.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            reset_token_in_response: get("RESET_TOKEN_IN_RESPONSE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_required_vars_are_all_reported() {
        let err = AppConfig::from_lookup(lookup(&[("PAYPAL_CLIENT_ID", "id")])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("JWT_SECRET"));
        assert!(msg.contains("PAYPAL_SECRET_KEY"));
        assert!(!msg.contains("PAYPAL_CLIENT_ID"));
    }

    #[test]
    fn defaults_apply_for_optional_vars() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "secret"),
            ("PAYPAL_CLIENT_ID", "id"),
            ("PAYPAL_SECRET_KEY", "key"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8848);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.payment_mode, PaymentMode::Sandbox);
        assert_eq!(config.jwt_expiry_hours, 24);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.cors_allowed_origins.len(), 3);
        assert!(!config.reset_token_in_response);
        assert!(config.google_client_id.is_none());
    }

    #[test]
    fn rejects_unknown_payment_mode() {
        let result = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "secret"),
            ("PAYPAL_CLIENT_ID", "id"),
            ("PAYPAL_SECRET_KEY", "key"),
            ("PAYPAL_MODE", "production"),
        ]));
        assert!(result.is_err());
    }
}
