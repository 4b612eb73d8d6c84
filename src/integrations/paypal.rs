use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::{config::PaymentMode, error::AppError};

const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";
const LIVE_BASE_URL: &str = "https://api-m.paypal.com";

/// The parts of a gateway order the payment flow relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub status: String,
    pub amount: Option<f64>,
    pub payer_email: Option<String>,
}

impl GatewayOrder {
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

/// Gateway order ids are interpolated into a URL path, so only
/// `[A-Za-z0-9-]` is accepted.
pub fn is_valid_order_id(order_id: &str) -> bool {
    !order_id.is_empty()
        && order_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, AppError>;
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
    payer: Option<Payer>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    amount: Option<Amount>,
}

#[derive(Debug, Deserialize)]
struct Amount {
    value: String,
}

#[derive(Debug, Deserialize)]
struct Payer {
    email_address: Option<String>,
}

impl From<OrderResponse> for GatewayOrder {
    fn from(order: OrderResponse) -> Self {
        let amount = order
            .purchase_units
            .first()
            .and_then(|unit| unit.amount.as_ref())
            .and_then(|amount| amount.value.parse::<f64>().ok());
        GatewayOrder {
            id: order.id,
            status: order.status,
            amount,
            payer_email: order.payer.and_then(|p| p.email_address),
        }
    }
}

/// PayPal Orders v2 client using OAuth2 client credentials.
pub struct PayPalClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl PayPalClient {
    pub fn new(mode: PaymentMode, client_id: String, secret: String) -> Self {
        let base_url = match mode {
            PaymentMode::Sandbox => SANDBOX_BASE_URL,
            PaymentMode::Live => LIVE_BASE_URL,
        };
        Self::with_base_url(base_url.to_string(), client_id, secret)
    }

    pub fn with_base_url(base_url: String, client_id: String, secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            client_id,
            secret,
        }
    }

    async fn access_token(&self) -> Result<String, AppError> {
        let resp = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AppError::Gateway(format!(
                "token request failed with status {}",
                resp.status()
            )));
        }

        let token: AccessTokenResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PayPalClient {
    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, AppError> {
        if !is_valid_order_id(order_id) {
            return Err(AppError::validation("Invalid payment data"));
        }
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(format!("{}/v2/checkout/orders/{}", self.base_url, order_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        match resp.status() {
            status if status == reqwest::StatusCode::NOT_FOUND => {
                return Err(AppError::PaymentIncomplete(
                    "Payment not completed".to_string(),
                ));
            }
            status if !status.is_success() => {
                return Err(AppError::Gateway(format!(
                    "order lookup failed with status {status}"
                )));
            }
            _ => {}
        }

        let order: OrderResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;
        tracing::debug!(order_id = %order.id, status = %order.status, "gateway order fetched");
        Ok(order.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_completed_order() {
        let raw = serde_json::json!({
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "payer": { "email_address": "buyer@example.com" },
            "purchase_units": [{ "amount": { "currency_code": "USD", "value": "149.99" } }]
        });
        let order: GatewayOrder = serde_json::from_value::<OrderResponse>(raw).unwrap().into();

        assert!(order.is_completed());
        assert_eq!(order.amount, Some(149.99));
        assert_eq!(order.payer_email.as_deref(), Some("buyer@example.com"));
    }

    #[test]
    fn order_ids_stay_in_one_path_segment() {
        assert!(is_valid_order_id("5O190127TN364715T"));
        assert!(is_valid_order_id("ORDER-1"));
        assert!(!is_valid_order_id(""));
        assert!(!is_valid_order_id("../v1/oauth2/token"));
        assert!(!is_valid_order_id("ABC/capture"));
        assert!(!is_valid_order_id("ABC?x=1"));
    }

    #[tokio::test]
    async fn client_refuses_path_breaking_ids_before_any_request() {
        let client = PayPalClient::with_base_url(
            "http://127.0.0.1:9".to_string(),
            "id".to_string(),
            "secret".to_string(),
        );
        let err = client.fetch_order("../../v1/identity").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn tolerates_missing_units() {
        let raw = serde_json::json!({ "id": "X", "status": "APPROVED" });
        let order: GatewayOrder = serde_json::from_value::<OrderResponse>(raw).unwrap().into();

        assert!(!order.is_completed());
        assert_eq!(order.amount, None);
    }
}
