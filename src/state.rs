use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::TokenService,
    config::AppConfig,
    integrations::{HttpSocialVerifier, PayPalClient, PaymentGateway, SocialVerifier},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub payments: Arc<dyn PaymentGateway>,
    pub social: Arc<dyn SocialVerifier>,
}

impl AppState {
    /// Wires the production collaborators from config.
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        let payments = Arc::new(PayPalClient::new(
            config.payment_mode,
            config.paypal_client_id.clone(),
            config.paypal_secret_key.clone(),
        ));
        let social = Arc::new(HttpSocialVerifier::new(config.google_client_id.clone()));
        Self::with_integrations(orm, config, payments, social)
    }

    pub fn with_integrations(
        orm: DatabaseConnection,
        config: AppConfig,
        payments: Arc<dyn PaymentGateway>,
        social: Arc<dyn SocialVerifier>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiry_hours);
        Self {
            orm,
            config: Arc::new(config),
            tokens,
            payments,
            social,
        }
    }
}
