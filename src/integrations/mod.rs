//! Outbound HTTP collaborators. Each one sits behind a trait so handlers and
//! tests only see [`PaymentGateway`] and [`SocialVerifier`].

pub mod paypal;
pub mod social;

pub use paypal::{GatewayOrder, PayPalClient, PaymentGateway, is_valid_order_id};
pub use social::{HttpSocialVerifier, SocialProfile, SocialVerifier};
