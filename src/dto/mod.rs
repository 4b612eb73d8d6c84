pub mod auth;
pub mod catalog;
pub mod leaves;
pub mod manager;
pub mod payments;
pub mod queries;
pub mod reports;
pub mod content;
