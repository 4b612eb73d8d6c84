pub mod app;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod extract;
pub mod integrations;
pub mod middleware;
pub mod models;
pub mod preview;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod upload;
pub mod validation;
