pub mod alerts;
pub mod artifacts;
pub mod auth;
pub mod health;
