pub mod alerts;
pub mod auth;
pub mod contracts;
pub mod dashboard;
pub mod documents;
pub mod drivers;
