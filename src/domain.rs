pub mod alerts;
pub mod artifacts;
pub mod auth;
pub mod clock;
pub mod contracts;
pub mod documents;
pub mod drivers;
pub mod notifications;
pub mod signature;
