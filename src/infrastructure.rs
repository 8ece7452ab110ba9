pub mod auth;
pub mod db;
pub mod mailer;
pub mod pdf;
pub mod repositories;
pub mod scheduler;
pub mod state;
pub mod storage;
