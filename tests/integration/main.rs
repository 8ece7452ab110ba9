#[path = "../common/mod.rs"]
#[macro_use]
pub mod common;

mod alerts;
mod auth;
mod contracts;
mod drivers;
mod health;
