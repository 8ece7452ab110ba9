pub mod contracts;
pub mod profile;
