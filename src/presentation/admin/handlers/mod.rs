pub mod alerts;
pub mod contracts;
pub mod dashboard;
pub mod drivers;
