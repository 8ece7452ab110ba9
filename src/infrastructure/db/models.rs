pub mod contracts;
pub mod drivers;
