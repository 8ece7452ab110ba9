pub mod contracts;
pub mod drivers;
pub mod mock;
