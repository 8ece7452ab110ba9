pub mod compose;
pub mod overview;
pub mod run;
pub mod send_one;
