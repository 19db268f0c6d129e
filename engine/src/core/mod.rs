pub mod log;
pub mod time;

pub use time::{FrameClock, Stepper};
