#![forbid(unsafe_code)]

pub mod model;
pub mod pacing;
pub mod protocol;
pub mod time;

pub use time::Clock;
