//! Small terminal application for logging how you feel throughout the day.
//! Every feeling you pick from a fixed palette is stored locally with a timestamp, and the
//! screen shows what you logged today, most recent first.
//!

pub mod cli;
pub mod feelings;
pub mod storage;
pub mod utils;
pub mod view;
