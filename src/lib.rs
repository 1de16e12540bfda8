pub mod config;
pub mod error;
pub mod net;
pub mod trace;

pub use self::error::{BenchError, Result};
