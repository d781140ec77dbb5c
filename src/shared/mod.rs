pub mod config;
pub mod error;

pub use config::{AppConfig, CommitPolicy};
pub use error::{AppError, Result};
