//! askrelay core library
//!
//! Foundational pieces shared by every askrelay crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Civil time in the configured timezone

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use clock::CivilClock;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
