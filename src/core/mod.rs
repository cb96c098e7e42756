// Public modules
pub mod api;
pub mod auth;
pub mod config;
pub mod defaults;
pub mod error;
pub mod prompt;
pub mod publish;
pub mod release;
pub mod upload;
pub mod validate;
pub mod workflow;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
