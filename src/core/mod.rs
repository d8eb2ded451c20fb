//! Core utilities and common types.

pub mod error;
pub mod record;
pub mod types;

pub use error::{Error, Result};
pub use record::{PasswordMetadata, PasswordRecord};
pub use types::*;
