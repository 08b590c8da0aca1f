//! tccloud Common Library
//!
//! Error taxonomy, the retry-until-stable executor, composite identity codec
//! and the per-action rate limiter shared by the provider and the CLI.

pub mod error;
pub mod identity;
pub mod ratelimit;
pub mod retry;

// Re-export commonly used types
pub use error::{Error, ErrorClass, Result};
pub use identity::{CompositeId, IdentityLayout, ID_SEPARATOR};
pub use ratelimit::RateLimiter;
pub use retry::{retry, RetryPolicy};

/// tccloud version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
