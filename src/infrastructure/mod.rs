//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod retry;
pub mod shutdown;

pub use retry::RetryPolicy;
pub use shutdown::shutdown_signal;
