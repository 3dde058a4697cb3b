//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (bound in-flight requests)
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//!     → Pass to upstream
//! ```

pub mod headers;
pub mod limits;
