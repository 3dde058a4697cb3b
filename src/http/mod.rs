//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, limits)
//!     → proxy.rs (route lookup, forward to upstream)
//!     → request.rs (upstream URL, header preparation)
//!     → response.rs (header rewrite, error mapping)
//!     → cookies.rs (cookie names and paths in both directions)
//!     → Send to client
//! ```

pub mod cookies;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use proxy::Forwarder;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
