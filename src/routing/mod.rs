//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     ProxyDefinition map
//!     → registrar.rs (parse target URL and pattern, build endpoint)
//!     → router.rs (mount, reject duplicates)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate patterns, extract path suffix)
//!     → Return: matched endpoint or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Any registration failure aborts startup

pub mod endpoint;
pub mod matcher;
pub mod registrar;
pub mod router;

pub use endpoint::{EndpointId, ProxyEndpoint};
pub use matcher::{PathPattern, PatternError};
pub use registrar::{build_endpoint, register, register_all, RegistrationError};
pub use router::{RouteMatch, RouteTable, RoutingTarget};
