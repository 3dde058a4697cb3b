//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → ProxySection::definitions() → ProxyDefinition map for the registrar
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod definition;
pub mod loader;
pub mod schema;
pub mod validation;

pub use definition::ProxyDefinition;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ForwardOptions, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, ProxySection,
    ServerConfig, TimeoutConfig, TlsConfig,
};
pub use validation::ValidationError;
