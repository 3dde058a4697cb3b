//! Validated proxy definitions.

use crate::config::schema::ForwardOptions;

/// One entry of `proxy.servers`, with required fields checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDefinition {
    /// Key of the entry in the configuration map.
    pub key: String,

    /// URL path pattern.
    pub path: String,

    /// Target base URL, unparsed. Syntax is checked at registration.
    pub target: String,

    /// Optional display name.
    pub name: Option<String>,

    /// Forwarding options.
    pub options: ForwardOptions,
}

impl ProxyDefinition {
    /// Create a definition with default forwarding options.
    pub fn new(
        key: impl Into<String>,
        path: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            target: target.into(),
            name: None,
            options: ForwardOptions::default(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the forwarding options.
    pub fn with_options(mut self, options: ForwardOptions) -> Self {
        self.options = options;
        self
    }

    /// Name used for logging and identification; falls back to the key.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => &self.key,
        }
    }
}
