//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse servlet-style URL patterns from configuration
//! - Match request paths against a pattern
//! - Extract the path suffix that is appended to the upstream target
//!
//! # Pattern Syntax
//! - `/api/a/*`: prefix mapping, matches `/api/a` and everything below it
//! - `/*` or `/`: catch-all, matches every path
//! - `/status`: exact mapping, matches only `/status`
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefixes match on segment boundaries (`/api/a/*` does not match `/api/ab`)
//! - No regex to guarantee O(n) matching

use std::fmt;

/// Reason a pattern was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    Empty,
    MissingLeadingSlash,
    MisplacedWildcard,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "pattern is empty"),
            PatternError::MissingLeadingSlash => write!(f, "pattern must start with `/`"),
            PatternError::MisplacedWildcard => {
                write!(f, "`*` is only allowed as a trailing `/*`")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A compiled URL pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPattern {
    /// Matches the given path only.
    Exact(String),
    /// Matches the prefix and everything below it. The prefix has no
    /// trailing slash; the empty prefix matches every path.
    Prefix(String),
}

impl PathPattern {
    /// Parse a configured pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash);
        }

        if pattern == "/" {
            return Ok(PathPattern::Prefix(String::new()));
        }

        let (base, wildcard) = match pattern.strip_suffix("/*") {
            Some(base) => (base, true),
            None => (pattern, false),
        };
        if base.contains('*') {
            return Err(PatternError::MisplacedWildcard);
        }

        if wildcard {
            Ok(PathPattern::Prefix(base.trim_end_matches('/').to_string()))
        } else {
            Ok(PathPattern::Exact(base.to_string()))
        }
    }

    /// Returns the part of `path` after the mapped portion, or `None` if
    /// the path does not match.
    pub fn path_info<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Exact(exact) => (path == exact).then_some(""),
            PathPattern::Prefix(prefix) => {
                let rest = path.strip_prefix(prefix.as_str())?;
                (rest.is_empty() || rest.starts_with('/')).then_some(rest)
            }
        }
    }

    /// The path portion consumed by this mapping (the servlet path).
    ///
    /// Used as the cookie path for rewritten `Set-Cookie` headers.
    pub fn mount_path(&self) -> &str {
        match self {
            PathPattern::Exact(path) => path,
            PathPattern::Prefix(prefix) if prefix.is_empty() => "/",
            PathPattern::Prefix(prefix) => prefix,
        }
    }

    /// True for `/*` and `/`.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, PathPattern::Prefix(prefix) if prefix.is_empty())
    }

    /// True if some path is matched by both patterns.
    pub fn overlaps(&self, other: &PathPattern) -> bool {
        match (self, other) {
            (PathPattern::Exact(a), PathPattern::Exact(b)) => a == b,
            (PathPattern::Exact(path), prefix @ PathPattern::Prefix(_))
            | (prefix @ PathPattern::Prefix(_), PathPattern::Exact(path)) => {
                prefix.path_info(path).is_some()
            }
            (PathPattern::Prefix(a), PathPattern::Prefix(b)) => {
                let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                PathPattern::Prefix(short.clone()).path_info(long).is_some()
            }
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(path) => write!(f, "{path}"),
            PathPattern::Prefix(prefix) => write!(f, "{prefix}/*"),
        }
    }
}
