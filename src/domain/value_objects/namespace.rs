//! Deployment Namespace Value Object
//!
//! The operator-chosen identifier that seeds every derived name: the stack,
//! both hosts, the archive key and the parameter paths.

use thiserror::Error;

/// Longest DNS label allowed by RFC 1035
pub const MAX_LABEL_LEN: usize = 63;

/// Longest namespace whose `<namespace>-preview` host label still fits in
/// one DNS label
pub const MAX_NAMESPACE_LEN: usize = MAX_LABEL_LEN - "-preview".len();

/// Reasons a namespace cannot be used as a DNS label
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("must not be empty")]
    Empty,

    #[error("must be at most {MAX_NAMESPACE_LEN} characters (got {0})")]
    TooLong(usize),

    #[error("must only contain lowercase letters, digits and hyphens (found '{0}')")]
    InvalidChar(char),

    #[error("must not start or end with a hyphen")]
    EdgeHyphen,
}

/// Validated namespace. Interpolated verbatim into derived names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentNamespace(String);

impl DeploymentNamespace {
    /// Validate `raw` as a single DNS label.
    ///
    /// The value is never rewritten; anything that would need sanitizing is
    /// rejected instead.
    pub fn parse(raw: &str) -> Result<Self, NamespaceError> {
        if raw.is_empty() {
            return Err(NamespaceError::Empty);
        }
        if raw.len() > MAX_NAMESPACE_LEN {
            return Err(NamespaceError::TooLong(raw.len()));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(NamespaceError::InvalidChar(c));
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(NamespaceError::EdgeHyphen);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeploymentNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeploymentNamespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
