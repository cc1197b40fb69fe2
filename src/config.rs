//! Remote configuration
//!
//! A [`RemoteConfig`] names the remote endpoint, the credentials used to
//! reach it and an optional root prefix applied to every path. It is
//! validated once when built and never changes afterwards.

use crate::error::{FsError, Result};
use crate::path;
use std::fmt;

/// Login credentials for the remote endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Remote filesystem configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    endpoint: String,
    credentials: Credentials,
    root: Option<String>,
}

impl RemoteConfig {
    /// Build a configuration without a root prefix
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if the endpoint or login is empty.
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(FsError::Config("endpoint must not be empty".to_string()));
        }
        if credentials.login.is_empty() {
            return Err(FsError::Config("credentials.login must not be empty".to_string()));
        }
        Ok(Self {
            endpoint,
            credentials,
            root: None,
        })
    }

    /// Set the path prefix prepended to all remote operations
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if the root is not a valid path.
    pub fn with_root(mut self, root: &str) -> Result<Self> {
        let root = path::normalize(root)
            .map_err(|e| FsError::Config(format!("invalid root: {e}")))?;
        self.root = (!path::is_root(&root)).then_some(root);
        Ok(self)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Normalized root prefix, `None` when operations address `/` directly
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Endpoint scheme (`http`, `file`, `memory`, ...), lowercased
    #[must_use]
    pub fn scheme(&self) -> Option<String> {
        self.endpoint
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
    }

    /// Endpoint with its scheme stripped
    #[must_use]
    pub fn location(&self) -> &str {
        self.endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(_, rest)| rest)
    }
}
