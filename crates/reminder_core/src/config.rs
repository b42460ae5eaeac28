//! Store namespace configuration.
//!
//! # Invariants
//! - The reminders collection path is fixed per app id; the optional
//!   namespace only prefixes it.
//! - Path segments never contain `/` themselves.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// App id used when none is configured.
pub const DEFAULT_APP_ID: &str = "default-app-id";
/// Final path segment of the reminders collection.
pub const REMINDERS_COLLECTION: &str = "reminders";

/// Where reminders live inside the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    app_id: String,
    namespace: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            namespace: None,
        }
    }
}

impl StoreConfig {
    /// Builds a config for `app_id`; blank input falls back to [`DEFAULT_APP_ID`].
    ///
    /// # Errors
    /// - `ConfigError::InvalidAppId` when `app_id` contains `/`.
    pub fn new(app_id: &str) -> Result<Self, ConfigError> {
        let trimmed = app_id.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.contains('/') {
            return Err(ConfigError::InvalidAppId(trimmed.to_string()));
        }
        Ok(Self {
            app_id: trimmed.to_string(),
            namespace: None,
        })
    }

    /// Prefixes the collection path with `namespace`.
    ///
    /// Leading/trailing slashes are stripped; a blank namespace clears it.
    pub fn with_namespace(mut self, namespace: &str) -> Result<Self, ConfigError> {
        let trimmed = namespace.trim().trim_matches('/');
        if trimmed.is_empty() {
            self.namespace = None;
            return Ok(self);
        }
        if trimmed.split('/').any(|segment| segment.trim().is_empty()) {
            return Err(ConfigError::InvalidNamespace(namespace.to_string()));
        }
        self.namespace = Some(trimmed.to_string());
        Ok(self)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `{namespace}/{app_id}/reminders`, or `{app_id}/reminders` without namespace.
    pub fn collection_path(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}/{}/{REMINDERS_COLLECTION}", self.app_id),
            None => format!("{}/{REMINDERS_COLLECTION}", self.app_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidAppId(String),
    InvalidNamespace(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAppId(value) => write!(f, "app id must not contain `/`: `{value}`"),
            Self::InvalidNamespace(value) => {
                write!(f, "namespace has an empty path segment: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}
