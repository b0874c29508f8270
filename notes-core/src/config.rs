//! Backend configuration.
//!
//! Built once at process start and handed to the document store, never read
//! from a global.

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_USER_ID: &str = "user-001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Who the front end acts as. Needed even when no backend is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Stamped on created notes.
    pub user_id: String,
    /// Filter listings by `user_id` instead of returning the whole collection.
    pub scope: bool,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.into(),
            scope: false,
        }
    }
}

impl Owner {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Read `NOTES_USER_ID` and `NOTES_SCOPE_TO_OWNER`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut owner = Self::default();
        if let Some(user_id) = present(&lookup, "NOTES_USER_ID") {
            owner.user_id = user_id;
        }
        if let Some(flag) = present(&lookup, "NOTES_SCOPE_TO_OWNER") {
            owner.scope = parse_flag(&flag).ok_or_else(|| {
                Error::InvalidConfig(format!("NOTES_SCOPE_TO_OWNER: expected a boolean, got {flag:?}"))
            })?;
        }
        Ok(owner)
    }

    /// Owner filter to apply when listing, if scoping is enabled.
    pub fn filter(&self) -> Option<&str> {
        self.scope.then_some(self.user_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API root, e.g. `https://cloud.appwrite.io/v1` (no trailing slash).
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: Option<String>,
    pub owner: Owner,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            api_key: None,
            owner: Owner::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// Front ends layer their command-line flags over the environment here,
    /// so every source goes through the same validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| present(&lookup, key).ok_or(Error::MissingConfig(key));

        let mut config = Self::new(
            required("APPWRITE_ENDPOINT")?,
            required("APPWRITE_PROJECT_ID")?,
            required("APPWRITE_DATABASE_ID")?,
            required("APPWRITE_COLLECTION_ID")?,
        );
        config.api_key = present(&lookup, "APPWRITE_API_KEY");
        config.owner = Owner::from_lookup(&lookup)?;

        if let Some(secs) = present(&lookup, "NOTES_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().ok().filter(|&s| s > 0).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "NOTES_TIMEOUT_SECS: expected a positive number of seconds, got {secs:?}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub(crate) fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Blank values count as unset.
fn present<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
