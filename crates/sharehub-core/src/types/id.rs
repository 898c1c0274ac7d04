//! User identifier newtype.
//!
//! User identities are the login names that root each user's namespace
//! (`/<user>/files/...`), so they are strings rather than UUIDs. When the
//! `sqlx` feature is enabled, [`UserId`] maps transparently to `TEXT`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identity of a user owning or receiving shares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct UserId(String);

impl UserId {
    /// Create a user identifier, rejecting values that cannot root a path.
    pub fn new(id: impl Into<String>) -> Result<Self, AppError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AppError::validation("User id must not be empty"));
        }
        if id.contains('/') {
            return Err(AppError::validation(format!(
                "User id '{id}' must not contain '/'"
            )));
        }
        if id == "." || id == ".." {
            return Err(AppError::validation(format!("User id '{id}' is reserved")));
        }
        Ok(Self(id))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the user's storage root, e.g. `/alice/files`.
    pub fn files_root(&self) -> String {
        format!("/{}/files", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
