//! User identity resolution for process snapshots.
//!
//! Snapshot files carry numeric uids. The `/tasks` payload shows user names,
//! resolved through an [`IdentityResolver`].

use nix::unistd::{Uid, User};
use std::collections::HashMap;

/// Errors raised while querying the user database.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("user lookup for uid {uid} failed: {source}")]
    Lookup {
        uid: u32,
        #[source]
        source: nix::Error,
    },
}

/// Resolves numeric user ids to user names.
pub trait IdentityResolver: Send + Sync {
    /// Returns `Ok(None)` when the uid has no entry.
    fn user_name(&self, uid: u32) -> Result<Option<String>, IdentityError>;
}

/// Resolver backed by the host user database (`getpwuid_r`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdentityResolver;

impl IdentityResolver for SystemIdentityResolver {
    fn user_name(&self, uid: u32) -> Result<Option<String>, IdentityError> {
        User::from_uid(Uid::from_raw(uid))
            .map(|user| user.map(|u| u.name))
            .map_err(|source| IdentityError::Lookup { uid, source })
    }
}

/// Fixed uid → name table. Useful for tests and for hosts without NSS access.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityResolver {
    names: HashMap<u32, String>,
}

impl StaticIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, uid: u32, name: impl Into<String>) -> Self {
        self.names.insert(uid, name.into());
        self
    }
}

impl IdentityResolver for StaticIdentityResolver {
    fn user_name(&self, uid: u32) -> Result<Option<String>, IdentityError> {
        Ok(self.names.get(&uid).cloned())
    }
}
