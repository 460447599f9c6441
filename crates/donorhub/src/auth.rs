//! Boundary to the external auth service.
//!
//! The registry never implements authentication; it only needs one
//! asynchronous resolution of "who is the current account" before intake
//! can run. Implementors of [`AuthService`] provide that resolution. No
//! timeout or cancellation semantics are defined: a fetch that never
//! resolves leaves the caller waiting, which is accepted behavior.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::profile::{self, UserProfile};
use crate::store::Store;

/// Source of the authenticated account profile.
///
/// The registry runs single-threaded, so implementations need not be
/// `Send`.
#[async_trait(?Send)]
pub trait AuthService {
    /// Fetch the profile of the currently authenticated account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] when no valid account context
    /// exists; the caller surfaces a login prompt and does not retry.
    async fn get_user_details(&self) -> Result<UserProfile>;

    /// End the current session, discarding any local account state.
    ///
    /// # Errors
    ///
    /// Returns an error if local state could not be cleared.
    async fn logout(&self) -> Result<()>;
}

/// Auth service resolving the identity from the locally stored profile
/// override.
///
/// Stands in for the remote account endpoint in a purely local
/// deployment: the override saved via `profile update` is the session.
#[derive(Debug)]
pub struct StoredProfileAuth<'a> {
    store: &'a Store,
}

impl<'a> StoredProfileAuth<'a> {
    /// Create an auth service over the given store.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

#[async_trait(?Send)]
impl AuthService for StoredProfileAuth<'_> {
    async fn get_user_details(&self) -> Result<UserProfile> {
        profile::load_override(self.store).ok_or(Error::NotAuthenticated)
    }

    async fn logout(&self) -> Result<()> {
        profile::clear_override(self.store)?;
        Ok(())
    }
}
