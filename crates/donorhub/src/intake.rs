//! Donor application intake.
//!
//! This module validates and appends donor applications, enforcing the
//! one-application-per-identity rule at insertion time.

use tracing::{debug, info};

use crate::donor::{account_identity, next_application_id, ApplicationForm, DonorApplication};
use crate::error::{Error, Result};
use crate::profile::UserProfile;
use crate::store::{Store, DONORS_NAMESPACE};

/// Application intake over an explicitly injected store.
///
/// Uniqueness is only checked here, between the read and the write of one
/// submission; the store itself carries no constraint. Two processes
/// submitting concurrently can both pass the check before either writes,
/// a known race that is documented rather than solved.
#[derive(Debug)]
pub struct Intake<'a> {
    store: &'a Store,
}

impl<'a> Intake<'a> {
    /// Create an intake bound to the given store.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Submit a donor application for an authenticated account.
    ///
    /// Reads the current registry, rejects duplicates by account id or
    /// email, then appends the new application and writes the registry
    /// back. A rejected call leaves the stored list untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] if the account is missing its
    ///   identity fields.
    /// - [`Error::Validation`] if a required form field is empty.
    /// - [`Error::DuplicateApplication`] if this identity already applied.
    /// - A store error if the write-back fails; the application was not
    ///   persisted.
    pub fn submit(
        &self,
        account: &UserProfile,
        form: &ApplicationForm,
    ) -> Result<DonorApplication> {
        let (user_id, name, email) = account_identity(account)?;
        validate_form(form)?;

        let mut donors: Vec<DonorApplication> = self.store.get_or_default(DONORS_NAMESPACE);

        if donors.iter().any(|d| d.matches_identity(&user_id, &email)) {
            debug!("Rejecting duplicate application for user {user_id}");
            return Err(Error::duplicate(user_id));
        }

        let application =
            DonorApplication::new(next_application_id(&donors), user_id, name, email, form);

        donors.push(application.clone());
        self.store.set(DONORS_NAMESPACE, &donors)?;

        info!(
            "Recorded donor application {} ({} {})",
            application.id, application.blood_type, application.location
        );
        Ok(application)
    }
}

/// Check the applicant-supplied fields a submission requires.
fn validate_form(form: &ApplicationForm) -> Result<()> {
    if form.location.trim().is_empty() {
        return Err(Error::validation("location", "Location is required"));
    }
    if form.contact.trim().is_empty() {
        return Err(Error::validation("contact", "Contact info is required"));
    }
    Ok(())
}
