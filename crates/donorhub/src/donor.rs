//! Core donor-registry types.
//!
//! This module defines the fundamental data structures for representing
//! donor applications as they are submitted and stored.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::profile::UserProfile;

/// Format used for `applicationDate` strings (month/day/year, no padding).
///
/// Matches the date shape already present in stored registries, so freshly
/// written entries sort together with legacy ones.
pub const APPLICATION_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// A blood type from the closed set of eight ABO/Rh combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BloodType {
    /// A positive.
    #[serde(rename = "A+")]
    APositive,
    /// A negative.
    #[serde(rename = "A-")]
    ANegative,
    /// B positive.
    #[serde(rename = "B+")]
    BPositive,
    /// B negative.
    #[serde(rename = "B-")]
    BNegative,
    /// AB positive.
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[serde(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[serde(rename = "O+")]
    OPositive,
    /// O negative.
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// All blood types, in the order they are offered to applicants.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::APositive => write!(f, "A+"),
            Self::ANegative => write!(f, "A-"),
            Self::BPositive => write!(f, "B+"),
            Self::BNegative => write!(f, "B-"),
            Self::AbPositive => write!(f, "AB+"),
            Self::AbNegative => write!(f, "AB-"),
            Self::OPositive => write!(f, "O+"),
            Self::ONegative => write!(f, "O-"),
        }
    }
}

impl std::str::FromStr for BloodType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            other => Err(Error::validation(
                "bloodType",
                format!("unknown blood type: {other}"),
            )),
        }
    }
}

/// Review status of a donor application.
///
/// Applications are created as `Pending`; nothing in the registry itself
/// transitions them further.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Accepted into the donor pool.
    Approved,
    /// Declined.
    Rejected,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// The applicant-supplied part of a donor application.
///
/// Name and email are deliberately absent: they are snapshotted from the
/// authenticated account at submission time, never typed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationForm {
    /// The applicant's blood type.
    pub blood_type: BloodType,
    /// Age in years. The 18-65 window is a form hint, not a registry rule.
    pub age: u8,
    /// Free-text city or area.
    pub location: String,
    /// Free-text phone number or email address.
    pub contact: String,
    /// Date of the most recent donation, if any.
    pub last_donation: Option<String>,
}

/// A submitted donor application, pending review.
///
/// Created once by intake and never mutated by the registry thereafter.
/// Field names serialize in the camelCase layout of the stored registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorApplication {
    /// Unique identifier, derived from the submission timestamp.
    pub id: i64,

    /// Identifier of the applying account.
    pub user_id: String,

    /// Applicant name, snapshotted from the account profile.
    pub name: String,

    /// Applicant email, snapshotted from the account profile.
    pub email: String,

    /// The applicant's blood type.
    pub blood_type: BloodType,

    /// Age in years at submission time.
    pub age: u8,

    /// Free-text city or area.
    pub location: String,

    /// Free-text phone number or email address.
    pub contact: String,

    /// Date of the most recent donation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_donation: Option<String>,

    /// Submission date, set at creation and immutable.
    pub application_date: String,

    /// Review status; always `Pending` at creation.
    pub status: ApplicationStatus,
}

impl DonorApplication {
    /// Build a new application from an authenticated account and a form.
    ///
    /// Stamps the application date with today's date and sets the status
    /// to `Pending`. The caller supplies a process-unique `id`.
    #[must_use]
    pub fn new(id: i64, user_id: String, name: String, email: String, form: &ApplicationForm) -> Self {
        Self {
            id,
            user_id,
            name,
            email,
            blood_type: form.blood_type,
            age: form.age,
            location: form.location.trim().to_string(),
            contact: form.contact.trim().to_string(),
            last_donation: form
                .last_donation
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            application_date: Local::now().format(APPLICATION_DATE_FORMAT).to_string(),
            status: ApplicationStatus::Pending,
        }
    }

    /// Check whether this application belongs to the given identity.
    ///
    /// Matches on either the account id or the snapshotted email, the same
    /// pair the registry keeps unique.
    #[must_use]
    pub fn matches_identity(&self, user_id: &str, email: &str) -> bool {
        self.user_id == user_id || self.email == email
    }

    /// Case-insensitive substring match over name and location.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.location.to_lowercase().contains(needle)
    }
}

/// Compute a process-unique id for a new application.
///
/// Uses the current timestamp in milliseconds, bumped past the largest id
/// already in the registry so that two submissions in the same millisecond
/// cannot collide.
#[must_use]
pub fn next_application_id(existing: &[DonorApplication]) -> i64 {
    let now = Utc::now().timestamp_millis();
    match existing.iter().map(|d| d.id).max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

/// Snapshot the identity fields intake copies out of an account profile.
///
/// # Errors
///
/// Returns [`Error::NotAuthenticated`] if the profile is missing its id,
/// name, or email; such a profile is not a usable account context.
pub fn account_identity(account: &UserProfile) -> crate::error::Result<(String, String, String)> {
    let user_id = non_empty(account.id.as_deref()).ok_or(Error::NotAuthenticated)?;
    let name = non_empty(account.name.as_deref()).ok_or(Error::NotAuthenticated)?;
    let email = non_empty(account.email.as_deref()).ok_or(Error::NotAuthenticated)?;
    Ok((user_id, name, email))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_form() -> ApplicationForm {
        ApplicationForm {
            blood_type: BloodType::APositive,
            age: 25,
            location: "Dhaka".to_string(),
            contact: "0170000000".to_string(),
            last_donation: None,
        }
    }

    #[test]
    fn test_blood_type_display() {
        assert_eq!(BloodType::APositive.to_string(), "A+");
        assert_eq!(BloodType::AbNegative.to_string(), "AB-");
        assert_eq!(BloodType::ONegative.to_string(), "O-");
    }

    #[test]
    fn test_blood_type_round_trip() {
        for bt in BloodType::ALL {
            let parsed: BloodType = bt.to_string().parse().unwrap();
            assert_eq!(parsed, bt);
        }
    }

    #[test]
    fn test_blood_type_parse_lenient() {
        let parsed: BloodType = " ab+ ".parse().unwrap();
        assert_eq!(parsed, BloodType::AbPositive);
    }

    #[test]
    fn test_blood_type_parse_unknown() {
        let result: Result<BloodType, _> = "C+".parse();
        let err = result.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("C+"));
    }

    #[test]
    fn test_blood_type_serde_uses_display_strings() {
        let json = serde_json::to_string(&BloodType::AbPositive).unwrap();
        assert_eq!(json, "\"AB+\"");

        let parsed: BloodType = serde_json::from_str("\"O-\"").unwrap();
        assert_eq!(parsed, BloodType::ONegative);
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ApplicationStatus::Pending.to_string(), "Pending");
        assert_eq!(ApplicationStatus::Approved.to_string(), "Approved");
        assert_eq!(ApplicationStatus::Rejected.to_string(), "Rejected");
    }

    #[test]
    fn test_application_new() {
        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );

        assert_eq!(app.user_id, "u1");
        assert_eq!(app.name, "Alice");
        assert_eq!(app.email, "a@x.com");
        assert_eq!(app.blood_type, BloodType::APositive);
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert!(!app.application_date.is_empty());
    }

    #[test]
    fn test_application_new_trims_fields() {
        let mut form = test_form();
        form.location = "  Dhaka  ".to_string();
        form.last_donation = Some("   ".to_string());

        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &form,
        );

        assert_eq!(app.location, "Dhaka");
        assert!(app.last_donation.is_none());
    }

    #[test]
    fn test_application_date_parses_back() {
        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );
        let parsed =
            chrono::NaiveDate::parse_from_str(&app.application_date, APPLICATION_DATE_FORMAT);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_matches_identity() {
        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );

        assert!(app.matches_identity("u1", "other@x.com"));
        assert!(app.matches_identity("u2", "a@x.com"));
        assert!(!app.matches_identity("u2", "other@x.com"));
    }

    #[test]
    fn test_matches_search() {
        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );

        assert!(app.matches_search("ali"));
        assert!(app.matches_search("dhaka"));
        assert!(!app.matches_search("chittagong"));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );

        let json = serde_json::to_string(&app).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"bloodType\":\"A+\""));
        assert!(json.contains("\"applicationDate\""));
        assert!(json.contains("\"status\":\"Pending\""));
        // Absent lastDonation is omitted entirely, like the stored layout.
        assert!(!json.contains("lastDonation"));
    }

    #[test]
    fn test_deserialization_round_trip() {
        let app = DonorApplication::new(
            1,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );

        let json = serde_json::to_string(&app).unwrap();
        let parsed: DonorApplication = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, app);
    }

    #[test]
    fn test_next_application_id_empty() {
        let id = next_application_id(&[]);
        assert!(id > 0);
    }

    #[test]
    fn test_next_application_id_bumps_past_collision() {
        let mut app = DonorApplication::new(
            0,
            "u1".to_string(),
            "Alice".to_string(),
            "a@x.com".to_string(),
            &test_form(),
        );
        app.id = i64::MAX - 1;

        let id = next_application_id(std::slice::from_ref(&app));
        assert_eq!(id, i64::MAX);
    }

    #[test]
    fn test_account_identity_requires_all_fields() {
        let mut account = UserProfile::default();
        assert!(account_identity(&account)
            .unwrap_err()
            .is_not_authenticated());

        account.id = Some("u1".to_string());
        account.name = Some("Alice".to_string());
        assert!(account_identity(&account)
            .unwrap_err()
            .is_not_authenticated());

        account.email = Some("a@x.com".to_string());
        let (user_id, name, email) = account_identity(&account).unwrap();
        assert_eq!(user_id, "u1");
        assert_eq!(name, "Alice");
        assert_eq!(email, "a@x.com");
    }
}
