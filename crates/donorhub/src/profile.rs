//! Account profiles and profile-completeness scoring.
//!
//! A profile is owned by the external auth service; the registry only
//! reads it, scores how complete it is, and keeps an optional local
//! override in the [`PROFILE_OVERRIDE_NAMESPACE`] namespace.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{Store, PROFILE_OVERRIDE_NAMESPACE};

/// Email pattern used when validating a profile.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Mobile-number pattern used when validating a profile.
///
/// The pattern accepts exactly 10 digits while the accompanying message
/// claims 11; the two have always disagreed and the discrepancy is kept
/// rather than guessed at.
const MOBILE_PATTERN: &str = r"^[0-9]{10}$";

/// User-facing message for a mobile number that fails [`MOBILE_PATTERN`].
const MOBILE_MESSAGE: &str = "Mobile number must be 11 digits";

/// An account profile as served by the auth service.
///
/// The four required fields are name, email, mobile and blood type;
/// everything else is optional. All fields are representable as absent so
/// a partially-filled profile can still be loaded and scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend identifier of the account.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Full name (required for a complete profile).
    pub name: Option<String>,

    /// Email address (required for a complete profile).
    pub email: Option<String>,

    /// Mobile number (required for a complete profile).
    pub mobile: Option<String>,

    /// Blood type, as the display string, e.g. `"A+"` (required for a
    /// complete profile). Kept as text because legacy stored profiles
    /// hold an empty string here before the field is first chosen.
    pub blood_type: Option<String>,

    /// Age in years.
    pub age: Option<String>,

    /// Gender.
    pub gender: Option<String>,

    /// Present address.
    pub present_address: Option<String>,

    /// Permanent address.
    pub permanent_address: Option<String>,

    /// Occupation.
    pub occupation: Option<String>,

    /// Education.
    pub education: Option<String>,

    /// Interests.
    pub interests: Option<String>,

    /// Hobbies.
    pub hobbies: Option<String>,
}

impl UserProfile {
    /// The required fields, in scoring order.
    fn required_fields(&self) -> [&Option<String>; 4] {
        [&self.name, &self.email, &self.mobile, &self.blood_type]
    }

    /// The optional fields, in scoring order.
    fn optional_fields(&self) -> [&Option<String>; 8] {
        [
            &self.age,
            &self.gender,
            &self.present_address,
            &self.permanent_address,
            &self.occupation,
            &self.education,
            &self.interests,
            &self.hobbies,
        ]
    }
}

/// Check whether a profile field counts as filled.
///
/// A field is filled when present and non-empty after trimming.
fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Score how complete a profile is, as a whole-number percentage.
///
/// Required fields carry 70% of the weight, optional fields 30%:
/// `round((required_filled/4)*70 + (optional_filled/8)*30)`, rounding
/// half up. An empty profile scores 0, required-only scores 70, a fully
/// filled profile scores 100.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn completeness(profile: &UserProfile) -> u8 {
    let required_filled = profile
        .required_fields()
        .iter()
        .filter(|f| is_filled(f))
        .count();
    let optional_filled = profile
        .optional_fields()
        .iter()
        .filter(|f| is_filled(f))
        .count();

    let score = (required_filled as f64 / 4.0).mul_add(0.7, optional_filled as f64 / 8.0 * 0.3)
        * 100.0;

    score.round() as u8
}

/// Validate the required fields of a profile before it is saved.
///
/// Mirrors the registration form rules: name at least 3 characters,
/// a plausible email shape, a digits-only mobile number, and a blood
/// type from the closed set.
///
/// # Errors
///
/// Returns a [`Error::Validation`] naming the first field that fails.
pub fn validate(profile: &UserProfile) -> Result<()> {
    let name = profile.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    if name.chars().count() < 3 {
        return Err(Error::validation(
            "name",
            "Name must be at least 3 characters",
        ));
    }

    let email = profile.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(Error::validation("email", "Email is required"));
    }
    let email_re =
        Regex::new(EMAIL_PATTERN).map_err(|e| Error::internal(format!("email pattern: {e}")))?;
    if !email_re.is_match(email) {
        return Err(Error::validation("email", "Invalid email address"));
    }

    let mobile = profile.mobile.as_deref().map(str::trim).unwrap_or_default();
    if mobile.is_empty() {
        return Err(Error::validation("mobile", "Mobile number is required"));
    }
    let mobile_re =
        Regex::new(MOBILE_PATTERN).map_err(|e| Error::internal(format!("mobile pattern: {e}")))?;
    if !mobile_re.is_match(mobile) {
        return Err(Error::validation("mobile", MOBILE_MESSAGE));
    }

    let blood_type = profile
        .blood_type
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if blood_type.is_empty() {
        return Err(Error::validation("bloodType", "Blood type is required"));
    }
    blood_type.parse::<crate::donor::BloodType>()?;

    Ok(())
}

/// Load the locally-overridden profile, if one has been saved.
///
/// Returns `None` when no override exists or the stored payload is
/// unreadable; the caller should then fall back to the auth service.
#[must_use]
pub fn load_override(store: &Store) -> Option<UserProfile> {
    store.get(PROFILE_OVERRIDE_NAMESPACE)
}

/// Save a profile as the local override of the canonical account.
///
/// # Errors
///
/// Returns an error if the write fails; the profile was not persisted.
pub fn save_override(store: &Store, profile: &UserProfile) -> Result<()> {
    store.set(PROFILE_OVERRIDE_NAMESPACE, profile)
}

/// Remove the local profile override.
///
/// Returns `true` if an override was present.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn clear_override(store: &Store) -> Result<bool> {
    store.remove(PROFILE_OVERRIDE_NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_only() -> UserProfile {
        UserProfile {
            id: Some("u1".to_string()),
            name: Some("Alice Rahman".to_string()),
            email: Some("alice@example.com".to_string()),
            mobile: Some("0170000000".to_string()),
            blood_type: Some("A+".to_string()),
            ..UserProfile::default()
        }
    }

    fn fully_filled() -> UserProfile {
        UserProfile {
            age: Some("25".to_string()),
            gender: Some("female".to_string()),
            present_address: Some("Dhaka".to_string()),
            permanent_address: Some("Sylhet".to_string()),
            occupation: Some("Engineer".to_string()),
            education: Some("BSc".to_string()),
            interests: Some("Volunteering".to_string()),
            hobbies: Some("Reading".to_string()),
            ..required_only()
        }
    }

    #[test]
    fn test_completeness_empty_profile() {
        assert_eq!(completeness(&UserProfile::default()), 0);
    }

    #[test]
    fn test_completeness_required_only() {
        assert_eq!(completeness(&required_only()), 70);
    }

    #[test]
    fn test_completeness_fully_filled() {
        assert_eq!(completeness(&fully_filled()), 100);
    }

    #[test]
    fn test_completeness_whitespace_does_not_count() {
        let mut profile = required_only();
        profile.mobile = Some("   ".to_string());
        // 3 of 4 required filled: round(3/4 * 70) = 53.
        assert_eq!(completeness(&profile), 53);
    }

    #[test]
    fn test_completeness_partial_optional() {
        let mut profile = required_only();
        profile.age = Some("25".to_string());
        profile.gender = Some("female".to_string());
        // 70 + round-half-up applied to 2/8 * 30 = 7.5 → 78.
        assert_eq!(completeness(&profile), 78);
    }

    #[test]
    fn test_completeness_within_bounds() {
        let profiles = [
            UserProfile::default(),
            required_only(),
            fully_filled(),
            UserProfile {
                hobbies: Some("Reading".to_string()),
                ..UserProfile::default()
            },
        ];
        for profile in &profiles {
            assert!(completeness(profile) <= 100);
        }
    }

    #[test]
    fn test_validate_accepts_complete_profile() {
        assert!(validate(&required_only()).is_ok());
    }

    #[test]
    fn test_validate_requires_name() {
        let mut profile = required_only();
        profile.name = None;

        let err = validate(&profile).unwrap_err();
        assert_eq!(err.to_string(), "invalid name: Name is required");
    }

    #[test]
    fn test_validate_short_name() {
        let mut profile = required_only();
        profile.name = Some("Al".to_string());

        let err = validate(&profile).unwrap_err();
        assert!(err.to_string().contains("at least 3 characters"));
    }

    #[test]
    fn test_validate_bad_email() {
        let mut profile = required_only();
        profile.email = Some("not-an-email".to_string());

        let err = validate(&profile).unwrap_err();
        assert!(err.to_string().contains("Invalid email address"));
    }

    #[test]
    fn test_validate_mobile_ten_digits_pass_but_message_says_eleven() {
        // The validator and its message disagree on purpose: ten digits
        // pass, eleven fail, and the failure message still says eleven.
        let mut profile = required_only();
        profile.mobile = Some("0123456789".to_string());
        assert!(validate(&profile).is_ok());

        profile.mobile = Some("01234567890".to_string());
        let err = validate(&profile).unwrap_err();
        assert!(err.to_string().contains("must be 11 digits"));
    }

    #[test]
    fn test_validate_mobile_rejects_non_digits() {
        let mut profile = required_only();
        profile.mobile = Some("01700-0000".to_string());

        let err = validate(&profile).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_blood_type() {
        let mut profile = required_only();
        profile.blood_type = Some("Z+".to_string());
        assert!(validate(&profile).is_err());

        profile.blood_type = Some(String::new());
        let err = validate(&profile).unwrap_err();
        assert!(err.to_string().contains("Blood type is required"));
    }

    #[test]
    fn test_serde_field_names() {
        let profile = fully_filled();
        let json = serde_json::to_string(&profile).unwrap();

        assert!(json.contains("\"_id\""));
        assert!(json.contains("\"bloodType\""));
        assert!(json.contains("\"presentAddress\""));
        assert!(json.contains("\"permanentAddress\""));
    }

    #[test]
    fn test_deserializes_sparse_payload() {
        // Legacy override payloads may carry only a few keys.
        let profile: UserProfile =
            serde_json::from_str(r#"{"name":"Alice","bloodType":""}"#).unwrap();

        assert_eq!(profile.name.as_deref(), Some("Alice"));
        assert_eq!(profile.blood_type.as_deref(), Some(""));
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_override_round_trip() {
        let store = Store::open_in_memory().unwrap();
        assert!(load_override(&store).is_none());

        let profile = required_only();
        save_override(&store, &profile).unwrap();
        assert_eq!(load_override(&store), Some(profile));

        assert!(clear_override(&store).unwrap());
        assert!(load_override(&store).is_none());
        assert!(!clear_override(&store).unwrap());
    }
}
