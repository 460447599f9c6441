//! Donor directory queries.
//!
//! This module produces the filtered, sorted and aggregated views of the
//! donor registry that list screens display. All query functions are pure
//! over a slice of applications; [`Directory`] adds read-only access to
//! the backing store.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::donor::{BloodType, DonorApplication, APPLICATION_DATE_FORMAT};
use crate::store::{Store, DONORS_NAMESPACE};

/// Sort order for directory listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recent applications first.
    #[default]
    Newest,
    /// Oldest applications first.
    Oldest,
    /// Alphabetical by donor name.
    Name,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Oldest => write!(f, "oldest"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// Summary statistics over the full registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    /// Total number of applications, regardless of any active filter.
    pub total_donors: usize,
    /// Application counts per blood type.
    pub counts_by_blood_type: BTreeMap<BloodType, usize>,
}

/// Filter and sort applications for display.
///
/// An entry is kept when it matches the blood-type filter (if any) and
/// contains the search text in its name or location, case-insensitively.
/// The sort is stable: entries that compare equal keep their insertion
/// order.
#[must_use]
pub fn query(
    all: &[DonorApplication],
    blood_type: Option<BloodType>,
    search: &str,
    sort: SortKey,
) -> Vec<DonorApplication> {
    let needle = search.trim().to_lowercase();

    let mut matches: Vec<DonorApplication> = all
        .iter()
        .filter(|donor| blood_type.map_or(true, |bt| donor.blood_type == bt))
        .filter(|donor| needle.is_empty() || donor.matches_search(&needle))
        .cloned()
        .collect();

    match sort {
        SortKey::Newest => {
            matches.sort_by_key(|d| std::cmp::Reverse(parse_application_date(&d.application_date)));
        }
        SortKey::Oldest => {
            matches.sort_by_key(|d| parse_application_date(&d.application_date));
        }
        SortKey::Name => {
            matches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
    }

    matches
}

/// Count applications per blood type over the unfiltered registry.
///
/// Used for the summary statistics shown above the directory; independent
/// of any active filter or search.
#[must_use]
pub fn counts_by_blood_type(all: &[DonorApplication]) -> BTreeMap<BloodType, usize> {
    let mut counts = BTreeMap::new();
    for donor in all {
        *counts.entry(donor.blood_type).or_insert(0) += 1;
    }
    counts
}

/// Parse an `applicationDate` string for sorting.
///
/// Unparsable or missing dates map to the minimum representable date so a
/// malformed entry sorts as oldest instead of breaking the query.
fn parse_application_date(raw: &str) -> NaiveDate {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, APPLICATION_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .unwrap_or(NaiveDate::MIN)
}

/// Read-only directory view over a store.
#[derive(Debug)]
pub struct Directory<'a> {
    store: &'a Store,
}

impl<'a> Directory<'a> {
    /// Create a directory view bound to the given store.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Load every application in insertion order.
    ///
    /// An absent or unreadable registry yields an empty list.
    #[must_use]
    pub fn donors(&self) -> Vec<DonorApplication> {
        self.store.get_or_default(DONORS_NAMESPACE)
    }

    /// Load, filter and sort applications for display.
    #[must_use]
    pub fn search(
        &self,
        blood_type: Option<BloodType>,
        search: &str,
        sort: SortKey,
    ) -> Vec<DonorApplication> {
        query(&self.donors(), blood_type, search, sort)
    }

    /// Summary statistics over the full registry.
    #[must_use]
    pub fn stats(&self) -> DirectoryStats {
        let donors = self.donors();
        DirectoryStats {
            total_donors: donors.len(),
            counts_by_blood_type: counts_by_blood_type(&donors),
        }
    }
}
