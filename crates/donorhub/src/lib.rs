//! `donorhub` - A local blood-donor registry
//!
//! This library provides the core functionality for taking in donor
//! applications, browsing the donor directory, and scoring profile
//! completeness over a namespaced local store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod directory;
pub mod donor;
pub mod error;
pub mod feedback;
pub mod intake;
pub mod logging;
pub mod profile;
pub mod store;

pub use config::Config;
pub use directory::{counts_by_blood_type, query, Directory, DirectoryStats, SortKey};
pub use donor::{ApplicationForm, ApplicationStatus, BloodType, DonorApplication};
pub use error::{Error, Result};
pub use intake::Intake;
pub use logging::init_logging;
pub use profile::{completeness, UserProfile};
pub use store::Store;
