#![forbid(unsafe_code)]

//! Core calculation engine for parenteral nutrition prescriptions.
//!
//! This crate provides:
//! - Domain types (patient and dosing inputs, result records)
//! - Anthropometry resolution (BMI, ideal/adjusted weight, dosing weight)
//! - Requirement and volume calculation
//! - Glucose and lipid safety classification
//! - Context advisories and caller-side form defaulting
//! - Configuration, logging and the display preference store

pub mod types;
pub mod error;
pub mod anthropometry;
pub mod requirements;
pub mod safety;
pub mod engine;
pub mod advisory;
pub mod form;
pub mod config;
pub mod logging;
pub mod preferences;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use anthropometry::resolve_anthropometry;
pub use requirements::compute_requirements;
pub use safety::assess_safety;
pub use engine::calculate;
pub use advisory::{context_advisories, within_standard_ranges, Advisory, AdvisoryKind, Severity};
pub use form::{apply_stress_suggestion, FormDefaults, FormInput};
pub use config::Config;
pub use preferences::{Preferences, Theme};
