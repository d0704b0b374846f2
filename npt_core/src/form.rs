//! Form defaulting for callers of the engine.
//!
//! The engine never fills in missing values. A caller collects whatever
//! the clinician typed into a `FormInput` and resolves it against
//! `FormDefaults` before calculating.

use crate::advisory::{STRESS_KCAL_PER_KG, STRESS_PROTEIN_PER_KG};
use crate::{DosingInput, PatientInput, Sex};
use serde::{Deserialize, Serialize};

/// kcal/kg below which a stressed patient is bumped to the suggested target
const STRESS_KCAL_FLOOR: f64 = 26.0;

/// protein/kg below which a stressed patient is bumped to the suggested target
const STRESS_PROTEIN_FLOOR: f64 = 1.4;

/// Raw, possibly incomplete form state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormInput {
    pub age_years: Option<f64>,
    pub sex: Option<Sex>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub stress: bool,
    pub refeeding_risk: bool,
    pub copd: bool,
    pub fistula: bool,
    pub kcal_per_kg: Option<f64>,
    pub start_fraction: Option<f64>,
    pub protein_per_kg: Option<f64>,
    pub glucose_percent: Option<f64>,
    pub amino_acid_percent: Option<f64>,
}

/// Fallback values for missing or unusable form fields
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormDefaults {
    #[serde(default = "default_age_years")]
    pub age_years: f64,

    #[serde(default)]
    pub sex: Sex,

    #[serde(default = "default_weight_kg")]
    pub weight_kg: f64,

    #[serde(default = "default_height_cm")]
    pub height_cm: f64,

    #[serde(default = "default_kcal_per_kg")]
    pub kcal_per_kg: f64,

    #[serde(default = "default_start_fraction")]
    pub start_fraction: f64,

    #[serde(default = "default_protein_per_kg")]
    pub protein_per_kg: f64,

    #[serde(default = "default_glucose_percent")]
    pub glucose_percent: f64,

    #[serde(default = "default_amino_acid_percent")]
    pub amino_acid_percent: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            age_years: default_age_years(),
            sex: Sex::default(),
            weight_kg: default_weight_kg(),
            height_cm: default_height_cm(),
            kcal_per_kg: default_kcal_per_kg(),
            start_fraction: default_start_fraction(),
            protein_per_kg: default_protein_per_kg(),
            glucose_percent: default_glucose_percent(),
            amino_acid_percent: default_amino_acid_percent(),
        }
    }
}

// Default value functions
fn default_age_years() -> f64 {
    65.0
}

fn default_weight_kg() -> f64 {
    70.0
}

fn default_height_cm() -> f64 {
    175.0
}

fn default_kcal_per_kg() -> f64 {
    25.0
}

fn default_start_fraction() -> f64 {
    0.8
}

fn default_protein_per_kg() -> f64 {
    1.5
}

fn default_glucose_percent() -> f64 {
    65.0
}

fn default_amino_acid_percent() -> f64 {
    15.0
}

/// Use the value unless it is missing, zero or not finite
fn or_default(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => fallback,
    }
}

impl FormInput {
    /// Fill every missing field and split into engine inputs
    ///
    /// Zero counts as missing, so a cleared numeric field falls back to its
    /// default rather than reaching a formula.
    pub fn resolve(&self, defaults: &FormDefaults) -> (PatientInput, DosingInput) {
        let patient = PatientInput {
            age_years: or_default(self.age_years, defaults.age_years),
            sex: self.sex.unwrap_or(defaults.sex),
            weight_kg: or_default(self.weight_kg, defaults.weight_kg),
            height_cm: or_default(self.height_cm, defaults.height_cm),
            stress: self.stress,
            refeeding_risk: self.refeeding_risk,
            copd: self.copd,
            fistula: self.fistula,
        };

        let dosing = DosingInput {
            kcal_per_kg: or_default(self.kcal_per_kg, defaults.kcal_per_kg),
            protein_per_kg: or_default(self.protein_per_kg, defaults.protein_per_kg),
            start_fraction: or_default(self.start_fraction, defaults.start_fraction),
            glucose_percent: or_default(self.glucose_percent, defaults.glucose_percent),
            amino_acid_percent: or_default(self.amino_acid_percent, defaults.amino_acid_percent),
        };

        (patient, dosing)
    }
}

/// Raise low targets to the stress suggestion
///
/// Targets already at or above the floors are left alone. Returns whether
/// anything changed.
pub fn apply_stress_suggestion(patient: &PatientInput, dosing: &mut DosingInput) -> bool {
    if !patient.stress {
        return false;
    }

    let mut changed = false;
    if dosing.kcal_per_kg < STRESS_KCAL_FLOOR {
        dosing.kcal_per_kg = STRESS_KCAL_PER_KG;
        changed = true;
    }
    if dosing.protein_per_kg < STRESS_PROTEIN_FLOOR {
        dosing.protein_per_kg = STRESS_PROTEIN_PER_KG;
        changed = true;
    }

    if changed {
        tracing::info!(
            "Stress suggestion applied: {} kcal/kg, {} g/kg protein",
            dosing.kcal_per_kg,
            dosing.protein_per_kg
        );
    }
    changed
}
