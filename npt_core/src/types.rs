//! Core domain types for the parenteral nutrition calculator.
//!
//! This module defines the value records passed through the pipeline:
//! - Patient demographics and clinical context flags
//! - Dosing parameters chosen by the clinician
//! - Anthropometry, requirement and safety results
//! - Fixed clinical constants used by the formulas

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Clinical Constants
// ============================================================================

/// BMI at or above which the adjusted body weight is used for dosing
pub const OBESITY_BMI_THRESHOLD: f64 = 30.0;

/// Devine formula base weight (kg) for men
pub const DEVINE_BASE_MALE_KG: f64 = 50.0;

/// Devine formula base weight (kg) for women
pub const DEVINE_BASE_FEMALE_KG: f64 = 45.5;

/// Devine formula slope (kg per cm above the pivot height)
pub const DEVINE_KG_PER_CM: f64 = 0.9;

/// Devine formula pivot height (cm)
pub const DEVINE_PIVOT_HEIGHT_CM: f64 = 152.0;

/// Fraction of excess weight added back onto IBW for the adjusted weight
pub const ADJUSTED_WEIGHT_FACTOR: f64 = 0.25;

/// Grams of protein per gram of nitrogen
pub const PROTEIN_PER_NITROGEN: f64 = 6.25;

/// kcal per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// kcal per gram of dextrose (hydrated glucose)
pub const KCAL_PER_G_GLUCOSE: f64 = 3.4;

/// kcal per gram of fat
pub const KCAL_PER_G_LIPID: f64 = 9.0;

/// Dextrose 50% stock solution (g/mL)
pub const GLUCOSE_SOURCE_G_PER_ML: f64 = 0.5;

/// Lipid 20% emulsion (g/mL)
pub const LIPID_SOURCE_G_PER_ML: f64 = 0.2;

/// Infusion runs continuously over a full day
pub const INFUSION_HOURS: f64 = 24.0;

/// Minutes per day, for mg/kg/min glucose rates
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Upper safe glucose infusion rate (g/kg/day, inclusive)
pub const MAX_GLUCOSE_G_KG_DAY: f64 = 5.0;

/// Upper safe lipid load (g/kg/day, inclusive)
pub const MAX_LIPID_G_KG_DAY: f64 = 1.5;

/// Lipid load below which essential fatty acid deficiency is a concern
pub const MIN_LIPID_G_KG_DAY: f64 = 0.7;

// ============================================================================
// Input Types
// ============================================================================

/// Biological sex, selecting the Devine base weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "h" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            "m" => Err(Error::Input(
                "ambiguous sex 'm': use 'male' or 'female'".into(),
            )),
            other => Err(Error::Input(format!("unknown sex: {}", other))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("male"),
            Sex::Female => f.write_str("female"),
        }
    }
}

/// Patient demographics and clinical context
///
/// The context flags (stress, refeeding, COPD, fistula) never alter the
/// numeric output; they only drive advisory text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    pub age_years: f64,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub stress: bool,
    pub refeeding_risk: bool,
    pub copd: bool,
    pub fistula: bool,
}

/// Dosing targets chosen by the clinician
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DosingInput {
    pub kcal_per_kg: f64,
    pub protein_per_kg: f64,
    /// Fraction (0.0-1.0) of the full target delivered today
    pub start_fraction: f64,
    /// Share of non-protein calories given as glucose (0-100); lipids get the rest
    pub glucose_percent: f64,
    /// Amino acid solution strength, percent w/v
    pub amino_acid_percent: f64,
}

// ============================================================================
// Result Types
// ============================================================================

/// Body composition metrics and the weight used for dosing
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AnthropometryResult {
    pub bmi: f64,
    pub ideal_body_weight_kg: f64,
    pub adjusted_body_weight_kg: f64,
    pub calculation_weight_kg: f64,
    pub obese: bool,
}

/// Daily nutrient requirements and bag volumes
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RequirementResult {
    pub target_kcal: f64,
    pub delivered_kcal: f64,
    pub protein_g: f64,
    pub nitrogen_g: f64,
    pub protein_kcal: f64,
    pub non_protein_kcal: f64,
    pub glucose_kcal: f64,
    pub lipid_kcal: f64,
    pub glucose_g: f64,
    pub glucose_ml: f64,
    pub lipid_g: f64,
    pub lipid_ml: f64,
    pub amino_acid_ml: f64,
    pub total_volume_ml: f64,
    pub rate_ml_per_hour: f64,
}

/// Glucose infusion rate classification
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseStatus {
    WithinRange,
    Excessive,
}

impl GlucoseStatus {
    pub fn message(self) -> &'static str {
        match self {
            GlucoseStatus::WithinRange => "Within safe limits.",
            GlucoseStatus::Excessive => {
                "Exceeds 5 g/kg/day. Risk of hyperglycemia and increased CO2 production."
            }
        }
    }
}

/// Lipid load classification
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LipidStatus {
    Adequate,
    Low,
    Overload,
}

impl LipidStatus {
    pub fn message(self) -> &'static str {
        match self {
            LipidStatus::Adequate => "Adequate intake.",
            LipidStatus::Low => {
                "Low intake (<0.7 g/kg/day). Risk of essential fatty acid deficiency if sustained."
            }
            LipidStatus::Overload => "Exceeds 1.5 g/kg/day (overload).",
        }
    }
}

/// Glucose infusion rate assessment
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GlucoseSafety {
    pub g_kg_day: f64,
    pub mg_kg_min: f64,
    pub ok: bool,
    pub status: GlucoseStatus,
    pub message: &'static str,
}

/// Lipid load assessment
///
/// `warn` is a soft flag: a low lipid load leaves `ok` set.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LipidSafety {
    pub g_kg_day: f64,
    pub ok: bool,
    pub warn: bool,
    pub status: LipidStatus,
    pub message: &'static str,
}

/// Independent glucose and lipid assessments
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SafetyResult {
    pub glucose: GlucoseSafety,
    pub lipids: LipidSafety,
}

/// Output of one full pipeline run
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Calculation {
    pub anthropometry: AnthropometryResult,
    pub requirements: RequirementResult,
    pub safety: SafetyResult,
}
