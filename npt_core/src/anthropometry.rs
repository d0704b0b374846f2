//! Anthropometry resolver.
//!
//! Turns sex, height and actual weight into BMI, ideal and adjusted body
//! weight, and picks the single weight every downstream formula doses on:
//! - BMI below 30: actual weight
//! - BMI 30 or above: adjusted body weight

use crate::types::{
    AnthropometryResult, Sex, ADJUSTED_WEIGHT_FACTOR, DEVINE_BASE_FEMALE_KG, DEVINE_BASE_MALE_KG,
    DEVINE_KG_PER_CM, DEVINE_PIVOT_HEIGHT_CM, OBESITY_BMI_THRESHOLD,
};

/// Body mass index in kg/m², or 0 when height is not positive
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm > 0.0 {
        let height_m = height_cm / 100.0;
        weight_kg / (height_m * height_m)
    } else {
        0.0
    }
}

/// Ideal body weight by the Devine formula
///
/// Not clamped: very short stature yields a small or negative value.
pub fn ideal_body_weight(sex: Sex, height_cm: f64) -> f64 {
    let base = match sex {
        Sex::Male => DEVINE_BASE_MALE_KG,
        Sex::Female => DEVINE_BASE_FEMALE_KG,
    };
    base + DEVINE_KG_PER_CM * (height_cm - DEVINE_PIVOT_HEIGHT_CM)
}

/// Adjusted body weight: IBW plus a quarter of the excess over IBW
pub fn adjusted_body_weight(ideal_kg: f64, actual_kg: f64) -> f64 {
    ideal_kg + ADJUSTED_WEIGHT_FACTOR * (actual_kg - ideal_kg)
}

pub fn is_obese(bmi: f64) -> bool {
    bmi >= OBESITY_BMI_THRESHOLD
}

/// Weight used for dosing
pub fn calculation_weight(actual_kg: f64, adjusted_kg: f64, bmi: f64) -> f64 {
    if is_obese(bmi) {
        adjusted_kg
    } else {
        actual_kg
    }
}

/// Resolve all body metrics for a patient
///
/// Adjusted body weight is always computed, even when the actual weight is
/// selected, so callers can display it.
pub fn resolve_anthropometry(sex: Sex, height_cm: f64, weight_kg: f64) -> AnthropometryResult {
    let bmi = body_mass_index(weight_kg, height_cm);
    let ideal = ideal_body_weight(sex, height_cm);
    let adjusted = adjusted_body_weight(ideal, weight_kg);

    AnthropometryResult {
        bmi,
        ideal_body_weight_kg: ideal,
        adjusted_body_weight_kg: adjusted,
        calculation_weight_kg: calculation_weight(weight_kg, adjusted, bmi),
        obese: is_obese(bmi),
    }
}
