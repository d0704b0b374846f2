//! Glucose infusion rate and lipid load checks.
//!
//! Both checks read only the macronutrient grams and the dosing weight and
//! are always reported together. Thresholds:
//! - Glucose: ok up to and including 5 g/kg/day
//! - Lipids: ok up to and including 1.5 g/kg/day, low below 0.7 g/kg/day

use crate::types::{
    GlucoseSafety, GlucoseStatus, LipidSafety, LipidStatus, SafetyResult, MAX_GLUCOSE_G_KG_DAY,
    MAX_LIPID_G_KG_DAY, MINUTES_PER_DAY, MIN_LIPID_G_KG_DAY,
};

/// Grams per kg per day, or 0 for a non-positive weight
fn per_kg_day(grams: f64, weight_kg: f64) -> f64 {
    if weight_kg > 0.0 {
        grams / weight_kg
    } else {
        0.0
    }
}

pub fn assess_glucose(glucose_g: f64, calculation_weight_kg: f64) -> GlucoseSafety {
    let g_kg_day = per_kg_day(glucose_g, calculation_weight_kg);
    let mg_kg_min = if calculation_weight_kg > 0.0 {
        (glucose_g * 1000.0) / (calculation_weight_kg * MINUTES_PER_DAY)
    } else {
        0.0
    };

    let ok = g_kg_day <= MAX_GLUCOSE_G_KG_DAY;
    let status = if ok {
        GlucoseStatus::WithinRange
    } else {
        GlucoseStatus::Excessive
    };

    GlucoseSafety {
        g_kg_day,
        mg_kg_min,
        ok,
        status,
        message: status.message(),
    }
}

/// Classify the lipid load
///
/// A low load raises `warn` but leaves `ok` set; the two flags can never
/// both signal trouble since a load below 0.7 is never above 1.5.
pub fn assess_lipids(lipid_g: f64, calculation_weight_kg: f64) -> LipidSafety {
    let g_kg_day = per_kg_day(lipid_g, calculation_weight_kg);

    let ok = g_kg_day <= MAX_LIPID_G_KG_DAY;
    let warn = g_kg_day < MIN_LIPID_G_KG_DAY;
    let status = if !ok {
        LipidStatus::Overload
    } else if warn {
        LipidStatus::Low
    } else {
        LipidStatus::Adequate
    };

    LipidSafety {
        g_kg_day,
        ok,
        warn,
        status,
        message: status.message(),
    }
}

/// Run both safety checks
pub fn assess_safety(glucose_g: f64, lipid_g: f64, calculation_weight_kg: f64) -> SafetyResult {
    SafetyResult {
        glucose: assess_glucose(glucose_g, calculation_weight_kg),
        lipids: assess_lipids(lipid_g, calculation_weight_kg),
    }
}
