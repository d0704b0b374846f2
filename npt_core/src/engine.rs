//! Calculation pipeline.
//!
//! Runs the three stages in their fixed order:
//! - Resolve anthropometry and pick the dosing weight
//! - Compute requirements and volumes on that weight
//! - Classify glucose and lipid rates against the safety bands

use crate::anthropometry::resolve_anthropometry;
use crate::requirements::compute_requirements;
use crate::safety::assess_safety;
use crate::{Calculation, DosingInput, PatientInput};

/// Compute a full prescription draft
///
/// Pure and total: every input combination yields a result, and identical
/// inputs yield identical outputs. Context flags on the patient are not
/// read here.
pub fn calculate(patient: &PatientInput, dosing: &DosingInput) -> Calculation {
    let anthropometry = resolve_anthropometry(patient.sex, patient.height_cm, patient.weight_kg);
    let weight = anthropometry.calculation_weight_kg;

    let requirements = compute_requirements(weight, dosing);
    let safety = assess_safety(requirements.glucose_g, requirements.lipid_g, weight);

    tracing::debug!(
        "Calculated on {:.1} kg (obese: {}): {:.0} kcal, {:.0} mL at {:.0} mL/h",
        weight,
        anthropometry.obese,
        requirements.delivered_kcal,
        requirements.total_volume_ml,
        requirements.rate_ml_per_hour
    );

    Calculation {
        anthropometry,
        requirements,
        safety,
    }
}
