//! Daily nutrient requirements and bag volumes.
//!
//! Each step consumes the values computed before it, so the order below is
//! fixed: energy, protein, non-protein split, grams, volumes, rate.

use crate::types::{
    DosingInput, RequirementResult, GLUCOSE_SOURCE_G_PER_ML, INFUSION_HOURS, KCAL_PER_G_GLUCOSE,
    KCAL_PER_G_LIPID, KCAL_PER_G_PROTEIN, LIPID_SOURCE_G_PER_ML, PROTEIN_PER_NITROGEN,
};

/// Compute requirements for the given dosing weight
///
/// Only the non-protein energy is floored at zero. Every other quantity
/// follows the arithmetic, so out-of-range inputs (e.g. a negative protein
/// target) propagate unchanged.
pub fn compute_requirements(calculation_weight_kg: f64, dosing: &DosingInput) -> RequirementResult {
    // Energy
    let target_kcal = dosing.kcal_per_kg * calculation_weight_kg;
    let delivered_kcal = target_kcal * dosing.start_fraction;

    // Protein
    let protein_g = dosing.protein_per_kg * calculation_weight_kg;
    let nitrogen_g = protein_g / PROTEIN_PER_NITROGEN;
    let protein_kcal = protein_g * KCAL_PER_G_PROTEIN;

    // Non-protein calories; lipid takes the exact remainder
    let non_protein_kcal = (delivered_kcal - protein_kcal).max(0.0);
    let glucose_kcal = non_protein_kcal * (dosing.glucose_percent / 100.0);
    let lipid_kcal = non_protein_kcal - glucose_kcal;

    // Grams
    let glucose_g = glucose_kcal / KCAL_PER_G_GLUCOSE;
    let lipid_g = lipid_kcal / KCAL_PER_G_LIPID;

    // Volumes (base bag, additives excluded)
    let glucose_ml = glucose_g / GLUCOSE_SOURCE_G_PER_ML;
    let lipid_ml = lipid_g / LIPID_SOURCE_G_PER_ML;
    let amino_acid_ml = (protein_g * 100.0) / dosing.amino_acid_percent;

    let total_volume_ml = amino_acid_ml + glucose_ml + lipid_ml;
    let rate_ml_per_hour = total_volume_ml / INFUSION_HOURS;

    RequirementResult {
        target_kcal,
        delivered_kcal,
        protein_g,
        nitrogen_g,
        protein_kcal,
        non_protein_kcal,
        glucose_kcal,
        lipid_kcal,
        glucose_g,
        glucose_ml,
        lipid_g,
        lipid_ml,
        amino_acid_ml,
        total_volume_ml,
        rate_ml_per_hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_dosing() -> DosingInput {
        DosingInput {
            kcal_per_kg: 25.0,
            protein_per_kg: 1.5,
            start_fraction: 0.8,
            glucose_percent: 65.0,
            amino_acid_percent: 15.0,
        }
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_standard_adult_requirements() {
        let res = compute_requirements(70.0, &standard_dosing());

        assert!(close(res.target_kcal, 1750.0, 1e-9));
        assert!(close(res.delivered_kcal, 1400.0, 1e-9));
        assert!(close(res.protein_g, 105.0, 1e-9));
        assert!(close(res.nitrogen_g, 16.8, 1e-9));
        assert!(close(res.protein_kcal, 420.0, 1e-9));
        assert!(close(res.non_protein_kcal, 980.0, 1e-9));
        assert!(close(res.glucose_kcal, 637.0, 1e-9));
        assert!(close(res.lipid_kcal, 343.0, 1e-9));
        assert!(close(res.glucose_g, 187.35, 0.01));
        assert!(close(res.lipid_g, 38.11, 0.01));
        assert!(close(res.glucose_ml, 374.71, 0.01));
        assert!(close(res.lipid_ml, 190.56, 0.01));
        assert!(close(res.amino_acid_ml, 700.0, 1e-9));
        assert!(close(res.total_volume_ml, 1265.26, 0.01));
        assert!(close(res.rate_ml_per_hour, 52.72, 0.01));
    }

    #[test]
    fn test_full_start_fraction_delivers_target() {
        let mut dosing = standard_dosing();
        dosing.start_fraction = 1.0;

        let res = compute_requirements(70.0, &dosing);
        assert_eq!(res.delivered_kcal, res.target_kcal);
    }

    #[test]
    fn test_non_protein_energy_floored_at_zero() {
        let mut dosing = standard_dosing();
        dosing.protein_per_kg = 3.0;
        dosing.start_fraction = 0.25;

        // 437.5 kcal delivered vs 840 kcal of protein
        let res = compute_requirements(70.0, &dosing);

        assert_eq!(res.non_protein_kcal, 0.0);
        assert_eq!(res.glucose_g, 0.0);
        assert_eq!(res.lipid_g, 0.0);
        assert_eq!(res.glucose_ml, 0.0);
        assert_eq!(res.lipid_ml, 0.0);
        assert_eq!(res.total_volume_ml, res.amino_acid_ml);
    }

    #[test]
    fn test_protein_exactly_meeting_delivered_energy() {
        let dosing = DosingInput {
            kcal_per_kg: 20.0,
            protein_per_kg: 5.0,
            start_fraction: 1.0,
            glucose_percent: 50.0,
            amino_acid_percent: 10.0,
        };

        let res = compute_requirements(10.0, &dosing);
        assert_eq!(res.non_protein_kcal, 0.0);
    }

    #[test]
    fn test_macronutrient_split_closes_exactly() {
        for pct in [0.0, 12.5, 30.0, 33.3, 50.0, 65.0, 77.7, 90.0, 100.0] {
            let mut dosing = standard_dosing();
            dosing.glucose_percent = pct;

            let res = compute_requirements(83.4, &dosing);
            assert_eq!(
                res.glucose_kcal + res.lipid_kcal,
                res.non_protein_kcal,
                "split did not close at {}%",
                pct
            );
        }
    }

    #[test]
    fn test_all_glucose_leaves_no_lipid() {
        let mut dosing = standard_dosing();
        dosing.glucose_percent = 100.0;

        let res = compute_requirements(70.0, &dosing);
        assert_eq!(res.lipid_kcal, 0.0);
        assert_eq!(res.lipid_ml, 0.0);
    }

    #[test]
    fn test_volume_composition_and_rate() {
        let res = compute_requirements(64.0, &standard_dosing());

        assert_eq!(
            res.total_volume_ml,
            res.amino_acid_ml + res.glucose_ml + res.lipid_ml
        );
        assert_eq!(res.rate_ml_per_hour, res.total_volume_ml / 24.0);
    }

    #[test]
    fn test_amino_acid_concentration_scales_volume() {
        let mut dosing = standard_dosing();
        dosing.amino_acid_percent = 10.0;

        let res = compute_requirements(70.0, &dosing);
        assert!(close(res.amino_acid_ml, 1050.0, 1e-9));
    }

    #[test]
    fn test_negative_protein_target_propagates() {
        let mut dosing = standard_dosing();
        dosing.protein_per_kg = -1.0;

        let res = compute_requirements(70.0, &dosing);
        assert!(res.protein_g < 0.0);
        assert!(res.amino_acid_ml < 0.0);
        // Negative protein energy inflates the non-protein share
        assert!(close(res.non_protein_kcal, 1400.0 + 280.0, 1e-9));
    }
}
