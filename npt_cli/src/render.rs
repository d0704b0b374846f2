//! Text rendering of a calculation for the terminal.
//!
//! All rounding happens here, never in the engine: BMI, weights and
//! nitrogen to one decimal, per-kg rates to two, everything else to whole
//! units.

use npt_core::advisory::{stress_suggestion, Suggestion};
use npt_core::*;
use serde::Serialize;

/// Everything shown for one calculation request
#[derive(Debug, Serialize)]
pub struct Report {
    pub patient: PatientInput,
    pub dosing: DosingInput,
    pub calculation: Calculation,
    pub advisories: Vec<Advisory>,
    pub suggestion: Option<Suggestion>,
    pub within_standard_ranges: bool,
}

impl Report {
    pub fn build(patient: PatientInput, dosing: DosingInput) -> Self {
        let calculation = calculate(&patient, &dosing);
        let advisories = context_advisories(&patient, &dosing);
        let suggestion = stress_suggestion(patient.stress);
        let within_standard_ranges = within_standard_ranges(&calculation.safety, &patient);

        Self {
            patient,
            dosing,
            calculation,
            advisories,
            suggestion,
            within_standard_ranges,
        }
    }
}

/// Round half away from zero after an epsilon nudge, so 1.005 rounds up
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    ((value + f64::EPSILON) * factor).round() / factor
}

fn whole(value: f64) -> String {
    format!("{:.0}", round_to(value, 0))
}

fn one(value: f64) -> String {
    format!("{:.1}", round_to(value, 1))
}

fn two(value: f64) -> String {
    format!("{:.2}", round_to(value, 2))
}

fn percent(fraction: f64) -> String {
    whole(fraction * 100.0)
}

/// Displayed glucose share of non-protein calories
fn glucose_share(dosing: &DosingInput) -> String {
    whole(dosing.glucose_percent)
}

/// Displayed lipid share, the complement of the rounded glucose share so
/// the two always add up to 100
fn lipid_share(dosing: &DosingInput) -> String {
    format!("{:.0}", 100.0 - round_to(dosing.glucose_percent, 0))
}

fn safety_tag(ok: bool, warn: bool) -> &'static str {
    if !ok {
        "[DANGER]"
    } else if warn {
        "[WARN]"
    } else {
        "[OK]"
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "[WARN]",
        Severity::Info => "[INFO]",
    }
}

/// Dosing weight label; "AdjBW" marks the adjusted weight
fn weight_label(anthro: &AnthropometryResult) -> String {
    if anthro.obese {
        format!("AdjBW {} kg", one(anthro.calculation_weight_kg))
    } else {
        format!("{} kg", one(anthro.calculation_weight_kg))
    }
}

/// Summary view: body metrics, composition, safety and advisories
pub fn summary(report: &Report) -> String {
    let anthro = &report.calculation.anthropometry;
    let req = &report.calculation.requirements;
    let safety = &report.calculation.safety;
    let dosing = &report.dosing;

    let mut out = Vec::new();
    out.push("PARENTERAL NUTRITION DRAFT".to_string());
    out.push("==========================".to_string());
    out.push(format!(
        "BMI:                {}{}",
        one(anthro.bmi),
        if anthro.obese { "  (obesity)" } else { "" }
    ));
    out.push(format!("Calculation weight: {}", weight_label(anthro)));
    out.push(format!(
        "Ideal / adjusted:   {} kg / {} kg",
        one(anthro.ideal_body_weight_kg),
        one(anthro.adjusted_body_weight_kg)
    ));
    out.push(format!(
        "Energy today:       {} kcal ({}% of {} kcal target)",
        whole(req.delivered_kcal),
        percent(dosing.start_fraction),
        whole(req.target_kcal)
    ));
    out.push(format!(
        "Total volume:       {} mL at {} mL/h",
        whole(req.total_volume_ml),
        whole(req.rate_ml_per_hour)
    ));

    out.push(String::new());
    out.push("Bag composition".to_string());
    out.push(format!(
        "  Protein: {} g -> {} mL amino acids {}% (nitrogen {} g)",
        whole(req.protein_g),
        whole(req.amino_acid_ml),
        dosing.amino_acid_percent,
        one(req.nitrogen_g)
    ));
    out.push(format!(
        "  Glucose: {} g -> {} mL dextrose 50% ({}% of non-protein kcal)",
        whole(req.glucose_g),
        whole(req.glucose_ml),
        glucose_share(dosing)
    ));
    out.push(format!(
        "  Lipids:  {} g -> {} mL lipids 20% ({}% of non-protein kcal)",
        whole(req.lipid_g),
        whole(req.lipid_ml),
        lipid_share(dosing)
    ));

    out.push(String::new());
    out.push("Safety".to_string());
    out.push(format!(
        "  {} Glucose: {} g/kg/day ({} mg/kg/min). {}",
        safety_tag(safety.glucose.ok, false),
        two(safety.glucose.g_kg_day),
        two(safety.glucose.mg_kg_min),
        safety.glucose.message
    ));
    out.push(format!(
        "  {} Lipids: {} g/kg/day. {}",
        safety_tag(safety.lipids.ok, safety.lipids.warn),
        two(safety.lipids.g_kg_day),
        safety.lipids.message
    ));

    if !report.advisories.is_empty() {
        out.push(String::new());
        out.push("Clinical context".to_string());
        for advisory in &report.advisories {
            out.push(format!(
                "  {} {}",
                severity_tag(advisory.severity),
                advisory.message
            ));
        }
    }

    if let Some(s) = report.suggestion {
        out.push(String::new());
        out.push(format!(
            "Suggested for stress: {} kcal/kg, {} g/kg protein",
            s.kcal_per_kg, s.protein_per_kg
        ));
    }

    if report.within_standard_ranges {
        out.push(String::new());
        out.push("All parameters within standard ranges.".to_string());
    }

    out.join("\n")
}

/// Prescription order document, ready to copy into the chart
pub fn order(report: &Report, generated_at: &str) -> String {
    let anthro = &report.calculation.anthropometry;
    let req = &report.calculation.requirements;
    let dosing = &report.dosing;
    let patient = &report.patient;

    let mut out = Vec::new();
    out.push("PARENTERAL NUTRITION ORDER".to_string());
    out.push("----------------------------------------".to_string());
    out.push(format!("Generated: {}", generated_at));
    out.push(String::new());
    out.push("PATIENT:".to_string());
    out.push(format!(
        "Calculation weight: {} (BMI {})",
        weight_label(anthro),
        one(anthro.bmi)
    ));
    out.push(format!(
        "Situation: {} | {}",
        if patient.stress { "Sepsis/Stress" } else { "Standard" },
        if patient.refeeding_risk {
            "Refeeding risk"
        } else {
            "No refeeding risk"
        }
    ));

    out.push(String::new());
    out.push(format!(
        "DAILY DELIVERY (day at {}% of target):",
        percent(dosing.start_fraction)
    ));
    out.push(format!("- Total calories: {} kcal", whole(req.delivered_kcal)));
    out.push(format!(
        "- Protein:        {} g (nitrogen {} g)",
        whole(req.protein_g),
        one(req.nitrogen_g)
    ));
    out.push(format!(
        "- Glucose:        {} g ({}% non-protein)",
        whole(req.glucose_g),
        glucose_share(dosing)
    ));
    out.push(format!(
        "- Lipids:         {} g ({}% non-protein)",
        whole(req.lipid_g),
        lipid_share(dosing)
    ));

    out.push(String::new());
    out.push("BAG COMPOSITION:".to_string());
    out.push(format!(
        "1. Amino acids ({}%): {} mL",
        dosing.amino_acid_percent,
        whole(req.amino_acid_ml)
    ));
    out.push(format!("2. Dextrose 50%:      {} mL", whole(req.glucose_ml)));
    out.push(format!("3. Lipids 20%:        {} mL", whole(req.lipid_ml)));

    out.push(String::new());
    out.push("VOLUME AND RATE:".to_string());
    out.push(format!(
        "- Total volume:  {} mL (plus additives)",
        whole(req.total_volume_ml)
    ));
    out.push(format!(
        "- Infusion rate: {} mL/h (over 24 h)",
        whole(req.rate_ml_per_hour)
    ));

    out.push(String::new());
    out.push("SUGGESTED ADDITIVES (adjust to labs):".to_string());
    out.push("- Na/K: 1-2 mEq/kg/day".to_string());
    out.push("- Phosphate: 20-40 mmol/day".to_string());
    out.push("- Mg: 8-20 mEq/day | Ca: 10-15 mEq/day".to_string());
    out.push("- Multivitamin + trace elements: 1 vial/day".to_string());
    if patient.fistula {
        out.push("- EXTRA ZINC: 10-20 mg/day (fistula losses)".to_string());
    }
    if patient.refeeding_risk {
        out.push("- THIAMINE: 100-200 mg IV (refeeding alert)".to_string());
    }

    out.push(String::new());
    out.push("MONITORING:".to_string());
    out.push("- Blood glucose 140-180 mg/dL.".to_string());
    out.push("- Triglycerides at 48-72 h (pause lipids if >400 mg/dL).".to_string());
    out.push("- Daily fluid balance and electrolytes during initiation.".to_string());

    out.join("\n")
}

/// Step-by-step prescribing guide with the patient's numbers filled in
pub fn guide(report: &Report) -> String {
    let anthro = &report.calculation.anthropometry;
    let req = &report.calculation.requirements;
    let dosing = &report.dosing;

    let mut out = Vec::new();
    out.push("HOW TO PRESCRIBE PARENTERAL NUTRITION".to_string());
    out.push("1. Assess the route: prefer enteral feeding (PN if enteral gives <60% after 5-7 days).".to_string());
    out.push(format!(
        "2. Calculation weight: {} -> {} kg.",
        if anthro.obese {
            "adjusted body weight (obesity)"
        } else {
            "actual weight"
        },
        one(anthro.calculation_weight_kg)
    ));
    out.push(format!(
        "3. Set energy: {} kcal/kg x {} kg = {} kcal. Start at {}% = {} kcal.",
        dosing.kcal_per_kg,
        one(anthro.calculation_weight_kg),
        whole(req.target_kcal),
        percent(dosing.start_fraction),
        whole(req.delivered_kcal)
    ));
    out.push(format!(
        "4. Protein: {} g/kg -> {} g (N {} g).",
        dosing.protein_per_kg,
        whole(req.protein_g),
        one(req.nitrogen_g)
    ));
    out.push(format!(
        "5. Non-protein: glucose {}% ({} g, {} mL dextrose 50%) and lipids {}% ({} g, {} mL lipids 20%).",
        glucose_share(dosing),
        whole(req.glucose_g),
        whole(req.glucose_ml),
        lipid_share(dosing),
        whole(req.lipid_g),
        whole(req.lipid_ml)
    ));
    out.push("6. Electrolytes: Na/K 1-2 mEq/kg; P 20-40 mmol; Mg 8-20 mEq. Add vitamins and trace elements.".to_string());
    out.push(format!(
        "7. Volume: {} mL at {} mL/h.",
        whole(req.total_volume_ml),
        whole(req.rate_ml_per_hour)
    ));
    out.push("8. Monitor: blood glucose 140-180 mg/dL, triglycerides < 400 mg/dL.".to_string());

    out.push(String::new());
    out.push("KEY PRECAUTIONS".to_string());
    out.push("- Maximum glucose: <= 5 g/kg/day (about <= 5 mg/kg/min). Give less with hyperglycemia or COPD.".to_string());
    out.push("- Lipids: 0.7-1.0 g/kg/day (max 1.5). If triglycerides >400 mg/dL, reduce or pause lipids.".to_string());
    out.push("- COPD / hypercapnia: favour a lower glucose share (e.g. 50-60% of non-protein) and stay within glucose limits to avoid extra CO2.".to_string());
    out.push("- Extra zinc: 10-20 mg/day with fistulas, large losses, diarrhea or burns.".to_string());
    out.push("- Refeeding risk / malnutrition: start at 25-50% plus thiamine 100-200 mg IV/day; monitor P, K and Mg closely.".to_string());

    out.push(String::new());
    out.push("COMMON PITFALLS".to_string());
    out.push("- Giving 100% of kcal from day 1: start at 70-80% and step up.".to_string());
    out.push("- Forgetting vitamins and trace elements.".to_string());
    out.push("- Exceeding 5 g/kg/day of glucose: hyperglycemia and extra CO2.".to_string());
    out.push("- Not watching phosphate early: refeeding risk.".to_string());
    out.push("- Ignoring obesity: dose on adjusted weight, not actual weight.".to_string());
    out.push("- Prioritise full protein even while calories are hypocaloric in the first days.".to_string());

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_report() -> Report {
        let (patient, dosing) = FormInput::default().resolve(&FormDefaults::default());
        Report::build(patient, dosing)
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(52.719, 0), 53.0);
        assert_eq!(round_to(22.857, 1), 22.9);
        assert_eq!(round_to(1.005, 2), 1.01);
        assert_eq!(round_to(2.675, 2), 2.68);
    }

    #[test]
    fn test_summary_standard_patient() {
        let text = summary(&standard_report());

        assert!(text.contains("BMI:                22.9"));
        assert!(text.contains("Calculation weight: 70.0 kg"));
        assert!(text.contains("1400 kcal (80% of 1750 kcal target)"));
        assert!(text.contains("1265 mL at 53 mL/h"));
        assert!(text.contains("Protein: 105 g -> 700 mL amino acids 15% (nitrogen 16.8 g)"));
        assert!(text.contains("Glucose: 187 g -> 375 mL dextrose 50%"));
        assert!(text.contains("Lipids:  38 g -> 191 mL lipids 20%"));
        assert!(text.contains("[OK] Glucose: 2.68 g/kg/day"));
        assert!(text.contains("[WARN] Lipids: 0.54 g/kg/day"));
        assert!(text.contains("All parameters within standard ranges."));
        assert!(!text.contains("Clinical context"));
    }

    #[test]
    fn test_summary_obese_patient_labels_adjusted_weight() {
        let form = FormInput {
            sex: Some(Sex::Female),
            weight_kg: Some(120.0),
            height_cm: Some(160.0),
            ..Default::default()
        };
        let (patient, dosing) = form.resolve(&FormDefaults::default());
        let text = summary(&Report::build(patient, dosing));

        assert!(text.contains("46.9  (obesity)"));
        assert!(text.contains("Calculation weight: AdjBW 69.5 kg"));
    }

    #[test]
    fn test_summary_lists_advisories() {
        let form = FormInput {
            refeeding_risk: true,
            fistula: true,
            stress: true,
            ..Default::default()
        };
        let (patient, dosing) = form.resolve(&FormDefaults::default());
        let text = summary(&Report::build(patient, dosing));

        assert!(text.contains("Clinical context"));
        assert!(text.contains("[WARN] Refeeding risk"));
        assert!(text.contains("[INFO] Fistula"));
        assert!(text.contains("Suggested for stress: 30 kcal/kg, 1.5 g/kg protein"));
        assert!(!text.contains("within standard ranges"));
    }

    #[test]
    fn test_order_document() {
        let text = order(&standard_report(), "2024-01-01 08:00");

        assert!(text.starts_with("PARENTERAL NUTRITION ORDER"));
        assert!(text.contains("Generated: 2024-01-01 08:00"));
        assert!(text.contains("Calculation weight: 70.0 kg (BMI 22.9)"));
        assert!(text.contains("Situation: Standard | No refeeding risk"));
        assert!(text.contains("DAILY DELIVERY (day at 80% of target):"));
        assert!(text.contains("1. Amino acids (15%): 700 mL"));
        assert!(text.contains("- Total volume:  1265 mL (plus additives)"));
        assert!(text.contains("- Infusion rate: 53 mL/h (over 24 h)"));
        assert!(!text.contains("EXTRA ZINC"));
        assert!(!text.contains("THIAMINE"));
    }

    #[test]
    fn test_order_adds_zinc_and_thiamine() {
        let form = FormInput {
            refeeding_risk: true,
            fistula: true,
            start_fraction: Some(0.4),
            ..Default::default()
        };
        let (patient, dosing) = form.resolve(&FormDefaults::default());
        let text = order(&Report::build(patient, dosing), "now");

        assert!(text.contains("Refeeding risk"));
        assert!(text.contains("day at 40% of target"));
        assert!(text.contains("EXTRA ZINC"));
        assert!(text.contains("THIAMINE"));
    }

    #[test]
    fn test_shares_add_up_to_one_hundred() {
        let form = FormInput {
            glucose_percent: Some(65.5),
            ..Default::default()
        };
        let (patient, dosing) = form.resolve(&FormDefaults::default());
        let report = Report::build(patient, dosing);

        let text = order(&report, "now");
        assert!(text.contains("(66% non-protein)"));
        assert!(text.contains("(34% non-protein)"));

        let text = summary(&report);
        assert!(text.contains("(34% of non-protein kcal)"));
    }

    #[test]
    fn test_guide_walks_through_standard_patient() {
        let text = guide(&standard_report());

        assert!(text.starts_with("HOW TO PRESCRIBE PARENTERAL NUTRITION"));
        assert!(text.contains("2. Calculation weight: actual weight -> 70.0 kg."));
        assert!(text.contains("3. Set energy: 25 kcal/kg x 70.0 kg = 1750 kcal. Start at 80% = 1400 kcal."));
        assert!(text.contains("4. Protein: 1.5 g/kg -> 105 g (N 16.8 g)."));
        assert!(text.contains("glucose 65% (187 g, 375 mL dextrose 50%) and lipids 35% (38 g, 191 mL lipids 20%)"));
        assert!(text.contains("7. Volume: 1265 mL at 53 mL/h."));
        assert!(text.contains("KEY PRECAUTIONS"));
        assert!(text.contains("Lipids: 0.7-1.0 g/kg/day (max 1.5)"));
        assert!(text.contains("triglycerides >400 mg/dL"));
    }

    #[test]
    fn test_guide_names_adjusted_weight_for_obesity() {
        let form = FormInput {
            sex: Some(Sex::Female),
            weight_kg: Some(120.0),
            height_cm: Some(160.0),
            ..Default::default()
        };
        let (patient, dosing) = form.resolve(&FormDefaults::default());
        let text = guide(&Report::build(patient, dosing));

        assert!(text.contains("adjusted body weight (obesity) -> 69.5 kg"));
    }
}
