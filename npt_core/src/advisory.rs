//! Clinical context advisories.
//!
//! Refeeding risk, COPD and fistula flags never change the numbers; they
//! produce guidance shown alongside the prescription.

use crate::{DosingInput, PatientInput, SafetyResult};
use serde::Serialize;

/// Suggested targets for a stressed (septic / trauma) patient
pub const STRESS_KCAL_PER_KG: f64 = 30.0;
pub const STRESS_PROTEIN_PER_KG: f64 = 1.5;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    RefeedingRisk,
    Copd,
    Fistula,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// A piece of guidance triggered by the clinical context
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub severity: Severity,
    pub message: String,
}

/// Suggested dosing targets for a stressed patient
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Suggestion {
    pub kcal_per_kg: f64,
    pub protein_per_kg: f64,
}

/// Advisories for the patient's context, in display order
pub fn context_advisories(patient: &PatientInput, dosing: &DosingInput) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if patient.refeeding_risk {
        advisories.push(Advisory {
            kind: AdvisoryKind::RefeedingRisk,
            severity: Severity::Warning,
            message: format!(
                "Refeeding risk: start at 25-50% (current {}%). Add IV thiamine 100-200 mg.",
                (dosing.start_fraction * 100.0).round()
            ),
        });
    }

    if patient.copd {
        advisories.push(Advisory {
            kind: AdvisoryKind::Copd,
            severity: Severity::Warning,
            message: "COPD: avoid glucose overload (keep glucose below 50-60% of non-protein calories)."
                .into(),
        });
    }

    if patient.fistula {
        advisories.push(Advisory {
            kind: AdvisoryKind::Fistula,
            severity: Severity::Info,
            message: "Fistula: consider extra zinc (10-20 mg/day).".into(),
        });
    }

    advisories
}

/// Whether the draft needs no special attention
///
/// Fistula is informational only and does not clear this flag.
pub fn within_standard_ranges(safety: &SafetyResult, patient: &PatientInput) -> bool {
    safety.glucose.ok && safety.lipids.ok && !patient.refeeding_risk && !patient.copd
}

pub fn stress_suggestion(stress: bool) -> Option<Suggestion> {
    stress.then_some(Suggestion {
        kcal_per_kg: STRESS_KCAL_PER_KG,
        protein_per_kg: STRESS_PROTEIN_PER_KG,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::assess_safety;
    use crate::Sex;

    fn patient() -> PatientInput {
        PatientInput {
            age_years: 65.0,
            sex: Sex::Male,
            weight_kg: 70.0,
            height_cm: 175.0,
            stress: false,
            refeeding_risk: false,
            copd: false,
            fistula: false,
        }
    }

    fn dosing() -> DosingInput {
        DosingInput {
            kcal_per_kg: 25.0,
            protein_per_kg: 1.5,
            start_fraction: 0.8,
            glucose_percent: 65.0,
            amino_acid_percent: 15.0,
        }
    }

    #[test]
    fn test_no_flags_no_advisories() {
        assert!(context_advisories(&patient(), &dosing()).is_empty());
    }

    #[test]
    fn test_refeeding_reports_current_start() {
        let mut p = patient();
        p.refeeding_risk = true;
        let mut d = dosing();
        d.start_fraction = 0.35;

        let advisories = context_advisories(&p, &d);

        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].kind, AdvisoryKind::RefeedingRisk);
        assert_eq!(advisories[0].severity, Severity::Warning);
        assert!(advisories[0].message.contains("current 35%"));
        assert!(advisories[0].message.contains("thiamine"));
    }

    #[test]
    fn test_all_flags_in_order() {
        let mut p = patient();
        p.refeeding_risk = true;
        p.copd = true;
        p.fistula = true;

        let kinds: Vec<_> = context_advisories(&p, &dosing())
            .into_iter()
            .map(|a| a.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                AdvisoryKind::RefeedingRisk,
                AdvisoryKind::Copd,
                AdvisoryKind::Fistula
            ]
        );
    }

    #[test]
    fn test_standard_ranges_banner() {
        let safe = assess_safety(187.0, 56.0, 70.0);
        let mut p = patient();
        assert!(within_standard_ranges(&safe, &p));

        p.fistula = true;
        assert!(within_standard_ranges(&safe, &p));

        p.copd = true;
        assert!(!within_standard_ranges(&safe, &p));

        let unsafe_glucose = assess_safety(400.0, 56.0, 70.0);
        assert!(!within_standard_ranges(&unsafe_glucose, &patient()));
    }

    #[test]
    fn test_stress_suggestion() {
        assert_eq!(stress_suggestion(false), None);

        let s = stress_suggestion(true).unwrap();
        assert_eq!(s.kcal_per_kg, 30.0);
        assert_eq!(s.protein_per_kg, 1.5);
    }
}
