//! Strategy selection: trained model when the feature vector is complete,
//! threshold ladder when only blood pressure or sugar is present,
//! `InsufficientData` otherwise.

use crate::extract::extract_vitals;
use crate::model::{seed_training_set, FeatureVector, RiskModel};
use crate::rules;
use crate::types::{RiskAssessment, RiskLevel};
use crate::TriageError;

/// Substituted when the model needs a full feature vector but no heart
/// rate was extracted (resting adult default, beats/min).
const DEFAULT_HEART_RATE: f64 = 72.0;

/// Stateless triage engine wrapping the trained risk model.
///
/// Constructed once at process startup; immutable afterwards, so a shared
/// reference can serve concurrent assessments without locking.
pub struct TriageEngine {
    model: RiskModel,
}

impl TriageEngine {
    /// Train the risk model on the seed dataset. The only failure mode is
    /// a malformed dataset, which is a programming error surfaced here
    /// rather than at assessment time.
    pub fn new() -> Result<Self, TriageError> {
        let model = RiskModel::train(&seed_training_set())?;
        Ok(TriageEngine { model })
    }

    /// Assess risk across a set of record texts.
    ///
    /// The records are concatenated with single spaces (an empty slice is
    /// valid and yields an empty text), vitals are extracted once from the
    /// combined text, and the strategy is selected from field
    /// completeness. This never fails — uninformative input degrades to
    /// [`RiskLevel::InsufficientData`], which callers must treat as a
    /// normal outcome.
    pub fn assess_risk<S: AsRef<str>>(&self, records: &[S]) -> RiskAssessment {
        let full_text = records
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(" ");
        let vitals = extract_vitals(&full_text);

        let bp = vitals.systolic.zip(vitals.diastolic);
        let risk_level = match (bp, vitals.sugar, vitals.age) {
            (Some((sys, dia)), Some(sugar), Some(age)) => {
                let heart_rate = vitals.heart_rate.map_or(DEFAULT_HEART_RATE, f64::from);
                let features: FeatureVector = [
                    f64::from(sys),
                    f64::from(dia),
                    f64::from(sugar),
                    heart_rate,
                    f64::from(age),
                ];
                tracing::debug!(?features, "full feature vector, using trained model");
                self.model.predict(features)
            }
            (bp, sugar, _) if bp.is_some() || sugar.is_some() => {
                tracing::debug!("partial vitals, using threshold rules");
                rules::escalate(&vitals)
            }
            _ => {
                tracing::debug!("no usable vitals found");
                RiskLevel::InsufficientData
            }
        };

        RiskAssessment {
            risk_level,
            vitals_detected: vitals.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TriageEngine {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        TriageEngine::new().unwrap()
    }

    #[test]
    fn full_features_normal_ranges_are_healthy() {
        let result = engine().assess_risk(&["bp 120/80 sugar 90 age 25"]);
        assert_eq!(result.risk_level, RiskLevel::Healthy);
        assert_eq!(result.vitals_detected.bp.as_deref(), Some("120/80"));
    }

    #[test]
    fn full_features_severe_readings_are_critical() {
        let result = engine().assess_risk(&["bp 160/100 sugar 180 age 60"]);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    /// Regression: age alone does not qualify for the model path, and
    /// 160/100 sits below the crisis thresholds.
    #[test]
    fn elevated_bp_without_sugar_falls_back_to_warning() {
        let result = engine().assess_risk(&["bp 160/100 age 60"]);
        assert_eq!(result.risk_level, RiskLevel::Warning);
        assert_eq!(result.vitals_detected.age, Some(60));
    }

    #[test]
    fn no_numbers_means_insufficient_data() {
        let result = engine().assess_risk(&["just a normal note with no numbers"]);
        assert_eq!(result.risk_level, RiskLevel::InsufficientData);
        assert!(result.vitals_detected.bp.is_none());
        assert!(result.vitals_detected.sugar.is_none());
    }

    #[test]
    fn empty_record_set_is_insufficient_data() {
        let result = engine().assess_risk(&[] as &[&str]);
        assert_eq!(result.risk_level, RiskLevel::InsufficientData);
    }

    #[test]
    fn only_secondary_vitals_is_insufficient_data() {
        // Height/weight/age populate the echo but select no strategy.
        let result = engine().assess_risk(&["age 40, height 170 cm, weight 80 kg"]);
        assert_eq!(result.risk_level, RiskLevel::InsufficientData);
        assert_eq!(result.vitals_detected.age, Some(40));
        assert_eq!(result.vitals_detected.height, Some(170));
        assert_eq!(result.vitals_detected.weight, Some(80));
    }

    #[test]
    fn vitals_are_pooled_across_records() {
        let result = engine().assess_risk(&["bp 145/92", "glucose 150"]);
        assert_eq!(result.risk_level, RiskLevel::Warning);
        assert_eq!(result.vitals_detected.bp.as_deref(), Some("145/92"));
        assert_eq!(result.vitals_detected.sugar, Some(150));
    }

    #[test]
    fn assessment_is_idempotent() {
        let records = ["bp 150/95 sugar 210 pulse 88"];
        let eng = engine();
        assert_eq!(eng.assess_risk(&records), eng.assess_risk(&records));
    }

    #[test]
    fn ladder_path_is_monotone_in_bp() {
        let eng = engine();
        let levels: Vec<RiskLevel> = ["bp 120/80", "bp 150/95", "bp 185/125"]
            .iter()
            .map(|text| eng.assess_risk(&[text]).risk_level)
            .collect();
        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn assessment_serializes_with_stable_shape() {
        let result = engine().assess_risk(&["sugar 240"]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["risk_level"], "Critical");
        assert_eq!(json["vitals_detected"]["sugar"], 240);
        assert!(json["vitals_detected"]["bp"].is_null());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<TriageEngine>();
    }
}
