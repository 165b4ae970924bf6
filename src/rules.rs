//! Threshold ladder used when only partial vitals are available.

use crate::types::{RiskLevel, VitalsRecord};

/// Hypertensive crisis thresholds, mmHg.
const BP_CRITICAL_SYSTOLIC: u16 = 180;
const BP_CRITICAL_DIASTOLIC: u16 = 120;
/// Stage-2 hypertension thresholds, mmHg.
const BP_WARNING_SYSTOLIC: u16 = 140;
const BP_WARNING_DIASTOLIC: u16 = 90;
/// Blood sugar thresholds, mg/dL.
const SUGAR_CRITICAL: u16 = 200;
const SUGAR_WARNING: u16 = 140;

/// Escalate from `Healthy` on blood pressure and sugar severity, taking
/// the maximum across both checks. Heart rate, age, height and weight
/// never escalate here; heart rate and age only matter on the trained
/// model path.
pub fn escalate(vitals: &VitalsRecord) -> RiskLevel {
    let mut level = RiskLevel::Healthy;

    if let (Some(sys), Some(dia)) = (vitals.systolic, vitals.diastolic) {
        if sys >= BP_CRITICAL_SYSTOLIC || dia >= BP_CRITICAL_DIASTOLIC {
            level = level.max(RiskLevel::Critical);
        } else if sys >= BP_WARNING_SYSTOLIC || dia >= BP_WARNING_DIASTOLIC {
            level = level.max(RiskLevel::Warning);
        }
    }

    if let Some(sugar) = vitals.sugar {
        if sugar >= SUGAR_CRITICAL {
            level = level.max(RiskLevel::Critical);
        } else if sugar >= SUGAR_WARNING {
            level = level.max(RiskLevel::Warning);
        }
    }

    level
}
