use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ABO/Rh blood group — the eight combinations the extractor can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    /// Build from an upper-cased letter group and Rh sign.
    pub(crate) fn from_parts(letters: &str, rh_positive: bool) -> Option<Self> {
        Some(match (letters, rh_positive) {
            ("A", true) => BloodGroup::APositive,
            ("A", false) => BloodGroup::ANegative,
            ("B", true) => BloodGroup::BPositive,
            ("B", false) => BloodGroup::BNegative,
            ("AB", true) => BloodGroup::AbPositive,
            ("AB", false) => BloodGroup::AbNegative,
            ("O", true) => BloodGroup::OPositive,
            ("O", false) => BloodGroup::ONegative,
            _ => return None,
        })
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured vitals pulled out of one record's free text.
///
/// Every field is optional — absent means the pattern did not match,
/// never a zero sentinel. Systolic and diastolic come from a single
/// paired pattern, so they are either both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsRecord {
    /// Systolic blood pressure, mmHg.
    pub systolic: Option<u16>,
    /// Diastolic blood pressure, mmHg.
    pub diastolic: Option<u16>,
    /// Blood sugar, mg/dL.
    pub sugar: Option<u16>,
    /// Heart rate, beats/min.
    pub heart_rate: Option<u16>,
    /// Age in years.
    pub age: Option<u16>,
    /// Height, cm.
    pub height: Option<u16>,
    /// Weight, kg.
    pub weight: Option<u16>,
    pub blood_group: Option<BloodGroup>,
}

impl VitalsRecord {
    pub fn has_blood_pressure(&self) -> bool {
        self.systolic.is_some() && self.diastolic.is_some()
    }

    /// Combined `"systolic/diastolic"` rendering, present only when both
    /// halves of the reading were extracted.
    pub fn blood_pressure_display(&self) -> Option<String> {
        match (self.systolic, self.diastolic) {
            (Some(sys), Some(dia)) => Some(format!("{sys}/{dia}")),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == VitalsRecord::default()
    }

    /// Whether the record carries at least one of the metrics charted on
    /// the history timeline (BP, sugar, heart rate, weight).
    pub fn has_chartable_metric(&self) -> bool {
        self.systolic.is_some()
            || self.sugar.is_some()
            || self.heart_rate.is_some()
            || self.weight.is_some()
    }

    /// Presentation form embedded in a [`RiskAssessment`].
    pub fn summary(&self) -> VitalsSummary {
        VitalsSummary {
            bp: self.blood_pressure_display(),
            sugar: self.sugar,
            heart_rate: self.heart_rate,
            height: self.height,
            weight: self.weight,
            age: self.age,
            blood_group: self.blood_group,
        }
    }

    /// Dated chart sample for the vitals history timeline, or `None` when
    /// the record has no chartable metric.
    pub fn trend_point(&self, date: NaiveDate) -> Option<TrendPoint> {
        if !self.has_chartable_metric() {
            return None;
        }
        Some(TrendPoint {
            date,
            systolic: self.systolic,
            diastolic: self.diastolic,
            sugar: self.sugar,
            heart_rate: self.heart_rate,
            weight: self.weight,
        })
    }
}

/// Coarse triage tier.
///
/// The derived ordering (`Healthy < Warning < Critical`) is what the
/// threshold ladder escalates over; `InsufficientData` sits outside the
/// severity scale and is never an input to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Healthy,
    Warning,
    Critical,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Healthy => "Healthy",
            RiskLevel::Warning => "Warning",
            RiskLevel::Critical => "Critical",
            RiskLevel::InsufficientData => "Insufficient Data",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vitals as echoed back to the caller, with blood pressure collapsed to
/// its combined string form. Absent fields serialize as `null` so the
/// response shape is stable regardless of what was extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsSummary {
    pub bp: Option<String>,
    pub sugar: Option<u16>,
    pub heart_rate: Option<u16>,
    pub height: Option<u16>,
    pub weight: Option<u16>,
    pub age: Option<u16>,
    pub blood_group: Option<BloodGroup>,
}

/// Result of a triage run: the tier plus the vitals that drove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub vitals_detected: VitalsSummary,
}

/// One sample on the vitals history chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,
    pub sugar: Option<u16>,
    pub heart_rate: Option<u16>,
    pub weight: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_group_round_trip() {
        let json = serde_json::to_string(&BloodGroup::OPositive).unwrap();
        assert_eq!(json, "\"O+\"");
        let back: BloodGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BloodGroup::OPositive);
    }

    #[test]
    fn blood_group_from_parts_rejects_unknown_letters() {
        assert_eq!(BloodGroup::from_parts("AB", false), Some(BloodGroup::AbNegative));
        assert_eq!(BloodGroup::from_parts("C", true), None);
    }

    #[test]
    fn risk_level_severity_ordering() {
        assert!(RiskLevel::Healthy < RiskLevel::Warning);
        assert!(RiskLevel::Warning < RiskLevel::Critical);
        assert_eq!(
            RiskLevel::Healthy.max(RiskLevel::Critical),
            RiskLevel::Critical
        );
    }

    #[test]
    fn insufficient_data_serializes_with_space() {
        let json = serde_json::to_string(&RiskLevel::InsufficientData).unwrap();
        assert_eq!(json, "\"Insufficient Data\"");
    }

    #[test]
    fn bp_display_requires_both_halves() {
        let mut vitals = VitalsRecord::default();
        assert_eq!(vitals.blood_pressure_display(), None);

        vitals.systolic = Some(150);
        vitals.diastolic = Some(90);
        assert_eq!(vitals.blood_pressure_display().as_deref(), Some("150/90"));
    }

    #[test]
    fn summary_serializes_absent_fields_as_null() {
        let vitals = VitalsRecord {
            sugar: Some(140),
            ..VitalsRecord::default()
        };
        let json = serde_json::to_value(vitals.summary()).unwrap();
        assert_eq!(json["sugar"], 140);
        assert!(json["bp"].is_null());
        assert!(json["blood_group"].is_null());
    }

    #[test]
    fn trend_point_requires_a_chartable_metric() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let only_age = VitalsRecord {
            age: Some(40),
            ..VitalsRecord::default()
        };
        assert!(only_age.trend_point(date).is_none());

        let with_weight = VitalsRecord {
            weight: Some(70),
            ..VitalsRecord::default()
        };
        let point = with_weight.trend_point(date).unwrap();
        assert_eq!(point.weight, Some(70));
        assert_eq!(point.date, date);
    }
}
