//! Vitals triage core: pulls structured vitals (blood pressure, glucose,
//! heart rate, age, height, weight, blood group) out of free-text medical
//! records and produces a coarse risk tier.
//!
//! The crate is pure computation with no I/O: callers hand in record
//! texts (typically extracted upstream from PDFs) and get back a
//! [`RiskAssessment`]. Risk comes from a trained multi-class model when
//! blood pressure, sugar and age are all present, and from a deterministic
//! threshold ladder when only some of them are.
//!
//! ```
//! use triage_core::{RiskLevel, TriageEngine};
//!
//! let engine = TriageEngine::new()?;
//! let result = engine.assess_risk(&["Patient BP is 150/90 and sugar is 200mg/dl"]);
//! assert_eq!(result.risk_level, RiskLevel::Critical);
//! # Ok::<(), triage_core::TriageError>(())
//! ```

pub mod engine;
pub mod extract;
pub mod model;
pub mod rules;
pub mod types;

use thiserror::Error;

/// Failures constructing the triage engine. Assessment itself never
/// fails — uninformative input degrades to
/// [`RiskLevel::InsufficientData`](types::RiskLevel::InsufficientData).
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training set has {features} feature rows but {labels} labels")]
    LabelMismatch { features: usize, labels: usize },

    #[error("training label at row {row} is not a concrete severity")]
    NonSeverityLabel { row: usize },
}

pub use engine::TriageEngine;
pub use extract::extract_vitals;
pub use types::{
    BloodGroup, RiskAssessment, RiskLevel, TrendPoint, VitalsRecord, VitalsSummary,
};
