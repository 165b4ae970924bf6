//! Regex extraction of numeric vitals from unstructured record text.
//!
//! The policy is "nearest number after an optional keyword, capped digit
//! width" — a pragmatic heuristic, deliberately not an NLP model. Keeping
//! the rules here, separate from the risk tiering, means they can be
//! swapped for a proper NER stage later without touching the tier policy.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BloodGroup, VitalsRecord};

/// Paired reading: optional label, then 2-3 digits / 2-3 digits.
/// Matches `150/90`, `140 / 90`, `bp 120/80`.
static BLOOD_PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:bp|pressure)?[^\d]*(\d{2,3})\s*/\s*(\d{2,3})").unwrap());

/// `sugar 200`, `glucose 180`, `rbs 140`, `fbs 100`, `levels 95`.
static SUGAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:sugar|glucose|rbs|fbs|ppbs|levels?)[^\d]*(\d{2,3})").unwrap());

/// `hr 80`, `pulse 100`, `bpm 90`.
static HEART_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:hr|pulse|rate|bpm)[^\d]*(\d{2,3})").unwrap());

/// `age 30`, `Age: 35`, `old 25`. Capped at two digits, so ages of 100
/// and above are never extracted — known limitation, kept deliberately.
static AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:age|old)[^\d]*(\d{1,2})").unwrap());

/// `175 cm`, `175cm`.
static HEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,3})\s*(?:cm|centimeters)").unwrap());

/// `70 kg`, `70kg`.
static WEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,3})\s*(?:kg|kilograms)").unwrap());

/// Letter group directly adjacent to an Rh sign: `O+`, `ab -`. Runs
/// against the original text, case-insensitively.
static BLOOD_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(a|b|ab|o)\s?([+-])").unwrap());

/// Word-form fallback on the normalized text: `o positive`, `ab negative`.
static BLOOD_GROUP_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(a|b|ab|o)\s+(positive|negative)").unwrap());

/// Lower-case the text and replace each separator that would break numeric
/// adjacency (`: - \n * #` — label colons, markdown artifacts) with a
/// single space. Applied before every pattern except the adjacent
/// blood-group rule, which needs the original text.
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            ':' | '-' | '\n' | '*' | '#' => ' ',
            other => other,
        })
        .collect()
}

/// Parse free text into a structured vitals record.
///
/// Each rule is independent and first-match-wins; anything that does not
/// match simply stays absent. This never fails — uninformative text yields
/// an all-absent record.
pub fn extract_vitals(raw_text: &str) -> VitalsRecord {
    let clean = normalize(raw_text);
    tracing::debug!(
        snippet = %clean.chars().take(200).collect::<String>(),
        "parsing record text"
    );

    let mut vitals = VitalsRecord::default();

    // Both halves of the reading come from one match, or neither does.
    if let Some(caps) = BLOOD_PRESSURE.captures(&clean) {
        if let (Ok(sys), Ok(dia)) = (caps[1].parse(), caps[2].parse()) {
            vitals.systolic = Some(sys);
            vitals.diastolic = Some(dia);
        }
    }

    vitals.sugar = first_number(&SUGAR, &clean);
    vitals.heart_rate = first_number(&HEART_RATE, &clean);
    vitals.age = first_number(&AGE, &clean);
    vitals.height = first_number(&HEIGHT, &clean);
    vitals.weight = first_number(&WEIGHT, &clean);
    vitals.blood_group = extract_blood_group(raw_text, &clean);

    tracing::debug!(?vitals, "extracted vitals");
    vitals
}

fn first_number(pattern: &Regex, text: &str) -> Option<u16> {
    pattern.captures(text).and_then(|caps| caps[1].parse().ok())
}

/// Adjacent form (`O+`) takes precedence; the word form (`o positive`) is
/// only attempted when the adjacent form finds nothing.
fn extract_blood_group(raw_text: &str, clean: &str) -> Option<BloodGroup> {
    if let Some(caps) = BLOOD_GROUP.captures(raw_text) {
        return BloodGroup::from_parts(&caps[1].to_uppercase(), &caps[2] == "+");
    }
    let caps = BLOOD_GROUP_WORD.captures(clean)?;
    BloodGroup::from_parts(&caps[1].to_uppercase(), &caps[2] == "positive")
}
