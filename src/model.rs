//! Trained multi-class risk model: a small deterministic ensemble of CART
//! decision trees fitted once at startup on a fixed labeled dataset.
//!
//! The model is only consulted when a full feature vector is available;
//! partial vitals go through the threshold ladder in [`crate::rules`]
//! instead. Exact architecture is not load-bearing — the contract is a
//! three-class output that tracks blood-pressure and sugar severity.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::types::RiskLevel;
use crate::TriageError;

/// Feature layout: `[systolic, diastolic, sugar, heart rate, age]`.
pub const FEATURE_COUNT: usize = 5;

/// Fixed-width input to [`RiskModel::predict`]. The width is enforced by
/// the type, so a malformed vector cannot reach the model.
pub type FeatureVector = [f64; FEATURE_COUNT];

const SEVERITY_CLASSES: usize = 3;
const TREE_COUNT: usize = 25;
const RNG_SEED: u64 = 42;
/// Features considered per split before falling back to the full set.
const SPLIT_FEATURES: usize = 3;

/// Labeled feature rows the model is fitted on.
pub struct TrainingSet {
    pub features: Vec<FeatureVector>,
    pub labels: Vec<RiskLevel>,
}

/// The fixed seed dataset correlating vitals combinations with risk tier:
/// normal ranges are healthy, moderately elevated or low readings warn,
/// and high blood pressure or sugar (or both combined) are critical.
pub fn seed_training_set() -> TrainingSet {
    TrainingSet {
        features: vec![
            [120.0, 80.0, 90.0, 72.0, 25.0],   // normal adult
            [110.0, 70.0, 85.0, 68.0, 30.0],   // normal adult
            [150.0, 95.0, 200.0, 85.0, 50.0],  // high bp + high sugar
            [160.0, 100.0, 180.0, 90.0, 60.0], // very high bp
            [130.0, 85.0, 140.0, 75.0, 45.0],  // slightly elevated
            [140.0, 90.0, 250.0, 80.0, 55.0],  // diabetes risk
            [90.0, 60.0, 80.0, 65.0, 22.0],    // low bp
        ],
        labels: vec![
            RiskLevel::Healthy,
            RiskLevel::Healthy,
            RiskLevel::Critical,
            RiskLevel::Critical,
            RiskLevel::Warning,
            RiskLevel::Critical,
            RiskLevel::Warning,
        ],
    }
}

/// Trained ensemble. Immutable after [`RiskModel::train`]; safe to share
/// across threads for concurrent prediction.
pub struct RiskModel {
    trees: Vec<DecisionTree>,
}

impl RiskModel {
    /// Fit the ensemble. Each tree considers a random feature subset at
    /// every split (seeded, so training is reproducible) and is grown to
    /// purity on the full dataset, which keeps inference deterministic
    /// and faithful to the seed labels.
    pub fn train(dataset: &TrainingSet) -> Result<Self, TriageError> {
        if dataset.features.is_empty() {
            return Err(TriageError::EmptyTrainingSet);
        }
        if dataset.features.len() != dataset.labels.len() {
            return Err(TriageError::LabelMismatch {
                features: dataset.features.len(),
                labels: dataset.labels.len(),
            });
        }
        if let Some(row) = dataset
            .labels
            .iter()
            .position(|label| severity_index(*label).is_none())
        {
            return Err(TriageError::NonSeverityLabel { row });
        }

        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let trees = (0..TREE_COUNT)
            .map(|_| DecisionTree::grow(dataset, &mut rng))
            .collect();

        tracing::info!(
            trees = TREE_COUNT,
            samples = dataset.features.len(),
            "risk model trained"
        );
        Ok(Self { trees })
    }

    /// Majority vote across the ensemble. Ties resolve to the lower
    /// severity.
    pub fn predict(&self, features: FeatureVector) -> RiskLevel {
        let mut votes = [0usize; SEVERITY_CLASSES];
        for tree in &self.trees {
            let class = severity_index(tree.predict(&features))
                .unwrap_or_else(|| unreachable!("leaves only carry validated labels"));
            votes[class] += 1;
        }

        let mut winner = 0;
        for class in 1..SEVERITY_CLASSES {
            if votes[class] > votes[winner] {
                winner = class;
            }
        }
        severity_label(winner)
    }
}

fn severity_index(level: RiskLevel) -> Option<usize> {
    match level {
        RiskLevel::Healthy => Some(0),
        RiskLevel::Warning => Some(1),
        RiskLevel::Critical => Some(2),
        RiskLevel::InsufficientData => None,
    }
}

fn severity_label(class: usize) -> RiskLevel {
    match class {
        0 => RiskLevel::Healthy,
        1 => RiskLevel::Warning,
        _ => RiskLevel::Critical,
    }
}

// ---------------------------------------------------------------------------
// CART tree
// ---------------------------------------------------------------------------

enum Node {
    Leaf(RiskLevel),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    fn grow(dataset: &TrainingSet, rng: &mut StdRng) -> Self {
        let indices: Vec<usize> = (0..dataset.features.len()).collect();
        DecisionTree {
            root: build_node(dataset, &indices, rng),
        }
    }

    fn predict(&self, features: &FeatureVector) -> RiskLevel {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(label) => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn build_node(dataset: &TrainingSet, indices: &[usize], rng: &mut StdRng) -> Node {
    let counts = label_counts(dataset, indices);
    if let Some(label) = pure_label(&counts) {
        return Node::Leaf(label);
    }

    // Random subspace per split; fall back to the full feature set so a
    // tree never stops short of purity when a separating split exists.
    let subset = rand::seq::index::sample(rng, FEATURE_COUNT, SPLIT_FEATURES).into_vec();
    let all: Vec<usize> = (0..FEATURE_COUNT).collect();
    let split = best_split(dataset, indices, &subset)
        .or_else(|| best_split(dataset, indices, &all));

    match split {
        None => Node::Leaf(majority_label(&counts)),
        Some(split) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| dataset.features[i][split.feature] <= split.threshold);
            Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(build_node(dataset, &left_idx, rng)),
                right: Box::new(build_node(dataset, &right_idx, rng)),
            }
        }
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Exhaustive search over midpoint thresholds of the given features,
/// minimizing weighted Gini impurity. Returns `None` when no candidate
/// separates the indices into two non-empty sides.
fn best_split(dataset: &TrainingSet, indices: &[usize], features: &[usize]) -> Option<Split> {
    let mut best: Option<Split> = None;

    for &feature in features {
        let mut values: Vec<f64> = indices
            .iter()
            .map(|&i| dataset.features[i][feature])
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| dataset.features[i][feature] <= threshold);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let impurity = weighted_gini(dataset, &left, &right);
            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(Split {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}

fn weighted_gini(dataset: &TrainingSet, left: &[usize], right: &[usize]) -> f64 {
    let total = (left.len() + right.len()) as f64;
    (left.len() as f64 / total) * gini(&label_counts(dataset, left), left.len())
        + (right.len() as f64 / total) * gini(&label_counts(dataset, right), right.len())
}

fn gini(counts: &[usize; SEVERITY_CLASSES], total: usize) -> f64 {
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum::<f64>()
}

fn label_counts(dataset: &TrainingSet, indices: &[usize]) -> [usize; SEVERITY_CLASSES] {
    let mut counts = [0usize; SEVERITY_CLASSES];
    for &i in indices {
        if let Some(class) = severity_index(dataset.labels[i]) {
            counts[class] += 1;
        }
    }
    counts
}

fn pure_label(counts: &[usize; SEVERITY_CLASSES]) -> Option<RiskLevel> {
    let mut found = None;
    for (class, &count) in counts.iter().enumerate() {
        if count > 0 {
            if found.is_some() {
                return None;
            }
            found = Some(severity_label(class));
        }
    }
    found
}

/// Most common label; ties resolve to the lower severity.
fn majority_label(counts: &[usize; SEVERITY_CLASSES]) -> RiskLevel {
    let mut winner = 0;
    for class in 1..SEVERITY_CLASSES {
        if counts[class] > counts[winner] {
            winner = class;
        }
    }
    severity_label(winner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_seed_labels() {
        let dataset = seed_training_set();
        let model = RiskModel::train(&dataset).unwrap();
        for (features, expected) in dataset.features.iter().zip(&dataset.labels) {
            assert_eq!(model.predict(*features), *expected);
        }
    }

    #[test]
    fn extreme_readings_classify_critical() {
        let model = RiskModel::train(&seed_training_set()).unwrap();
        assert_eq!(
            model.predict([190.0, 120.0, 260.0, 90.0, 60.0]),
            RiskLevel::Critical
        );
    }

    #[test]
    fn training_is_deterministic() {
        let dataset = seed_training_set();
        let a = RiskModel::train(&dataset).unwrap();
        let b = RiskModel::train(&dataset).unwrap();
        let probe: FeatureVector = [135.0, 88.0, 150.0, 78.0, 48.0];
        assert_eq!(a.predict(probe), b.predict(probe));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let dataset = TrainingSet {
            features: vec![],
            labels: vec![],
        };
        assert!(matches!(
            RiskModel::train(&dataset),
            Err(crate::TriageError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let dataset = TrainingSet {
            features: vec![[120.0, 80.0, 90.0, 72.0, 25.0]],
            labels: vec![],
        };
        assert!(matches!(
            RiskModel::train(&dataset),
            Err(crate::TriageError::LabelMismatch { features: 1, labels: 0 })
        ));
    }

    #[test]
    fn insufficient_data_label_is_rejected() {
        let dataset = TrainingSet {
            features: vec![[120.0, 80.0, 90.0, 72.0, 25.0]],
            labels: vec![RiskLevel::InsufficientData],
        };
        assert!(matches!(
            RiskModel::train(&dataset),
            Err(crate::TriageError::NonSeverityLabel { row: 0 })
        ));
    }
}
