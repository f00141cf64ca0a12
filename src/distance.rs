//! Feature-weighted geometric distance between two landmark sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::types::LandmarkLabel;
use crate::types::LandmarkSet;

/// Weight used for a label a configured table does not list.
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// Per-label importance used when averaging point distances.
///
/// Serialized as a map from label name to weight; labels left out of a
/// configured map get [`DEFAULT_WEIGHT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<LandmarkLabel, f32>",
    into = "BTreeMap<LandmarkLabel, f32>"
)]
pub struct WeightTable {
    weights: [f32; LandmarkLabel::COUNT],
}

impl WeightTable {
    /// Eyes dominate, then mouth corners and nose, then brows and lips.
    pub const DEFAULT: WeightTable = WeightTable {
        weights: [
            2.0, // LEFT_EYE
            2.0, // RIGHT_EYE
            1.5, // NOSE_BASE
            1.5, // MOUTH_LEFT
            1.5, // MOUTH_RIGHT
            1.0, // LEFT_EAR
            1.0, // RIGHT_EAR
            1.0, // LEFT_CHEEK
            1.0, // RIGHT_CHEEK
            1.0, // FACE_CONTOUR
            1.2, // LEFT_EYEBROW_TOP
            1.2, // RIGHT_EYEBROW_TOP
            1.3, // NOSE_BRIDGE
            1.2, // UPPER_LIP_TOP
            1.2, // LOWER_LIP_BOTTOM
        ],
    };

    /// Every label weighted [`DEFAULT_WEIGHT`].
    pub const UNIFORM: WeightTable = WeightTable {
        weights: [DEFAULT_WEIGHT; LandmarkLabel::COUNT],
    };

    pub fn weight(&self, label: LandmarkLabel) -> f32 {
        self.weights[label.index()]
    }

    /// Return a copy with `label` reweighted. Weights must be finite and positive.
    pub fn with_weight(mut self, label: LandmarkLabel, weight: f32) -> Result<Self> {
        check_weight(label, weight)?;
        self.weights[label.index()] = weight;
        Ok(self)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_weight(label: LandmarkLabel, weight: f32) -> Result<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "weight for {label} must be positive, got {weight}"
        )))
    }
}

impl TryFrom<BTreeMap<LandmarkLabel, f32>> for WeightTable {
    type Error = Error;

    fn try_from(map: BTreeMap<LandmarkLabel, f32>) -> Result<Self> {
        map.into_iter()
            .try_fold(Self::UNIFORM, |table, (label, weight)| {
                table.with_weight(label, weight)
            })
    }
}

impl From<WeightTable> for BTreeMap<LandmarkLabel, f32> {
    fn from(table: WeightTable) -> Self {
        LandmarkLabel::ALL
            .iter()
            .map(|label| (*label, table.weight(*label)))
            .collect()
    }
}

/// What to do when the two sets hold different numbers of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMismatchPolicy {
    /// Score the pair as completely dissimilar.
    #[default]
    ZeroScore,
    /// Fail with [`Error::LabelCountMismatch`].
    Reject,
}

/// Label counts of a pair that could not be compared point for point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub left: usize,
    pub right: usize,
}

/// Outcome of the weighted distance comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceScore {
    /// `1 / (1 + average weighted distance)`, or 0 for a count mismatch.
    pub similarity: f32,
    /// Sum of the weights of the compared labels.
    pub weight_used: f32,
    /// Number of labels present in both sets.
    pub compared: usize,
    /// Set when the pair was scored 0 because the label counts differ.
    pub mismatch: Option<LabelCounts>,
}

/// Compare two landmark sets by weighted average point distance after
/// normalization.
///
/// Labels present in only one set are skipped.
pub fn distance_score(
    a: &LandmarkSet,
    b: &LandmarkSet,
    config: &ScoringConfig,
) -> Result<DistanceScore> {
    let (left, right) = (a.len(), b.len());
    if left != right {
        return match config.label_mismatch {
            LabelMismatchPolicy::ZeroScore => Ok(DistanceScore {
                similarity: 0.0,
                weight_used: 0.0,
                compared: 0,
                mismatch: Some(LabelCounts { left, right }),
            }),
            LabelMismatchPolicy::Reject => Err(Error::LabelCountMismatch { left, right }),
        };
    }

    let norm_a = normalize(a, config.degenerate_axis)?;
    let norm_b = normalize(b, config.degenerate_axis)?;

    let mut weighted_sum = 0.0f32;
    let mut total_weight = 0.0f32;
    let mut compared = 0;

    for (label, pa) in norm_a.iter() {
        let Some(pb) = norm_b.get(label) else {
            continue;
        };
        let weight = config.weights.weight(label);
        weighted_sum += pa.distance(&pb) * weight;
        total_weight += weight;
        compared += 1;
    }

    if total_weight <= 0.0 {
        return Err(Error::NoOverlappingLabels);
    }

    let average = weighted_sum / total_weight;
    Ok(DistanceScore {
        similarity: 1.0 / (1.0 + average),
        weight_used: total_weight,
        compared,
        mismatch: None,
    })
}
