use serde::{Deserialize, Serialize};

use crate::combine::BlendWeights;
use crate::distance::{LabelMismatchPolicy, WeightTable};
use crate::error::Result;
use crate::normalize::DegenerateAxisPolicy;

/// Tunables for a face comparison.
///
/// Every field has a default, so a config file only needs the fields it
/// changes:
///
/// ```json
/// { "degenerate_axis": "reject", "blend": { "distance": 0.6, "angle": 0.4 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-label weights for the distance score.
    pub weights: WeightTable,
    /// How the distance and angle scores are blended.
    pub blend: BlendWeights,
    pub degenerate_axis: DegenerateAxisPolicy,
    pub label_mismatch: LabelMismatchPolicy,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        // Weight tables are checked on construction
        self.blend.validate()
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_blend(mut self, blend: BlendWeights) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_degenerate_axis(mut self, policy: DegenerateAxisPolicy) -> Self {
        self.degenerate_axis = policy;
        self
    }

    pub fn with_label_mismatch(mut self, policy: LabelMismatchPolicy) -> Self {
        self.label_mismatch = policy;
        self
    }
}
