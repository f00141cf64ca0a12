use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Linear blend of the distance and angle sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub distance: f32,
    pub angle: f32,
}

impl BlendWeights {
    pub const DEFAULT: BlendWeights = BlendWeights {
        distance: 0.7,
        angle: 0.3,
    };

    /// Both weights must be finite, non-negative and sum to 1.
    pub fn validate(&self) -> Result<()> {
        let finite = self.distance.is_finite() && self.angle.is_finite();
        if !finite || self.distance < 0.0 || self.angle < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "blend weights must be non-negative, got distance={} angle={}",
                self.distance, self.angle
            )));
        }
        let sum = self.distance + self.angle;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(Error::InvalidConfig(format!(
                "blend weights must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Final score of one face comparison, with its components for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// Blended score in [0, 1].
    pub score: f32,
    /// Weighted distance similarity in [0, 1].
    pub distance: f32,
    /// Angular consistency similarity in [0, 1].
    pub angle: f32,
}

impl SimilarityResult {
    pub fn new(distance: f32, angle: f32, weights: &BlendWeights) -> Self {
        Self {
            score: combine(distance, angle, weights),
            distance,
            angle,
        }
    }

    /// Strictly above `threshold`.
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.score > threshold
    }
}

pub fn combine(distance: f32, angle: f32, weights: &BlendWeights) -> f32 {
    (weights.distance * distance + weights.angle * angle).clamp(0.0, 1.0)
}
