use crate::angle::angle_score;
use crate::combine::SimilarityResult;
use crate::config::ScoringConfig;
use crate::distance::distance_score;
use crate::error::Result;
use crate::types::LandmarkSet;

/// Scores live landmark sets against enrolled ones.
///
/// Holds only its configuration, so one comparator can be shared freely
/// between threads.
///
/// # Usage
///
/// ```rust
/// use face_similarity::{FaceComparator, LandmarkLabel, LandmarkSet, Point};
///
/// let enrolled = LandmarkSet::try_from_iter([
///     (LandmarkLabel::LeftEye, Point::new(212.0, 240.0)),
///     (LandmarkLabel::RightEye, Point::new(308.0, 238.0)),
///     (LandmarkLabel::NoseBase, Point::new(261.0, 301.0)),
///     (LandmarkLabel::MouthLeft, Point::new(226.0, 347.0)),
///     (LandmarkLabel::MouthRight, Point::new(296.0, 345.0)),
/// ])?;
/// let mut live = enrolled;
/// live.insert(LandmarkLabel::NoseBase, Point::new(290.0, 301.0))?;
///
/// let comparator = FaceComparator::default();
/// let same = comparator.compare(&enrolled, &enrolled)?;
/// let moved = comparator.compare(&live, &enrolled)?;
/// assert!(same.exceeds(0.98));
/// assert!(moved.score < same.score);
/// # Ok::<(), face_similarity::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceComparator {
    config: ScoringConfig,
}

impl FaceComparator {
    /// Create a comparator, validating `config` first.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Full pipeline for one pair: normalize, distance score, angle score, blend.
    pub fn compare(
        &self,
        live: &LandmarkSet,
        enrolled: &LandmarkSet,
    ) -> Result<SimilarityResult> {
        let distance = distance_score(live, enrolled, &self.config)?;
        if let Some(counts) = distance.mismatch {
            tracing::debug!(
                live = counts.left,
                enrolled = counts.right,
                "landmark counts differ, distance similarity is 0"
            );
        }

        let angle = angle_score(live, enrolled, self.config.degenerate_axis)?;
        let result =
            SimilarityResult::new(distance.similarity, angle.similarity, &self.config.blend);

        tracing::debug!(
            score = result.score,
            distance = result.distance,
            angle = result.angle,
            compared = distance.compared,
            mean_angle_diff = angle.mean_difference_deg,
            "compared landmark sets"
        );
        Ok(result)
    }

    /// Compare `live` against every template, preserving order.
    pub fn compare_all(
        &self,
        live: &LandmarkSet,
        templates: &[LandmarkSet],
    ) -> Vec<Result<SimilarityResult>> {
        templates
            .iter()
            .map(|template| self.compare(live, template))
            .collect()
    }

    /// Index and result of the best-scoring template.
    ///
    /// Templates that cannot be compared are skipped. Ties keep the earliest
    /// index. Returns `None` if no template could be compared.
    pub fn best_match(
        &self,
        live: &LandmarkSet,
        templates: &[LandmarkSet],
    ) -> Option<(usize, SimilarityResult)> {
        best_outcome(&self.compare_all(live, templates))
    }
}

/// Index and result of the highest score among `outcomes`.
///
/// Failed comparisons are skipped. Ties keep the earliest index.
pub fn best_outcome(outcomes: &[Result<SimilarityResult>]) -> Option<(usize, SimilarityResult)> {
    outcomes
        .iter()
        .enumerate()
        .filter_map(|(i, outcome)| match outcome {
            Ok(result) => Some((i, *result)),
            Err(e) => {
                tracing::warn!(template = i, "skipping template: {}", e);
                None
            }
        })
        .fold(None, |best, (i, result)| match best {
            Some((_, b)) if b.score >= result.score => best,
            _ => Some((i, result)),
        })
}
