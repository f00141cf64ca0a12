//! Angular consistency between the key landmarks of two faces.
//!
//! For every triple of key landmarks the angle at the middle point is measured
//! in both faces. The mean absolute change over all triples, out of a worst
//! case of 180 degrees, gives a shape similarity that ignores how far the
//! points sit from each other.

use serde::Serialize;

use crate::error::{Error, Result, Side};
use crate::normalize::{normalize, DegenerateAxisPolicy};
use crate::types::{LandmarkLabel, LandmarkSet, Point};

/// Landmarks every set must provide for angular scoring, in triple order.
pub const KEY_LANDMARKS: [LandmarkLabel; 5] = [
    LandmarkLabel::LeftEye,
    LandmarkLabel::RightEye,
    LandmarkLabel::NoseBase,
    LandmarkLabel::MouthLeft,
    LandmarkLabel::MouthRight,
];

/// All `(i, j, k)` with `i < j < k` over [`KEY_LANDMARKS`], in lexicographic
/// order. The angle is taken at `j`. Summation follows this order.
pub const KEY_TRIPLES: [[usize; 3]; 10] = [
    [0, 1, 2],
    [0, 1, 3],
    [0, 1, 4],
    [0, 2, 3],
    [0, 2, 4],
    [0, 3, 4],
    [1, 2, 3],
    [1, 2, 4],
    [1, 3, 4],
    [2, 3, 4],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleScore {
    /// `1 - mean_difference_deg / 180`, clamped to [0, 1].
    pub similarity: f32,
    /// Mean absolute angle change over [`KEY_TRIPLES`], in degrees.
    pub mean_difference_deg: f32,
}

/// Angle at `vertex` between the rays towards `from` and `to`, in [0, 180] degrees.
pub fn vertex_angle(from: Point, vertex: Point, to: Point) -> f32 {
    let a = (from.y - vertex.y).atan2(from.x - vertex.x);
    let b = (to.y - vertex.y).atan2(to.x - vertex.x);
    let angle = (a - b).abs().to_degrees();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Compare the key-landmark angles of two faces after normalization.
///
/// Fails with [`Error::MissingKeyLandmark`] before any geometry is computed
/// if either set lacks one of [`KEY_LANDMARKS`].
pub fn angle_score(
    a: &LandmarkSet,
    b: &LandmarkSet,
    policy: DegenerateAxisPolicy,
) -> Result<AngleScore> {
    require_key_landmarks(a, Side::Left)?;
    require_key_landmarks(b, Side::Right)?;

    let keys_a = key_points(&normalize(a, policy)?, Side::Left)?;
    let keys_b = key_points(&normalize(b, policy)?, Side::Right)?;

    let total: f32 = KEY_TRIPLES
        .iter()
        .map(|&[i, j, k]| {
            let angle_a = vertex_angle(keys_a[i], keys_a[j], keys_a[k]);
            let angle_b = vertex_angle(keys_b[i], keys_b[j], keys_b[k]);
            (angle_a - angle_b).abs()
        })
        .sum();

    let mean = total / KEY_TRIPLES.len() as f32;
    Ok(AngleScore {
        similarity: (1.0 - mean / 180.0).clamp(0.0, 1.0),
        mean_difference_deg: mean,
    })
}

fn require_key_landmarks(set: &LandmarkSet, side: Side) -> Result<()> {
    match KEY_LANDMARKS.iter().find(|label| !set.contains(**label)) {
        Some(&label) => Err(Error::MissingKeyLandmark { label, side }),
        None => Ok(()),
    }
}

fn key_points(set: &LandmarkSet, side: Side) -> Result<[Point; 5]> {
    let mut points = [Point::zero(); 5];
    for (slot, label) in points.iter_mut().zip(KEY_LANDMARKS) {
        *slot = set
            .get(label)
            .ok_or(Error::MissingKeyLandmark { label, side })?;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn face() -> LandmarkSet {
        LandmarkSet::try_from_iter([
            (LandmarkLabel::LeftEye, Point::new(0.0, 0.0)),
            (LandmarkLabel::RightEye, Point::new(10.0, 0.0)),
            (LandmarkLabel::NoseBase, Point::new(5.0, 5.0)),
            (LandmarkLabel::MouthLeft, Point::new(3.0, 10.0)),
            (LandmarkLabel::MouthRight, Point::new(7.0, 10.0)),
        ])
        .unwrap()
    }

    #[test]
    fn triples_are_ordered_and_distinct() {
        for [i, j, k] in KEY_TRIPLES {
            assert!(i < j && j < k && k < KEY_LANDMARKS.len());
        }
        for pair in KEY_TRIPLES.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn vertex_angle_basics() {
        let origin = Point::zero();
        assert_relative_eq!(
            vertex_angle(Point::new(1.0, 0.0), origin, Point::new(0.0, 1.0)),
            90.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            vertex_angle(Point::new(1.0, 0.0), origin, Point::new(-1.0, 0.0)),
            180.0,
            epsilon = 1e-4
        );
        // Raw difference of 270 degrees folds back to 90
        assert_relative_eq!(
            vertex_angle(Point::new(0.0, -1.0), origin, Point::new(-1.0, 0.01)),
            90.0,
            epsilon = 1.0
        );
        assert_eq!(vertex_angle(Point::new(2.0, 2.0), origin, Point::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn identical_faces_score_one() {
        let score = angle_score(&face(), &face(), DegenerateAxisPolicy::Midpoint).unwrap();
        assert_eq!(score.similarity, 1.0);
        assert_eq!(score.mean_difference_deg, 0.0);
    }

    #[test]
    fn moved_mouth_lowers_score() {
        let mut moved = face();
        moved.insert(LandmarkLabel::MouthRight, Point::new(20.0, 10.0)).unwrap();

        let score = angle_score(&face(), &moved, DegenerateAxisPolicy::Midpoint).unwrap();
        assert!(score.similarity < 1.0);
        assert!(score.similarity > 0.0);
        assert!(score.mean_difference_deg > 1.0);
    }

    #[test]
    fn missing_key_landmark_is_reported_with_side() {
        let mut partial = LandmarkSet::new();
        for (label, point) in face().iter() {
            if label != LandmarkLabel::NoseBase {
                partial.insert(label, point).unwrap();
            }
        }

        let err = angle_score(&face(), &partial, DegenerateAxisPolicy::Midpoint).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingKeyLandmark {
                label: LandmarkLabel::NoseBase,
                side: Side::Right
            }
        ));

        let err = angle_score(&partial, &face(), DegenerateAxisPolicy::Midpoint).unwrap_err();
        assert!(matches!(err, Error::MissingKeyLandmark { side: Side::Left, .. }));
    }

    #[test]
    fn score_is_symmetric() {
        let mut moved = face();
        moved.insert(LandmarkLabel::NoseBase, Point::new(4.0, 7.0)).unwrap();

        let forward = angle_score(&face(), &moved, DegenerateAxisPolicy::Midpoint).unwrap();
        let backward = angle_score(&moved, &face(), DegenerateAxisPolicy::Midpoint).unwrap();
        assert_eq!(forward, backward);
    }
}
