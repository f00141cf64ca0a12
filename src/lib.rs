//! # face-similarity
//!
//! Facial landmark similarity scoring for face verification.
//!
//! Given the landmarks detected on a live capture and on an enrolled image,
//! this crate computes a single similarity score in [0, 1]:
//!
//! 1. Both landmark sets are normalized into the unit square, each axis on
//!    its own (removes position and per-axis scale)
//! 2. A weighted average of point distances is turned into a similarity
//!    `1 / (1 + d)`, eyes weighing most
//! 3. The angles formed by every triple of the five key landmarks (eyes,
//!    nose base, mouth corners) are compared between the faces
//! 4. The two similarities are blended, 0.7 distance and 0.3 angle by default
//!
//! Deciding whether a score is high enough to accept is left to the caller.
//! Rotation, perspective and liveness are not handled.
//!
//! ## Quick Start
//!
//! ```rust
//! use face_similarity::{FaceComparator, LandmarkLabel, LandmarkSet, Point};
//!
//! let enrolled = LandmarkSet::try_from_iter([
//!     (LandmarkLabel::LeftEye, Point::new(0.0, 0.0)),
//!     (LandmarkLabel::RightEye, Point::new(10.0, 0.0)),
//!     (LandmarkLabel::NoseBase, Point::new(5.0, 5.0)),
//!     (LandmarkLabel::MouthLeft, Point::new(3.0, 10.0)),
//!     (LandmarkLabel::MouthRight, Point::new(7.0, 10.0)),
//! ])
//! .unwrap();
//!
//! // The same face captured at twice the resolution, somewhere else in frame
//! let live = enrolled.map_points(|p| p * 2.0 + Point::new(40.0, 25.0));
//!
//! let comparator = FaceComparator::default();
//! let result = comparator.compare(&live, &enrolled).unwrap();
//! assert!((result.score - 1.0).abs() < 1e-6);
//! ```
//!
//! ## Landmark files
//!
//! [`LandmarkSet`] serializes as a JSON object keyed by label name:
//!
//! ```rust
//! use face_similarity::{LandmarkLabel, LandmarkSet};
//!
//! let set: LandmarkSet = serde_json::from_str(
//!     r#"{"LEFT_EYE": {"x": 120.0, "y": 80.5}, "NOSE_BASE": {"x": 150.0, "y": 130.0}}"#,
//! )
//! .unwrap();
//! assert_eq!(set.len(), 2);
//! assert!(set.contains(LandmarkLabel::NoseBase));
//! ```

mod angle;
mod combine;
mod compare;
mod config;
mod distance;
mod error;
mod normalize;
mod types;

pub use angle::{angle_score, vertex_angle, AngleScore, KEY_LANDMARKS, KEY_TRIPLES};
pub use combine::{combine, BlendWeights, SimilarityResult};
pub use compare::{best_outcome, FaceComparator};
pub use config::ScoringConfig;
pub use distance::{
    distance_score, DistanceScore, LabelCounts, LabelMismatchPolicy, WeightTable, DEFAULT_WEIGHT,
};
pub use error::{Error, Result, Side};
pub use normalize::{normalize, Axis, AxisBounds, DegenerateAxisPolicy, DEGENERATE_AXIS_VALUE};
pub use types::{LandmarkLabel, LandmarkSet, Point};
