//! Integration tests for the public scoring pipeline.

use approx::assert_relative_eq;
use face_similarity::{
    angle_score, distance_score, BlendWeights, DegenerateAxisPolicy, Error, FaceComparator,
    LabelMismatchPolicy, LandmarkLabel, LandmarkSet, Point, ScoringConfig, WeightTable,
};
use std::io::Write;

/// Five-point reference face on a 10x10 grid.
fn reference_face() -> LandmarkSet {
    LandmarkSet::try_from_iter([
        (LandmarkLabel::LeftEye, Point::new(0.0, 0.0)),
        (LandmarkLabel::RightEye, Point::new(10.0, 0.0)),
        (LandmarkLabel::NoseBase, Point::new(5.0, 5.0)),
        (LandmarkLabel::MouthLeft, Point::new(3.0, 10.0)),
        (LandmarkLabel::MouthRight, Point::new(7.0, 10.0)),
    ])
    .unwrap()
}

/// A full 15-point detection, roughly in image pixels.
fn detected_face() -> LandmarkSet {
    LandmarkSet::try_from_iter([
        (LandmarkLabel::LeftEye, Point::new(212.0, 240.0)),
        (LandmarkLabel::RightEye, Point::new(308.0, 238.0)),
        (LandmarkLabel::NoseBase, Point::new(261.0, 301.0)),
        (LandmarkLabel::MouthLeft, Point::new(226.0, 347.0)),
        (LandmarkLabel::MouthRight, Point::new(296.0, 345.0)),
        (LandmarkLabel::LeftEar, Point::new(160.0, 268.0)),
        (LandmarkLabel::RightEar, Point::new(362.0, 265.0)),
        (LandmarkLabel::LeftCheek, Point::new(204.0, 300.0)),
        (LandmarkLabel::RightCheek, Point::new(318.0, 298.0)),
        (LandmarkLabel::FaceContour, Point::new(258.0, 168.0)),
        (LandmarkLabel::LeftEyebrowTop, Point::new(190.0, 212.0)),
        (LandmarkLabel::RightEyebrowTop, Point::new(286.0, 210.0)),
        (LandmarkLabel::NoseBridge, Point::new(260.0, 236.0)),
        (LandmarkLabel::UpperLipTop, Point::new(226.0, 336.0)),
        (LandmarkLabel::LowerLipBottom, Point::new(262.0, 372.0)),
    ])
    .unwrap()
}

/// The same face slightly re-detected: a few points move by a couple of pixels.
fn redetected_face() -> LandmarkSet {
    let mut face = detected_face();
    face.insert(LandmarkLabel::NoseBase, Point::new(263.0, 303.0)).unwrap();
    face.insert(LandmarkLabel::MouthRight, Point::new(293.0, 346.0)).unwrap();
    face.insert(LandmarkLabel::LeftCheek, Point::new(207.0, 297.0)).unwrap();
    face
}

fn rotate_about_centroid(set: &LandmarkSet) -> LandmarkSet {
    let n = set.len() as f32;
    let sum = set.iter().fold(Point::zero(), |acc, (_, p)| acc + p);
    let c = sum * (1.0 / n);
    // 90 degrees: (dx, dy) -> (-dy, dx)
    set.map_points(|p| {
        let d = p - c;
        Point::new(c.x - d.y, c.y + d.x)
    })
}

fn compare(a: &LandmarkSet, b: &LandmarkSet) -> f32 {
    FaceComparator::default().compare(a, b).unwrap().score
}

#[test]
fn identical_reference_faces_score_one() {
    let a = reference_face();
    let b = reference_face();
    let config = ScoringConfig::default();

    let distance = distance_score(&a, &b, &config).unwrap();
    let angle = angle_score(&a, &b, config.degenerate_axis).unwrap();
    assert_eq!(distance.similarity, 1.0);
    assert_eq!(angle.similarity, 1.0);
    assert_relative_eq!(compare(&a, &b), 1.0, epsilon = 1e-6);
}

#[test]
fn identity_holds_for_full_detection() {
    let face = detected_face();
    let result = FaceComparator::default().compare(&face, &face).unwrap();
    assert_eq!(result.distance, 1.0);
    assert_eq!(result.angle, 1.0);
    assert_relative_eq!(result.score, 1.0, epsilon = 1e-6);
}

#[test]
fn moved_mouth_corner_lowers_both_scores() {
    let a = reference_face();
    let mut b = reference_face();
    b.insert(LandmarkLabel::MouthRight, Point::new(20.0, 10.0)).unwrap();

    let result = FaceComparator::default().compare(&a, &b).unwrap();
    assert!(result.score > 0.0 && result.score < 1.0);
    assert!(result.distance < 1.0);
    // MOUTH_RIGHT takes part in six of the ten triples
    assert!(result.angle < 0.95, "angle score {} barely moved", result.angle);
    assert_relative_eq!(result.score, 0.8354, epsilon = 1e-3);
}

#[test]
fn scores_are_symmetric() {
    let a = detected_face();
    let b = redetected_face();
    let config = ScoringConfig::default();

    let d_ab = distance_score(&a, &b, &config).unwrap();
    let d_ba = distance_score(&b, &a, &config).unwrap();
    assert_relative_eq!(d_ab.similarity, d_ba.similarity, epsilon = 1e-6);

    let a_ab = angle_score(&a, &b, config.degenerate_axis).unwrap();
    let a_ba = angle_score(&b, &a, config.degenerate_axis).unwrap();
    assert_eq!(a_ab.similarity, a_ba.similarity);
}

#[test]
fn scores_stay_in_unit_range() {
    let base = detected_face();
    let candidates = [
        redetected_face(),
        rotate_about_centroid(&base),
        base.map_points(|p| Point::new(p.y, p.x)),
        base.map_points(|p| Point::new(-p.x, p.y * 3.0)),
    ];

    for candidate in &candidates {
        let result = FaceComparator::default().compare(&base, candidate).unwrap();
        for value in [result.score, result.distance, result.angle] {
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
    }
}

#[test]
fn translation_does_not_change_score() {
    let a = detected_face();
    let b = redetected_face();
    let shift = Point::new(-120.0, 64.0);

    let before = compare(&a, &b);
    let after = compare(&a.map_points(|p| p + shift), &b.map_points(|p| p + shift));
    assert_relative_eq!(before, after, epsilon = 1e-5);
}

#[test]
fn per_axis_scaling_does_not_change_score() {
    let a = detected_face();
    let b = redetected_face();
    let stretch = |p: Point| Point::new(p.x * 2.0, p.y * 0.5);

    let before = compare(&a, &b);
    let after = compare(&a.map_points(stretch), &b.map_points(stretch));
    assert_relative_eq!(before, after, epsilon = 1e-5);

    // Each set may also come from a different capture resolution
    let after = compare(&a.map_points(|p| p * 3.0), &b);
    assert_relative_eq!(before, after, epsilon = 1e-5);
}

#[test]
fn rotation_is_not_compensated() {
    let a = reference_face();
    let rotated = rotate_about_centroid(&a);

    let score = compare(&a, &rotated);
    assert!(score < 0.99, "rotated face scored {score}");
}

#[test]
fn ten_versus_nine_labels_scores_zero_distance() {
    let full = detected_face();
    let a = LandmarkSet::try_from_iter(full.iter().take(10)).unwrap();
    let b = LandmarkSet::try_from_iter(full.iter().take(9)).unwrap();
    assert_eq!(a.len(), 10);
    assert_eq!(b.len(), 9);

    let score = distance_score(&a, &b, &ScoringConfig::default()).unwrap();
    assert_eq!(score.similarity, 0.0);

    let strict = ScoringConfig::default().with_label_mismatch(LabelMismatchPolicy::Reject);
    assert!(matches!(
        distance_score(&a, &b, &strict),
        Err(Error::LabelCountMismatch { left: 10, right: 9 })
    ));
}

#[test]
fn degenerate_axis_policies() {
    // Every key point on one horizontal line
    let flat = LandmarkSet::try_from_iter(
        [
            LandmarkLabel::LeftEye,
            LandmarkLabel::RightEye,
            LandmarkLabel::NoseBase,
            LandmarkLabel::MouthLeft,
            LandmarkLabel::MouthRight,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label, Point::new(i as f32 * 10.0, 42.0))),
    )
    .unwrap();

    let result = FaceComparator::default().compare(&flat, &reference_face()).unwrap();
    assert!(result.score.is_finite());
    assert!((0.0..=1.0).contains(&result.score));

    let strict = FaceComparator::new(
        ScoringConfig::default().with_degenerate_axis(DegenerateAxisPolicy::Reject),
    )
    .unwrap();
    assert!(matches!(
        strict.compare(&flat, &reference_face()),
        Err(Error::DegenerateAxisRange { .. })
    ));
}

#[test]
fn custom_weights_change_distance_only() {
    let a = detected_face();
    let b = redetected_face();

    let default = FaceComparator::default().compare(&a, &b).unwrap();
    let uniform = FaceComparator::new(ScoringConfig::default().with_weights(WeightTable::UNIFORM))
        .unwrap()
        .compare(&a, &b)
        .unwrap();

    assert_eq!(default.angle, uniform.angle);
    assert!(default.distance != uniform.distance);
}

#[test]
fn config_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "blend": {{ "distance": 1.0, "angle": 0.0 }}, "label_mismatch": "reject" }}"#
    )
    .unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let config: ScoringConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(config.blend, BlendWeights { distance: 1.0, angle: 0.0 });
    assert_eq!(config.weights, WeightTable::DEFAULT);

    let comparator = FaceComparator::new(config).unwrap();
    let result = comparator.compare(&detected_face(), &redetected_face()).unwrap();
    assert_relative_eq!(result.score, result.distance, epsilon = 1e-6);
}

#[test]
fn landmark_file_round_trip() {
    let face = detected_face();
    let file = tempfile::NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(file.as_file(), &face).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let loaded: LandmarkSet = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded, face);
    assert!(text.contains("\"LOWER_LIP_BOTTOM\""));
}
