use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates in detector image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Facial features reported by the landmark detector.
///
/// Declaration order is the storage index inside [`LandmarkSet`] and the
/// iteration order of every set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandmarkLabel {
    LeftEye,
    RightEye,
    NoseBase,
    MouthLeft,
    MouthRight,
    LeftEar,
    RightEar,
    LeftCheek,
    RightCheek,
    FaceContour,
    LeftEyebrowTop,
    RightEyebrowTop,
    NoseBridge,
    UpperLipTop,
    LowerLipBottom,
}

impl LandmarkLabel {
    pub const COUNT: usize = 15;

    pub const ALL: [LandmarkLabel; Self::COUNT] = [
        LandmarkLabel::LeftEye,
        LandmarkLabel::RightEye,
        LandmarkLabel::NoseBase,
        LandmarkLabel::MouthLeft,
        LandmarkLabel::MouthRight,
        LandmarkLabel::LeftEar,
        LandmarkLabel::RightEar,
        LandmarkLabel::LeftCheek,
        LandmarkLabel::RightCheek,
        LandmarkLabel::FaceContour,
        LandmarkLabel::LeftEyebrowTop,
        LandmarkLabel::RightEyebrowTop,
        LandmarkLabel::NoseBridge,
        LandmarkLabel::UpperLipTop,
        LandmarkLabel::LowerLipBottom,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical detector name, e.g. `LEFT_EYE`.
    pub const fn name(self) -> &'static str {
        match self {
            LandmarkLabel::LeftEye => "LEFT_EYE",
            LandmarkLabel::RightEye => "RIGHT_EYE",
            LandmarkLabel::NoseBase => "NOSE_BASE",
            LandmarkLabel::MouthLeft => "MOUTH_LEFT",
            LandmarkLabel::MouthRight => "MOUTH_RIGHT",
            LandmarkLabel::LeftEar => "LEFT_EAR",
            LandmarkLabel::RightEar => "RIGHT_EAR",
            LandmarkLabel::LeftCheek => "LEFT_CHEEK",
            LandmarkLabel::RightCheek => "RIGHT_CHEEK",
            LandmarkLabel::FaceContour => "FACE_CONTOUR",
            LandmarkLabel::LeftEyebrowTop => "LEFT_EYEBROW_TOP",
            LandmarkLabel::RightEyebrowTop => "RIGHT_EYEBROW_TOP",
            LandmarkLabel::NoseBridge => "NOSE_BRIDGE",
            LandmarkLabel::UpperLipTop => "UPPER_LIP_TOP",
            LandmarkLabel::LowerLipBottom => "LOWER_LIP_BOTTOM",
        }
    }
}

impl fmt::Display for LandmarkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LandmarkLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.name() == s)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

/// The landmarks detected for one face, at most one point per label.
///
/// Serialized as a JSON object keyed by label name:
/// `{"LEFT_EYE": {"x": 120.5, "y": 88.0}, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<LandmarkLabel, Point>",
    into = "BTreeMap<LandmarkLabel, Point>"
)]
pub struct LandmarkSet {
    slots: [Option<Point>; LandmarkLabel::COUNT],
}

impl LandmarkSet {
    pub const fn new() -> Self {
        Self {
            slots: [None; LandmarkLabel::COUNT],
        }
    }

    /// Insert a point, returning the one previously stored for `label`.
    ///
    /// Fails if either coordinate is NaN or infinite.
    pub fn insert(&mut self, label: LandmarkLabel, point: Point) -> Result<Option<Point>> {
        if !point.is_finite() {
            return Err(Error::NonFiniteCoordinate { label });
        }
        Ok(self.slots[label.index()].replace(point))
    }

    pub fn get(&self, label: LandmarkLabel) -> Option<Point> {
        self.slots[label.index()]
    }

    pub fn contains(&self, label: LandmarkLabel) -> bool {
        self.slots[label.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = LandmarkLabel> + '_ {
        self.iter().map(|(label, _)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkLabel, Point)> + '_ {
        LandmarkLabel::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(label, slot)| slot.map(|p| (*label, p)))
    }

    /// Apply `f` to every present point, keeping labels.
    ///
    /// The caller must keep the points finite.
    pub fn map_points<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Point) -> Point,
    {
        let mut slots = self.slots;
        for slot in slots.iter_mut() {
            if let Some(p) = slot {
                *p = f(*p);
            }
        }
        Self { slots }
    }
}

impl TryFrom<BTreeMap<LandmarkLabel, Point>> for LandmarkSet {
    type Error = Error;

    fn try_from(map: BTreeMap<LandmarkLabel, Point>) -> Result<Self> {
        Self::try_from_iter(map)
    }
}

impl From<LandmarkSet> for BTreeMap<LandmarkLabel, Point> {
    fn from(set: LandmarkSet) -> Self {
        set.iter().collect()
    }
}

impl LandmarkSet {
    /// Build a set from `(label, point)` pairs. Later pairs overwrite earlier ones.
    pub fn try_from_iter<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (LandmarkLabel, Point)>,
    {
        let mut set = Self::new();
        for (label, point) in pairs {
            set.insert(label, point)?;
        }
        Ok(set)
    }
}
