//! Bounding-box normalization of landmark sets.
//!
//! Each axis is rescaled independently so that its minimum maps to 0 and its
//! maximum to 1. This removes absolute position and per-axis scale, but not
//! in-plane rotation or perspective.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{LandmarkSet, Point};

/// Coordinate given to every point on an axis with zero spread under
/// [`DegenerateAxisPolicy::Midpoint`].
pub const DEGENERATE_AXIS_VALUE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// What to do when all points share one coordinate on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateAxisPolicy {
    /// Map the whole axis to [`DEGENERATE_AXIS_VALUE`].
    #[default]
    Midpoint,
    /// Fail with [`Error::DegenerateAxisRange`].
    Reject,
}

/// Per-axis minimum and maximum of a landmark set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: Point,
    pub max: Point,
}

impl AxisBounds {
    /// Bounds of all points in `set`, or `None` for an empty set.
    pub fn of(set: &LandmarkSet) -> Option<Self> {
        let mut points = set.iter().map(|(_, p)| p);
        let first = points.next()?;
        let bounds = points.fold(
            AxisBounds {
                min: first,
                max: first,
            },
            |acc, p| AxisBounds {
                min: Point::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
                max: Point::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
            },
        );
        Some(bounds)
    }

    /// Width and height of the box, widened to `f64` so that finite
    /// coordinates of opposite sign cannot overflow.
    pub fn span(&self) -> (f64, f64) {
        (
            f64::from(self.max.x) - f64::from(self.min.x),
            f64::from(self.max.y) - f64::from(self.min.y),
        )
    }
}

/// Rescale `set` into the unit square, axis by axis.
pub fn normalize(set: &LandmarkSet, policy: DegenerateAxisPolicy) -> Result<LandmarkSet> {
    let Some(bounds) = AxisBounds::of(set) else {
        return Ok(*set);
    };
    let (x_span, y_span) = bounds.span();

    let x_scale = axis_scale(Axis::X, x_span, policy)?;
    let y_scale = axis_scale(Axis::Y, y_span, policy)?;

    Ok(set.map_points(|p| {
        Point::new(
            rescale(p.x, bounds.min.x, x_scale),
            rescale(p.y, bounds.min.y, y_scale),
        )
    }))
}

/// `None` marks a degenerate axis that collapses to the midpoint.
fn axis_scale(axis: Axis, span: f64, policy: DegenerateAxisPolicy) -> Result<Option<f64>> {
    if span > 0.0 {
        return Ok(Some(span));
    }
    match policy {
        DegenerateAxisPolicy::Midpoint => {
            tracing::debug!(%axis, "degenerate axis range, mapping to midpoint");
            Ok(None)
        }
        DegenerateAxisPolicy::Reject => Err(Error::DegenerateAxisRange { axis }),
    }
}

fn rescale(value: f32, min: f32, span: Option<f64>) -> f32 {
    match span {
        Some(span) => ((f64::from(value) - f64::from(min)) / span) as f32,
        None => DEGENERATE_AXIS_VALUE,
    }
}
