use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::axes::axis::Axis;
use crate::utils::errors::{GridError, Result};
use crate::utils::num::Real;

/// Fallback invoked with the raw query point when it lies outside the grid.
pub type PointFn<T, V> = Arc<dyn Fn(&[T]) -> V + Send + Sync>;

/// # Shorthand
/// Stable string identifiers for the projecting extrapolation policies,
/// usable wherever a full [`Extrapolation`] value is not needed. These
/// four identifiers are the only string-enum surface of the crate.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// let shorthand: Shorthand = "replicate".parse().unwrap();
/// assert_eq!(shorthand, Shorthand::Replicate);
/// assert!("clamp".parse::<Shorthand>().is_err());
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Shorthand {
    Error,
    Replicate,
    Reflect,
    Fuzzy,
}

impl FromStr for Shorthand {
    type Err = GridError;

    fn from_str(name: &str) -> Result<Shorthand> {
        match name {
            "error" => Ok(Shorthand::Error),
            "replicate" => Ok(Shorthand::Replicate),
            "reflect" => Ok(Shorthand::Reflect),
            "fuzzy" => Ok(Shorthand::Fuzzy),
            _ => Err(GridError::InvalidConfigurationErr(format!(
                "Unrecognized extrapolation shorthand: {}",
                name
            ))),
        }
    }
}

/// # Extrapolation
/// Closed set of strategies for query coordinates outside the grid range.
///
/// `Error`, `Replicate`, `Reflect`, `AssumeInside` and `Fuzzy` project
/// per-axis coordinates. `Constant` and `WithPoint` act at whole-point
/// level: when any coordinate of the raw point is outside the joint grid,
/// the entire result is the constant or the function value and the
/// neighbor/weight computation is skipped.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// let xs = vec![10.0, 20.0];
/// let ys = vec![2.0, 1.0];
/// let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Replicate).unwrap();
/// assert_eq!(interpolant.interpolate(30000.0).unwrap(), 1.0);
/// ```
pub enum Extrapolation<T: Real = f64, V = f64> {
    /// Fail with `OutOfRangeErr` for any coordinate outside the axis range.
    Error,
    /// Clamp outside coordinates to the nearest boundary.
    Replicate,
    /// Fold outside coordinates back into range by repeated mirroring
    /// across whichever boundary is exceeded.
    Reflect,
    /// Skip the range check entirely; the caller promises every coordinate
    /// is inside. Violations do not panic but yield unspecified weights.
    AssumeInside,
    /// Clamp coordinates within `atol + rtol * |boundary|` of the range,
    /// fail with `OutOfRangeErr` otherwise.
    Fuzzy { atol: T, rtol: T },
    /// Return this value for any point outside the grid.
    Constant(V),
    /// Call the function with the raw point for any point outside the grid.
    WithPoint(PointFn<T, V>),
}

impl<T: Real, V> Extrapolation<T, V> {
    /// Absolute tolerance used when `Fuzzy` is built from shorthand.
    pub fn default_fuzzy_atol() -> T {
        T::epsilon().sqrt()
    }

    /// Build the policy from one of the recognized shorthand identifiers.
    /// `fuzzy` uses the default tolerance; construct `Fuzzy` directly for
    /// anything else.
    pub fn from_shorthand(name: &str) -> Result<Self> {
        Ok(Shorthand::from_str(name)?.into())
    }

    /// Project a coordinate into `[axis.first(), axis.last()]` according
    /// to the policy. `AssumeInside` returns the coordinate unchanged.
    /// `Constant` and `WithPoint` are resolved at whole-point level before
    /// per-axis projection; a coordinate reaching them here is already
    /// inside the range and passes through unchanged.
    pub fn project(&self, axis: &Axis<T>, x: T) -> Result<T> {
        match self {
            Extrapolation::Error => {
                if x < axis.first() || x > axis.last() {
                    return Err(out_of_range(axis, x, None));
                }
                Ok(x)
            }
            Extrapolation::Replicate => Ok(axis.clamp_inside(x)),
            Extrapolation::Reflect => Ok(reflect(axis, x)),
            Extrapolation::AssumeInside => Ok(x),
            Extrapolation::Fuzzy { atol, rtol } => {
                let inside = axis.clamp_inside(x);
                let tolerance = *atol + *rtol * inside.abs();
                if (x - inside).abs() <= tolerance {
                    Ok(inside)
                } else {
                    Err(out_of_range(axis, x, tolerance.to_f64()))
                }
            }
            Extrapolation::Constant(_) | Extrapolation::WithPoint(_) => Ok(x),
        }
    }
}

/// Fold `x` into the axis range by unbounded triangular-wave reflection.
/// The remainder by twice the span counts the reflections in closed form;
/// one more fold handles the descending half-period, and the final clamp
/// absorbs floating-point residue.
fn reflect<T: Real>(axis: &Axis<T>, x: T) -> T {
    let first = axis.first();
    let last = axis.last();
    let span = last - first;
    if span == T::zero() {
        return first;
    }
    let period = span + span;
    let mut offset = (x - first) % period;
    if offset < T::zero() {
        offset = offset + period;
    }
    if offset > span {
        offset = period - offset;
    }
    axis.clamp_inside(first + offset)
}

fn out_of_range<T: Real>(axis: &Axis<T>, x: T, tolerance: Option<f64>) -> GridError {
    GridError::OutOfRangeErr {
        coordinate: x.to_f64().unwrap_or(f64::NAN),
        lower: axis.first().to_f64().unwrap_or(f64::NAN),
        upper: axis.last().to_f64().unwrap_or(f64::NAN),
        tolerance,
    }
}

impl<T: Real, V> Default for Extrapolation<T, V> {
    fn default() -> Self {
        Extrapolation::Error
    }
}

impl<T: Real, V> From<Shorthand> for Extrapolation<T, V> {
    fn from(shorthand: Shorthand) -> Self {
        match shorthand {
            Shorthand::Error => Extrapolation::Error,
            Shorthand::Replicate => Extrapolation::Replicate,
            Shorthand::Reflect => Extrapolation::Reflect,
            Shorthand::Fuzzy => Extrapolation::Fuzzy {
                atol: Self::default_fuzzy_atol(),
                rtol: T::zero(),
            },
        }
    }
}

impl<T: Real, V: Clone> Clone for Extrapolation<T, V> {
    fn clone(&self) -> Self {
        match self {
            Extrapolation::Error => Extrapolation::Error,
            Extrapolation::Replicate => Extrapolation::Replicate,
            Extrapolation::Reflect => Extrapolation::Reflect,
            Extrapolation::AssumeInside => Extrapolation::AssumeInside,
            Extrapolation::Fuzzy { atol, rtol } => Extrapolation::Fuzzy {
                atol: *atol,
                rtol: *rtol,
            },
            Extrapolation::Constant(value) => Extrapolation::Constant(value.clone()),
            Extrapolation::WithPoint(function) => Extrapolation::WithPoint(function.clone()),
        }
    }
}

impl<T: Real, V: fmt::Debug> fmt::Debug for Extrapolation<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extrapolation::Error => write!(f, "Error"),
            Extrapolation::Replicate => write!(f, "Replicate"),
            Extrapolation::Reflect => write!(f, "Reflect"),
            Extrapolation::AssumeInside => write!(f, "AssumeInside"),
            Extrapolation::Fuzzy { atol, rtol } => f
                .debug_struct("Fuzzy")
                .field("atol", atol)
                .field("rtol", rtol)
                .finish(),
            Extrapolation::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Extrapolation::WithPoint(_) => write!(f, "WithPoint"),
        }
    }
}
