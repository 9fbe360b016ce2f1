use serde::{Deserialize, Serialize};

use crate::extrapolation::enums::Extrapolation;
use crate::utils::errors::{GridError, Result};
use crate::utils::num::Real;

/// # Axis
/// One dimension's ordered coordinate sequence, borrowed from the caller
/// for the lifetime of the interpolant. Coordinates must be in
/// non-decreasing order; only the endpoints are verified at construction,
/// full sortedness is a caller obligation. Duplicate adjacent coordinates
/// are permitted and denote a step discontinuity at that coordinate.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// let coords = vec![10.0, 20.0, 30.0];
/// let axis = Axis::new(&coords).unwrap();
/// assert_eq!(axis.len(), 3);
/// assert_eq!(axis.first(), 10.0);
/// assert_eq!(axis.last(), 30.0);
/// assert_eq!(axis.lower_bound(20.0), 1);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Axis<'a, T: Real = f64> {
    coords: &'a [T],
}

/// # NeighborWeights
/// The bracketing grid-index pair and linear weight pair for one axis.
/// Always exactly two entries, even when the query coincides with a grid
/// coordinate (one weight is then 1 and the other 0), so the corner
/// enumeration downstream has a fixed non-branching shape.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NeighborWeights<T: Real = f64> {
    pub indices: [usize; 2],
    pub weights: [T; 2],
}

impl<'a, T: Real> Axis<'a, T> {
    pub fn new(coords: &'a [T]) -> Result<Self> {
        if coords.len() < 2 {
            return Err(GridError::InvalidConfigurationErr(format!(
                "An axis needs at least 2 coordinates, got {}",
                coords.len()
            )));
        }
        let first = coords[0];
        let last = coords[coords.len() - 1];
        if !first.is_finite() || !last.is_finite() {
            return Err(GridError::InvalidConfigurationErr(
                "Axis endpoints need to be finite".to_string(),
            ));
        }
        if first > last {
            return Err(GridError::InvalidConfigurationErr(
                "Axis coordinates need to be in non-decreasing order".to_string(),
            ));
        }
        Ok(Axis { coords })
    }

    pub fn coords(&self) -> &'a [T] {
        return self.coords;
    }

    pub fn len(&self) -> usize {
        return self.coords.len();
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn first(&self) -> T {
        self.coords[0]
    }

    pub fn last(&self) -> T {
        self.coords[self.coords.len() - 1]
    }

    /// Whether a coordinate lies inside the axis range, boundaries included.
    pub fn contains(&self, x: T) -> bool {
        x >= self.first() && x <= self.last()
    }

    pub(crate) fn clamp_inside(&self, x: T) -> T {
        x.max(self.first()).min(self.last())
    }

    /// First index whose coordinate is greater than or equal to `x`.
    pub fn lower_bound(&self, x: T) -> usize {
        self.coords.partition_point(|&c| c < x)
    }

    /// Project `x` through the extrapolation policy, then bracket it.
    pub fn resolve<V>(
        &self,
        x: T,
        extrapolation: &Extrapolation<T, V>,
    ) -> Result<NeighborWeights<T>> {
        let x = extrapolation.project(self, x)?;
        Ok(self.bracket(x))
    }

    /// Bracketing neighbors and linear weights for a coordinate inside the
    /// axis range. The lower neighbor always exists: a query at or below
    /// the first coordinate brackets against the first segment. When the
    /// bracketing coordinates are duplicates the weight pair is defined as
    /// (1, 0), biasing toward the lower index; this is the documented
    /// tie-break for step discontinuities, not a fallback.
    pub fn bracket(&self, x: T) -> NeighborWeights<T> {
        let mut iu = self.lower_bound(x);
        if iu == 0 {
            iu = 1;
        }
        if iu > self.coords.len() - 1 {
            iu = self.coords.len() - 1;
        }
        let il = iu - 1;
        let xl = self.coords[il];
        let xu = self.coords[iu];
        if xl == xu {
            return NeighborWeights {
                indices: [il, iu],
                weights: [T::one(), T::zero()],
            };
        }
        let span = xu - xl;
        NeighborWeights {
            indices: [il, iu],
            weights: [(xu - x) / span, (x - xl) / span],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_rejects_short_and_unordered_axes() {
        assert!(Axis::<f64>::new(&[]).is_err());
        assert!(Axis::new(&[1.0]).is_err());
        assert!(Axis::new(&[2.0, 1.0]).is_err());
        assert!(Axis::new(&[f64::NAN, 1.0]).is_err());
        assert!(Axis::new(&[0.0, f64::INFINITY]).is_err());
        assert!(Axis::new(&[1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_weights_sum_to_one_inside_range() {
        let coords: Vec<f64> = vec![0.0, 1.0, 2.5, 2.5, 7.0];
        let axis = Axis::new(&coords).unwrap();
        let mut x = 0.0;
        while x <= 7.0 {
            let pair = axis.bracket(x);
            let total = pair.weights[0] + pair.weights[1];
            assert!((total - 1.0).abs() < 1e-12);
            assert!(pair.weights[0] >= 0.0);
            assert!(pair.weights[1] >= 0.0);
            x += 0.125;
        }
    }

    #[test]
    fn test_exact_grid_coordinate_puts_full_weight_on_it() {
        let coords = vec![10.0, 20.0, 30.0];
        let axis = Axis::new(&coords).unwrap();
        let pair = axis.bracket(20.0);
        assert_eq!(pair.indices, [0, 1]);
        assert_eq!(pair.weights, [0.0, 1.0]);

        let pair = axis.bracket(10.0);
        assert_eq!(pair.indices, [0, 1]);
        assert_eq!(pair.weights, [1.0, 0.0]);

        let pair = axis.bracket(30.0);
        assert_eq!(pair.indices, [1, 2]);
        assert_eq!(pair.weights, [0.0, 1.0]);
    }

    #[test]
    fn test_duplicate_coordinate_tie_break() {
        let coords = vec![1.0, 1.0, 2.0];
        let axis = Axis::new(&coords).unwrap();
        let pair = axis.bracket(1.0);
        assert_eq!(pair.indices, [0, 1]);
        assert_eq!(pair.weights, [1.0, 0.0]);
    }

    #[test]
    fn test_resolve_applies_the_policy() {
        let coords = vec![10.0, 20.0];
        let axis = Axis::new(&coords).unwrap();
        let pair = axis
            .resolve(15.0, &Extrapolation::<f64, f64>::Error)
            .unwrap();
        assert!((pair.weights[0] - 0.5).abs() < 1e-12);
        assert!(axis
            .resolve(30.0, &Extrapolation::<f64, f64>::Error)
            .is_err());
        let pair = axis
            .resolve(30.0, &Extrapolation::<f64, f64>::Replicate)
            .unwrap();
        assert_eq!(pair.weights, [0.0, 1.0]);
    }
}
