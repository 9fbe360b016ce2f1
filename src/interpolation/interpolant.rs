use std::ops::{Add, Mul};

use ndarray::{ArrayView, ArrayView1, IxDyn};

use crate::axes::axis::{Axis, NeighborWeights};
use crate::axes::point::IntoPoint;
use crate::extrapolation::enums::Extrapolation;
use crate::interpolation::combine::{Combine, WeightedSum};
use crate::utils::errors::{GridError, Result};
use crate::utils::num::Real;

/// Widest dimensionality blended on stack buffers; beyond it the corner
/// scratch spills to the heap, where the 2^N corner reads dominate cost
/// anyway.
pub const MAX_STACK_DIMS: usize = 8;

const MAX_STACK_CORNERS: usize = 1 << MAX_STACK_DIMS;

/// # Interpolant
/// An immutable, validated view over a rectilinear grid: `N` coordinate
/// axes, an `N`-dimensional value array of matching shape, an
/// extrapolation policy and a combine operation. Axes and values are
/// borrowed from the caller and never copied; the dimensionality `N` is
/// part of the type.
///
/// Evaluation is pure and reads no mutable state, so a built interpolant
/// can be shared freely across threads.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// use ndarray::array;
///
/// let x = vec![1.0, 2.0];
/// let y = vec![1.0, 2.0, 3.0];
/// let values = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let interpolant =
///     Interpolant::new([&x, &y], values.view().into_dyn(), Extrapolation::Error).unwrap();
/// let blended = interpolant.interpolate((1.5, 1.1)).unwrap();
/// assert!((blended - 2.6).abs() < 1e-12);
/// ```
///
/// The 1-D convenience form:
/// ```
/// use gridatlas::prelude::*;
/// let xs = vec![1.0, 2.0];
/// let ys = vec![10.0, 20.0];
/// let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
/// assert_eq!(interpolant.interpolate(1.5).unwrap(), 15.0);
/// ```
#[derive(Clone, Debug)]
pub struct Interpolant<'a, T: Real, V, const N: usize, C = WeightedSum> {
    axes: [Axis<'a, T>; N],
    values: ArrayView<'a, V, IxDyn>,
    extrapolation: Extrapolation<T, V>,
    combine: C,
}

impl<'a, T: Real, V, const N: usize> Interpolant<'a, T, V, N, WeightedSum> {
    /// Build an interpolant with the default weighted-sum combine.
    pub fn new(
        axes: [&'a [T]; N],
        values: ArrayView<'a, V, IxDyn>,
        extrapolation: Extrapolation<T, V>,
    ) -> Result<Self>
    where
        V: Copy + Add<Output = V> + Mul<T, Output = V>,
    {
        Self::with_combine(axes, values, extrapolation, WeightedSum)
    }
}

impl<'a, T: Real, V> Interpolant<'a, T, V, 1, WeightedSum> {
    /// Convenience constructor for the 1-D series case.
    pub fn series(xs: &'a [T], ys: &'a [V], extrapolation: Extrapolation<T, V>) -> Result<Self>
    where
        V: Copy + Add<Output = V> + Mul<T, Output = V>,
    {
        Self::new([xs], ArrayView1::from(ys).into_dyn(), extrapolation)
    }
}

impl<'a, T: Real, V, C: Combine<T, V>> Interpolant<'a, T, V, 1, C> {
    /// 1-D series with a custom combine operation.
    pub fn series_with(
        xs: &'a [T],
        ys: &'a [V],
        extrapolation: Extrapolation<T, V>,
        combine: C,
    ) -> Result<Self> {
        Self::with_combine([xs], ArrayView1::from(ys).into_dyn(), extrapolation, combine)
    }
}

impl<'a, T: Real, V, const N: usize, C: Combine<T, V>> Interpolant<'a, T, V, N, C> {
    pub fn with_combine(
        axes: [&'a [T]; N],
        values: ArrayView<'a, V, IxDyn>,
        extrapolation: Extrapolation<T, V>,
        combine: C,
    ) -> Result<Self> {
        let first_coords = match axes.first() {
            Some(coords) => *coords,
            None => {
                return Err(GridError::InvalidConfigurationErr(
                    "An interpolant needs at least one axis".to_string(),
                ))
            }
        };
        let mut checked = [Axis::new(first_coords)?; N];
        for (slot, coords) in checked.iter_mut().zip(axes.iter()).skip(1) {
            *slot = Axis::new(*coords)?;
        }
        if values.ndim() != N {
            return Err(GridError::InvalidConfigurationErr(format!(
                "Values have {} dimensions but {} axes were given",
                values.ndim(),
                N
            )));
        }
        for (k, axis) in checked.iter().enumerate() {
            if values.len_of(ndarray::Axis(k)) != axis.len() {
                return Err(GridError::InvalidConfigurationErr(format!(
                    "Values extend {} along dimension {} but the axis has {} coordinates",
                    values.len_of(ndarray::Axis(k)),
                    k,
                    axis.len()
                )));
            }
        }
        Ok(Interpolant {
            axes: checked,
            values,
            extrapolation,
            combine,
        })
    }

    pub fn axes(&self) -> &[Axis<'a, T>; N] {
        return &self.axes;
    }

    pub fn values(&self) -> &ArrayView<'a, V, IxDyn> {
        return &self.values;
    }

    pub fn extrapolation(&self) -> &Extrapolation<T, V> {
        return &self.extrapolation;
    }

    pub fn dimensions(&self) -> usize {
        N
    }

    /// Whether every coordinate of the point lies inside its axis range,
    /// boundaries included.
    pub fn contains(&self, point: &[T; N]) -> bool {
        self.axes
            .iter()
            .zip(point.iter())
            .all(|(axis, &x)| axis.contains(x))
    }

    /// Evaluate at a query point given in any accepted representation
    /// (array, slice, tuple, or a bare scalar when `N` is 1).
    pub fn interpolate<P: IntoPoint<T, N>>(&self, point: P) -> Result<V>
    where
        V: Clone,
    {
        self.interpolate_point(point.into_point()?)
    }

    /// Evaluate at an already-normalized query point.
    pub fn interpolate_point(&self, point: [T; N]) -> Result<V>
    where
        V: Clone,
    {
        match &self.extrapolation {
            Extrapolation::Constant(value) if !self.contains(&point) => {
                return Ok(value.clone());
            }
            Extrapolation::WithPoint(function) if !self.contains(&point) => {
                return Ok(function(&point));
            }
            _ => {}
        }
        let mut resolved = [NeighborWeights {
            indices: [0, 1],
            weights: [T::one(), T::zero()],
        }; N];
        for (pair, (axis, &x)) in resolved
            .iter_mut()
            .zip(self.axes.iter().zip(point.iter()))
        {
            *pair = axis.resolve(x, &self.extrapolation)?;
        }
        Ok(self.blend(&resolved))
    }

    /// Reconstruct the interpolant over relocated axis/value storage,
    /// keeping the policy and combine operation. Validation runs again on
    /// the new storage. This is the structural-transform hook for moving
    /// a grid onto a different memory space (an arena, a device staging
    /// buffer) without changing evaluation behavior.
    pub fn rebind<'b>(
        &self,
        axes: [&'b [T]; N],
        values: ArrayView<'b, V, IxDyn>,
    ) -> Result<Interpolant<'b, T, V, N, C>>
    where
        V: Clone,
        C: Clone,
    {
        Interpolant::with_combine(axes, values, self.extrapolation.clone(), self.combine.clone())
    }

    /// Blend the 2^N corner values. Dimensions 1 to 3 run fully unrolled
    /// on fixed arrays; higher dimensions share the generic bit-pattern
    /// loop. Corner order is ascending in both, axis 0 in the lowest bit.
    fn blend(&self, resolved: &[NeighborWeights<T>; N]) -> V {
        match &resolved[..] {
            [a] => {
                let weights = [a.weights[0], a.weights[1]];
                let values = [
                    &self.values[&[a.indices[0]][..]],
                    &self.values[&[a.indices[1]][..]],
                ];
                self.combine.combine(&weights, &values)
            }
            [a, b] => {
                let weights = [
                    a.weights[0] * b.weights[0],
                    a.weights[1] * b.weights[0],
                    a.weights[0] * b.weights[1],
                    a.weights[1] * b.weights[1],
                ];
                let values = [
                    &self.values[&[a.indices[0], b.indices[0]][..]],
                    &self.values[&[a.indices[1], b.indices[0]][..]],
                    &self.values[&[a.indices[0], b.indices[1]][..]],
                    &self.values[&[a.indices[1], b.indices[1]][..]],
                ];
                self.combine.combine(&weights, &values)
            }
            [a, b, c] => {
                let weights = [
                    a.weights[0] * b.weights[0] * c.weights[0],
                    a.weights[1] * b.weights[0] * c.weights[0],
                    a.weights[0] * b.weights[1] * c.weights[0],
                    a.weights[1] * b.weights[1] * c.weights[0],
                    a.weights[0] * b.weights[0] * c.weights[1],
                    a.weights[1] * b.weights[0] * c.weights[1],
                    a.weights[0] * b.weights[1] * c.weights[1],
                    a.weights[1] * b.weights[1] * c.weights[1],
                ];
                let values = [
                    &self.values[&[a.indices[0], b.indices[0], c.indices[0]][..]],
                    &self.values[&[a.indices[1], b.indices[0], c.indices[0]][..]],
                    &self.values[&[a.indices[0], b.indices[1], c.indices[0]][..]],
                    &self.values[&[a.indices[1], b.indices[1], c.indices[0]][..]],
                    &self.values[&[a.indices[0], b.indices[0], c.indices[1]][..]],
                    &self.values[&[a.indices[1], b.indices[0], c.indices[1]][..]],
                    &self.values[&[a.indices[0], b.indices[1], c.indices[1]][..]],
                    &self.values[&[a.indices[1], b.indices[1], c.indices[1]][..]],
                ];
                self.combine.combine(&weights, &values)
            }
            _ => self.blend_generic(resolved),
        }
    }

    fn blend_generic(&self, resolved: &[NeighborWeights<T>; N]) -> V {
        let corners = 1usize << N;
        let mut index = [0usize; N];
        if corners <= MAX_STACK_CORNERS {
            let mut weights = [T::zero(); MAX_STACK_CORNERS];
            for (k, pair) in resolved.iter().enumerate() {
                index[k] = pair.indices[0];
            }
            let origin = &self.values[&index[..]];
            let mut values = [origin; MAX_STACK_CORNERS];
            for corner in 0..corners {
                weights[corner] = corner_weight(resolved, corner, &mut index);
                values[corner] = &self.values[&index[..]];
            }
            self.combine
                .combine(&weights[..corners], &values[..corners])
        } else {
            let mut weights = Vec::with_capacity(corners);
            let mut values = Vec::with_capacity(corners);
            for corner in 0..corners {
                weights.push(corner_weight(resolved, corner, &mut index));
                values.push(&self.values[&index[..]]);
            }
            self.combine.combine(&weights, &values)
        }
    }
}

/// Weight of one corner of the bracketing cell; writes the corner's
/// multi-index into `index`. Bit `k` of `corner` selects the upper
/// neighbor along axis `k`.
fn corner_weight<T: Real, const N: usize>(
    resolved: &[NeighborWeights<T>; N],
    corner: usize,
    index: &mut [usize; N],
) -> T {
    let mut weight = T::one();
    for (k, pair) in resolved.iter().enumerate() {
        let side = (corner >> k) & 1;
        index[k] = pair.indices[side];
        weight = weight * pair.weights[side];
    }
    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extrapolation::enums::PointFn;
    use ndarray::{array, Array, ArrayD};

    #[test]
    fn test_exact_grid_point_returns_stored_value() {
        let xs = vec![10.0, 20.0, 30.0];
        let ys = vec![1.0, 2.0, 3.0];
        let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
        assert_eq!(interpolant.interpolate(10.0).unwrap(), 1.0);
        assert_eq!(interpolant.interpolate(20.0).unwrap(), 2.0);
        assert_eq!(interpolant.interpolate(30.0).unwrap(), 3.0);
    }

    #[test]
    fn test_midpoint_linearity() {
        let xs = vec![1.0, 2.0];
        let ys = vec![10.0, 20.0];
        let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
        assert_eq!(interpolant.interpolate(1.5).unwrap(), 15.0);
    }

    #[test]
    fn test_duplicate_coordinate_keeps_lower_value() {
        let xs = vec![1.0, 1.0, 2.0];
        let ys = vec![10.0, 20.0, 30.0];
        let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
        let blended = interpolant.interpolate(1.0).unwrap();
        assert!((10.0..=20.0).contains(&blended));
        assert_eq!(blended, 10.0);
    }

    #[test]
    fn test_reflect_and_replicate_policies_end_to_end() {
        let xs = vec![10.0, 20.0];
        let ys = vec![2.0, 1.0];
        let reflected = Interpolant::series(&xs, &ys, Extrapolation::Reflect).unwrap();
        assert_eq!(reflected.interpolate(30.0).unwrap(), 2.0);

        let replicated = Interpolant::series(&xs, &ys, Extrapolation::Replicate).unwrap();
        assert_eq!(replicated.interpolate(30000.0).unwrap(), 1.0);
    }

    #[test]
    fn test_fuzzy_shorthand_end_to_end() {
        let xs = vec![10.0, 20.0];
        let ys = vec![2.0, 1.0];
        let policy = Extrapolation::from_shorthand("fuzzy").unwrap();
        let interpolant = Interpolant::series(&xs, &ys, policy).unwrap();
        // within the default tolerance of the upper boundary
        assert_eq!(interpolant.interpolate(20.0 + 1e-9).unwrap(), 1.0);
        assert!(interpolant.interpolate(21.0).is_err());
    }

    #[test]
    fn test_error_policy_end_to_end() {
        let xs = vec![10.0, 20.0];
        let ys = vec![2.0, 1.0];
        let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
        assert_eq!(interpolant.interpolate(10.0).unwrap(), 2.0);
        assert_eq!(interpolant.interpolate(20.0).unwrap(), 1.0);
        match interpolant.interpolate(20.5).unwrap_err() {
            GridError::OutOfRangeErr {
                coordinate,
                lower,
                upper,
                tolerance,
            } => {
                assert_eq!(coordinate, 20.5);
                assert_eq!(lower, 10.0);
                assert_eq!(upper, 20.0);
                assert_eq!(tolerance, None);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bilinear_blend_matches_closed_form() {
        let x = vec![1.0, 2.0];
        let y = vec![1.0, 2.0, 3.0];
        let values = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let interpolant =
            Interpolant::new([&x, &y], values.view().into_dyn(), Extrapolation::Error).unwrap();
        let blended = interpolant.interpolate((1.5, 1.1)).unwrap();
        let expected = 0.45 * 1.0 + 0.45 * 4.0 + 0.05 * 2.0 + 0.05 * 5.0;
        assert!((blended - expected).abs() < 1e-12);
    }

    #[test]
    fn test_trilinear_unrolled_matches_generic_loop() {
        let x = vec![0.0, 1.0];
        let y = vec![0.0, 1.0, 2.0];
        let z = vec![0.0, 1.0];
        let values: ArrayD<f64> = Array::from_shape_fn((2, 3, 2), |(i, j, k)| {
            (i * 100 + j * 10 + k) as f64
        })
        .into_dyn();
        let interpolant = Interpolant::new(
            [&x, &y, &z],
            values.view(),
            Extrapolation::Error,
        )
        .unwrap();
        let point = [0.25, 1.5, 0.75];
        let blended = interpolant.interpolate(point).unwrap();

        // the generic path over the same cell, driven through the resolver
        let axes = interpolant.axes();
        let resolved = [
            axes[0].bracket(point[0]),
            axes[1].bracket(point[1]),
            axes[2].bracket(point[2]),
        ];
        let mut expected = 0.0;
        let mut index = [0usize; 3];
        for corner in 0..8 {
            let weight = corner_weight(&resolved, corner, &mut index);
            expected += weight * values[&index[..]];
        }
        assert!((blended - expected).abs() < 1e-12);
    }

    #[test]
    fn test_four_dimensions_use_the_generic_path() {
        let a = vec![0.0, 1.0];
        let values: ArrayD<f64> = Array::from_elem(vec![2, 2, 2, 2], 3.5).into_dyn();
        let interpolant = Interpolant::new(
            [&a, &a, &a, &a],
            values.view(),
            Extrapolation::Error,
        )
        .unwrap();
        let blended = interpolant.interpolate([0.5, 0.25, 0.75, 0.1]).unwrap();
        assert!((blended - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_policy_bypasses_the_blend() {
        let xs = vec![10.0, 20.0];
        let ys = vec![2.0, 1.0];
        let interpolant =
            Interpolant::series(&xs, &ys, Extrapolation::Constant(f64::NAN)).unwrap();
        assert!(interpolant.interpolate(25.0).unwrap().is_nan());
        // inside the grid the constant does not apply
        assert_eq!(interpolant.interpolate(15.0).unwrap(), 1.5);
    }

    #[test]
    fn test_with_point_policy_receives_the_raw_point() {
        let xs = vec![10.0, 20.0];
        let ys = vec![2.0, 1.0];
        let fallback: PointFn<f64, f64> = std::sync::Arc::new(|point: &[f64]| point[0] * 2.0);
        let interpolant =
            Interpolant::series(&xs, &ys, Extrapolation::WithPoint(fallback)).unwrap();
        assert_eq!(interpolant.interpolate(30.0).unwrap(), 60.0);
        assert_eq!(interpolant.interpolate(15.0).unwrap(), 1.5);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected_per_call() {
        let x = vec![1.0, 2.0];
        let y = vec![1.0, 2.0];
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let interpolant =
            Interpolant::new([&x, &y], values.view().into_dyn(), Extrapolation::Error).unwrap();
        let short: &[f64] = &[1.5];
        assert_eq!(
            interpolant.interpolate(short).unwrap_err(),
            GridError::DimensionMismatchErr {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_construction_rejects_shape_mismatch() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![1.0, 2.0];
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(
            Interpolant::new([&x, &y], values.view().into_dyn(), Extrapolation::<f64, f64>::Error)
                .is_err()
        );

        let values = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        assert!(
            Interpolant::new([&x, &y], values.view().into_dyn(), Extrapolation::<f64, f64>::Error)
                .is_ok()
        );
    }

    #[test]
    fn test_construction_rejects_rank_mismatch() {
        let x = vec![1.0, 2.0];
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(Interpolant::<f64, f64, 1>::new(
            [&x],
            values.view().into_dyn(),
            Extrapolation::Error
        )
        .is_err());
    }

    #[test]
    fn test_repeated_evaluation_is_bit_identical() {
        let x = vec![1.0, 2.0];
        let y = vec![1.0, 2.0, 3.0];
        let values = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let interpolant =
            Interpolant::new([&x, &y], values.view().into_dyn(), Extrapolation::Error).unwrap();
        let first = interpolant.interpolate((1.3, 2.7)).unwrap();
        let second = interpolant.interpolate((1.3, 2.7)).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_rebind_preserves_behavior_on_new_storage() {
        let xs = vec![10.0, 20.0];
        let ys = vec![2.0, 1.0];
        let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Replicate).unwrap();

        // relocated copies, as a device staging pass would produce
        let moved_xs = xs.clone();
        let moved_ys = ys.clone();
        let rebound = interpolant
            .rebind([&moved_xs], ArrayView1::from(moved_ys.as_slice()).into_dyn())
            .unwrap();
        assert_eq!(
            interpolant.interpolate(17.5).unwrap(),
            rebound.interpolate(17.5).unwrap()
        );
        assert_eq!(
            interpolant.interpolate(30000.0).unwrap(),
            rebound.interpolate(30000.0).unwrap()
        );
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Distribution([f64; 2]);

    struct Renormalize;

    impl Combine<f64, Distribution> for Renormalize {
        fn combine(&self, weights: &[f64], values: &[&Distribution]) -> Distribution {
            let mut blended = [0.0, 0.0];
            for (weight, value) in weights.iter().zip(values.iter()) {
                blended[0] += *weight * value.0[0];
                blended[1] += *weight * value.0[1];
            }
            let total = blended[0] + blended[1];
            Distribution([blended[0] / total, blended[1] / total])
        }
    }

    #[test]
    fn test_custom_combine_interpolates_distributions() {
        let xs = vec![0.0, 1.0];
        let ys = vec![Distribution([0.5, 0.5]), Distribution([1.0, 0.0])];
        let interpolant =
            Interpolant::series_with(&xs, &ys, Extrapolation::Error, Renormalize).unwrap();
        // weights (0.1, 0.9) pick x = 0.9
        let blended = interpolant.interpolate(0.9).unwrap();
        assert!((blended.0[0] - 0.95).abs() < 1e-12);
        assert!((blended.0[1] - 0.05).abs() < 1e-12);
        assert!((blended.0[0] + blended.0[1] - 1.0).abs() < 1e-12);
    }
}
