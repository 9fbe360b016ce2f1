pub mod batch;
pub mod combine;
pub mod interpolant;

use ndarray::{ArrayView, IxDyn};
use std::ops::{Add, Mul};

use crate::axes::point::IntoPoint;
use crate::extrapolation::enums::Extrapolation;
use crate::interpolation::combine::{Combine, WeightedSum};
use crate::interpolation::interpolant::Interpolant;
use crate::utils::errors::Result;
use crate::utils::num::Real;

/// One-shot evaluation with the default weighted-sum combine: builds a
/// validated interpolant, evaluates a single point, and drops it.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// use ndarray::array;
/// let x = vec![1.0, 2.0];
/// let y = vec![1.0, 2.0, 3.0];
/// let values = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let blended = evaluate(
///     [&x, &y],
///     values.view().into_dyn(),
///     (1.5, 1.1),
///     Extrapolation::Error,
/// )
/// .unwrap();
/// assert!((blended - 2.6).abs() < 1e-12);
/// ```
pub fn evaluate<'a, T, V, P, const N: usize>(
    axes: [&'a [T]; N],
    values: ArrayView<'a, V, IxDyn>,
    point: P,
    extrapolation: Extrapolation<T, V>,
) -> Result<V>
where
    T: Real,
    V: Copy + Add<Output = V> + Mul<T, Output = V>,
    P: IntoPoint<T, N>,
{
    evaluate_with(axes, values, point, extrapolation, WeightedSum)
}

/// One-shot evaluation with a custom combine operation.
pub fn evaluate_with<'a, T, V, P, C, const N: usize>(
    axes: [&'a [T]; N],
    values: ArrayView<'a, V, IxDyn>,
    point: P,
    extrapolation: Extrapolation<T, V>,
    combine: C,
) -> Result<V>
where
    T: Real,
    V: Clone,
    P: IntoPoint<T, N>,
    C: Combine<T, V>,
{
    Interpolant::with_combine(axes, values, extrapolation, combine)?.interpolate(point)
}
