use std::ops::{Add, Mul};

use crate::utils::num::Real;

/// # Combine
/// Pluggable reduction merging the weighted corner values into one
/// result. `weights` and `values` always have the same length (the 2^N
/// corners of the bracketing cell, enumerated in ascending bit order)
/// and are never empty.
///
/// Implementations must return the value unchanged when its weight is 1
/// and every other weight is 0, and should be linear in the weights when
/// the value type supports addition and scaling. Beyond that the
/// operation is free to renormalize, so types with only a
/// weighted-average structure (probability distributions, rotations,
/// labels) interpolate through the same machinery.
pub trait Combine<T: Real, V> {
    fn combine(&self, weights: &[T], values: &[&V]) -> V;
}

/// # WeightedSum
/// Default combine: multiply-accumulate of corner values by corner
/// weights, in ascending corner order. The same accumulation order is
/// used at every dimensionality, so the unrolled low-dimension paths and
/// the generic path produce identical results in exact arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeightedSum;

impl<T, V> Combine<T, V> for WeightedSum
where
    T: Real,
    V: Copy + Add<Output = V> + Mul<T, Output = V>,
{
    fn combine(&self, weights: &[T], values: &[&V]) -> V {
        let mut accumulated = *values[0] * weights[0];
        for (weight, value) in weights.iter().zip(values.iter()).skip(1) {
            accumulated = accumulated + **value * *weight;
        }
        accumulated
    }
}

/// # CombineWith
/// Adapter turning a plain function into a [`Combine`] implementation,
/// for one-off custom reductions that do not warrant a named type.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// fn largest_weight(weights: &[f64], values: &[&f64]) -> f64 {
///     let mut best = 0;
///     for (corner, weight) in weights.iter().enumerate() {
///         if *weight > weights[best] {
///             best = corner;
///         }
///     }
///     *values[best]
/// }
///
/// let xs = vec![0.0, 1.0];
/// let ys = vec![10.0, 20.0];
/// let nearest = CombineWith(largest_weight);
/// let interpolant =
///     Interpolant::series_with(&xs, &ys, Extrapolation::Error, nearest).unwrap();
/// assert_eq!(interpolant.interpolate(0.25).unwrap(), 10.0);
/// assert_eq!(interpolant.interpolate(0.75).unwrap(), 20.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CombineWith<F>(pub F);

impl<T, V, F> Combine<T, V> for CombineWith<F>
where
    T: Real,
    F: Fn(&[T], &[&V]) -> V,
{
    fn combine(&self, weights: &[T], values: &[&V]) -> V {
        (self.0)(weights, values)
    }
}
