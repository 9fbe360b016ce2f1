use num_traits::NumCast;

use crate::utils::errors::{GridError, Result};
use crate::utils::num::Real;

/// Conversion of one point component into the axis scalar type. Mixed
/// integer/float components of a query point all promote through this
/// trait, so downstream arithmetic runs on a single scalar type.
pub trait IntoScalar<T: Real>: Copy {
    fn into_scalar(self) -> Result<T>;
}

macro_rules! impl_into_scalar {
    ($($source:ty),*) => {
        $(
            impl<T: Real> IntoScalar<T> for $source {
                fn into_scalar(self) -> Result<T> {
                    <T as NumCast>::from(self).ok_or_else(|| {
                        GridError::InvalidConfigurationErr(format!(
                            "Coordinate {:?} cannot be represented in the axis scalar type",
                            self
                        ))
                    })
                }
            }
        )*
    };
}

impl_into_scalar!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// # IntoPoint
/// Normalization of heterogeneous point representations into the fixed
/// `[T; N]` form matching the interpolant's dimensionality. Accepted:
/// `[S; N]` arrays, `&[S]` slices and `&Vec<S>` (length checked against
/// `N`), tuples of arity 1 to 4 with independently promoted components,
/// and a bare numeric scalar for `N = 1` only. All conversions are pure
/// and allocation-free.
///
/// ## Example
/// ```
/// use gridatlas::prelude::*;
/// let point: [f64; 2] = (1, 2.5).into_point().unwrap();
/// assert_eq!(point, [1.0, 2.5]);
/// let point: [f64; 1] = 3.into_point().unwrap();
/// assert_eq!(point, [3.0]);
/// ```
pub trait IntoPoint<T: Real, const N: usize> {
    fn into_point(self) -> Result<[T; N]>;
}

impl<T: Real, S: IntoScalar<T>, const N: usize> IntoPoint<T, N> for [S; N] {
    fn into_point(self) -> Result<[T; N]> {
        let mut point = [T::zero(); N];
        for (target, source) in point.iter_mut().zip(self.into_iter()) {
            *target = source.into_scalar()?;
        }
        Ok(point)
    }
}

impl<'p, T: Real, S: IntoScalar<T>, const N: usize> IntoPoint<T, N> for &'p [S] {
    fn into_point(self) -> Result<[T; N]> {
        if self.len() != N {
            return Err(GridError::DimensionMismatchErr {
                expected: N,
                got: self.len(),
            });
        }
        let mut point = [T::zero(); N];
        for (target, source) in point.iter_mut().zip(self.iter()) {
            *target = (*source).into_scalar()?;
        }
        Ok(point)
    }
}

impl<'p, T: Real, S: IntoScalar<T>, const N: usize> IntoPoint<T, N> for &'p Vec<S> {
    fn into_point(self) -> Result<[T; N]> {
        self.as_slice().into_point()
    }
}

macro_rules! impl_into_point_scalar {
    ($($source:ty),*) => {
        $(
            impl<T: Real> IntoPoint<T, 1> for $source {
                fn into_point(self) -> Result<[T; 1]> {
                    Ok([self.into_scalar()?])
                }
            }
        )*
    };
}

impl_into_point_scalar!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

macro_rules! impl_into_point_tuple {
    ($arity:literal; $($component:ident : $index:tt),+) => {
        impl<T: Real, $($component: IntoScalar<T>),+> IntoPoint<T, $arity> for ($($component,)+) {
            fn into_point(self) -> Result<[T; $arity]> {
                Ok([$(self.$index.into_scalar()?),+])
            }
        }
    };
}

impl_into_point_tuple!(1; A: 0);
impl_into_point_tuple!(2; A: 0, B: 1);
impl_into_point_tuple!(3; A: 0, B: 1, C: 2);
impl_into_point_tuple!(4; A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_and_slice_normalization() {
        let point: [f64; 3] = [1.0, 2.0, 3.0].into_point().unwrap();
        assert_eq!(point, [1.0, 2.0, 3.0]);

        let coords = vec![1, 2, 3];
        let point: [f64; 3] = (&coords).into_point().unwrap();
        assert_eq!(point, [1.0, 2.0, 3.0]);

        let point: Result<[f64; 2]> = coords.as_slice().into_point();
        assert_eq!(
            point.unwrap_err(),
            GridError::DimensionMismatchErr {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_mixed_tuple_promotion() {
        let point: [f64; 2] = (1, 2.5).into_point().unwrap();
        assert_eq!(point, [1.0, 2.5]);

        let point: [f32; 4] = (1u8, 2i64, 3.0f32, 4.0f64).into_point().unwrap();
        assert_eq!(point, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_bare_scalar_only_for_one_dimension() {
        let point: [f64; 1] = 3.into_point().unwrap();
        assert_eq!(point, [3.0]);

        let point: [f32; 1] = 2.5f64.into_point().unwrap();
        assert_eq!(point, [2.5]);
    }
}
