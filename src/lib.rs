//! # GridAtlas
//! Generic multilinear interpolation over rectilinear grids.
//!
//! An [`Interpolant`](crate::interpolation::interpolant::Interpolant) is an
//! immutable, validated view over caller-owned coordinate axes and an
//! N-dimensional value array. Each evaluation brackets the query point on
//! every axis, forms the 2^N corner weights, and reduces the corner values
//! through a pluggable combine operation, so types that only support a
//! weighted average (probability distributions, rotations, labels)
//! interpolate through the same machinery as plain numbers. Out-of-range
//! queries are handled by a closed set of extrapolation policies.
//!
//! ```
//! use gridatlas::prelude::*;
//!
//! let xs = vec![10.0, 20.0, 30.0];
//! let ys = vec![1.0, 2.0, 3.0];
//! let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
//! assert_eq!(interpolant.interpolate(25.0).unwrap(), 2.5);
//! ```

pub mod axes;
pub mod extrapolation;
pub mod interpolation;
pub mod prelude;
pub mod utils;
