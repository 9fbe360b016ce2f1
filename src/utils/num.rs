use std::fmt::Debug;

use num_traits::Float;

/// Trait implemented by scalar coordinate types used in axis searches and
/// interpolation weights.
pub trait Real: Float + Debug + Send + Sync + 'static {}

impl<T> Real for T where T: Float + Debug + Send + Sync + 'static {}
