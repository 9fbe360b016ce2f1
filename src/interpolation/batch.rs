use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator,
    ParallelIterator,
};

use crate::interpolation::combine::Combine;
use crate::interpolation::interpolant::Interpolant;
use crate::utils::errors::{GridError, Result};
use crate::utils::num::Real;

impl<'a, T: Real, V, const N: usize, C: Combine<T, V>> Interpolant<'a, T, V, N, C> {
    /// Evaluate a batch of points into a caller-owned output buffer. The
    /// first failing point aborts the batch; results already written stay
    /// in the buffer.
    ///
    /// ## Example
    /// ```
    /// use gridatlas::prelude::*;
    /// let xs = vec![0.0, 1.0];
    /// let ys = vec![0.0, 10.0];
    /// let interpolant = Interpolant::series(&xs, &ys, Extrapolation::Error).unwrap();
    /// let points = [[0.0], [0.25], [1.0]];
    /// let mut out = vec![0.0; 3];
    /// interpolant.interpolate_many(&points, &mut out).unwrap();
    /// assert_eq!(out, vec![0.0, 2.5, 10.0]);
    /// ```
    pub fn interpolate_many(&self, points: &[[T; N]], out: &mut [V]) -> Result<()>
    where
        V: Clone,
    {
        if points.len() != out.len() {
            return Err(GridError::InvalidConfigurationErr(format!(
                "Output buffer holds {} results but {} points were given",
                out.len(),
                points.len()
            )));
        }
        for (slot, point) in out.iter_mut().zip(points.iter()) {
            *slot = self.interpolate_point(*point)?;
        }
        Ok(())
    }

    /// Parallel batch evaluation, one rayon task per point. Evaluation is
    /// read-only, so the points split across workers with no internal
    /// synchronization.
    pub fn par_interpolate_many(&self, points: &[[T; N]], out: &mut [V]) -> Result<()>
    where
        V: Clone + Send + Sync,
        C: Sync,
    {
        if points.len() != out.len() {
            return Err(GridError::InvalidConfigurationErr(format!(
                "Output buffer holds {} results but {} points were given",
                out.len(),
                points.len()
            )));
        }
        out.par_iter_mut()
            .zip(points.par_iter())
            .try_for_each(|(slot, point)| {
                *slot = self.interpolate_point(*point)?;
                Ok(())
            })
    }
}
