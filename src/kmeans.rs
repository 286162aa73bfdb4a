//! Lloyd's k-means over any type implementing [`Cluster`],
//! and its instantiation for learning a palette of [`Pixel`]s.
//!
//! Each round assigns every point to its nearest center and then moves each center
//! to the average of its members. Iteration stops once no point changes its center
//! or the iteration cap is reached. A center that loses all of its members keeps its
//! previous value; it is not reseeded, so it may end up unused.

use crate::{traits::closest, AboveMaxLen, Cluster, Pixel, MAX_COLORS, MAX_K};

/// A list of initial centers for [`kmeans`], holding at most [`MAX_COLORS`] values.
#[derive(Debug, Clone, PartialEq)]
#[repr(transparent)]
pub struct Centroids<T>(Vec<T>);

impl<T> Centroids<T> {
    /// Returns the inner `Vec` of centers.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    /// Creates a new [`Centroids`] by truncating the input to at most [`MAX_COLORS`] centers.
    #[must_use]
    pub fn from_truncated(mut centroids: Vec<T>) -> Self {
        centroids.truncate(MAX_K);
        Self(centroids)
    }

    /// Returns the number of centers.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn num_colors(&self) -> u16 {
        self.0.len() as u16
    }
}

impl<T> AsRef<[T]> for Centroids<T> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Centroids<T>> for Vec<T> {
    fn from(value: Centroids<T>) -> Self {
        value.into_inner()
    }
}

impl<T> TryFrom<Vec<T>> for Centroids<T> {
    type Error = AboveMaxLen<u16>;

    fn try_from(centroids: Vec<T>) -> Result<Self, Self::Error> {
        if centroids.len() <= MAX_K {
            Ok(Self(centroids))
        } else {
            Err(AboveMaxLen(MAX_COLORS))
        }
    }
}

/// The result of running [`kmeans`].
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansOutput<T> {
    /// The final centers, in the same order as the initial centers.
    pub centroids: Vec<T>,
    /// The index of the center each data point is assigned to.
    ///
    /// This is empty if there were no centers to assign to.
    pub assignments: Vec<usize>,
    /// The number of data points assigned to each center.
    pub counts: Vec<u32>,
    /// The number of update rounds that were run.
    pub iterations: u32,
    /// Whether the assignments stopped changing before the iteration cap.
    pub converged: bool,
}

/// Clusters `data` starting from `initial` centers, running at most `max_iterations` update rounds.
///
/// Ties between equally distant centers go to the one listed first.
#[must_use]
pub fn kmeans<T: Cluster>(data: &[T], initial: Centroids<T>, max_iterations: u32) -> KmeansOutput<T> {
    let mut centroids = initial.into_inner();
    let k = centroids.len();

    let mut assignments = data
        .iter()
        .map(|point| closest(point, &centroids))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    let mut iterations = 0;
    let mut converged = assignments.is_empty();

    while !converged && iterations < max_iterations {
        iterations += 1;

        let mut groups = vec![Vec::new(); k];
        for (point, &label) in data.iter().zip(&assignments) {
            groups[label].push(point.clone());
        }

        for (center, group) in centroids.iter_mut().zip(&groups) {
            // an empty group keeps its previous center
            if let Ok(average) = T::average(group) {
                *center = average;
            }
        }

        let mut changes = 0u32;
        for (point, label) in data.iter().zip(&mut assignments) {
            if let Some(nearest) = closest(point, &centroids) {
                if nearest != *label {
                    *label = nearest;
                    changes += 1;
                }
            }
        }

        tracing::trace!(round = iterations, changes, "k-means round");
        converged = changes == 0;
    }

    let mut counts = vec![0; k];
    for &label in &assignments {
        counts[label] += 1;
    }

    KmeansOutput { centroids, assignments, counts, iterations, converged }
}

/// Returns `k` fully saturated, full value colors with evenly spaced hues,
/// from hue `0.0` up to hue `1.0` inclusive.
///
/// A single center uses hue `0.0`.
#[must_use]
pub fn hue_centroids(k: u8) -> Centroids<Pixel> {
    let last = f64::from(k.saturating_sub(1).max(1));
    Centroids(
        (0..k)
            .map(|i| Pixel::from_hsv(f64::from(i) / last, 1.0, 1.0))
            .collect(),
    )
}

/// Learns `k` colors from the `foreground` pixels.
///
/// The centers are seeded by [`hue_centroids`], so the result is deterministic for a given input.
/// Points are assigned by squared euclidean distance in RGB space.
#[must_use]
pub fn palette(foreground: &[Pixel], k: u8, max_iterations: u32) -> KmeansOutput<Pixel> {
    kmeans(foreground, hue_centroids(k), max_iterations)
}
