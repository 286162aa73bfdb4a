use crate::NotescanError;
use ordered_float::OrderedFloat;

/// The capabilities a value needs in order to be clustered by [`kmeans`](crate::kmeans::kmeans).
///
/// [`Pixel`](crate::Pixel) implements this using the squared euclidean distance in RGB space
/// and the per-channel RGB mean.
pub trait Cluster: Clone {
    /// Returns the distance between two values. Smaller is closer.
    fn distance(&self, other: &Self) -> f64;

    /// Returns the value representing the center of `members`.
    ///
    /// # Errors
    /// Should return [`NotescanError::EmptyInput`] if `members` is empty.
    fn average(members: &[Self]) -> Result<Self, NotescanError>;
}

/// Returns the index of the value in `centers` closest to `value`.
///
/// Ties go to the lowest index. Returns `None` if `centers` is empty.
pub(crate) fn closest<T: Cluster>(value: &T, centers: &[T]) -> Option<usize> {
    centers
        .iter()
        .enumerate()
        .min_by_key(|(_, center)| OrderedFloat(value.distance(center)))
        .map(|(i, _)| i)
}
