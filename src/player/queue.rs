//! Queue identity lookups.
//!
//! Next/previous navigation locates the current track in the queue by id
//! equality, first match in sequence order. Duplicate ids therefore
//! resolve to the earliest occurrence, and empty ids never match.

use crate::track::TrackDescriptor;

/// Position of `current` in `queue` by id identity (first match).
pub(crate) fn position_of(queue: &[TrackDescriptor], current: &TrackDescriptor) -> Option<usize> {
    queue.iter().position(|t| t.same_id(current))
}
