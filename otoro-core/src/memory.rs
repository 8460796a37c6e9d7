//! Heap-usage estimation for the concurrent graph.
//!
//! The engine never measures the allocator; it reports a conservative
//! estimate derived from struct layout so callers can budget index RAM and
//! account for growth as insertions land. Constants are derived from 64-bit
//! Linux layouts and intentionally round up.

/// Size of one stored neighbour entry (`id: usize`, `score: f32`, padding).
pub(crate) const NEIGHBOUR_ENTRY_BYTES: u64 = 16;

/// Fixed overhead of one neighbour set: the shared inner allocation (node,
/// capacity, `ArcSwap` cell) plus the reference-counted array header that
/// every published snapshot carries.
pub(crate) const NEIGHBOUR_SET_OVERHEAD_BYTES: u64 = 88;

/// Estimated per-entry overhead of a concurrent-map slot holding a node's
/// neighbour set: key, hash metadata, and shard bookkeeping.
pub(crate) const MAP_SLOT_BYTES: u64 = 48;

/// Returns the estimated resident bytes of a single neighbour set with the
/// given capacity, including its map slot.
#[must_use]
pub(crate) fn neighbour_set_bytes(capacity: usize) -> u64 {
    MAP_SLOT_BYTES + NEIGHBOUR_SET_OVERHEAD_BYTES + capacity as u64 * NEIGHBOUR_ENTRY_BYTES
}

/// Formats a byte count for log output, scaling to the largest unit that
/// keeps the value above one.
///
/// # Examples
/// ```
/// use otoro_core::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
