//! Splits a port range into one contiguous slice per worker.
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

use serde_derive::Serialize;

use crate::error::ScanError;
use crate::input::LOWEST_PORT_NUMBER;

/// A contiguous slice of the requested range, owned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubRange {
    /// Position of the slice; slices are ordered by ascending id.
    pub worker_id: usize,
    /// First port (inclusive).
    pub start: u16,
    /// Last port (inclusive).
    pub end: u16,
}

impl SubRange {
    /// The ports of this slice in ascending order.
    pub const fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    /// Number of ports in this slice. Never zero.
    pub const fn len(&self) -> u32 {
        self.end as u32 - self.start as u32 + 1
    }

    /// Always false; present for symmetry with [`SubRange::len`].
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Number of ports in `start..=end`, or an error when the range is empty or
/// starts at port 0.
fn total_ports(start: u16, end: u16) -> Result<usize, ScanError> {
    if start < LOWEST_PORT_NUMBER || end < start {
        return Err(ScanError::InvalidRange { start, end });
    }
    Ok(usize::from(end - start) + 1)
}

/// How many workers a scan of `start..=end` gets: one per port, capped at
/// `max_workers`.
pub fn worker_count(start: u16, end: u16, max_workers: NonZeroUsize) -> Result<usize, ScanError> {
    Ok(total_ports(start, end)?.min(max_workers.get()))
}

/// Splits `start..=end` into `min(total, max_workers)` slices.
///
/// Every slice but the last holds exactly `total / workers` ports. The last
/// slice runs to `end` and takes the whole remainder, so `1..=1000` over 7
/// workers gives six slices of 142 ports and one of 148.
///
/// ```rust
/// # use std::num::NonZeroUsize;
/// # use rangescan::partition::partition;
/// let slices = partition(1, 1000, NonZeroUsize::new(7).unwrap()).unwrap();
/// assert_eq!(slices.len(), 7);
/// assert_eq!(slices[0].ports(), 1..=142);
/// assert_eq!(slices[6].ports(), 853..=1000);
/// ```
pub fn partition(
    start: u16,
    end: u16,
    max_workers: NonZeroUsize,
) -> Result<Vec<SubRange>, ScanError> {
    let total = total_ports(start, end)?;
    let workers = total.min(max_workers.get());
    let chunk = total / workers;

    // workers * chunk <= total, so there are at least `workers` slice starts
    // inside the range.
    let starts = (start..=end)
        .step_by(chunk)
        .take(workers)
        .collect::<Vec<u16>>();

    let slices = starts
        .iter()
        .enumerate()
        .map(|(worker_id, &first)| SubRange {
            worker_id,
            start: first,
            end: starts.get(worker_id + 1).map_or(end, |next| next - 1),
        })
        .collect();

    Ok(slices)
}
