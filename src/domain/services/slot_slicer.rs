use crate::domain::entities::{Interval, Slot, WallTime};
use std::collections::HashSet;

/// Slices open ranges into consecutive `granularity`-minute slots.
///
/// A trailing piece shorter than `granularity` is dropped. Slots are marked
/// unavailable when the whole day is blocked or their start time is taken.
pub fn slice(
    open: &[Interval],
    granularity: u32,
    day_blocked: bool,
    taken: &HashSet<WallTime>,
) -> Vec<Slot> {
    if granularity == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for range in open {
        let mut start = range.start;
        while let Some(end) = start.checked_add_minutes(granularity) {
            if end > range.end {
                break;
            }
            slots.push(Slot {
                start_time: start,
                end_time: end,
                available: !day_blocked && !taken.contains(&start),
            });
            start = end;
        }
    }
    slots
}
