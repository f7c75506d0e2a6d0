use crate::domain::entities::{Interval, TimeRule, WallTime};
use serde::Serialize;

/// A named blocked window, reported next to the open ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedWindow {
    pub rule_name: String,
    pub window: Interval,
}

/// The effective shape of a day after overlaying blocked rules on open rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayWindows {
    /// Sorted, non-overlapping, non-adjacent bookable ranges
    pub open: Vec<Interval>,
    pub blocked: Vec<BlockedWindow>,
}

impl DayWindows {
    /// The blocked rule covering `time`, if any
    pub fn blocking_rule(&self, time: WallTime) -> Option<&BlockedWindow> {
        self.blocked.iter().find(|b| b.window.contains(time))
    }

    pub fn open_range_at(&self, time: WallTime) -> Option<Interval> {
        self.open.iter().copied().find(|range| range.contains(time))
    }

    pub fn is_open(&self, time: WallTime) -> bool {
        self.open_range_at(time).is_some()
    }
}

/// Reduces one day-type's rules to open ranges.
///
/// Open windows are unioned, then every blocked window is cut out of them.
/// A blocked window only removes the sub-range it overlaps.
pub fn reduce(rules: &[TimeRule]) -> DayWindows {
    let mut blocked: Vec<BlockedWindow> = rules
        .iter()
        .filter(|r| r.is_blocked)
        .map(|r| BlockedWindow {
            rule_name: r.rule_name.clone(),
            window: r.window(),
        })
        .collect();
    blocked.sort_by(|a, b| a.window.cmp(&b.window).then(a.rule_name.cmp(&b.rule_name)));

    let open = merge(rules.iter().filter(|r| !r.is_blocked).map(TimeRule::window));
    let cuts = merge(blocked.iter().map(|b| b.window));

    DayWindows {
        open: subtract(&open, &cuts),
        blocked,
    }
}

/// Sorts and merges overlapping or touching intervals.
pub fn merge(intervals: impl IntoIterator<Item = Interval>) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// `ranges - cuts`, both sorted and merged.
fn subtract(ranges: &[Interval], cuts: &[Interval]) -> Vec<Interval> {
    let mut result = Vec::new();
    for range in ranges {
        let mut cursor = range.start;
        for cut in cuts.iter().filter(|c| c.overlaps(range)) {
            if let Some(piece) = Interval::new(cursor, cut.start) {
                result.push(piece);
            }
            cursor = cursor.max(cut.end);
        }
        if let Some(piece) = Interval::new(cursor, range.end) {
            result.push(piece);
        }
    }
    result
}
