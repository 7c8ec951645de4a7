//! Closed-interval tree for diagnostic spans.
//!
//! Diagnostics are stored once in an arena (see [`crate::diagnostics`]); the tree
//! holds only lightweight [`ClosedInterval`] entries carrying an index back into
//! that arena. Intervals are **closed** `[low, high]` ranges over character
//! offsets; the arena derives them from half-open spans before insertion.
//!
//! Uses a sorted vector with binary search plus a prefix maximum-high table for
//! early pruning. Query complexity: O(log n + k), where k is the number of
//! reported intervals. Insertion complexity: O(n) (maintains sort order).

/// A closed `[low, high]` character range with a back-reference into the
/// diagnostic arena.
///
/// `low <= high` always holds; a zero-width marker is the degenerate point
/// `[low, low]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedInterval {
    /// Inclusive start offset.
    pub low: usize,
    /// Inclusive end offset.
    pub high: usize,
    /// Index of the owning record in the arena. The tree never stores record
    /// content.
    pub index: usize,
}

impl ClosedInterval {
    /// Create a new interval. `low` must not exceed `high`.
    pub fn new(low: usize, high: usize, index: usize) -> Self {
        debug_assert!(low <= high);
        Self { low, high, index }
    }

    /// Number of offsets covered (a point covers one).
    pub fn len(&self) -> usize {
        self.high - self.low + 1
    }

    /// Closed intervals are never empty; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Closed-closed overlap with `[low, high]`: touching a shared boundary
    /// offset counts.
    pub fn overlaps(&self, low: usize, high: usize) -> bool {
        self.low <= high && low <= self.high
    }

    /// Exclusive-border overlap with `[low, high]`: the intersection must be
    /// wider than a shared boundary offset.
    pub fn overlaps_exclusive(&self, low: usize, high: usize) -> bool {
        self.low < high && low < self.high
    }

    /// Whether `offset` lies inside the interval, borders included.
    pub fn contains_point(&self, offset: usize) -> bool {
        self.low <= offset && offset <= self.high
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &ClosedInterval) -> bool {
        self.low <= other.low && other.high <= self.high
    }

    /// Gap between two intervals: zero when they overlap, otherwise the number
    /// of offsets strictly between them plus one (adjacent intervals are at
    /// distance one).
    pub fn distance(&self, other: &ClosedInterval) -> usize {
        if self.overlaps(other.low, other.high) {
            return 0;
        }
        if self.high < other.low {
            other.low - self.high
        } else {
            self.low - other.high
        }
    }

    /// Smallest interval containing both. Keeps the receiver's back-reference.
    pub fn join(&self, other: &ClosedInterval) -> ClosedInterval {
        ClosedInterval {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
            index: self.index,
        }
    }
}

/// Interval tree over [`ClosedInterval`] entries.
#[derive(Debug, Default)]
pub struct IntervalTree {
    /// Entries kept sorted by `low`.
    intervals: Vec<ClosedInterval>,
    /// `prefix_max_high[i] = max(intervals[0..=i].high)`.
    ///
    /// Lets the backward scans in the query methods stop as soon as every
    /// earlier interval provably ends before the query, avoiding degradation
    /// to an O(n) scan on large diagnostic sets.
    prefix_max_high: Vec<usize>,
}

impl IntervalTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            prefix_max_high: Vec::new(),
        }
    }

    fn rebuild_prefix_max_high_from(&mut self, start_idx: usize) {
        if self.intervals.is_empty() {
            self.prefix_max_high.clear();
            return;
        }

        if self.prefix_max_high.len() != self.intervals.len() {
            self.prefix_max_high.resize(self.intervals.len(), 0);
        }

        let mut max_high = if start_idx == 0 {
            0
        } else {
            self.prefix_max_high[start_idx - 1]
        };

        for (idx, interval) in self.intervals.iter().enumerate().skip(start_idx) {
            max_high = max_high.max(interval.high);
            self.prefix_max_high[idx] = max_high;
        }
    }

    /// Insert an interval, keeping entries sorted by `low`.
    pub fn insert(&mut self, interval: ClosedInterval) {
        let pos = self
            .intervals
            .binary_search_by_key(&interval.low, |i| i.low)
            .unwrap_or_else(|pos| pos);

        self.intervals.insert(pos, interval);
        self.prefix_max_high.insert(pos, 0);
        self.rebuild_prefix_max_high_from(pos);
    }

    /// All intervals containing `offset` (closed borders). This is the
    /// hover/stab query.
    pub fn query_point(&self, offset: usize) -> Vec<&ClosedInterval> {
        self.query_point_impl(offset).0
    }

    fn query_point_impl(&self, offset: usize) -> (Vec<&ClosedInterval>, usize) {
        if self.intervals.is_empty() {
            return (Vec::new(), 0);
        }

        let mut result = Vec::new();
        let mut scanned = 0usize;

        // First position where low > offset; every candidate is before it.
        let search_key = offset.saturating_add(1);
        let idx = match self.intervals.binary_search_by_key(&search_key, |i| i.low) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };

        for i in (0..idx).rev() {
            scanned = scanned.saturating_add(1);

            // Everything at or before i ends before the offset: done.
            if self.prefix_max_high[i] < offset {
                break;
            }

            let interval = &self.intervals[i];
            if interval.contains_point(offset) {
                result.push(interval);
            }
        }

        (result, scanned)
    }

    #[cfg(test)]
    fn query_point_scan_count(&self, offset: usize) -> usize {
        self.query_point_impl(offset).1
    }

    /// All intervals overlapping the closed query `[low, high]` under
    /// closed-closed semantics.
    pub fn query_overlap(&self, low: usize, high: usize) -> Vec<&ClosedInterval> {
        if self.intervals.is_empty() || low > high {
            return Vec::new();
        }

        // First position where interval.low > high bounds the candidates.
        let search_key = high.saturating_add(1);
        let search_end = match self.intervals.binary_search_by_key(&search_key, |i| i.low) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };

        if search_end == 0 {
            return Vec::new();
        }

        // Walk back from the first entry starting at/after `low` until the
        // prefix maximum proves nothing earlier can reach the query.
        let mut scan_start = match self.intervals.binary_search_by_key(&low, |i| i.low) {
            Ok(idx) | Err(idx) => idx.min(search_end),
        };
        while scan_start > 0 && self.prefix_max_high[scan_start - 1] >= low {
            scan_start -= 1;
        }

        self.intervals[scan_start..search_end]
            .iter()
            .filter(|i| i.overlaps(low, high))
            .collect()
    }

    /// All intervals overlapping the half-open query `[start, end)` under
    /// exclusive-border semantics: an interval merely touching `start` or
    /// `end` is not reported.
    pub fn query_overlap_exclusive(&self, start: usize, end: usize) -> Vec<&ClosedInterval> {
        if self.intervals.is_empty() {
            return Vec::new();
        }

        // Candidates start strictly before `end`.
        let search_end = match self.intervals.binary_search_by_key(&end, |i| i.low) {
            Ok(idx) | Err(idx) => idx,
        };

        if search_end == 0 {
            return Vec::new();
        }

        let mut scan_start = match self.intervals.binary_search_by_key(&start, |i| i.low) {
            Ok(idx) | Err(idx) => idx.min(search_end),
        };
        while scan_start > 0 && self.prefix_max_high[scan_start - 1] > start {
            scan_start -= 1;
        }

        self.intervals[scan_start..search_end]
            .iter()
            .filter(|i| i.overlaps_exclusive(start, end))
            .collect()
    }

    /// Drop all intervals.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.prefix_max_high.clear();
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_geometry() {
        let a = ClosedInterval::new(5, 9, 0);
        assert_eq!(a.len(), 5);
        assert!(!a.is_empty());
        assert!(a.contains_point(5));
        assert!(a.contains_point(9));
        assert!(!a.contains_point(10));

        let inner = ClosedInterval::new(6, 8, 1);
        assert!(a.contains(&inner));
        assert!(!inner.contains(&a));
    }

    #[test]
    fn test_overlap_closed_vs_exclusive() {
        // Two diagnostics sharing exactly one boundary offset.
        let a = ClosedInterval::new(0, 5, 0);

        assert!(a.overlaps(5, 9)); // closed: the shared offset counts
        assert!(!a.overlaps_exclusive(5, 9)); // exclusive: it does not
        assert!(a.overlaps_exclusive(4, 9));
        assert!(!a.overlaps(6, 9));
    }

    #[test]
    fn test_degenerate_point_interval() {
        let point = ClosedInterval::new(7, 7, 0);
        assert_eq!(point.len(), 1);
        assert!(point.contains_point(7));
        assert!(point.overlaps(7, 7));
        assert!(point.overlaps(0, 7));

        // Exclusive semantics admit the point only strictly inside the query,
        // never when it sits on a query border.
        assert!(point.overlaps_exclusive(0, 20));
        assert!(!point.overlaps_exclusive(7, 20));
        assert!(!point.overlaps_exclusive(0, 7));
    }

    #[test]
    fn test_distance_and_join() {
        let a = ClosedInterval::new(0, 3, 0);
        let b = ClosedInterval::new(8, 10, 1);
        assert_eq!(a.distance(&b), 5);
        assert_eq!(b.distance(&a), 5);

        let adjacent = ClosedInterval::new(4, 6, 2);
        assert_eq!(a.distance(&adjacent), 1);

        let overlapping = ClosedInterval::new(2, 5, 3);
        assert_eq!(a.distance(&overlapping), 0);

        let joined = a.join(&b);
        assert_eq!((joined.low, joined.high), (0, 10));
        assert_eq!(joined.index, a.index);
    }

    #[test]
    fn test_empty_tree_queries() {
        let tree = IntervalTree::new();
        assert!(tree.is_empty());
        assert!(tree.query_point(0).is_empty());
        assert!(tree.query_overlap(0, 100).is_empty());
        assert!(tree.query_overlap_exclusive(0, 100).is_empty());
    }

    #[test]
    fn test_insert_and_query_point() {
        let mut tree = IntervalTree::new();
        tree.insert(ClosedInterval::new(0, 4, 0));
        tree.insert(ClosedInterval::new(10, 14, 1));
        tree.insert(ClosedInterval::new(3, 12, 2));
        assert_eq!(tree.len(), 3);

        let mut hits: Vec<usize> = tree.query_point(3).iter().map(|i| i.index).collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 2]);

        let hits: Vec<usize> = tree.query_point(14).iter().map(|i| i.index).collect();
        assert_eq!(hits, vec![1]);

        assert!(tree.query_point(20).is_empty());
    }

    #[test]
    fn test_query_overlap_range() {
        let mut tree = IntervalTree::new();
        tree.insert(ClosedInterval::new(0, 4, 0));
        tree.insert(ClosedInterval::new(5, 9, 1));
        tree.insert(ClosedInterval::new(20, 24, 2));

        // Closed query touching the first interval's last offset.
        let mut hits: Vec<usize> = tree.query_overlap(4, 6).iter().map(|i| i.index).collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);

        // Exclusive query abutting interval 0 at offset 4 reports only 1.
        let hits: Vec<usize> = tree
            .query_overlap_exclusive(4, 10)
            .iter()
            .map(|i| i.index)
            .collect();
        assert_eq!(hits, vec![1]);

        assert!(tree.query_overlap(10, 19).is_empty());
    }

    #[test]
    fn test_disjoint_intervals_never_coreported() {
        let mut tree = IntervalTree::new();
        tree.insert(ClosedInterval::new(0, 4, 0));
        tree.insert(ClosedInterval::new(10, 14, 1));

        for offset in 0..=4 {
            let hits: Vec<usize> = tree.query_point(offset).iter().map(|i| i.index).collect();
            assert_eq!(hits, vec![0], "offset {offset}");
        }
        for offset in 5..=9 {
            assert!(tree.query_point(offset).is_empty(), "offset {offset}");
        }
    }

    #[test]
    fn test_clear_empties_tree() {
        let mut tree = IntervalTree::new();
        tree.insert(ClosedInterval::new(0, 10, 0));
        tree.insert(ClosedInterval::new(5, 15, 1));
        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.query_point(5).is_empty());
    }

    #[test]
    fn test_unsorted_insertion_order() {
        let mut tree = IntervalTree::new();
        tree.insert(ClosedInterval::new(30, 35, 0));
        tree.insert(ClosedInterval::new(10, 15, 1));
        tree.insert(ClosedInterval::new(20, 25, 2));
        tree.insert(ClosedInterval::new(0, 5, 3));

        assert_eq!(tree.query_point(12)[0].index, 1);
        assert_eq!(tree.query_point(22)[0].index, 2);
        assert_eq!(tree.query_point(33)[0].index, 0);
    }

    #[test]
    fn test_query_point_prunes_scan() {
        // Many short intervals well before the probe; the prefix maximum must
        // stop the backward scan almost immediately.
        let mut tree = IntervalTree::new();
        for i in 0..1000 {
            let start = i * 10;
            tree.insert(ClosedInterval::new(start, start + 4, i));
        }

        let probe = 9002;
        let hits = tree.query_point(probe);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 900);

        let scanned = tree.query_point_scan_count(probe);
        assert!(
            scanned <= 4,
            "expected pruned scan, but scanned {scanned} intervals"
        );
    }
}
