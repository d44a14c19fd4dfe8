use core::ops::Range;

/// Split of `0..len` into contiguous, disjoint ranges, each folded by one worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    len: usize,
    ranges: Vec<Range<usize>>,
}

impl PartitionPlan {
    /// Split `0..len` into `count` ranges whose sizes differ by at most one.
    ///
    /// The count is clamped to `1..=len`. An empty input still gets a single empty range,
    /// so every reduction produces at least one partial.
    pub fn new(len: usize, count: usize) -> Self {
        let count = count.clamp(1, len.max(1));
        let base = len / count;
        let remainder = len % count;

        let mut ranges = Vec::with_capacity(count);
        let mut start = 0;
        for index in 0..count {
            let size = base + usize::from(index < remainder);
            ranges.push(start..start + size);
            start += size;
        }

        Self { len, ranges }
    }

    /// Pick a partition count so that each range holds at least `min_len` items, using no more
    /// than `max_count` partitions.
    pub fn with_min_len(len: usize, min_len: usize, max_count: usize) -> Self {
        let count = len.div_ceil(min_len.max(1)).min(max_count.max(1));
        Self::new(len, count)
    }

    /// Total number of items covered by the plan.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the plan covers no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of partitions.
    pub fn count(&self) -> usize {
        self.ranges.len()
    }

    /// The partitions, in order.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }
}
