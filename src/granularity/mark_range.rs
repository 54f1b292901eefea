use granularity::IndexGranularity;

/// Contiguous range `[begin, end)` of marks to read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MarkRange {
    /// Inclusive.
    pub begin: usize,
    /// Exclusive.
    pub end: usize,
}

impl MarkRange {
    pub fn new(begin: usize, end: usize) -> MarkRange {
        MarkRange {
            begin: begin,
            end: end,
        }
    }

    pub fn num_marks(&self) -> usize {
        if self.end > self.begin {
            self.end - self.begin
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }
}

/// Maps mark ranges to `[start_row, end_row)` pairs, skipping empty
/// ranges.
pub fn mark_ranges_to_rows(
    mark_ranges: &[MarkRange],
    granularity: &IndexGranularity,
) -> Vec<(usize, usize)> {
    let mut row_ranges = Vec::with_capacity(mark_ranges.len());
    for range in mark_ranges {
        if range.is_empty() {
            continue;
        }
        let start_row = granularity.rows_up_to(range.begin);
        let end_row = granularity.rows_up_to(range.end);
        row_ranges.push((start_row, end_row));
    }
    row_ranges
}
