use error::{ErrorKind, Result};
use granularity::IndexGranularity;

/// Granularity with arbitrary per-mark row counts.
///
/// Row counts are stored as cumulative partial sums:
/// `partial_sums[i]` is the total number of rows from the start of the
/// part to the end of mark `i`. Row → mark conversion is a binary
/// search for the first partial sum greater than the row.
///
/// An adaptive granularity may end with an empty *final mark*,
/// signalling that no more data follows.
#[derive(Clone, Debug, Default)]
pub struct AdaptiveGranularity {
    /// `partial_sums[i]` = rows in marks `[0, i]`.
    ///
    /// Example: `[100, 250, 408, 550]` describes marks of
    /// 100, 150, 158 and 142 rows.
    partial_sums: Vec<usize>,
}

impl AdaptiveGranularity {
    pub fn new() -> AdaptiveGranularity {
        AdaptiveGranularity::default()
    }

    /// Total rows from the start of the part to the end of the mark.
    pub fn cumulative_rows(&self, mark_index: usize) -> Result<usize> {
        if mark_index >= self.partial_sums.len() {
            return Err(ErrorKind::OutOfRange(format!(
                "mark {} out of range ({} marks)",
                mark_index,
                self.partial_sums.len()
            )).into());
        }
        Ok(self.partial_sums[mark_index])
    }

    /// Appends the empty mark that closes an adaptive part.
    pub fn add_final_mark(&mut self) {
        self.add_mark(0);
    }

    /// First index whose partial sum is strictly greater than `row`.
    fn upper_bound(&self, row: usize) -> usize {
        let mut low = 0;
        let mut high = self.partial_sums.len();
        while low < high {
            let mid = (low + high) / 2;
            if self.partial_sums[mid] <= row {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }
}

impl IndexGranularity for AdaptiveGranularity {
    fn marks_count(&self) -> usize {
        self.partial_sums.len()
    }

    fn mark_rows(&self, mark_index: usize) -> Result<usize> {
        let cumulative = self.cumulative_rows(mark_index)?;
        if mark_index == 0 {
            Ok(cumulative)
        } else {
            Ok(cumulative - self.partial_sums[mark_index - 1])
        }
    }

    fn rows_in_range(&self, begin: usize, end: usize) -> usize {
        if end <= begin {
            return 0;
        }
        let end = end.min(self.partial_sums.len());
        if begin >= self.partial_sums.len() {
            return 0;
        }
        let end_rows = self.partial_sums[end - 1];
        let begin_rows = if begin == 0 {
            0
        } else {
            self.partial_sums[begin - 1]
        };
        end_rows - begin_rows
    }

    fn mark_containing_row(&self, row: usize) -> Result<usize> {
        if self.partial_sums.is_empty() {
            return Err(ErrorKind::OutOfRange("no marks in granularity".to_string()).into());
        }
        let mark = self.upper_bound(row);
        if mark == self.partial_sums.len() {
            return Err(ErrorKind::OutOfRange(format!(
                "row {} beyond the last mark",
                row
            )).into());
        }
        Ok(mark)
    }

    fn count_marks_for_rows(&self, from_mark: usize, number_of_rows: usize) -> usize {
        if from_mark >= self.partial_sums.len() {
            return 0;
        }
        let rows_before = if from_mark == 0 {
            0
        } else {
            self.partial_sums[from_mark - 1]
        };
        let target_row = rows_before + number_of_rows;
        // first mark ending at or after target_row
        let mut low = from_mark;
        let mut high = self.partial_sums.len();
        while low < high {
            let mid = (low + high) / 2;
            if self.partial_sums[mid] < target_row {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        if low == self.partial_sums.len() {
            self.partial_sums.len() - from_mark
        } else {
            low - from_mark + 1
        }
    }

    fn has_final_mark(&self) -> bool {
        match self.partial_sums.len() {
            0 => false,
            len => self.mark_rows(len - 1).expect("index in range") == 0,
        }
    }

    fn add_mark(&mut self, rows: usize) {
        let cumulative = self.partial_sums.last().cloned().unwrap_or(0) + rows;
        self.partial_sums.push(cumulative);
    }
}

#[cfg(test)]
mod tests {

    use granularity::{AdaptiveGranularity, IndexGranularity};

    fn sample() -> AdaptiveGranularity {
        let mut granularity = AdaptiveGranularity::new();
        granularity.add_mark(100);
        granularity.add_mark(150);
        granularity.add_mark(200);
        granularity
    }

    #[test]
    fn test_mark_lookup_and_range_sums() {
        let granularity = sample();
        assert_eq!(granularity.marks_count(), 3);
        assert_eq!(granularity.mark_rows(1).unwrap(), 150);
        assert_eq!(granularity.mark_containing_row(0).unwrap(), 0);
        assert_eq!(granularity.mark_containing_row(99).unwrap(), 0);
        assert_eq!(granularity.mark_containing_row(249).unwrap(), 1);
        assert_eq!(granularity.mark_containing_row(250).unwrap(), 2);
        assert_eq!(granularity.rows_in_range(1, 3), 350);
        assert_eq!(granularity.total_rows(), 450);
        assert!(!granularity.has_final_mark());
        assert_eq!(granularity.cumulative_rows(2).unwrap(), 450);
    }

    #[test]
    fn test_out_of_range_errors() {
        let granularity = sample();
        assert!(granularity.mark_rows(3).is_err());
        assert!(granularity.mark_containing_row(450).is_err());
        assert!(AdaptiveGranularity::new().mark_containing_row(0).is_err());
    }

    #[test]
    fn test_final_mark() {
        let mut granularity = sample();
        granularity.add_final_mark();
        assert!(granularity.has_final_mark());
        assert_eq!(granularity.marks_count(), 4);
        assert_eq!(granularity.mark_rows(3).unwrap(), 0);
        assert_eq!(granularity.total_rows(), 450);
        // the final mark contains no row.
        assert!(granularity.mark_containing_row(450).is_err());
    }

    #[test]
    fn test_count_marks_for_rows() {
        let granularity = sample();
        assert_eq!(granularity.count_marks_for_rows(0, 100), 1);
        assert_eq!(granularity.count_marks_for_rows(0, 101), 2);
        assert_eq!(granularity.count_marks_for_rows(1, 350), 2);
        assert_eq!(granularity.count_marks_for_rows(1, 1_000), 2);
        assert_eq!(granularity.count_marks_for_rows(3, 1), 0);
    }

    #[test]
    fn test_zero_row_mark_in_the_middle() {
        let mut granularity = AdaptiveGranularity::new();
        granularity.add_mark(10);
        granularity.add_mark(0);
        granularity.add_mark(10);
        assert_eq!(granularity.marks_count(), 3);
        assert_eq!(granularity.mark_rows(1).unwrap(), 0);
        // row 10 belongs to the first non-empty mark after the zero mark.
        assert_eq!(granularity.mark_containing_row(10).unwrap(), 2);
        assert!(!granularity.has_final_mark());
    }
}
