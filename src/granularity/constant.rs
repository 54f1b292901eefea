use error::{ErrorKind, Result};
use granularity::IndexGranularity;

/// Granularity with a fixed number of rows per mark.
///
/// Conversions are plain arithmetic. A constant granularity never
/// carries a final mark.
#[derive(Clone, Debug)]
pub struct ConstantGranularity {
    granularity: usize,
    num_marks: usize,
}

impl ConstantGranularity {
    pub fn new(granularity: usize, num_marks: usize) -> ConstantGranularity {
        assert!(granularity > 0, "granularity must be positive");
        ConstantGranularity {
            granularity: granularity,
            num_marks: num_marks,
        }
    }

    /// Rows per mark.
    pub fn granularity(&self) -> usize {
        self.granularity
    }
}

impl IndexGranularity for ConstantGranularity {
    fn marks_count(&self) -> usize {
        self.num_marks
    }

    fn mark_rows(&self, mark_index: usize) -> Result<usize> {
        if mark_index >= self.num_marks {
            return Err(ErrorKind::OutOfRange(format!(
                "mark {} out of range ({} marks)",
                mark_index, self.num_marks
            )).into());
        }
        Ok(self.granularity)
    }

    fn rows_in_range(&self, begin: usize, end: usize) -> usize {
        if end <= begin {
            return 0;
        }
        let end = end.min(self.num_marks);
        if begin >= self.num_marks {
            return 0;
        }
        (end - begin) * self.granularity
    }

    fn mark_containing_row(&self, row: usize) -> Result<usize> {
        let mark = row / self.granularity;
        if mark >= self.num_marks {
            return Err(ErrorKind::OutOfRange(format!(
                "row {} beyond the last mark",
                row
            )).into());
        }
        Ok(mark)
    }

    fn count_marks_for_rows(&self, from_mark: usize, number_of_rows: usize) -> usize {
        if from_mark >= self.num_marks {
            return 0;
        }
        let from_row = from_mark * self.granularity;
        let to_row = from_row + number_of_rows;
        let to_mark = (to_row + self.granularity - 1) / self.granularity;
        to_mark.min(self.num_marks) - from_mark
    }

    fn has_final_mark(&self) -> bool {
        false
    }

    fn add_mark(&mut self, _rows: usize) {
        self.num_marks += 1;
    }
}
