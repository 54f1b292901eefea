//! Row granularity for the columnar companions of a segment.
//!
//! A granularity partitions a column's rows into granules; mark `i`
//! covers the rows of granule `i`. Readers address data by
//! `MarkRange`s and convert them to row ranges through the granularity.
//!
//! Two layouts exist: a constant one (every granule holds the same
//! number of rows, arithmetic conversions) and an adaptive one
//! (arbitrary per-granule row counts, stored as cumulative sums so that
//! row ↔ mark conversions stay logarithmic).

mod adaptive;
mod constant;
mod granule_writer;
mod mark_range;

pub use self::adaptive::AdaptiveGranularity;
pub use self::constant::ConstantGranularity;
pub use self::granule_writer::{GranularityConfig, GranuleWriter};
pub use self::mark_range::{mark_ranges_to_rows, MarkRange};

use error::Result;

/// Row distribution across the marks of one part.
pub trait IndexGranularity {
    /// Number of marks.
    fn marks_count(&self) -> usize;

    /// Number of rows in the given mark.
    fn mark_rows(&self, mark_index: usize) -> Result<usize>;

    /// Total rows covered by marks `[begin, end)`. Out-of-bounds ends
    /// are clamped; an empty range yields 0.
    fn rows_in_range(&self, begin: usize, end: usize) -> usize;

    /// Index of the mark containing the given row.
    fn mark_containing_row(&self, row: usize) -> Result<usize>;

    /// Number of marks needed to cover `number_of_rows` rows starting
    /// at `from_mark`.
    fn count_marks_for_rows(&self, from_mark: usize, number_of_rows: usize) -> usize;

    /// Whether the granularity ends with an empty final mark.
    fn has_final_mark(&self) -> bool;

    /// Appends a mark covering `rows` rows. Writer-side only.
    fn add_mark(&mut self, rows: usize);

    /// Total rows covered by the marks `[0, end)`.
    fn rows_up_to(&self, end: usize) -> usize {
        self.rows_in_range(0, end)
    }

    /// Total rows across all marks.
    fn total_rows(&self) -> usize {
        self.rows_up_to(self.marks_count())
    }

    fn is_empty(&self) -> bool {
        self.marks_count() == 0
    }
}
