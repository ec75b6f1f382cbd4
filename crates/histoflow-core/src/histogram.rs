//! The histogram data source boundary.
//!
//! Values for groups come from named histograms: tables whose rows are
//! population labels and whose columns are breakdown labels. Anything that
//! can answer [`HistogramSource`] queries can drive a flow calculation.

/// Sentinel returned by [`HistogramSource::lookup`] when no count exists.
pub const NOT_FOUND: i64 = -1;

/// Column label that requests a row's total count.
pub const TOTAL_COLUMN: &str = "Total";

/// A read-only provider of histogram tables.
pub trait HistogramSource {
    /// Returns the breakdown column labels of `histogram` in table order.
    ///
    /// Unknown histograms have no columns.
    fn columns(&self, histogram: &str) -> Vec<String>;

    /// Returns the count at `row` x `column` of `histogram`, or
    /// [`NOT_FOUND`].
    ///
    /// A `column` of [`TOTAL_COLUMN`] resolves to the row's own total when
    /// the table has no explicit `Total` column.
    fn lookup(&self, histogram: &str, row: &str, column: &str) -> i64;
}

impl<S: HistogramSource + ?Sized> HistogramSource for &S {
    fn columns(&self, histogram: &str) -> Vec<String> {
        (**self).columns(histogram)
    }

    fn lookup(&self, histogram: &str, row: &str, column: &str) -> i64 {
        (**self).lookup(histogram, row, column)
    }
}
