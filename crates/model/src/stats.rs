//! Pure statistic derivations over tallies and record/column counts.

use crate::tally::NullCounters;

/// Percent of all possible data values that are null, rounded to two
/// decimal places. Returns `0.0` when the denominator is zero (zero-column
/// or zero-record datasets).
pub fn percent_null(null_total: u64, total_values: u64) -> f64 {
    if total_values == 0 {
        return 0.0;
    }
    let percent = null_total as f64 / total_values as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

/// Total number of data values in a dataset. Zero when the column count is
/// zero (a degenerate but observed case).
pub fn total_values(total_records: u64, total_columns: u64) -> u64 {
    total_records * total_columns
}

pub fn total_nulls(counters: &NullCounters) -> u64 {
    counters.total()
}
