use super::aggregate::numeric_column;
use super::model::View;

/// Bucket count used when the caller has no preference.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// One equal-width bucket. Buckets are `[low, high)` except the last, which
/// is `[low, high]` so the observed maximum is counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

/// Count the non-null values of `column` in `bucket_count` equal-width
/// buckets spanning the observed range.
///
/// Empty when the column is absent, not numeric, or has no values in the
/// view. A constant column yields a single bucket holding every value.
pub fn histogram_bins(view: &View<'_>, column: &str, bucket_count: usize) -> Vec<HistogramBin> {
    let Some(values) = numeric_column(view, column) else {
        return Vec::new();
    };
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return Vec::new();
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let width = max - min;
    if width <= 0.0 {
        return vec![HistogramBin {
            low: min,
            high: max,
            count: values.len(),
        }];
    }

    let n = bucket_count.max(1);
    let step = width / n as f64;
    let mut bins: Vec<HistogramBin> = (0..n)
        .map(|i| HistogramBin {
            low: min + step * i as f64,
            high: if i + 1 == n {
                max
            } else {
                min + step * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = bucket_index(&bins, v, min, step);
        bins[idx].count += 1;
    }
    bins
}

/// Bucket holding `v`, judged against the stored edges so a value on an
/// interior edge always goes to the bucket that starts there.
fn bucket_index(bins: &[HistogramBin], v: f64, min: f64, step: f64) -> usize {
    let last = bins.len() - 1;
    let mut idx = (((v - min) / step) as usize).min(last);
    while idx < last && v >= bins[idx + 1].low {
        idx += 1;
    }
    while idx > 0 && v < bins[idx].low {
        idx -= 1;
    }
    idx
}
