use std::collections::BTreeMap;
use std::fmt;

use super::model::{columns, CellValue, ColumnKind, View};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Arithmetic mean that keeps "no rows" distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Value(f64),
    NoData,
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Value(v) => write!(f, "{v:.2}"),
            Average::NoData => write!(f, "no data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    /// Sum of non-null prices; 0 for an empty view.
    pub total: f64,
    pub average: Average,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub transaction_count: usize,
    /// `None` when the dataset has no numeric `price` column.
    pub price: Option<PriceStats>,
}

impl Metrics {
    /// Total sales, 0 when there is no price column.
    pub fn total_sales(&self) -> f64 {
        self.price.map_or(0.0, |p| p.total)
    }

    pub fn average_price(&self) -> Average {
        self.price.map_or(Average::NoData, |p| p.average)
    }
}

/// Compute count, total and mean price over a view.
pub fn aggregate(view: &View<'_>) -> Metrics {
    let price = numeric_column(view, columns::PRICE).map(|values| {
        let (total, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        let average = if count == 0 {
            Average::NoData
        } else {
            Average::Value(total / count as f64)
        };
        PriceStats { total, average }
    });

    Metrics {
        transaction_count: view.len(),
        price,
    }
}

// ---------------------------------------------------------------------------
// Grouped sums
// ---------------------------------------------------------------------------

/// Sum per group value, in natural value order.
pub type GroupSums = BTreeMap<CellValue, f64>;

/// Sum `value_column` per distinct value of `group_column`.
///
/// Missing group cells form their own `Null` group so the group totals add
/// up to the column total. Empty when either column is absent or the value
/// column is not numeric.
pub fn group_sum(view: &View<'_>, group_column: &str, value_column: &str) -> GroupSums {
    let mut sums = GroupSums::new();
    let dataset = view.dataset();
    let (Some(group_idx), Some(value_idx)) = (
        dataset.column_index(group_column),
        dataset.column_index(value_column),
    ) else {
        return sums;
    };
    if dataset.column_kind(value_column) != Some(ColumnKind::Numeric) {
        log::debug!("'{value_column}' is not numeric, skipping group sum");
        return sums;
    }

    for record in view.records() {
        let entry = sums.entry(record.get(group_idx).clone()).or_insert(0.0);
        if let Some(v) = record.get(value_idx).as_f64() {
            *entry += v;
        }
    }
    sums
}

/// Non-null values of a numeric column, or `None` when the column is absent
/// or not numeric.
pub(crate) fn numeric_column<'v>(
    view: &'v View<'_>,
    column: &str,
) -> Option<impl Iterator<Item = f64> + 'v> {
    if view.dataset().column_kind(column)? != ColumnKind::Numeric {
        return None;
    }
    let cells = view.column(column)?;
    Some(cells.filter_map(CellValue::as_f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_view, FilterSelection};
    use crate::data::model::tests::{dataset, s};
    use crate::data::model::Dataset;

    fn five_rows() -> Dataset {
        dataset(
            &["category", "price"],
            &[
                &[s("A"), CellValue::Integer(10)],
                &[s("A"), CellValue::Integer(20)],
                &[s("B"), CellValue::Integer(30)],
                &[s("B"), CellValue::Integer(40)],
                &[s("C"), CellValue::Integer(50)],
            ],
        )
    }

    #[test]
    fn metrics_over_five_rows() {
        let ds = five_rows();
        let metrics = aggregate(&View::full(&ds));
        assert_eq!(metrics.transaction_count, 5);
        assert_eq!(metrics.total_sales(), 150.0);
        assert_eq!(metrics.average_price(), Average::Value(30.0));
    }

    #[test]
    fn group_sum_over_five_rows() {
        let ds = five_rows();
        let sums = group_sum(&View::full(&ds), "category", "price");
        let expected: GroupSums = [(s("A"), 30.0), (s("B"), 70.0), (s("C"), 50.0)]
            .into_iter()
            .collect();
        assert_eq!(sums, expected);
    }

    #[test]
    fn empty_view_reports_no_data() {
        let ds = five_rows();
        let mut selection = FilterSelection::new();
        selection.insert("category".into(), Default::default());
        let view = filtered_view(&ds, &selection);

        let metrics = aggregate(&view);
        assert_eq!(metrics.transaction_count, 0);
        assert_eq!(metrics.total_sales(), 0.0);
        assert_eq!(metrics.average_price(), Average::NoData);
        assert_eq!(metrics.average_price().to_string(), "no data");
        assert!(group_sum(&view, "category", "price").is_empty());
    }

    #[test]
    fn missing_price_column_omits_price_stats() {
        let ds = dataset(&["category"], &[&[s("A")]]);
        let metrics = aggregate(&View::full(&ds));
        assert_eq!(metrics.transaction_count, 1);
        assert!(metrics.price.is_none());
        assert_eq!(metrics.total_sales(), 0.0);
    }

    #[test]
    fn null_prices_are_skipped() {
        let ds = dataset(
            &["category", "price"],
            &[
                &[s("A"), CellValue::Float(4.0)],
                &[s("A"), CellValue::Null],
                &[CellValue::Null, CellValue::Float(2.0)],
            ],
        );
        let view = View::full(&ds);
        let metrics = aggregate(&view);
        assert_eq!(metrics.total_sales(), 6.0);
        assert_eq!(metrics.average_price(), Average::Value(3.0));

        let sums = group_sum(&view, "category", "price");
        assert_eq!(sums.get(&s("A")), Some(&4.0));
        assert_eq!(sums.get(&CellValue::Null), Some(&2.0));
        assert_eq!(sums.values().sum::<f64>(), metrics.total_sales());
    }

    #[test]
    fn group_sum_with_absent_or_text_columns_is_empty() {
        let ds = five_rows();
        let view = View::full(&ds);
        assert!(group_sum(&view, "payment_method", "price").is_empty());
        assert!(group_sum(&view, "category", "amount").is_empty());
        assert!(group_sum(&view, "price", "category").is_empty());
    }

    #[test]
    fn group_sum_is_reproducible() {
        let ds = five_rows();
        let view = View::full(&ds);
        let first: Vec<_> = group_sum(&view, "category", "price").into_iter().collect();
        let second: Vec<_> = group_sum(&view, "category", "price").into_iter().collect();
        assert_eq!(first, second);
    }
}
