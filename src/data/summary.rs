use super::aggregate::{aggregate, group_sum, GroupSums, Metrics};
use super::histogram::{histogram_bins, HistogramBin};
use super::model::{columns, View};

/// Everything the dashboard body renders for one filtered view.
///
/// Optional parts are `None` when the columns they need are absent from the
/// dataset; the presentation layer omits them entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub record_count: usize,
    pub metrics: Metrics,
    pub sales_by_category: Option<GroupSums>,
    pub sales_by_payment_method: Option<GroupSums>,
    pub age_histogram: Option<Vec<HistogramBin>>,
}

/// Recompute every derived view from scratch.
pub fn summarize(view: &View<'_>, histogram_buckets: usize) -> DashboardSummary {
    let has = |col: &str| view.has_column(col);

    let sales_by = |group: &str| {
        (has(group) && has(columns::PRICE)).then(|| group_sum(view, group, columns::PRICE))
    };

    DashboardSummary {
        record_count: view.len(),
        metrics: aggregate(view),
        sales_by_category: sales_by(columns::CATEGORY),
        sales_by_payment_method: sales_by(columns::PAYMENT_METHOD),
        age_histogram: has(columns::AGE)
            .then(|| histogram_bins(view, columns::AGE, histogram_buckets)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::Average;
    use crate::data::filter::{filtered_view, FilterSelection};
    use crate::data::model::tests::{dataset, s};
    use crate::data::model::{CellValue, Dataset};

    fn no_payment_column() -> Dataset {
        dataset(
            &["gender", "category", "price", "age"],
            &[
                &[s("F"), s("A"), CellValue::Integer(10), CellValue::Integer(25)],
                &[s("M"), s("B"), CellValue::Integer(30), CellValue::Integer(40)],
            ],
        )
    }

    #[test]
    fn missing_column_omits_its_chart() {
        let ds = no_payment_column();
        let mut selection = FilterSelection::new();
        selection.insert("payment_method".into(), [s("Cash")].into_iter().collect());

        let view = filtered_view(&ds, &selection);
        let summary = summarize(&view, 10);

        assert_eq!(summary.record_count, 2);
        assert!(summary.sales_by_payment_method.is_none());
        assert!(summary.sales_by_category.is_some());
        assert!(summary.age_histogram.is_some());
    }

    #[test]
    fn group_totals_match_metric_total() {
        let ds = no_payment_column();
        let summary = summarize(&View::full(&ds), 10);
        let by_category: f64 = summary.sales_by_category.unwrap().values().sum();
        assert_eq!(by_category, summary.metrics.total_sales());

        let binned: usize = summary.age_histogram.unwrap().iter().map(|b| b.count).sum();
        assert_eq!(binned, summary.metrics.transaction_count);
    }

    #[test]
    fn empty_gender_selection_degrades_every_view() {
        let ds = no_payment_column();
        let mut selection = FilterSelection::new();
        selection.insert("gender".into(), Default::default());

        let summary = summarize(&filtered_view(&ds, &selection), 10);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.metrics.transaction_count, 0);
        assert_eq!(summary.metrics.total_sales(), 0.0);
        assert_eq!(summary.metrics.average_price(), Average::NoData);
        assert_eq!(summary.sales_by_category, Some(GroupSums::new()));
        assert_eq!(summary.age_histogram, Some(Vec::new()));
    }
}
