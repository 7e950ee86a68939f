use std::collections::{BTreeMap, BTreeSet};

use super::model::{columns, CellValue, Dataset, View};

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of allowed values.
///
/// * Column not in the map, or not in the dataset → no constraint
/// * Column in the map with an empty set → nothing selected → no rows
pub type FilterSelection = BTreeMap<String, BTreeSet<CellValue>>;

/// Columns offered as sidebar filters, with their widget labels.
pub const FILTER_COLUMNS: [(&str, &str); 3] = [
    (columns::GENDER, "Select Gender"),
    (columns::CATEGORY, "Select Product Category"),
    (columns::PAYMENT_METHOD, "Select Payment Method"),
];

/// Initialise a [`FilterSelection`] with every distinct value selected for
/// each filter column the dataset actually has.
pub fn init_filter_selection(dataset: &Dataset) -> FilterSelection {
    FILTER_COLUMNS
        .iter()
        .filter(|(col, _)| dataset.has_column(col))
        .map(|(col, _)| (col.to_string(), dataset.distinct_values(col)))
        .collect()
}

/// Return the rows of `view` that pass every active constraint, in their
/// original order.
///
/// A row passes a column constraint when its value for that column is in
/// the allowed set; a missing cell reads as `Null`. Constraints on columns
/// the dataset does not have are ignored.
pub fn apply_filters<'a>(view: &View<'a>, selection: &FilterSelection) -> View<'a> {
    let dataset = view.dataset();

    let mut predicates: Vec<(usize, &BTreeSet<CellValue>)> = Vec::new();
    for (col, allowed) in selection {
        let Some(idx) = dataset.column_index(col) else {
            continue;
        };
        if allowed.is_empty() {
            log::debug!("Empty selection for '{col}', filtered view is empty");
            return View::empty(dataset);
        }
        // Everything selected → no effective filter
        if let Some(all_vals) = dataset.unique_values_of(col) {
            if all_vals.is_subset(allowed) {
                continue;
            }
        }
        predicates.push((idx, allowed));
    }

    if predicates.is_empty() {
        return view.clone();
    }

    let rows = view
        .rows()
        .iter()
        .copied()
        .filter(|&i| {
            let record = &dataset.records[i];
            predicates
                .iter()
                .all(|(idx, allowed)| allowed.contains(record.get(*idx)))
        })
        .collect();

    View::from_rows(dataset, rows)
}

/// Filter the whole dataset.
pub fn filtered_view<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> View<'a> {
    apply_filters(&View::full(dataset), selection)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::tests::{dataset, s};

    fn shop() -> Dataset {
        dataset(
            &["gender", "category", "price"],
            &[
                &[s("F"), s("A"), CellValue::Integer(10)],
                &[s("M"), s("A"), CellValue::Integer(20)],
                &[s("F"), s("B"), CellValue::Integer(30)],
                &[s("M"), s("B"), CellValue::Integer(40)],
                &[s("F"), s("C"), CellValue::Integer(50)],
            ],
        )
    }

    fn select(pairs: &[(&str, &[&str])]) -> FilterSelection {
        pairs
            .iter()
            .map(|(col, vals)| (col.to_string(), vals.iter().map(|v| s(v)).collect()))
            .collect()
    }

    #[test]
    fn empty_selection_map_keeps_everything() {
        let ds = shop();
        let view = filtered_view(&ds, &FilterSelection::new());
        assert_eq!(view.rows(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn default_selection_keeps_everything() {
        let ds = shop();
        let selection = init_filter_selection(&ds);
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains_key("payment_method"));
        assert_eq!(filtered_view(&ds, &selection).len(), ds.len());
    }

    #[test]
    fn constraints_are_combined_with_and() {
        let ds = shop();
        let selection = select(&[("gender", &["F"]), ("category", &["A", "C"])]);
        assert_eq!(filtered_view(&ds, &selection).rows(), &[0, 4]);
    }

    #[test]
    fn explicit_empty_set_yields_no_rows() {
        let ds = shop();
        let selection = select(&[("gender", &[]), ("category", &["A"])]);
        assert!(filtered_view(&ds, &selection).is_empty());
    }

    #[test]
    fn constraint_on_absent_column_is_ignored() {
        let ds = shop();
        let selection = select(&[("payment_method", &[]), ("category", &["B"])]);
        assert_eq!(filtered_view(&ds, &selection).rows(), &[2, 3]);
    }

    #[test]
    fn null_cells_match_only_when_null_is_selected() {
        let ds = dataset(&["gender"], &[&[s("F")], &[CellValue::Null]]);
        let mut selection = select(&[("gender", &["F"])]);
        assert_eq!(filtered_view(&ds, &selection).rows(), &[0]);

        selection.get_mut("gender").unwrap().insert(CellValue::Null);
        assert_eq!(filtered_view(&ds, &selection).rows(), &[0, 1]);
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        prop::collection::vec(("[abc]", "[xy]", 0i64..100), 0..40).prop_map(|rows| {
            let rows: Vec<Vec<CellValue>> = rows
                .into_iter()
                .map(|(g, c, p)| vec![s(&g), s(&c), CellValue::Integer(p)])
                .collect();
            Dataset::from_rows(
                vec!["gender".into(), "category".into(), "price".into()],
                rows,
            )
        })
    }

    fn arb_selection() -> impl Strategy<Value = FilterSelection> {
        (
            prop::option::of(prop::collection::btree_set("[abcd]", 0..4)),
            prop::option::of(prop::collection::btree_set("[xyz]", 0..3)),
        )
            .prop_map(|(genders, categories)| {
                let mut selection = FilterSelection::new();
                if let Some(g) = genders {
                    selection.insert("gender".into(), g.iter().map(|v| s(v)).collect());
                }
                if let Some(c) = categories {
                    selection.insert("category".into(), c.iter().map(|v| s(v)).collect());
                }
                selection
            })
    }

    proptest! {
        #[test]
        fn filtered_rows_are_an_ordered_subsequence(ds in arb_dataset(), sel in arb_selection()) {
            let view = filtered_view(&ds, &sel);
            prop_assert!(view.rows().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(view.rows().iter().all(|&i| i < ds.len()));
            prop_assert!(view.len() <= ds.len());
        }

        #[test]
        fn filtering_is_idempotent(ds in arb_dataset(), sel in arb_selection()) {
            let once = filtered_view(&ds, &sel);
            let twice = apply_filters(&once, &sel);
            prop_assert_eq!(once.rows(), twice.rows());
        }

        #[test]
        fn every_kept_row_satisfies_the_selection(ds in arb_dataset(), sel in arb_selection()) {
            let view = filtered_view(&ds, &sel);
            for record in view.records() {
                for (col, allowed) in &sel {
                    let idx = ds.column_index(col).unwrap();
                    prop_assert!(allowed.contains(record.get(idx)));
                }
            }
        }
    }
}
