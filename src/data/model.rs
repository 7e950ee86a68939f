use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

/// Columns the dashboard knows how to use. None of them is guaranteed to be
/// present in a loaded file.
pub mod columns {
    pub const GENDER: &str = "gender";
    pub const CATEGORY: &str = "category";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const PRICE: &str = "price";
    pub const AGE: &str = "age";
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream so it must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for sums, means and histograms.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column schema
// ---------------------------------------------------------------------------

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-null cell is a number.
    Numeric,
    /// Anything else; values are kept as text.
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single transaction. Cells are positional, aligned with
/// [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<CellValue>,
}

static NULL: CellValue = CellValue::Null;

impl Record {
    pub fn get(&self, column_index: usize) -> &CellValue {
        self.cells.get(column_index).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column schema and distinct values.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, in file order.
    pub records: Vec<Record>,
    /// Columns in header order.
    pub columns: Vec<ColumnInfo>,
    /// For each column the sorted set of distinct values.
    unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build a dataset from header names and rows of cells.
    ///
    /// Rows shorter than the header are padded with `Null`, longer rows are
    /// truncated. Non-finite floats (`inf`, `NaN`) read as `Null`. Column kinds are inferred from the cells: a column is
    /// numeric when it has at least one non-null cell and all non-null cells
    /// are numbers. Numbers found in categorical columns are turned into text
    /// so a column never mixes kinds.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = column_names.len();
        let mut rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, CellValue::Null);
                for cell in &mut cells {
                    if matches!(cell, CellValue::Float(f) if !f.is_finite()) {
                        *cell = CellValue::Null;
                    }
                }
                cells
            })
            .collect();

        let kinds: Vec<ColumnKind> = (0..width)
            .map(|col| infer_kind(rows.iter().map(|r| &r[col])))
            .collect();

        for row in &mut rows {
            for (cell, kind) in row.iter_mut().zip(&kinds) {
                if *kind == ColumnKind::Categorical && !cell.is_null() {
                    if let Some(text) = non_text(cell) {
                        *cell = CellValue::String(text);
                    }
                }
            }
        }

        let columns: Vec<ColumnInfo> = column_names
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| ColumnInfo { name, kind })
            .collect();

        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = columns
            .iter()
            .map(|c| (c.name.clone(), BTreeSet::new()))
            .collect();
        for row in &rows {
            for (col, cell) in columns.iter().zip(row) {
                if let Some(set) = unique_values.get_mut(&col.name) {
                    set.insert(cell.clone());
                }
            }
        }

        Dataset {
            records: rows.into_iter().map(|cells| Record { cells }).collect(),
            columns,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Distinct values of `column` in natural order; empty when the column
    /// is absent.
    pub fn distinct_values(&self, column: &str) -> BTreeSet<CellValue> {
        self.unique_values.get(column).cloned().unwrap_or_default()
    }

    pub(crate) fn unique_values_of(&self, column: &str) -> Option<&BTreeSet<CellValue>> {
        self.unique_values.get(column)
    }
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a CellValue>) -> ColumnKind {
    let mut seen_number = false;
    for cell in cells {
        match cell {
            CellValue::Null => {}
            CellValue::Integer(_) | CellValue::Float(_) => seen_number = true,
            CellValue::String(_) | CellValue::Bool(_) => return ColumnKind::Categorical,
        }
    }
    if seen_number {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

fn non_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::String(_) | CellValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// View – a subsequence of dataset rows
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] selected by index, in ascending order.
/// Never copies or mutates the underlying records.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    rows: Cow<'a, [usize]>,
}

impl<'a> View<'a> {
    /// A view over every row of the dataset.
    pub fn full(dataset: &'a Dataset) -> Self {
        View {
            dataset,
            rows: Cow::Owned((0..dataset.len()).collect()),
        }
    }

    /// A view over the given row indices. Out-of-range indices are dropped
    /// and the rest sorted so the view keeps dataset order.
    pub fn from_rows(dataset: &'a Dataset, mut rows: Vec<usize>) -> Self {
        rows.retain(|&i| i < dataset.len());
        rows.sort_unstable();
        rows.dedup();
        View {
            dataset,
            rows: Cow::Owned(rows),
        }
    }

    /// Borrow row indices that are already ascending, unique and in range,
    /// such as those returned by [`into_rows`](Self::into_rows).
    pub(crate) fn from_sorted_rows(dataset: &'a Dataset, rows: &'a [usize]) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(rows.last().map_or(true, |&i| i < dataset.len()));
        View {
            dataset,
            rows: Cow::Borrowed(rows),
        }
    }

    pub(crate) fn empty(dataset: &'a Dataset) -> Self {
        View {
            dataset,
            rows: Cow::Owned(Vec::new()),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Dataset row indices in this view.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<usize> {
        self.rows.into_owned()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.dataset.has_column(name)
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().map(|&i| &self.dataset.records[i])
    }

    /// Cells of `column` for every row of the view, or `None` when the
    /// column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + '_> {
        let idx = self.dataset.column_index(name)?;
        Some(self.records().map(move |r| r.get(idx)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a dataset from string cells the way the CSV loader would see
    /// them after inference.
    pub(crate) fn dataset(headers: &[&str], rows: &[&[CellValue]]) -> Dataset {
        Dataset::from_rows(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter().map(|r| r.to_vec()).collect(),
        )
    }

    pub(crate) fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn infers_numeric_and_categorical_columns() {
        let ds = dataset(
            &["category", "price", "note"],
            &[
                &[s("A"), CellValue::Integer(10), CellValue::Null],
                &[s("B"), CellValue::Float(2.5), CellValue::Null],
            ],
        );
        assert_eq!(ds.column_kind("category"), Some(ColumnKind::Categorical));
        assert_eq!(ds.column_kind("price"), Some(ColumnKind::Numeric));
        assert_eq!(ds.column_kind("note"), Some(ColumnKind::Categorical));
        assert_eq!(ds.column_kind("age"), None);
    }

    #[test]
    fn mixed_columns_become_text() {
        let ds = dataset(&["code"], &[&[CellValue::Integer(7)], &[s("x")]]);
        assert_eq!(ds.column_kind("code"), Some(ColumnKind::Categorical));
        assert_eq!(ds.records[0].get(0), &s("7"));
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let ds = dataset(&["a", "b"], &[&[s("x")]]);
        assert_eq!(ds.records[0].cells, vec![s("x"), CellValue::Null]);
    }

    #[test]
    fn distinct_values_are_sorted_and_absent_column_is_empty() {
        let ds = dataset(&["gender"], &[&[s("M")], &[s("F")], &[s("M")]]);
        let values: Vec<_> = ds.distinct_values("gender").into_iter().collect();
        assert_eq!(values, vec![s("F"), s("M")]);
        assert!(ds.distinct_values("payment_method").is_empty());
    }

    #[test]
    fn view_from_rows_keeps_dataset_order() {
        let ds = dataset(&["a"], &[&[s("x")], &[s("y")], &[s("z")]]);
        let view = View::from_rows(&ds, vec![2, 0, 9, 2]);
        assert_eq!(view.rows(), &[0, 2]);
        let cells: Vec<_> = view.column("a").unwrap().cloned().collect();
        assert_eq!(cells, vec![s("x"), s("z")]);
        assert!(view.column("missing").is_none());
    }

    #[test]
    fn non_finite_floats_read_as_null() {
        let ds = dataset(
            &["price"],
            &[&[CellValue::Float(f64::INFINITY)], &[CellValue::Float(f64::NAN)], &[CellValue::Float(2.5)]],
        );
        assert_eq!(ds.column_kind("price"), Some(ColumnKind::Numeric));
        let cells: Vec<_> = ds.records.iter().map(|r| r.get(0).clone()).collect();
        assert_eq!(cells, vec![CellValue::Null, CellValue::Null, CellValue::Float(2.5)]);
    }

    #[test]
    fn equality_agrees_with_ordering() {
        let pos = CellValue::Float(0.0);
        let neg = CellValue::Float(-0.0);
        assert_ne!(pos, neg);
        assert_ne!(pos.cmp(&neg), std::cmp::Ordering::Equal);

        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.cmp(&nan.clone()), std::cmp::Ordering::Equal);

        let set: BTreeSet<CellValue> = [pos, neg, nan.clone(), nan].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn sorted_rows_view_borrows_indices() {
        let ds = dataset(&["a"], &[&[s("x")], &[s("y")], &[s("z")]]);
        let rows = vec![0, 2];
        let view = View::from_sorted_rows(&ds, &rows);
        assert!(std::ptr::eq(view.rows(), rows.as_slice()));
        let cells: Vec<_> = view.column("a").unwrap().cloned().collect();
        assert_eq!(cells, vec![s("x"), s("z")]);
    }

    #[test]
    fn ordering_puts_null_first() {
        let mut values = vec![s("b"), CellValue::Integer(3), CellValue::Null, CellValue::Float(1.5)];
        values.sort();
        assert_eq!(
            values,
            vec![CellValue::Null, CellValue::Integer(3), CellValue::Float(1.5), s("b")]
        );
    }
}
