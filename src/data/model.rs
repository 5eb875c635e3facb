use std::fmt;

use crate::data::grouping::category_label;
use crate::error::{ExploreError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single parsed cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a loader, before the column
/// it belongs to is resolved into numeric or text storage.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
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
    /// Numeric view of the cell. Booleans and text are not numbers.
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

    /// Raw text of the cell, `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – named, typed storage resolved once at load time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Every present cell is a number; `None` marks a missing value.
    Numeric(Vec<Option<f64>>),
    Text(Vec<CellValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Resolve a column of loose cells into numeric or text storage.
    ///
    /// A column is numeric when all its non-null cells are integers or
    /// floats. A column of nothing but nulls counts as numeric (all missing).
    pub fn from_cells(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let numeric = cells
            .iter()
            .all(|c| c.is_null() || matches!(c, CellValue::Integer(_) | CellValue::Float(_)));

        let data = if numeric {
            ColumnData::Numeric(cells.iter().map(CellValue::as_f64).collect())
        } else {
            ColumnData::Text(cells)
        };
        Column {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Text of one cell regardless of storage, `None` for missing values.
    pub fn text_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Text(v) => v.get(row).and_then(CellValue::as_text),
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryIndex – per-row category labels cached at load
// ---------------------------------------------------------------------------

/// Category labels derived from one raw identifier column, e.g. `"A.J_3"` in
/// `Strains` becomes `"A.J"`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryIndex {
    pub column: String,
    pub separator: char,
    /// One entry per row; `None` where the raw value was null or empty.
    pub labels: Vec<Option<String>>,
    /// Distinct labels in first-seen order.
    pub unique: Vec<String>,
}

impl CategoryIndex {
    fn build(column: &Column, separator: char) -> Self {
        let labels: Vec<Option<String>> = (0..column.len())
            .map(|row| {
                column
                    .text_at(row)
                    .and_then(|raw| category_label(&raw, separator).map(str::to_string))
            })
            .collect();

        let mut unique: Vec<String> = Vec::new();
        for label in labels.iter().flatten() {
            if !unique.contains(label) {
                unique.push(label.clone());
            }
        }

        CategoryIndex {
            column: column.name.clone(),
            separator,
            labels,
            unique,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
    n_rows: usize,
    category: Option<CategoryIndex>,
}

impl Dataset {
    /// Build a dataset, checking that every column shares the row count.
    ///
    /// The row count is taken from the first column; an empty column list is
    /// a valid, empty dataset.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(ExploreError::RowCountMismatch {
                column: bad.name.clone(),
                expected: n_rows,
                actual: bad.len(),
            });
        }
        Ok(Dataset {
            name: name.into(),
            columns,
            n_rows,
            category: None,
        })
    }

    /// Derive and cache category labels from `column`.
    pub fn with_category(mut self, column: &str, separator: char) -> Result<Self> {
        let raw = self
            .column(column)
            .ok_or_else(|| ExploreError::MissingColumn(column.to_string()))?;
        self.category = Some(CategoryIndex::build(raw, separator));
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn category(&self) -> Option<&CategoryIndex> {
        self.category.as_ref()
    }

    /// Distinct category labels, empty when the dataset has no category index.
    pub fn category_labels(&self) -> &[String] {
        self.category
            .as_ref()
            .map(|c| c.unique.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strains() -> Column {
        Column::from_cells(
            "Strains",
            vec![
                CellValue::String("A.J_1".into()),
                CellValue::String("C57_2".into()),
                CellValue::Null,
                CellValue::String("A.J_4".into()),
            ],
        )
    }

    #[test]
    fn test_column_type_resolution() {
        let mixed = Column::from_cells(
            "p",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)],
        );
        assert_eq!(mixed.as_numeric(), Some(&[Some(1.0), None, Some(2.5)][..]));

        let text = Column::from_cells("t", vec![CellValue::Integer(1), CellValue::String("x".into())]);
        assert!(!text.is_numeric());

        let flags = Column::from_cells("b", vec![CellValue::Bool(true)]);
        assert!(!flags.is_numeric());

        let empty = Column::from_cells("n", vec![CellValue::Null, CellValue::Null]);
        assert!(empty.is_numeric());
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = Dataset::new(
            "bad",
            vec![
                Column::numeric("a", vec![Some(1.0), Some(2.0)]),
                Column::numeric("b", vec![Some(1.0)]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExploreError::RowCountMismatch {
                column: "b".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_category_index_first_seen_order() {
        let ds = Dataset::new("d", vec![strains()])
            .unwrap()
            .with_category("Strains", '_')
            .unwrap();
        let cat = ds.category().unwrap();
        assert_eq!(
            cat.labels,
            vec![Some("A.J".into()), Some("C57".into()), None, Some("A.J".into())]
        );
        assert_eq!(ds.category_labels(), &["A.J".to_string(), "C57".to_string()]);
    }

    #[test]
    fn test_missing_category_column() {
        let ds = Dataset::new("d", vec![strains()]).unwrap();
        assert_eq!(
            ds.with_category("Sample", '_').unwrap_err(),
            ExploreError::MissingColumn("Sample".into())
        );
    }
}
