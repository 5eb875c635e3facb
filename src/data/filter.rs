use super::model::Dataset;
use crate::error::{ExploreError, Result};

// ---------------------------------------------------------------------------
// Row restriction by category label
// ---------------------------------------------------------------------------

/// Keep only rows whose category label (derived from `column`) equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub column: String,
    pub value: String,
}

impl CategoryFilter {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Return indices of rows passing `filter`, or every row when there is none.
///
/// The labels come from the dataset's cached category index, so `filter.column`
/// must be the column the dataset was indexed on. An empty selection is an
/// error: there is nothing to average over.
pub fn select_rows(dataset: &Dataset, filter: Option<&CategoryFilter>) -> Result<Vec<usize>> {
    let Some(filter) = filter else {
        return Ok((0..dataset.len()).collect());
    };

    let index = dataset
        .category()
        .filter(|c| c.column == filter.column)
        .ok_or_else(|| ExploreError::MissingColumn(filter.column.clone()))?;

    let rows: Vec<usize> = index
        .labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.as_deref() == Some(filter.value.as_str()))
        .map(|(i, _)| i)
        .collect();

    if rows.is_empty() {
        return Err(ExploreError::NoMatchingRows {
            column: filter.column.clone(),
            value: filter.value.clone(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn dataset() -> Dataset {
        let strains = ["A.J_1", "C57_1", "A.J_2", ""]
            .iter()
            .map(|s| CellValue::String(s.to_string()))
            .collect();
        Dataset::new(
            "d",
            vec![
                Column::from_cells("Strains", strains),
                Column::numeric("P1", vec![Some(1.0); 4]),
            ],
        )
        .unwrap()
        .with_category("Strains", '_')
        .unwrap()
    }

    #[test]
    fn test_no_filter_selects_all() {
        assert_eq!(select_rows(&dataset(), None).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_by_label() {
        let f = CategoryFilter::new("Strains", "A.J");
        assert_eq!(select_rows(&dataset(), Some(&f)).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_filter_no_rows() {
        let f = CategoryFilter::new("Strains", "BALB");
        assert_eq!(
            select_rows(&dataset(), Some(&f)).unwrap_err(),
            ExploreError::NoMatchingRows {
                column: "Strains".into(),
                value: "BALB".into()
            }
        );
    }

    #[test]
    fn test_filter_on_unindexed_column() {
        let f = CategoryFilter::new("P1", "1");
        assert_eq!(
            select_rows(&dataset(), Some(&f)).unwrap_err(),
            ExploreError::MissingColumn("P1".into())
        );
    }
}
