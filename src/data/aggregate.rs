use std::cmp::Ordering;

use super::filter::{CategoryFilter, select_rows};
use super::grouping::GroupMap;
use super::model::Dataset;
use crate::error::{ExploreError, Result};

/// One labelled aggregate value: a column mean or a group total.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub label: String,
    pub value: f64,
}

impl Aggregate {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Ordered aggregate values, ready for windowing.
pub type AggregateResult = Vec<Aggregate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Column or group order as found in the dataset.
    #[default]
    Natural,
    /// Largest value first; ties keep natural order, NaN goes last.
    Descending,
}

/// Descending comparison with NaN sorted after every number.
pub fn cmp_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Stable sort, largest value first.
pub fn sort_descending(results: &mut AggregateResult) {
    results.sort_by(|a, b| cmp_descending(a.value, b.value));
}

/// Names of numeric columns at or after `from_index`, in column order.
pub fn numeric_columns(dataset: &Dataset, from_index: usize) -> Vec<String> {
    dataset
        .columns()
        .iter()
        .skip(from_index)
        .filter(|c| c.is_numeric())
        .map(|c| c.name.clone())
        .collect()
}

/// Mean of the present values of `values` at `rows`; NaN if none are present.
fn mean_over(values: &[Option<f64>], rows: &[usize]) -> f64 {
    let (sum, count) = rows
        .iter()
        .filter_map(|&r| values.get(r).copied().flatten())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

fn means_over_rows(dataset: &Dataset, columns: &[String], rows: &[usize]) -> Result<AggregateResult> {
    let mut out = Vec::with_capacity(columns.len());
    for name in columns {
        let column = dataset
            .column(name)
            .ok_or_else(|| ExploreError::MissingColumn(name.clone()))?;
        // Text columns carry no measurement.
        if let Some(values) = column.as_numeric() {
            out.push(Aggregate::new(name.clone(), mean_over(values, rows)));
        }
    }
    Ok(out)
}

/// Per-column means over the rows selected by `filter`, in `columns` order.
///
/// Missing values are left out of both sum and count. Non-numeric columns are
/// skipped; an unknown column name is an error.
pub fn aggregate_column_means(
    dataset: &Dataset,
    columns: &[String],
    filter: Option<&CategoryFilter>,
) -> Result<AggregateResult> {
    let rows = select_rows(dataset, filter)?;
    means_over_rows(dataset, columns, &rows)
}

/// Group totals: for each group, the sum of its member column means.
///
/// This is the average per sample per member, summed across members. Members
/// whose mean is NaN (no present values) add nothing.
pub fn aggregate_group_totals(
    dataset: &Dataset,
    groups: &GroupMap,
    filter: Option<&CategoryFilter>,
    order: Order,
) -> Result<AggregateResult> {
    let rows = select_rows(dataset, filter)?;

    let mut totals = Vec::with_capacity(groups.len());
    for group in groups.iter() {
        let total: f64 = means_over_rows(dataset, &group.members, &rows)?
            .iter()
            .map(|a| a.value)
            .filter(|v| !v.is_nan())
            .sum();
        totals.push(Aggregate::new(group.key.clone(), total));
    }

    if order == Order::Descending {
        sort_descending(&mut totals);
    }
    log::debug!(
        "Aggregated {} groups over {} rows of '{}'",
        totals.len(),
        rows.len(),
        dataset.name()
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::grouping::{GroupKeyRule, classify};
    use crate::data::model::{CellValue, Column};
    use approx::assert_relative_eq;

    fn dataset() -> Dataset {
        let strains = ["X_1", "X_2", "Y_1"]
            .iter()
            .map(|s| CellValue::String(s.to_string()))
            .collect();
        Dataset::new(
            "d",
            vec![
                Column::from_cells("Strains", strains),
                Column::numeric("CE(16:0)", vec![Some(1.0), Some(3.0), Some(10.0)]),
                Column::numeric("CE(18:1)", vec![None, Some(4.0), Some(2.0)]),
                Column::numeric("PC(34:1)", vec![Some(7.0), Some(9.0), None]),
                Column::numeric("TG(50:0)", vec![None, None, Some(1.0)]),
            ],
        )
        .unwrap()
        .with_category("Strains", '_')
        .unwrap()
    }

    fn all_numeric(ds: &Dataset) -> Vec<String> {
        numeric_columns(ds, 0)
    }

    #[test]
    fn test_means_skip_missing_values() {
        let ds = dataset();
        let means = aggregate_column_means(&ds, &all_numeric(&ds), None).unwrap();
        let labels: Vec<&str> = means.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["CE(16:0)", "CE(18:1)", "PC(34:1)", "TG(50:0)"]);
        assert_relative_eq!(means[0].value, 14.0 / 3.0);
        assert_relative_eq!(means[1].value, 3.0);
        assert_relative_eq!(means[2].value, 8.0);
        assert_relative_eq!(means[3].value, 1.0);
    }

    #[test]
    fn test_means_with_filter() {
        let ds = dataset();
        let f = CategoryFilter::new("Strains", "X");
        let means = aggregate_column_means(&ds, &all_numeric(&ds), Some(&f)).unwrap();
        assert_relative_eq!(means[0].value, 2.0);
        assert_relative_eq!(means[1].value, 4.0);
        assert_relative_eq!(means[2].value, 8.0);
        assert!(means[3].value.is_nan());
    }

    #[test]
    fn test_means_skip_text_and_reject_unknown() {
        let ds = dataset();
        let cols = vec!["Strains".to_string(), "PC(34:1)".to_string()];
        let means = aggregate_column_means(&ds, &cols, None).unwrap();
        assert_eq!(means.len(), 1);

        let err = aggregate_column_means(&ds, &["nope".to_string()], None).unwrap_err();
        assert_eq!(err, ExploreError::MissingColumn("nope".into()));
    }

    #[test]
    fn test_group_total_is_sum_of_member_means() {
        let ds = dataset();
        let groups = classify(&ds, 1, GroupKeyRule::LeadingAlpha);
        let f = CategoryFilter::new("Strains", "X");
        let totals = aggregate_group_totals(&ds, &groups, Some(&f), Order::Natural).unwrap();

        for (group, total) in groups.iter().zip(&totals) {
            let means = aggregate_column_means(&ds, &group.members, Some(&f)).unwrap();
            let expected: f64 = means.iter().map(|a| a.value).filter(|v| !v.is_nan()).sum();
            assert_eq!(group.key, total.label);
            assert_relative_eq!(total.value, expected);
        }
        // TG has no values for X and contributes zero.
        assert_relative_eq!(totals[2].value, 0.0);
    }

    #[test]
    fn test_group_totals_descending() {
        let ds = dataset();
        let groups = classify(&ds, 1, GroupKeyRule::LeadingAlpha);
        let totals = aggregate_group_totals(&ds, &groups, None, Order::Descending).unwrap();
        let labels: Vec<&str> = totals.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["PC", "CE", "TG"]);
    }

    #[test]
    fn test_group_totals_propagate_no_rows() {
        let ds = dataset();
        let groups = classify(&ds, 1, GroupKeyRule::LeadingAlpha);
        let f = CategoryFilter::new("Strains", "Z");
        assert!(matches!(
            aggregate_group_totals(&ds, &groups, Some(&f), Order::Natural),
            Err(ExploreError::NoMatchingRows { .. })
        ));
    }

    #[test]
    fn test_sort_descending_is_stable_with_nan_last() {
        let mut r = vec![
            Aggregate::new("a", 1.0),
            Aggregate::new("b", f64::NAN),
            Aggregate::new("c", 3.0),
            Aggregate::new("d", 1.0),
        ];
        sort_descending(&mut r);
        let labels: Vec<&str> = r.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", "d", "b"]);
    }
}
