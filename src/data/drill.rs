use super::aggregate::{Aggregate, aggregate_column_means, sort_descending};
use super::filter::CategoryFilter;
use super::grouping::GroupMap;
use super::model::Dataset;
use crate::error::Result;

/// Breakdown of one group into its member column means.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillDown {
    pub group: String,
    pub total: f64,
    /// Largest member first.
    pub entries: Vec<Aggregate>,
}

/// Member columns of `group_key` with their means, largest first.
///
/// Ties keep column order. A missing, empty or unknown key gives an empty
/// list; whether that is worth reporting is up to the caller.
pub fn resolve(
    group_key: Option<&str>,
    groups: &GroupMap,
    dataset: &Dataset,
    filter: Option<&CategoryFilter>,
) -> Result<Vec<Aggregate>> {
    let Some(members) = group_key
        .filter(|k| !k.is_empty())
        .and_then(|k| groups.get(k))
    else {
        return Ok(Vec::new());
    };

    let mut entries = aggregate_column_means(dataset, members, filter)?;
    sort_descending(&mut entries);
    Ok(entries)
}

/// Lay out `label: value` entries in side-by-side columns of at most `n_rows`
/// lines, each cell padded to `col_width` characters.
pub fn format_columns(items: &[Aggregate], n_rows: usize, col_width: usize) -> String {
    if items.is_empty() || n_rows == 0 {
        return String::new();
    }
    let chunks: Vec<&[Aggregate]> = items.chunks(n_rows).collect();
    let height = chunks[0].len();

    (0..height)
        .map(|row| {
            chunks
                .iter()
                .filter_map(|chunk| chunk.get(row))
                .map(|a| format!("{:<col_width$}", format!("{}: {:.3}", a.label, a.value)))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
