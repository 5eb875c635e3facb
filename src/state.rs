use std::path::Path;

use crate::color::ColorMap;
use crate::config::ExplorerConfig;
use crate::data::aggregate::{
    Aggregate, AggregateResult, Order, aggregate_column_means, aggregate_group_totals,
    numeric_columns,
};
use crate::data::drill::{DrillDown, resolve};
use crate::data::filter::{CategoryFilter, select_rows};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::window::{Page, WindowState};
use crate::error::{ExploreError, Result};
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Mean of every measurement column, paged through a window.
    #[default]
    ColumnMeans,
    /// Total per selected group, stacked, with drill-down.
    GroupComposition,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::ColumnMeans => "Column means",
            ViewMode::GroupComposition => "Group composition",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ViewMode::ColumnMeans => "columns",
            ViewMode::GroupComposition => "groups",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// The full session, independent of rendering.
///
/// The category filter and window size only change when the new value is
/// valid. A failed recompute keeps the last good results and window on
/// screen.
pub struct AppState {
    pub config: ExplorerConfig,
    registry: Registry,
    mode: ViewMode,
    /// Selected category label, `None` for all rows.
    category: Option<String>,
    selected_groups: Vec<String>,
    window: WindowState,
    /// Last successfully computed results, in display order.
    results: AggregateResult,
    drill: Option<DrillDown>,
    pub color_map: ColorMap,

    /// Text of the window size entry, applied on demand.
    pub window_input: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Self {
        let window = WindowState::new(config.window_size).unwrap_or_default();
        Self {
            registry: Registry::new(config.numeric_start, config.group_rule),
            mode: ViewMode::default(),
            category: None,
            selected_groups: Vec::new(),
            window_input: window.size().to_string(),
            window,
            results: Vec::new(),
            drill: None,
            color_map: ColorMap::new(Vec::<String>::new()),
            status_message: None,
            loading: false,
            config,
        }
    }

    // -- Accessors --

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Category labels of the active dataset, for the selection dropdown.
    pub fn category_labels(&self) -> &[String] {
        self.registry
            .active()
            .map(Dataset::category_labels)
            .unwrap_or(&[])
    }

    pub fn selected_groups(&self) -> &[String] {
        &self.selected_groups
    }

    /// Discovered groups not currently selected, sorted.
    pub fn available_groups(&self) -> Vec<String> {
        self.registry
            .groups()
            .sorted_keys()
            .into_iter()
            .filter(|g| !self.selected_groups.contains(g))
            .collect()
    }

    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn results(&self) -> &[Aggregate] {
        &self.results
    }

    pub fn drill(&self) -> Option<&DrillDown> {
        self.drill.as_ref()
    }

    pub fn close_drill(&mut self) {
        self.drill = None;
    }

    /// The page of results currently in view.
    pub fn visible(&self) -> Page<'_, Aggregate> {
        self.window.page(&self.results)
    }

    pub fn progress_label(&self) -> String {
        self.visible().progress_label(self.mode.noun())
    }

    /// Record a failed operation in the status line.
    pub fn report<T>(&mut self, result: Result<T>) {
        if let Err(e) = result {
            log::warn!("{e}");
            self.status_message = Some(e.to_string());
        }
    }

    // -- Loading --

    /// Load a file and make it the active dataset. On failure the session is
    /// left untouched.
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        self.loading = true;
        let outcome = loader::load_file(path).and_then(|ds| {
            let key = ds.name().to_string();
            self.load_dataset(key, ds).map_err(anyhow::Error::from)
        });
        self.loading = false;
        if let Err(e) = &outcome {
            log::error!("Failed to load {}: {e:#}", path.display());
            self.status_message = Some(format!("Error: {e:#}"));
        }
        outcome
    }

    /// Register `dataset` under `key` (replacing any previous one) and
    /// activate it.
    pub fn load_dataset(&mut self, key: impl Into<String>, dataset: Dataset) -> Result<()> {
        let key = key.into();
        let column = self.config.category_column.clone();
        let dataset = if dataset.has_column(&column) {
            dataset.with_category(&column, self.config.category_separator)?
        } else {
            log::info!("'{key}' has no '{column}' column, category filter disabled");
            dataset
        };

        self.registry.load(key.clone(), dataset);
        self.registry.set_active(&key)?;

        self.category = self.category_labels().first().cloned();
        self.selected_groups.clear();
        self.window.reset();
        self.status_message = None;
        self.after_switch();
        Ok(())
    }

    // -- Selection inputs --

    /// Switch the active dataset. Keeps the category and group selection
    /// where the new dataset has them.
    pub fn set_active(&mut self, key: &str) -> Result<()> {
        self.registry.set_active(key)?;

        let keep = self
            .category
            .as_ref()
            .is_some_and(|c| self.category_labels().contains(c));
        if !keep {
            self.category = self.category_labels().first().cloned();
        }
        let groups = self.registry.groups();
        self.selected_groups.retain(|g| groups.contains(g));
        self.status_message = None;
        self.after_switch();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.window.reset();
        self.after_switch();
    }

    /// Restrict rows to one category label. An unknown label is rejected and
    /// nothing changes.
    pub fn set_category_filter(&mut self, value: &str) -> Result<()> {
        let dataset = self.registry.active()?;
        let filter = CategoryFilter::new(self.config.category_column.clone(), value);
        select_rows(dataset, Some(&filter))?;

        self.category = Some(value.to_string());
        self.after_switch();
        Ok(())
    }

    /// Use every row.
    pub fn clear_category_filter(&mut self) {
        self.category = None;
        self.after_switch();
    }

    /// Replace the group selection (unknown keys and repeats dropped) and
    /// recompute.
    pub fn set_selected_groups<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<()> {
        let groups = self.registry.groups();
        let mut selected: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            if groups.contains(key) && !selected.iter().any(|s| s == key) {
                selected.push(key.to_string());
            }
        }
        self.selected_groups = selected;
        self.refresh()
    }

    /// Append `keys` to the selection.
    pub fn move_to_selected(&mut self, keys: &[String]) -> Result<()> {
        let mut next = self.selected_groups.clone();
        next.extend(keys.iter().cloned());
        self.set_selected_groups(&next)
    }

    /// Remove `keys` from the selection.
    pub fn move_to_available(&mut self, keys: &[String]) -> Result<()> {
        let next: Vec<String> = self
            .selected_groups
            .iter()
            .filter(|g| !keys.contains(g))
            .cloned()
            .collect();
        self.set_selected_groups(&next)
    }

    // -- Window --

    /// Apply a user-entered window size. Invalid input leaves the window as
    /// it was.
    pub fn set_window_size(&mut self, input: &str) -> Result<()> {
        self.window.set_size(input)?;
        self.window.clamp(self.results.len());
        Ok(())
    }

    pub fn page(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.window.move_left(),
            Direction::Right => self.window.move_right(self.results.len()),
        }
    }

    // -- Drill-down --

    /// Break `key` down into its member columns for the detail view.
    pub fn select_group(&mut self, key: &str) -> Result<()> {
        self.drill = self.breakdown(key)?;
        if self.drill.is_none() {
            self.status_message = Some(format!("No detail available for '{key}'"));
        }
        Ok(())
    }

    pub fn breakdown(&self, key: &str) -> Result<Option<DrillDown>> {
        let dataset = self.registry.active()?;
        let filter = self.filter();
        let entries = resolve(Some(key), self.registry.groups(), dataset, filter.as_ref())?;
        if entries.is_empty() {
            return Ok(None);
        }
        let total = entries.iter().map(|a| a.value).filter(|v| !v.is_nan()).sum();
        Ok(Some(DrillDown {
            group: key.to_string(),
            total,
            entries,
        }))
    }

    // -- Recompute --

    /// Recompute results for the current inputs. On error the previous
    /// results stay in place.
    pub fn refresh(&mut self) -> Result<()> {
        let results = self.compute()?;
        self.commit(results);
        Ok(())
    }

    fn filter(&self) -> Option<CategoryFilter> {
        self.category
            .as_ref()
            .map(|value| CategoryFilter::new(self.config.category_column.clone(), value.clone()))
    }

    fn compute(&self) -> Result<AggregateResult> {
        let dataset = self.registry.active()?;
        let groups = self.registry.groups();
        let filter = self.filter();

        match self.mode {
            ViewMode::ColumnMeans => {
                let columns = if self.selected_groups.is_empty() {
                    numeric_columns(dataset, self.config.numeric_start)
                } else {
                    groups.subset(&self.selected_groups).members()
                };
                aggregate_column_means(dataset, &columns, filter.as_ref())
            }
            ViewMode::GroupComposition => {
                if groups.is_empty() {
                    return Err(ExploreError::NoGroupsDiscovered(dataset.name().to_string()));
                }
                if self.selected_groups.is_empty() {
                    return Err(ExploreError::NoGroupsSelected);
                }
                let order = if self.config.sort_groups_descending {
                    Order::Descending
                } else {
                    Order::Natural
                };
                aggregate_group_totals(
                    dataset,
                    &groups.subset(&self.selected_groups),
                    filter.as_ref(),
                    order,
                )
            }
        }
    }

    fn commit(&mut self, results: AggregateResult) {
        self.results = results;
        self.window.clamp(self.results.len());
        self.status_message = None;
        if let Some(group) = self.drill.as_ref().map(|d| d.group.clone()) {
            self.drill = self.breakdown(&group).ok().flatten();
        }
    }

    /// Recompute after the dataset, filter or mode changed. The old results
    /// describe something else now, so a failure clears them.
    fn after_switch(&mut self) {
        self.color_map = ColorMap::new(self.registry.groups().keys());
        if let Err(e) = self.refresh() {
            self.results.clear();
            self.window.clamp(0);
            self.drill = None;
            log::debug!("Nothing to show yet: {e}");
            self.status_message = Some(e.to_string());
        }
    }
}
