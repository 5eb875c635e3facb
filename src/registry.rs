use std::collections::BTreeMap;

use crate::data::grouping::{GroupKeyRule, GroupMap, classify};
use crate::data::model::Dataset;
use crate::error::{ExploreError, Result};

// ---------------------------------------------------------------------------
// Registry – loaded datasets and the active one's groups
// ---------------------------------------------------------------------------

/// Owns every loaded dataset, tracks which one is active and keeps the group
/// map of the active dataset current.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    datasets: BTreeMap<String, Dataset>,
    active: Option<String>,
    groups: GroupMap,
    from_index: usize,
    rule: GroupKeyRule,
}

impl Registry {
    pub fn new(from_index: usize, rule: GroupKeyRule) -> Self {
        Self {
            from_index,
            rule,
            ..Self::default()
        }
    }

    /// Store `dataset` under `key`, replacing any dataset already there.
    ///
    /// The first dataset loaded becomes active. Reloading the active key
    /// re-classifies it.
    pub fn load(&mut self, key: impl Into<String>, dataset: Dataset) {
        let key = key.into();
        let replaced = self.datasets.insert(key.clone(), dataset).is_some();
        if replaced {
            log::info!("Replaced dataset '{key}'");
        }
        let reloaded_active = self.active.as_deref() == Some(key.as_str());
        if self.active.is_none() {
            self.active = Some(key);
            self.reclassify();
        } else if reloaded_active {
            self.reclassify();
        }
    }

    /// Make `key` active and classify its columns. Unknown keys leave the
    /// current selection in place.
    pub fn set_active(&mut self, key: &str) -> Result<()> {
        if !self.datasets.contains_key(key) {
            log::warn!("Refusing to activate unknown dataset '{key}'");
            return Err(ExploreError::UnknownDatasetKey(key.to_string()));
        }
        self.active = Some(key.to_string());
        self.reclassify();
        log::info!("Active dataset is now '{key}'");
        Ok(())
    }

    pub fn active(&self) -> Result<&Dataset> {
        self.active
            .as_ref()
            .and_then(|k| self.datasets.get(k))
            .ok_or(ExploreError::NoDataLoaded)
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Group map of the active dataset; empty when nothing is loaded.
    pub fn groups(&self) -> &GroupMap {
        &self.groups
    }

    /// Dataset keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Change where measurement columns start and how they are keyed.
    pub fn set_classification(&mut self, from_index: usize, rule: GroupKeyRule) {
        self.from_index = from_index;
        self.rule = rule;
        self.reclassify();
    }

    fn reclassify(&mut self) {
        self.groups = match self.active() {
            Ok(ds) => classify(ds, self.from_index, self.rule),
            Err(_) => GroupMap::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn dataset(name: &str, columns: &[&str]) -> Dataset {
        Dataset::new(
            name,
            columns
                .iter()
                .map(|c| Column::numeric(*c, vec![Some(1.0)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_registry() {
        let reg = Registry::default();
        assert_eq!(reg.active().unwrap_err(), ExploreError::NoDataLoaded);
        assert!(reg.groups().is_empty());
    }

    #[test]
    fn test_first_load_becomes_active() {
        let mut reg = Registry::new(0, GroupKeyRule::LeadingAlpha);
        reg.load("a", dataset("a", &["CE(1)", "PC(2)"]));
        reg.load("b", dataset("b", &["TG(1)"]));
        assert_eq!(reg.active_key(), Some("a"));
        assert_eq!(reg.groups().len(), 2);
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_set_active_reclassifies() {
        let mut reg = Registry::new(0, GroupKeyRule::LeadingAlpha);
        reg.load("a", dataset("a", &["CE(1)", "PC(2)"]));
        reg.load("b", dataset("b", &["TG(1)"]));
        reg.set_active("b").unwrap();
        assert_eq!(reg.active().unwrap().name(), "b");
        assert_eq!(reg.groups().keys().collect::<Vec<_>>(), vec!["TG"]);
    }

    #[test]
    fn test_set_active_unknown_keeps_active() {
        let mut reg = Registry::new(0, GroupKeyRule::LeadingAlpha);
        reg.load("a", dataset("a", &["CE(1)"]));
        assert_eq!(
            reg.set_active("missing_key").unwrap_err(),
            ExploreError::UnknownDatasetKey("missing_key".into())
        );
        assert_eq!(reg.active_key(), Some("a"));
        assert!(reg.groups().contains("CE"));
    }

    #[test]
    fn test_reload_replaces_and_reclassifies() {
        let mut reg = Registry::new(0, GroupKeyRule::LeadingAlpha);
        reg.load("a", dataset("a", &["CE(1)"]));
        reg.load("a", dataset("a", &["SM(1)", "SM(2)"]));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.groups().get("SM").unwrap().len(), 2);
        assert!(!reg.groups().contains("CE"));
    }

    #[test]
    fn test_set_classification() {
        let mut reg = Registry::new(0, GroupKeyRule::LeadingAlpha);
        reg.load("a", dataset("a", &["A_0", "A_1", "B_0"]));
        reg.set_classification(1, GroupKeyRule::Separator('_'));
        let keys: Vec<&str> = reg.groups().keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(reg.groups().get("A").unwrap(), &["A_1".to_string()]);
    }
}
