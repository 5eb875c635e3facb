use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::grouping::GroupKeyRule;
use crate::data::window::DEFAULT_WINDOW_SIZE;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "LIPID_PANDA_CONFIG";

/// Settings for how tables are interpreted and shown.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "numeric_start": 6, "window_size": 20 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Raw identifier column that category labels come from.
    pub category_column: String,
    /// Separator splitting a raw identifier; the first segment is the label.
    pub category_separator: char,
    /// Index of the first measurement column; earlier columns are metadata.
    pub numeric_start: usize,
    pub group_rule: GroupKeyRule,
    pub window_size: usize,
    /// Show the largest group first in composition view.
    pub sort_groups_descending: bool,
    pub tooltip_rows: usize,
    pub tooltip_col_width: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            category_column: "Strains".to_string(),
            category_separator: '_',
            numeric_start: 0,
            group_rule: GroupKeyRule::LeadingAlpha,
            window_size: DEFAULT_WINDOW_SIZE,
            sort_groups_descending: true,
            tooltip_rows: 16,
            tooltip_col_width: 24,
        }
    }
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: ExplorerConfig =
            serde_json::from_str(&text).context("parsing config JSON")?;
        if config.window_size == 0 {
            log::warn!("Config window_size 0 replaced by {DEFAULT_WINDOW_SIZE}");
            config.window_size = DEFAULT_WINDOW_SIZE;
        }
        Ok(config)
    }

    /// Config from the file named by `LIPID_PANDA_CONFIG`, or the defaults
    /// when it is unset or unreadable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => {
                log::info!("Using config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"numeric_start": 6, "group_rule": {{"separator": "-"}}, "window_size": 0}}"#
        )
        .unwrap();

        let config = ExplorerConfig::load(file.path()).unwrap();
        assert_eq!(config.numeric_start, 6);
        assert_eq!(config.group_rule, GroupKeyRule::Separator('-'));
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.category_column, "Strains");
    }

    #[test]
    fn test_unit_variant_rule() {
        let config: ExplorerConfig = serde_json::from_str(r#"{"group_rule": "leading_alpha"}"#).unwrap();
        assert_eq!(config.group_rule, GroupKeyRule::LeadingAlpha);
    }

    #[test]
    fn test_bad_config_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(ExplorerConfig::load(file.path()).is_err());
    }
}
