use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Group key extraction
// ---------------------------------------------------------------------------

/// How a column name is turned into the key of the group it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKeyRule {
    /// First segment before the separator: `"A_0"` → `"A"`.
    Separator(char),
    /// Longest leading run of ASCII letters: `"CE(16:0)"` → `"CE"`.
    #[default]
    LeadingAlpha,
}

impl GroupKeyRule {
    /// Group key of `name`, or `None` when the name has no key under this rule.
    pub fn extract<'a>(&self, name: &'a str) -> Option<&'a str> {
        match *self {
            GroupKeyRule::Separator(sep) => category_label(name, sep),
            GroupKeyRule::LeadingAlpha => leading_alpha(name),
        }
    }
}

/// First `separator`-delimited segment of a raw identifier; `None` when empty.
pub fn category_label(raw: &str, separator: char) -> Option<&str> {
    if raw.is_empty() {
        return None;
    }
    raw.split(separator).next()
}

fn leading_alpha(name: &str) -> Option<&str> {
    let end = name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    (end > 0).then(|| &name[..end])
}

// ---------------------------------------------------------------------------
// GroupMap – first-seen ordered key → member columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    /// Member column names in dataset column order.
    pub members: Vec<String>,
}

/// Groups in the order their keys were first seen, with keyed lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMap {
    groups: Vec<Group>,
    positions: BTreeMap<String, usize>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `member` to the group `key`, creating the group at the end if new.
    pub fn insert(&mut self, key: &str, member: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.groups[pos].members.push(member.to_string()),
            None => {
                self.positions.insert(key.to_string(), self.groups.len());
                self.groups.push(Group {
                    key: key.to_string(),
                    members: vec![member.to_string()],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.positions
            .get(key)
            .map(|&pos| self.groups[pos].members.as_slice())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    /// Keys sorted alphabetically, for selection lists.
    pub fn sorted_keys(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Restrict to `keys`, in the order given. Unknown and repeated keys are
    /// skipped.
    pub fn subset<S: AsRef<str>>(&self, keys: &[S]) -> GroupMap {
        let mut out = GroupMap::new();
        for key in keys {
            let key = key.as_ref();
            if out.contains(key) {
                continue;
            }
            if let Some(members) = self.get(key) {
                for m in members {
                    out.insert(key, m);
                }
            }
        }
        out
    }

    /// All member columns, group by group.
    pub fn members(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().cloned())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// Partition the numeric columns of `dataset` at or after `from_index` into
/// groups keyed by `rule`.
///
/// Columns before `from_index` are identifier/metadata columns. An offset past
/// the last column yields an empty map.
pub fn classify(dataset: &Dataset, from_index: usize, rule: GroupKeyRule) -> GroupMap {
    let mut groups = GroupMap::new();
    for column in dataset.columns().iter().skip(from_index) {
        if !column.is_numeric() {
            continue;
        }
        if let Some(key) = rule.extract(&column.name) {
            groups.insert(key, &column.name);
        }
    }
    log::debug!(
        "Classified '{}' from column {from_index}: {} groups",
        dataset.name(),
        groups.len()
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn lipid_dataset() -> Dataset {
        let num = |name: &str| Column::numeric(name, vec![Some(1.0), Some(2.0)]);
        Dataset::new(
            "lipids",
            vec![
                Column::from_cells(
                    "Strains",
                    vec![CellValue::String("A_1".into()), CellValue::String("B_1".into())],
                ),
                num("CE(16:0)"),
                num("PC(34:1)"),
                num("CE(18:1)"),
                num("12-HETE"),
                Column::from_cells(
                    "Notes",
                    vec![CellValue::String("ok".into()), CellValue::Null],
                ),
                num("pc(30:0)"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_leading_alpha() {
        let rule = GroupKeyRule::LeadingAlpha;
        assert_eq!(rule.extract("CE(16:0)"), Some("CE"));
        assert_eq!(rule.extract("LPC"), Some("LPC"));
        assert_eq!(rule.extract("TG 52:2"), Some("TG"));
        assert_eq!(rule.extract("12-HETE"), None);
        assert_eq!(rule.extract("(x)"), None);
        assert_eq!(rule.extract(""), None);
    }

    #[test]
    fn test_separator_rule() {
        let rule = GroupKeyRule::Separator('_');
        assert_eq!(rule.extract("A.J_12"), Some("A.J"));
        assert_eq!(rule.extract("nounderscore"), Some("nounderscore"));
        assert_eq!(rule.extract("_lead"), Some(""));
        assert_eq!(rule.extract(""), None);
    }

    #[test]
    fn test_classify_first_seen_order() {
        let groups = classify(&lipid_dataset(), 1, GroupKeyRule::LeadingAlpha);
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["CE", "PC", "pc"]);
        assert_eq!(
            groups.get("CE").unwrap(),
            &["CE(16:0)".to_string(), "CE(18:1)".to_string()]
        );
        assert_eq!(groups.sorted_keys(), vec!["CE", "PC", "pc"]);
    }

    #[test]
    fn test_classify_skips_leading_columns() {
        let groups = classify(&lipid_dataset(), 3, GroupKeyRule::LeadingAlpha);
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["CE", "pc"]);
        assert_eq!(groups.get("CE").unwrap().len(), 1);
    }

    #[test]
    fn test_classify_offset_past_end() {
        assert!(classify(&lipid_dataset(), 99, GroupKeyRule::LeadingAlpha).is_empty());
    }

    #[test]
    fn test_classify_is_deterministic() {
        let ds = lipid_dataset();
        assert_eq!(
            classify(&ds, 0, GroupKeyRule::LeadingAlpha),
            classify(&ds, 0, GroupKeyRule::LeadingAlpha)
        );
    }

    #[test]
    fn test_subset_follows_selection_order() {
        let groups = classify(&lipid_dataset(), 1, GroupKeyRule::LeadingAlpha);
        let sub = groups.subset(&["pc", "missing", "CE", "pc"]);
        let keys: Vec<&str> = sub.keys().collect();
        assert_eq!(keys, vec!["pc", "CE"]);
        assert_eq!(sub.members(), vec!["pc(30:0)", "CE(16:0)", "CE(18:1)"]);
    }
}
