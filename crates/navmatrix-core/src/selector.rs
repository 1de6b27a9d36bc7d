//! Per-item lookups keyed by `(category key, item id)`, with an "any category" fallback.
//!
//! Layer annotations may name a technique either inside one tactic or for every tactic it
//! appears in. [`ItemSet`] and [`ItemTable`] keep the two kinds apart and resolve them in a
//! single place: a scoped entry always wins over an any-category entry.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Any,
    Category(String),
}

impl Scope {
    /// `None` or an empty key means "any category".
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            Some(k) if !k.is_empty() => Scope::Category(k.to_string()),
            _ => Scope::Any,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    scoped: FxHashMap<String, FxHashSet<String>>,
    any: FxHashSet<String>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scope: Scope, item_id: impl Into<String>) {
        let item_id = item_id.into();
        match scope {
            Scope::Any => {
                self.any.insert(item_id);
            }
            Scope::Category(key) => {
                self.scoped.entry(key).or_default().insert(item_id);
            }
        }
    }

    pub fn with(mut self, scope: Scope, item_id: impl Into<String>) -> Self {
        self.insert(scope, item_id);
        self
    }

    pub fn contains(&self, category_key: &str, item_id: &str) -> bool {
        self.any.contains(item_id)
            || self
                .scoped
                .get(category_key)
                .is_some_and(|items| items.contains(item_id))
    }

    pub fn is_empty(&self) -> bool {
        self.any.is_empty() && self.scoped.values().all(FxHashSet::is_empty)
    }
}

#[derive(Debug, Clone)]
pub struct ItemTable<T> {
    scoped: FxHashMap<String, FxHashMap<String, T>>,
    any: FxHashMap<String, T>,
}

impl<T> Default for ItemTable<T> {
    fn default() -> Self {
        Self {
            scoped: FxHashMap::default(),
            any: FxHashMap::default(),
        }
    }
}

impl<T> ItemTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scope: Scope, item_id: impl Into<String>, value: T) {
        let item_id = item_id.into();
        match scope {
            Scope::Any => {
                self.any.insert(item_id, value);
            }
            Scope::Category(key) => {
                self.scoped.entry(key).or_default().insert(item_id, value);
            }
        }
    }

    pub fn with(mut self, scope: Scope, item_id: impl Into<String>, value: T) -> Self {
        self.insert(scope, item_id, value);
        self
    }

    /// Scoped entry first, then the any-category entry.
    pub fn get(&self, category_key: &str, item_id: &str) -> Option<&T> {
        self.scoped
            .get(category_key)
            .and_then(|items| items.get(item_id))
            .or_else(|| self.any.get(item_id))
    }
}

/// Which sub-items are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtechniqueVisibility {
    /// Only items named in the expansion set.
    #[default]
    Expanded,
    All,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Hidden,
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilters {
    pub excluded: ItemSet,
    pub expanded: ItemSet,
}

impl ItemFilters {
    /// Whether the item's sub-items are shown, ignoring exclusion.
    ///
    /// Grid sizing uses this directly so excluded items still reserve their rows.
    pub fn is_expanded(
        &self,
        category_key: &str,
        item_id: &str,
        visibility: SubtechniqueVisibility,
    ) -> bool {
        match visibility {
            SubtechniqueVisibility::None => false,
            SubtechniqueVisibility::All => true,
            SubtechniqueVisibility::Expanded => self.expanded.contains(category_key, item_id),
        }
    }

    /// Exclusion first, then expansion.
    pub fn resolve(
        &self,
        category_key: &str,
        item_id: &str,
        visibility: SubtechniqueVisibility,
    ) -> ItemState {
        if self.excluded.contains(category_key, item_id) {
            ItemState::Hidden
        } else if self.is_expanded(category_key, item_id, visibility) {
            ItemState::Expanded
        } else {
            ItemState::Collapsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_entries_match_every_category() {
        let set = ItemSet::new()
            .with(Scope::Any, "T1001")
            .with(Scope::Category("execution".into()), "T1059");
        assert!(set.contains("execution", "T1001"));
        assert!(set.contains("persistence", "T1001"));
        assert!(set.contains("execution", "T1059"));
        assert!(!set.contains("persistence", "T1059"));
        assert!(!set.is_empty());
        assert!(ItemSet::new().is_empty());
    }

    #[test]
    fn scoped_values_shadow_wildcard_values() {
        let table = ItemTable::new()
            .with(Scope::Any, "T1059", 1.0)
            .with(Scope::Category("execution".into()), "T1059", 9.0);
        assert_eq!(table.get("execution", "T1059"), Some(&9.0));
        assert_eq!(table.get("persistence", "T1059"), Some(&1.0));
        assert_eq!(table.get("persistence", "T9999"), None);
    }

    #[test]
    fn exclusion_wins_over_expansion() {
        let filters = ItemFilters {
            excluded: ItemSet::new().with(Scope::Any, "T1059"),
            expanded: ItemSet::new().with(Scope::Any, "T1059"),
        };
        let v = SubtechniqueVisibility::Expanded;
        assert_eq!(filters.resolve("execution", "T1059", v), ItemState::Hidden);
        assert!(filters.is_expanded("execution", "T1059", v));
        assert_eq!(
            filters.resolve("execution", "T1203", SubtechniqueVisibility::All),
            ItemState::Expanded
        );
        assert_eq!(
            filters.resolve("execution", "T1203", v),
            ItemState::Collapsed
        );
    }

    #[test]
    fn empty_scope_key_is_a_wildcard() {
        assert_eq!(Scope::from_key(None), Scope::Any);
        assert_eq!(Scope::from_key(Some("  ")), Scope::Any);
        assert_eq!(
            Scope::from_key(Some("execution")),
            Scope::Category("execution".into())
        );
    }
}
