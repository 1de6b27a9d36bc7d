//! Category tree (tactic → technique → sub-technique) and the providers that supply it.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One matrix column.
///
/// `items` is in rendering order. `sub_items` maps a parent item id to its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Filter key (e.g. `initial-access`). Derived from `name` when the source omits it.
    #[serde(default)]
    pub shortname: String,
    #[serde(default, alias = "techniques")]
    pub items: Vec<Item>,
    #[serde(default, alias = "subtechniques")]
    pub sub_items: IndexMap<String, Vec<Item>>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            shortname: shortname_for(&name),
            name,
            items: Vec::new(),
            sub_items: IndexMap::new(),
        }
    }

    pub fn with_item(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.items.push(Item::new(id, name));
        self
    }

    pub fn with_sub_items(mut self, parent: impl Into<String>, items: Vec<Item>) -> Self {
        self.sub_items.insert(parent.into(), items);
        self
    }

    pub fn key(&self) -> &str {
        &self.shortname
    }

    pub fn sub_items_of(&self, item_id: &str) -> &[Item] {
        self.sub_items.get(item_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn normalize(&mut self) {
        if self.shortname.trim().is_empty() {
            self.shortname = shortname_for(&self.name);
        }
    }
}

/// `"Initial Access"` → `"initial-access"`.
pub fn shortname_for(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Enterprise,
    Mobile,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Enterprise => "enterprise",
            Domain::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Error;

    /// Accepts `enterprise`, `mitre-enterprise` and `enterprise-attack` spellings (same for
    /// `mobile`).
    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim().to_ascii_lowercase();
        let key = raw.strip_prefix("mitre-").unwrap_or(&raw);
        let key = key.strip_suffix("-attack").unwrap_or(key);
        match key {
            "enterprise" => Ok(Domain::Enterprise),
            "mobile" => Ok(Domain::Mobile),
            _ => Err(Error::UnsupportedDomain {
                domain: s.to_string(),
            }),
        }
    }
}

/// Supplies the ordered category list for a domain.
pub trait MatrixProvider {
    fn categories(&self, domain: Domain) -> Result<Vec<Category>>;
}

/// Catalog document: `{ "enterprise": [ <category>... ], "mobile": [ ... ] }`.
#[derive(Debug, Clone, Default)]
pub struct JsonMatrixProvider {
    domains: IndexMap<String, Vec<Category>>,
}

impl JsonMatrixProvider {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: IndexMap<String, Vec<Category>> = serde_json::from_str(text)?;
        Ok(Self::from_domains(raw))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_domains(domains: IndexMap<String, Vec<Category>>) -> Self {
        let mut out = IndexMap::new();
        for (key, mut categories) in domains {
            for c in &mut categories {
                c.normalize();
            }
            let key = key
                .parse::<Domain>()
                .map(|d| d.as_str().to_string())
                .unwrap_or(key);
            out.insert(key, categories);
        }
        Self { domains: out }
    }

    pub fn insert(&mut self, domain: Domain, mut categories: Vec<Category>) {
        for c in &mut categories {
            c.normalize();
        }
        self.domains.insert(domain.as_str().to_string(), categories);
    }
}

impl MatrixProvider for JsonMatrixProvider {
    fn categories(&self, domain: Domain) -> Result<Vec<Category>> {
        let Some(categories) = self.domains.get(domain.as_str()) else {
            return Err(Error::MissingDomain {
                domain: domain.to_string(),
            });
        };
        tracing::debug!(
            domain = domain.as_str(),
            categories = categories.len(),
            "matrix catalog lookup"
        );
        Ok(categories.clone())
    }
}
