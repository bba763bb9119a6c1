//! Per-result-set view state.
//!
//! Each result set carries its own chart limit and table settings. Settings
//! are plain values: a transition produces a new [`ViewSettings`] and the
//! registry swaps it in, so two result sets can never share state.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{config::PlannerConfig, table::TableSettings};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultSetId(String);

impl ResultSetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub table: TableSettings,
    pub chart_limit: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl ViewSettings {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            table: TableSettings::default(),
            chart_limit: config.default_limit,
        }
    }

    pub fn with_chart_limit(&self, limit: usize) -> Self {
        Self {
            chart_limit: limit.max(1),
            ..self.clone()
        }
    }

    pub fn with_table(&self, table: TableSettings) -> Self {
        Self {
            table,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    defaults: ViewSettings,
    entries: HashMap<ResultSetId, ViewSettings>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: ViewSettings) -> Self {
        Self {
            defaults,
            entries: HashMap::new(),
        }
    }

    /// Settings for `id`; result sets never touched get the defaults.
    pub fn get(&self, id: &ResultSetId) -> ViewSettings {
        self.entries
            .get(id)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone())
    }

    pub fn update<F>(&mut self, id: &ResultSetId, f: F) -> ViewSettings
    where
        F: FnOnce(&ViewSettings) -> ViewSettings,
    {
        let next = f(&self.get(id));
        self.entries.insert(id.clone(), next.clone());
        next
    }

    pub fn remove(&mut self, id: &ResultSetId) -> Option<ViewSettings> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
