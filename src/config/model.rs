use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::budget::BudgetUnit;

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    /// Currency used when a new budget is created without an explicit unit.
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for budget snapshots. Defaults to `~/Documents/Budgets`.
    pub default_budget_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_budget_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_unit(&self) -> BudgetUnit {
        BudgetUnit::money(self.currency.clone())
    }

    pub fn resolve_default_budget_root(&self) -> PathBuf {
        if let Some(path) = &self.default_budget_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Budgets")
    }

    /// Resolves a snapshot argument: paths are used as given, bare names land in the budget root.
    pub fn resolve_budget_path(&self, name_or_path: &str) -> PathBuf {
        let candidate = PathBuf::from(name_or_path);
        if candidate.components().count() > 1 || candidate.extension().is_some() {
            return candidate;
        }
        self.resolve_default_budget_root()
            .join(format!("{}.json", name_or_path))
    }
}
