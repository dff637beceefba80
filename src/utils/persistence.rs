use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::{
    budget::{Budget, Ledger},
    errors::PersistenceError,
};

const TMP_SUFFIX: &str = "tmp";

/// Writes the budget snapshot to disk atomically by staging to a temporary file.
pub fn save_budget_to_file(budget: &Budget, path: &Path) -> Result<(), PersistenceError> {
    write_snapshot(budget, path)?;
    info!(budget = %budget.name, path = %path.display(), "budget saved");
    Ok(())
}

/// Loads a budget snapshot from disk, returning structured errors on failure.
pub fn load_budget_from_file(path: &Path) -> Result<Budget, PersistenceError> {
    let budget: Budget = read_snapshot(path)?;
    info!(budget = %budget.name, path = %path.display(), "budget loaded");
    Ok(budget)
}

pub fn save_ledger_to_file(ledger: &Ledger, path: &Path) -> Result<(), PersistenceError> {
    write_snapshot(ledger, path)?;
    info!(entries = ledger.len(), path = %path.display(), "ledger saved");
    Ok(())
}

pub fn load_ledger_from_file(path: &Path) -> Result<Ledger, PersistenceError> {
    let ledger: Ledger = read_snapshot(path)?;
    info!(entries = ledger.len(), path = %path.display(), "ledger loaded");
    Ok(ledger)
}

fn write_snapshot<T: Serialize>(value: &T, path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
