//! Calibration Store
//!
//! Holds the current calibration as an immutable `Arc` snapshot. Loads swap
//! the snapshot wholesale, readers clone the `Arc` and compute without
//! holding the lock, so an in-flight conversion always sees one table.

use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use config_loader::CalibrationLoader;
use contracts::{CalibrationTable, ContractError};
use tracing::info;

use crate::TimeConverter;

/// Swappable slot for the current calibration
#[derive(Debug, Default)]
pub struct CalibrationStore {
    slot: RwLock<Option<Arc<CalibrationTable>>>,
}

static GLOBAL: CalibrationStore = CalibrationStore::new();

impl CalibrationStore {
    /// Empty store, conversions fail with `NotInitialized` until a load
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Process-wide store used by the free conversion functions
    pub fn global() -> &'static CalibrationStore {
        &GLOBAL
    }

    /// Parse, validate and install a calibration document.
    ///
    /// The store is left unchanged on failure.
    pub fn load_from_str(&self, content: &str) -> Result<Arc<CalibrationTable>, ContractError> {
        let table = CalibrationLoader::load_from_str(content)?;
        Ok(self.install(table))
    }

    /// Read, parse, validate and install a calibration file.
    pub fn load_from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<CalibrationTable>, ContractError> {
        let table = CalibrationLoader::load_from_path(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Calibration file loaded");
        Ok(self.install(table))
    }

    /// Validate and install an already-built table.
    pub fn replace(&self, table: CalibrationTable) -> Result<Arc<CalibrationTable>, ContractError> {
        CalibrationLoader::validate(&table)?;
        Ok(self.install(table))
    }

    /// Current calibration snapshot
    pub fn snapshot(&self) -> Result<Arc<CalibrationTable>, ContractError> {
        self.read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(ContractError::NotInitialized)
    }

    /// Converter bound to the current snapshot
    pub fn converter(&self) -> Result<TimeConverter, ContractError> {
        self.snapshot().map(TimeConverter::new)
    }

    pub fn is_loaded(&self) -> bool {
        self.read().is_some()
    }

    /// Drop the current calibration
    pub fn clear(&self) {
        *self.write() = None;
    }

    fn install(&self, table: CalibrationTable) -> Arc<CalibrationTable> {
        let table = Arc::new(table);
        observability::record_calibration_loaded(&table);
        info!(rules = table.rule_count(), "Calibration installed");
        *self.write() = Some(Arc::clone(&table));
        table
    }

    // The slot only ever holds a complete snapshot, so a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<CalibrationTable>>> {
        self.slot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<CalibrationTable>>> {
        self.slot.write().unwrap_or_else(|e| e.into_inner())
    }
}
