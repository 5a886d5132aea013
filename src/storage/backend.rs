//! Key-value backends for the persisted state blob

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{BudgetError, BudgetResult};

use super::file_io::{read_text, write_text_atomic};

/// Stores one text document per key
pub trait StateBackend {
    /// The stored document, or `None` if the key was never written
    fn read(&self, key: &str) -> BudgetResult<Option<String>>;

    /// Replace the document stored under `key`
    fn write(&self, key: &str, value: &str) -> BudgetResult<()>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> BudgetResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BudgetError::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StateBackend for FileBackend {
    fn read(&self, key: &str) -> BudgetResult<Option<String>> {
        read_text(self.path_for(key)?)
    }

    fn write(&self, key: &str, value: &str) -> BudgetResult<()> {
        write_text_atomic(self.path_for(key)?, value)
    }
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key with raw text
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl StateBackend for MemoryBackend {
    fn read(&self, key: &str) -> BudgetResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> BudgetResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
