// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::model::StagingBuffer;

use super::app_folder::{write_atomic, StoreError, WriteDurability};

/// Key holding staged category contents, nested by category file name.
pub const STAGING_KEY: &str = "tempData";
/// Key holding the raw consolidated file as last read.
pub const CONSOLIDATED_KEY: &str = "consolidatedData";

/// String-keyed store of opaque blobs, optionally backed by a JSON file.
///
/// Values are kept as strings: plain strings raw, everything else serialized. Reads
/// deserialize again and fall back to the raw string when that fails.
#[derive(Debug, Clone, Default)]
pub struct KvStore {
    backing: Option<Backing>,
    entries: BTreeMap<String, String>,
    dirty: bool,
}

#[derive(Debug, Clone)]
struct Backing {
    root: PathBuf,
    path: PathBuf,
    durability: WriteDurability,
}

impl KvStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store persisted at `path` (which must lie inside `root`).
    ///
    /// A missing file is an empty store. A corrupt one is logged and treated as empty, since
    /// the store only ever holds data that can be rebuilt from the app folder.
    pub fn open(
        root: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        durability: WriteDurability,
    ) -> Result<Self, StoreError> {
        let backing = Backing {
            root: root.into(),
            path: path.into(),
            durability,
        };
        let entries = match fs::read_to_string(&backing.path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = ?backing.path, error = %err, "ignoring corrupt state file");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: backing.path,
                    source,
                })
            }
        };
        Ok(Self {
            backing: Some(backing),
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.backing.as_ref().map(|b| b.path.as_path())
    }

    /// Stores `value` under `key`, or under `key[subkey]` when a subkey is given.
    ///
    /// The nested form reads the current blob back as an object (anything else counts as
    /// `{}`), sets the field and stores the whole object again.
    pub fn set(&mut self, key: &str, value: &Value, subkey: Option<&str>) {
        let stored = match subkey {
            Some(subkey) => {
                let mut object = match self.get(key, None) {
                    Some(Value::Object(object)) => object,
                    _ => Map::new(),
                };
                object.insert(subkey.to_owned(), value.clone());
                Value::Object(object).to_string()
            }
            None => match value {
                Value::String(raw) => raw.clone(),
                other => other.to_string(),
            },
        };
        self.entries.insert(key.to_owned(), stored);
        self.dirty = true;
    }

    /// Never fails: unknown keys, unknown subkeys and non-object blobs read as `None`.
    pub fn get(&self, key: &str, subkey: Option<&str>) -> Option<Value> {
        let raw = self.entries.get(key)?;
        let parsed = match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => parsed,
            Err(_) => return Some(Value::String(raw.clone())),
        };
        match subkey {
            Some(subkey) => match parsed {
                Value::Object(mut object) => object.remove(subkey),
                _ => None,
            },
            None => Some(parsed),
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the store to its backing file, if it has one and anything changed.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let Some(backing) = &self.backing else {
            self.dirty = false;
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string(&self.entries).map_err(|source| StoreError::Json {
            path: backing.path.clone(),
            source,
        })?;
        write_atomic(&backing.root, &backing.path, json.as_bytes(), backing.durability)?;
        self.dirty = false;
        Ok(())
    }

    /// Staging buffer saved by [`KvStore::save_staging`]; empty when none was saved.
    pub fn load_staging(&self) -> StagingBuffer {
        let mut categories = BTreeMap::new();
        if let Some(Value::Object(object)) = self.get(STAGING_KEY, None) {
            for (file, raw) in object {
                match raw {
                    Value::String(raw) => {
                        categories.insert(file, raw);
                    }
                    other => {
                        categories.insert(file, other.to_string());
                    }
                }
            }
        }
        let consolidated = match self.get(CONSOLIDATED_KEY, None) {
            Some(Value::String(raw)) => Some(raw),
            Some(other) => Some(other.to_string()),
            None => None,
        };
        StagingBuffer::from_parts(categories, consolidated)
    }

    pub fn save_staging(&mut self, staging: &StagingBuffer) {
        let object: Map<String, Value> = staging
            .categories()
            .iter()
            .map(|(file, raw)| (file.clone(), Value::String(raw.clone())))
            .collect();
        self.set(STAGING_KEY, &Value::Object(object), None);
        match staging.consolidated() {
            Some(raw) => self.set(CONSOLIDATED_KEY, &Value::String(raw.to_owned()), None),
            None => {
                self.remove(CONSOLIDATED_KEY);
            }
        }
    }
}
