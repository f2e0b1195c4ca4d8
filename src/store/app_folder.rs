// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::migrate::Migrated;
use crate::model::{
    format_for_disk, AppTable, ConfigText, FavouritesRecord, FirstRun, ValidationError,
    VariablesRecord,
};

use super::paths::is_plain_file_name;

/// Directory holding the variables file. Fixed, since the variables record is what names
/// every other directory.
pub const UTILS_DIR: &str = "utils";
pub const VARIABLES_FILE: &str = "xldbv.json";
pub const FAVOURITES_FILE: &str = "xldbf.json";
/// Key-value state (staging buffer) kept between runs.
pub const STATE_FILE: &str = ".launchdeck-state.json";

const TMP_PREFIX: &str = ".launchdeck.tmp.";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid variables file {path:?}: {source}")]
    Validation {
        path: PathBuf,
        source: ValidationError,
    },
    #[error("invalid relative path for {field}: {value:?}")]
    InvalidRelativePath { field: &'static str, value: PathBuf },
    #[error("path {path:?} is outside the app root {root:?}")]
    PathOutsideRoot { root: PathBuf, path: PathBuf },
    #[error("refusing to write through symlink {path:?}")]
    SymlinkRefused { path: PathBuf },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync.
    #[default]
    BestEffort,

    /// Also fsyncs the file and, on unix, its directory, so a following read (the
    /// consolidation scan in particular) sees the bytes on stable storage.
    Durable,
}

/// An application root on disk: the file gateway plus typed load/save of every record.
///
/// All paths handed to the gateway must resolve inside the root; directories named by the
/// variables record are validated as relative paths before use.
#[derive(Debug, Clone)]
pub struct AppFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl AppFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn variables_path(&self) -> PathBuf {
        self.root.join(UTILS_DIR).join(VARIABLES_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn utils_dir(&self, variables: &VariablesRecord) -> Result<PathBuf, StoreError> {
        self.dir_path("directories.utils", &variables.directories.utils)
    }

    pub fn category_dir(&self, variables: &VariablesRecord) -> Result<PathBuf, StoreError> {
        self.dir_path("directories.xldb", &variables.directories.xldb)
    }

    pub fn favourites_path(&self, variables: &VariablesRecord) -> Result<PathBuf, StoreError> {
        self.file_in("favourites", &variables.directories.utils, FAVOURITES_FILE)
    }

    pub fn config_path(&self, variables: &VariablesRecord) -> Result<PathBuf, StoreError> {
        self.file_in("config", &variables.directories.utils, &variables.config)
    }

    pub fn consolidated_path(&self, variables: &VariablesRecord) -> Result<PathBuf, StoreError> {
        self.file_in("mainXLFC", &variables.directories.utils, &variables.main_xlfc)
    }

    pub fn category_path(
        &self,
        variables: &VariablesRecord,
        file: &str,
    ) -> Result<PathBuf, StoreError> {
        self.file_in("xldbFiles", &variables.directories.xldb, file)
    }

    fn dir_path(&self, field: &'static str, dir: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(dir);
        validate_relative_path(field, relative)?;
        Ok(self.root.join(relative))
    }

    fn file_in(&self, field: &'static str, dir: &str, name: &str) -> Result<PathBuf, StoreError> {
        if !is_plain_file_name(name) {
            return Err(StoreError::InvalidRelativePath {
                field,
                value: PathBuf::from(name),
            });
        }
        Ok(self.dir_path(field, dir)?.join(name))
    }

    pub fn read_file(&self, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        write_atomic(&self.root, path, contents, self.durability)
    }

    /// Removing a file that does not exist is not an error.
    pub fn remove_file(&self, path: &Path) -> Result<(), StoreError> {
        to_relative_path(&self.root, path, "path")?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn rename_file(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
        to_relative_path(&self.root, from, "from")?;
        let relative_to = to_relative_path(&self.root, to, "to")?;
        create_dir_all_safe(
            &self.root,
            relative_to.parent().unwrap_or_else(|| Path::new("")),
        )?;
        rename_overwrite(from, to).map_err(|source| StoreError::Io {
            path: from.to_path_buf(),
            source,
        })?;
        if self.durability == WriteDurability::Durable {
            sync_parent_dir(to)?;
        }
        Ok(())
    }

    /// Sorted names of the regular files in `dir`; in-flight temp files are skipped.
    pub fn list_directory(&self, dir: &Path) -> Result<Vec<String>, StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(TMP_PREFIX) {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    pub fn load_variables(&self) -> Result<Migrated<VariablesRecord>, StoreError> {
        let path = self.variables_path();
        let raw = self.read_file(&path)?;
        VariablesRecord::load_and_migrate(&raw)
            .map_err(|source| StoreError::Validation { path, source })
    }

    /// Validates before writing; an invalid record is never persisted.
    pub fn save_variables(&self, variables: &VariablesRecord) -> Result<(), StoreError> {
        let path = self.variables_path();
        variables
            .validate()
            .map_err(|source| StoreError::Validation {
                path: path.clone(),
                source,
            })?;
        let json = variables.to_pretty_json().map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write_file(&path, json.as_bytes())
    }

    /// A missing favourites file is an empty record.
    pub fn load_favourites(
        &self,
        variables: &VariablesRecord,
    ) -> Result<Migrated<FavouritesRecord>, StoreError> {
        let path = self.favourites_path(variables)?;
        let raw = match self.read_file(&path) {
            Ok(raw) => raw,
            Err(err) if err.is_not_found() => {
                return Ok(Migrated {
                    value: FavouritesRecord::new(),
                    changed: false,
                })
            }
            Err(err) => return Err(err),
        };
        FavouritesRecord::load_and_migrate(&raw).map_err(|source| StoreError::Json { path, source })
    }

    pub fn save_favourites(
        &self,
        variables: &VariablesRecord,
        favourites: &FavouritesRecord,
    ) -> Result<(), StoreError> {
        let path = self.favourites_path(variables)?;
        let json = favourites
            .to_pretty_json()
            .map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        self.write_file(&path, json.as_bytes())
    }

    pub fn read_category(
        &self,
        variables: &VariablesRecord,
        file: &str,
    ) -> Result<String, StoreError> {
        let path = self.category_path(variables, file)?;
        self.read_file(&path)
    }

    pub fn load_category(
        &self,
        variables: &VariablesRecord,
        file: &str,
    ) -> Result<AppTable, StoreError> {
        let path = self.category_path(variables, file)?;
        let raw = self.read_file(&path)?;
        AppTable::parse(&raw).map_err(|source| StoreError::Json { path, source })
    }

    /// Writes staged category text, pretty-printed when it parses as JSON.
    pub fn write_category(
        &self,
        variables: &VariablesRecord,
        file: &str,
        raw: &str,
    ) -> Result<(), StoreError> {
        let path = self.category_path(variables, file)?;
        self.write_file(&path, format_for_disk(raw).as_bytes())
    }

    pub fn remove_category(&self, variables: &VariablesRecord, file: &str) -> Result<(), StoreError> {
        let path = self.category_path(variables, file)?;
        self.remove_file(&path)
    }

    pub fn rename_category(
        &self,
        variables: &VariablesRecord,
        from: &str,
        to: &str,
    ) -> Result<(), StoreError> {
        let from = self.category_path(variables, from)?;
        let to = self.category_path(variables, to)?;
        self.rename_file(&from, &to)
    }

    pub fn read_consolidated(&self, variables: &VariablesRecord) -> Result<String, StoreError> {
        let path = self.consolidated_path(variables)?;
        self.read_file(&path)
    }

    pub fn load_consolidated(&self, variables: &VariablesRecord) -> Result<AppTable, StoreError> {
        let path = self.consolidated_path(variables)?;
        let raw = self.read_file(&path)?;
        AppTable::parse(&raw).map_err(|source| StoreError::Json { path, source })
    }

    pub fn write_consolidated(
        &self,
        variables: &VariablesRecord,
        table: &AppTable,
    ) -> Result<(), StoreError> {
        let path = self.consolidated_path(variables)?;
        let json = table.to_pretty_json().map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write_file(&path, json.as_bytes())
    }

    /// Reads the text config, creating it with defaults when it does not exist yet.
    pub fn load_config_text(&self, variables: &VariablesRecord) -> Result<ConfigText, StoreError> {
        let path = self.config_path(variables)?;
        match self.read_file(&path) {
            Ok(text) => Ok(ConfigText::parse(&text)),
            Err(err) if err.is_not_found() => {
                let defaults = ConfigText::with_defaults();
                self.write_file(&path, defaults.render().as_bytes())?;
                tracing::info!(path = ?path, "created default config file");
                Ok(defaults)
            }
            Err(err) => Err(err),
        }
    }

    pub fn save_config_text(
        &self,
        variables: &VariablesRecord,
        config: &ConfigText,
    ) -> Result<(), StoreError> {
        let path = self.config_path(variables)?;
        self.write_file(&path, config.render().as_bytes())
    }

    /// Registered category files that do not exist on disk.
    pub fn missing_categories(&self, variables: &VariablesRecord) -> Vec<String> {
        variables
            .xldb_files
            .iter()
            .filter(|file| {
                self.category_path(variables, file)
                    .map(|path| !path.is_file())
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }

    /// Loads the variables record, or lays out a fresh installation when there is none.
    ///
    /// A fresh root gets the variables file (`firstRun = 1`), the category directory, an
    /// empty favourites file, the default text config and an empty consolidated file.
    pub fn load_or_init(&self) -> Result<VariablesRecord, StoreError> {
        match self.load_variables() {
            Ok(loaded) => return Ok(loaded.value),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let variables = VariablesRecord::fresh();
        debug_assert_eq!(variables.first_run, FirstRun::FreshInstall);
        self.save_variables(&variables)?;
        let xldb = self.category_dir(&variables)?;
        let relative = to_relative_path(&self.root, &xldb, "directories.xldb")?;
        create_dir_all_safe(&self.root, &relative)?;
        self.save_favourites(&variables, &FavouritesRecord::new())?;
        self.save_config_text(&variables, &ConfigText::with_defaults())?;
        self.write_consolidated(&variables, &AppTable::new())?;
        tracing::info!(root = ?self.root, "initialized app root");
        Ok(variables)
    }
}

include!("app_folder/helpers.rs");

#[cfg(test)]
mod tests;
