// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The variables record (`xldbv`): directory layout, page sizes, category list and options.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::ids::{CategoryName, NameError, CATEGORY_EXT};
use super::version::Version;
use crate::migrate::{self, Migrated};

/// Setup state of the installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FirstRun {
    /// Setup finished; regular startup.
    Normal,
    /// Nothing configured yet.
    FreshInstall,
    /// Setup was started but the first save has not completed.
    SetupIncomplete,
}

impl FirstRun {
    pub fn needs_setup(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("firstRun must be 0, 1 or 2 (got {0})")]
pub struct InvalidFirstRun(pub u8);

impl TryFrom<u8> for FirstRun {
    type Error = InvalidFirstRun;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::FreshInstall),
            2 => Ok(Self::SetupIncomplete),
            other => Err(InvalidFirstRun(other)),
        }
    }
}

impl From<FirstRun> for u8 {
    fn from(value: FirstRun) -> Self {
        match value {
            FirstRun::Normal => 0,
            FirstRun::FreshInstall => 1,
            FirstRun::SetupIncomplete => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariablesRecord {
    #[schemars(with = "String")]
    pub version: Version,
    #[schemars(with = "u8")]
    pub first_run: FirstRun,
    pub config: String,
    pub logfile: String,
    #[serde(rename = "mainXLFC")]
    pub main_xlfc: String,
    pub uurl: String,
    pub favourite: String,
    pub current_theme: String,
    pub directories: Directories,
    pub rows: Rows,
    pub xldb_files: Vec<String>,
    pub load_scripts: Vec<String>,
    pub config_opts: ConfigOpts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Directories {
    pub utils: String,
    pub xldb: String,
    pub themes: String,
    pub load_scripts: String,
}

/// Page sizes of the launch list (`main`) and the category editor (`edit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Rows {
    pub main: NonZeroU32,
    pub edit: NonZeroU32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConfigOpts {
    pub tray: TrayOpts,
    pub triggercmd: TriggerCmdOpts,
    pub updates: UpdatesOpts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrayOpts {
    pub show: bool,
    pub minimize_to: bool,
    pub close_to: bool,
}

impl Default for TrayOpts {
    fn default() -> Self {
        Self {
            show: true,
            minimize_to: true,
            close_to: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteFile {
    /// Keep foreign entries of the export file, replace only our own.
    #[default]
    Keep,
    Overwrite,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AddCommands {
    All,
    #[default]
    Favourited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TriggerCmdOpts {
    pub overwrite_file: OverwriteFile,
    pub add_commands: AddCommands,
    pub auto_generate: bool,
    pub in_path: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatesOpts {
    pub auto_check: bool,
    pub periodic: PeriodicOpts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PeriodicOpts {
    pub enable: bool,
    /// Hours between checks.
    pub interval: NonZeroU32,
}

pub const DEFAULT_PERIODIC_HOURS: u32 = 24;

impl Default for PeriodicOpts {
    fn default() -> Self {
        Self {
            enable: false,
            interval: NonZeroU32::MIN.saturating_add(DEFAULT_PERIODIC_HOURS - 1),
        }
    }
}

impl Default for UpdatesOpts {
    fn default() -> Self {
        Self {
            auto_check: true,
            periodic: PeriodicOpts::default(),
        }
    }
}

impl UpdatesOpts {
    pub fn periodic_interval(&self) -> Option<Duration> {
        self.periodic
            .enable
            .then(|| Duration::from_secs(u64::from(self.periodic.interval.get()) * 3600))
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("variables file is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("variables file does not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("`{field}` must not be empty")]
    EmptyField { field: &'static str },
    #[error("`{field}` must be a plain file name (got {value:?})")]
    InvalidFileName { field: &'static str, value: String },
    #[error("`{field}` must be a relative directory inside the app root (got {value:?})")]
    InvalidDirectory { field: &'static str, value: String },
    #[error("category file {file:?} is not a valid category name: {source}")]
    InvalidCategory {
        file: String,
        #[source]
        source: NameError,
    },
    #[error("category file {file:?} must end in `{CATEGORY_EXT}`")]
    MissingCategoryExtension { file: String },
    #[error("category file {file:?} is listed twice")]
    DuplicateCategory { file: String },
}

impl VariablesRecord {
    /// Record of a brand-new installation.
    pub fn fresh() -> Self {
        let rows = |n: u32| NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN);
        Self {
            version: Version::new(1, 0, 0),
            first_run: FirstRun::FreshInstall,
            config: "xlaunch.cfg".to_owned(),
            logfile: "xlaunch.log".to_owned(),
            main_xlfc: "xlauncher.xlfc".to_owned(),
            uurl: String::new(),
            favourite: "\u{2605}".to_owned(),
            current_theme: "default".to_owned(),
            directories: Directories {
                utils: "utils".to_owned(),
                xldb: "xldb".to_owned(),
                themes: "themes".to_owned(),
                load_scripts: "scripts".to_owned(),
            },
            rows: Rows {
                main: rows(20),
                edit: rows(10),
            },
            xldb_files: Vec::new(),
            load_scripts: Vec::new(),
            config_opts: ConfigOpts {
                tray: TrayOpts::default(),
                triggercmd: TriggerCmdOpts::default(),
                updates: UpdatesOpts::default(),
            },
        }
    }

    /// Parses raw file contents, runs every migration, decodes and validates.
    pub fn load_and_migrate(raw: &str) -> Result<Migrated<Self>, ValidationError> {
        let value: Value = serde_json::from_str(raw).map_err(ValidationError::Syntax)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Migrated<Self>, ValidationError> {
        let migrated = migrate::migrate_variables(value);
        let record: Self =
            serde_json::from_value(migrated.value).map_err(ValidationError::Shape)?;
        record.validate()?;
        Ok(Migrated {
            value: record,
            changed: migrated.changed,
        })
    }

    /// Structural checks that the type system does not already enforce.
    ///
    /// Never repairs anything; migration is the only place that rewrites data.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_file_name("config", &self.config)?;
        check_file_name("logfile", &self.logfile)?;
        check_file_name("mainXLFC", &self.main_xlfc)?;
        if self.favourite.is_empty() {
            return Err(ValidationError::EmptyField { field: "favourite" });
        }

        check_directory("directories.utils", &self.directories.utils)?;
        check_directory("directories.xldb", &self.directories.xldb)?;
        check_directory("directories.themes", &self.directories.themes)?;
        check_directory("directories.loadScripts", &self.directories.load_scripts)?;

        let mut seen = BTreeSet::new();
        for file in &self.xldb_files {
            if !file.ends_with(CATEGORY_EXT) {
                return Err(ValidationError::MissingCategoryExtension { file: file.clone() });
            }
            let name = CategoryName::from_file_name(file).map_err(|source| {
                ValidationError::InvalidCategory {
                    file: file.clone(),
                    source,
                }
            })?;
            if name.file_name() != *file {
                return Err(ValidationError::InvalidCategory {
                    file: file.clone(),
                    source: NameError::Reserved(file.clone()),
                });
            }
            if !seen.insert(file.as_str()) {
                return Err(ValidationError::DuplicateCategory { file: file.clone() });
            }
        }

        for script in &self.load_scripts {
            check_file_name("loadScripts", script)?;
        }

        Ok(())
    }

    pub fn has_category(&self, file: &str) -> bool {
        self.xldb_files.iter().any(|f| f == file)
    }

    /// Appends the file to the category list unless it is already registered.
    pub fn register_category(&mut self, file: &str) -> bool {
        if self.has_category(file) {
            return false;
        }
        self.xldb_files.push(file.to_owned());
        true
    }

    /// Replaces `from` with `to` at the same index. Returns false when `from` is not listed.
    pub fn rename_category(&mut self, from: &str, to: &str) -> bool {
        match self.xldb_files.iter().position(|f| f == from) {
            Some(index) => {
                self.xldb_files[index] = to.to_owned();
                true
            }
            None => false,
        }
    }

    pub fn unregister_category(&mut self, file: &str) -> bool {
        let before = self.xldb_files.len();
        self.xldb_files.retain(|f| f != file);
        self.xldb_files.len() != before
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

fn check_file_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ValidationError::InvalidFileName {
            field,
            value: value.to_owned(),
        });
    }
    Ok(())
}

fn check_directory(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    let invalid = value.starts_with('/')
        || value.starts_with('\\')
        || value.get(1..2) == Some(":")
        || value.split(['/', '\\']).any(|segment| segment == "..");
    if invalid {
        return Err(ValidationError::InvalidDirectory {
            field,
            value: value.to_owned(),
        });
    }
    Ok(())
}
