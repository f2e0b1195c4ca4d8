// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use thiserror::Error;

/// Extension of every category file under `directories.xldb`.
pub const CATEGORY_EXT: &str = ".xlfc";

/// Extension written by older releases; still accepted when deriving display names.
pub const LEGACY_CATEGORY_EXT: &str = ".csv";

/// A trimmed, validated name used as a key in the catalog.
///
/// The tag type decides which rules apply beyond "non-empty after trimming". Names keep
/// their inner spacing and case exactly as typed, because they are also the keys of the
/// on-disk JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

pub trait NameRules {
    fn check(value: &str) -> Result<(), NameError>;
}

impl<T: NameRules> Name<T> {
    pub fn new(value: impl AsRef<str>) -> Result<Self, NameError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(NameError::Empty);
        }
        T::check(value)?;
        Ok(Self {
            value: value.to_owned(),
            _marker: PhantomData,
        })
    }
}

impl<T> Name<T> {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Name<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Name<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Name<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T: NameRules> FromStr for Name<T> {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<T: NameRules> TryFrom<String> for Name<T> {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name must not contain a path separator")]
    ContainsSeparator,
    #[error("name must not contain control characters")]
    ControlCharacter,
    #[error("name `{0}` is reserved")]
    Reserved(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AppTag {}
pub type AppName = Name<AppTag>;

impl NameRules for AppTag {
    fn check(value: &str) -> Result<(), NameError> {
        if value.chars().any(char::is_control) {
            return Err(NameError::ControlCharacter);
        }
        Ok(())
    }
}

/// Category names become file names, so they must also be a single safe path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryTag {}
pub type CategoryName = Name<CategoryTag>;

impl NameRules for CategoryTag {
    fn check(value: &str) -> Result<(), NameError> {
        if value.contains(['/', '\\']) {
            return Err(NameError::ContainsSeparator);
        }
        if value.chars().any(char::is_control) {
            return Err(NameError::ControlCharacter);
        }
        if value == "." || value == ".." {
            return Err(NameError::Reserved(value.to_owned()));
        }
        Ok(())
    }
}

impl CategoryName {
    /// File name of the category under `directories.xldb`.
    pub fn file_name(&self) -> String {
        format!("{}{CATEGORY_EXT}", self.value)
    }

    pub fn from_file_name(file: &str) -> Result<Self, NameError> {
        Self::new(display_name_of(file))
    }
}

/// Strips the category extension (current or legacy) from a file name.
pub fn display_name_of(file: &str) -> &str {
    file.strip_suffix(CATEGORY_EXT)
        .or_else(|| file.strip_suffix(LEGACY_CATEGORY_EXT))
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::{display_name_of, AppName, CategoryName, NameError};

    #[test]
    fn names_are_trimmed() {
        let name = AppName::new("  Firefox  ").unwrap();
        assert_eq!(name.as_str(), "Firefox");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(AppName::new("   "), Err(NameError::Empty));
        assert_eq!(CategoryName::new(""), Err(NameError::Empty));
    }

    #[test]
    fn category_rejects_separators_and_dot_segments() {
        assert_eq!(
            CategoryName::new("a/b"),
            Err(NameError::ContainsSeparator)
        );
        assert_eq!(
            CategoryName::new("a\\b"),
            Err(NameError::ContainsSeparator)
        );
        assert_eq!(
            CategoryName::new(".."),
            Err(NameError::Reserved("..".to_owned()))
        );
    }

    #[test]
    fn app_names_may_contain_slashes() {
        assert!(AppName::new("AC/DC player").is_ok());
    }

    #[test]
    fn category_file_name_round_trips() {
        let name = CategoryName::new("Games").unwrap();
        assert_eq!(name.file_name(), "Games.xlfc");
        assert_eq!(CategoryName::from_file_name("Games.xlfc").unwrap(), name);
        assert_eq!(display_name_of("Old.csv"), "Old");
        assert_eq!(display_name_of("plain"), "plain");
    }
}
