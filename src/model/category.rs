// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value pair a new category is seeded with, so the file is never an empty object.
pub const PLACEHOLDER_KEY: &str = " ";
pub const PLACEHOLDER_COMMAND: &str = " ";

/// Ordered `app name -> command` map, the content of one category file and of the
/// consolidated launch file.
///
/// Insertion order is kept. Re-inserting an existing name updates the command in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppTable {
    entries: IndexMap<String, String>,
}

impl AppTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder() -> Self {
        let mut table = Self::new();
        table.insert(PLACEHOLDER_KEY, PLACEHOLDER_COMMAND);
        table
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, command: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), command.into())
    }

    /// Removes `name`, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Replaces `from` with `to` at the same position.
    pub fn rename(&mut self, from: &str, to: &str, command: impl Into<String>) -> bool {
        let Some(mut index) = self.entries.get_index_of(from) else {
            return false;
        };
        let command = command.into();
        if from == to {
            if let Some((_, slot)) = self.entries.get_index_mut(index) {
                *slot = command;
            }
            return true;
        }

        self.entries.shift_remove_index(index);
        if let Some(existing) = self.entries.get_index_of(to) {
            self.entries.shift_remove_index(existing);
            if existing < index {
                index -= 1;
            }
        }
        self.entries.shift_insert(index, to.to_owned(), command);
        true
    }

    pub fn is_placeholder_only(&self) -> bool {
        self.entries.len() == 1 && self.entries.contains_key(PLACEHOLDER_KEY)
    }

    pub fn strip_placeholder(&mut self) -> bool {
        self.entries.shift_remove(PLACEHOLDER_KEY).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Real apps only; the placeholder pair is skipped.
    pub fn apps(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.iter().filter(|(name, _)| *name != PLACEHOLDER_KEY)
    }

    /// Union with `other`; on a name collision the entry from `other` wins.
    pub fn merge_from(&mut self, other: &AppTable) -> usize {
        let mut collisions = 0;
        for (name, command) in other.iter() {
            if self.insert(name, command).is_some() {
                collisions += 1;
            }
        }
        collisions
    }

    pub fn to_compact_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AppTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, command) in iter {
            table.insert(name, command);
        }
        table
    }
}

/// Pretty-prints staged category text for writing. Text that is not JSON is returned
/// unchanged, so a formatting problem never blocks a save.
pub fn format_for_disk(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(mut pretty) => {
                pretty.push('\n');
                pretty
            }
            Err(_) => raw.to_owned(),
        },
        Err(_) => raw.to_owned(),
    }
}
