// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::category::AppTable;

/// Raw serialized category contents awaiting the next save, keyed by category file name,
/// plus the raw consolidated file as last read.
///
/// Content is kept as text on purpose: whatever is staged is what the write phase puts on
/// disk, even when it no longer parses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingBuffer {
    categories: BTreeMap<String, String>,
    consolidated: Option<String>,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(categories: BTreeMap<String, String>, consolidated: Option<String>) -> Self {
        Self {
            categories,
            consolidated,
        }
    }

    pub fn get(&self, file: &str) -> Option<&str> {
        self.categories.get(file).map(String::as_str)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.categories.contains_key(file)
    }

    pub fn set(&mut self, file: impl Into<String>, raw: impl Into<String>) {
        self.categories.insert(file.into(), raw.into());
    }

    /// Stages `raw` only when nothing is staged for `file` yet.
    pub fn set_if_absent(&mut self, file: &str, raw: &str) -> bool {
        if self.categories.contains_key(file) {
            return false;
        }
        self.categories.insert(file.to_owned(), raw.to_owned());
        true
    }

    pub fn remove(&mut self, file: &str) -> Option<String> {
        self.categories.remove(file)
    }

    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        match self.categories.remove(from) {
            Some(raw) => {
                self.categories.insert(to.to_owned(), raw);
                true
            }
            None => false,
        }
    }

    /// Parsed staged table; an unstaged category is empty.
    pub fn table(&self, file: &str) -> Result<AppTable, serde_json::Error> {
        match self.get(file) {
            Some(raw) => AppTable::parse(raw),
            None => Ok(AppTable::new()),
        }
    }

    pub fn set_table(&mut self, file: &str, table: &AppTable) -> Result<(), serde_json::Error> {
        let raw = table.to_compact_json()?;
        self.set(file, raw);
        Ok(())
    }

    /// Drops staged entries for files not in `keep`; returns the dropped names.
    pub fn retain_files(&mut self, keep: &[String]) -> Vec<String> {
        let stale: Vec<String> = self
            .categories
            .keys()
            .filter(|file| !keep.contains(file))
            .cloned()
            .collect();
        for file in &stale {
            self.categories.remove(file);
        }
        stale
    }

    pub fn categories(&self) -> &BTreeMap<String, String> {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn consolidated(&self) -> Option<&str> {
        self.consolidated.as_deref()
    }

    pub fn set_consolidated(&mut self, raw: impl Into<String>) {
        self.consolidated = Some(raw.into());
    }
}
