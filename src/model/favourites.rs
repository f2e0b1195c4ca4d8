// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::migrate::{self, Migrated};

/// Upper bound of the recently-launched list.
pub const RECENT_LIMIT: usize = 5;

/// Starred apps and recently launched apps (`xldbf`), both by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FavouritesRecord {
    favourites: Vec<String>,
    recent: Vec<String>,
}

impl FavouritesRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank input is an empty record; anything else runs through the favourites migration.
    pub fn load_and_migrate(raw: &str) -> Result<Migrated<Self>, serde_json::Error> {
        let value = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw)?
        };
        let migrated = migrate::migrate_favourites(value);
        let record = serde_json::from_value(migrated.value)?;
        Ok(Migrated {
            value: record,
            changed: migrated.changed,
        })
    }

    pub fn favourites(&self) -> &[String] {
        &self.favourites
    }

    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    pub fn is_favourite(&self, name: &str) -> bool {
        self.favourites.iter().any(|f| f == name)
    }

    /// Flips the starred state of `name` and returns the new state.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(index) = self.favourites.iter().position(|f| f == name) {
            self.favourites.remove(index);
            false
        } else {
            self.favourites.push(name.to_owned());
            true
        }
    }

    pub fn push_recent(&mut self, name: &str) {
        self.recent.retain(|r| r != name);
        self.recent.insert(0, name.to_owned());
        self.recent.truncate(RECENT_LIMIT);
    }

    /// Drops every trace of an app that no longer exists.
    pub fn forget(&mut self, name: &str) -> bool {
        let before = self.favourites.len() + self.recent.len();
        self.favourites.retain(|f| f != name);
        self.recent.retain(|r| r != name);
        before != self.favourites.len() + self.recent.len()
    }

    /// Carries favourite and recent entries over to a renamed app, keeping positions.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        for list in [&mut self.favourites, &mut self.recent] {
            let had_target = list.iter().any(|entry| entry == to);
            if let Some(index) = list.iter().position(|entry| entry == from) {
                if had_target {
                    list.remove(index);
                } else {
                    list[index] = to.to_owned();
                }
            }
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}
