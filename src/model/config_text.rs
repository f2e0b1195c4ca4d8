// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

/// Keys of the launch-log config in the order they are written back.
pub const KNOWN_KEYS: [(&str, &str); 8] = [
    ("maxLogEntries", "1001"),
    ("dateFormat", "dd-MM-yy"),
    ("timeFormat", "HH:mm:ss"),
    ("construct", "timeFormat dateFormat"),
    ("leftEncapsule", "["),
    ("rightEncapsule", "]"),
    ("messageSeperator", ">"),
    ("messagePrefix", "Launching:"),
];

const QUOTED_KEYS: [&str; 4] = [
    "leftEncapsule",
    "rightEncapsule",
    "messageSeperator",
    "messagePrefix",
];

/// Flat `key=value` settings of the plain-text config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigText {
    values: BTreeMap<String, String>,
}

impl ConfigText {
    pub fn with_defaults() -> Self {
        Self {
            values: KNOWN_KEYS
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            values.insert(key.to_owned(), unquote(value.trim()).to_owned());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Known keys first in their fixed order (falling back to defaults), then the rest sorted.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.values.len().max(KNOWN_KEYS.len()));
        for (key, default) in KNOWN_KEYS {
            let value = self.get(key).unwrap_or(default);
            if QUOTED_KEYS.contains(&key) {
                lines.push(format!("{key}='{value}'"));
            } else {
                lines.push(format!("{key}={value}"));
            }
        }
        for (key, value) in &self.values {
            if KNOWN_KEYS.iter().any(|(known, _)| known == key) {
                continue;
            }
            lines.push(format!("{key}={value}"));
        }
        lines.join("\n")
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
