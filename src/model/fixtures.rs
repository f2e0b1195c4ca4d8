// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canned records shared by unit tests, integration tests and benches.

use serde_json::{json, Value};

use super::category::AppTable;

/// Current-shape variables JSON with `firstRun = 0` and the given category files.
pub fn variables_json(xldb_files: &[&str]) -> Value {
    json!({
        "version": "1.4.2",
        "firstRun": 0,
        "config": "xlaunch.cfg",
        "logfile": "xlaunch.log",
        "mainXLFC": "xlauncher.xlfc",
        "uurl": "",
        "favourite": "\u{2605}",
        "currentTheme": "default",
        "directories": {
            "utils": "utils",
            "xldb": "xldb",
            "themes": "themes",
            "loadScripts": "scripts"
        },
        "rows": { "main": 20, "edit": 10 },
        "xldbFiles": xldb_files,
        "loadScripts": [],
        "configOpts": {
            "tray": { "show": true, "minimizeTo": true, "closeTo": false },
            "triggercmd": {
                "overwriteFile": "keep",
                "addCommands": "favourited",
                "autoGenerate": false,
                "inPath": false
            },
            "updates": {
                "autoCheck": false,
                "periodic": { "enable": false, "interval": 24 }
            }
        }
    })
}

/// Legacy variables JSON: no option groups yet, the flat flags sit inside `configOpts`.
pub fn legacy_variables_json(xldb_files: &[&str]) -> Value {
    let mut value = variables_json(xldb_files);
    value["configOpts"] = json!({
        "tcuo": "overwrite",
        "tcao": "all",
        "tcag": "on",
        "inPath": true,
        "aupd": "on"
    });
    value
}

pub fn app_table(pairs: &[(&str, &str)]) -> AppTable {
    let mut table = AppTable::new();
    for (name, command) in pairs {
        table.insert(*name, *command);
    }
    table
}

/// `count` apps named `App 0000`, `App 0001`, ... with distinct commands.
pub fn numbered_apps(prefix: &str, count: usize) -> AppTable {
    let mut table = AppTable::new();
    for index in 0..count {
        table.insert(
            format!("{prefix} {index:04}"),
            format!("/usr/bin/{}-{index}", prefix.to_lowercase()),
        );
    }
    table
}
