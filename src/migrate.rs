// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Schema upgrades for the variables and favourites files.
//!
//! Every migration is a pure `Value -> Value` function that leaves data already in the new
//! shape untouched, so the whole chain runs on every load. New migrations are appended to
//! the end of their list; existing entries are never edited.

use serde_json::{json, Map, Value};

use crate::model::RECENT_LIMIT;

/// Output of a migration chain, with whether anything was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrated<T> {
    pub value: T,
    pub changed: bool,
}

pub type Migration = fn(Value) -> Value;

/// Variables-file migrations, oldest shape first.
pub const VARIABLES_MIGRATIONS: &[(&str, Migration)] = &[("nest-config-opts", nest_config_opts)];

/// Favourites-file migrations, oldest shape first.
pub const FAVOURITES_MIGRATIONS: &[(&str, Migration)] = &[("favourites-lists", favourites_lists)];

pub fn migrate_variables(value: Value) -> Migrated<Value> {
    run_chain(VARIABLES_MIGRATIONS, value)
}

pub fn migrate_favourites(value: Value) -> Migrated<Value> {
    run_chain(FAVOURITES_MIGRATIONS, value)
}

fn run_chain(chain: &[(&str, Migration)], value: Value) -> Migrated<Value> {
    let mut changed = false;
    let mut current = value;
    for (name, migration) in chain {
        let next = migration(current.clone());
        if next != current {
            tracing::debug!(migration = *name, "schema migration applied");
            changed = true;
        }
        current = next;
    }
    Migrated {
        value: current,
        changed,
    }
}

/// Folds the flat legacy flags (`tcuo`, `tcao`, `tcag`, `inPath`, `aupd`) into
/// `configOpts.triggercmd` / `configOpts.updates`, and fills missing option groups with
/// their defaults. The flags live inside `configOpts`; a copy at the top level is honoured
/// when `configOpts` has none.
fn nest_config_opts(value: Value) -> Value {
    let Value::Object(mut root) = value else {
        return value;
    };

    let mut opts = match root.remove("configOpts") {
        Some(Value::Object(opts)) => opts,
        _ => Map::new(),
    };

    let mut take_legacy = |key: &str| {
        let nested = opts.remove(key);
        let flat = root.remove(key);
        nested.or(flat)
    };
    let legacy_overwrite = take_legacy("tcuo");
    let legacy_add = take_legacy("tcao");
    let legacy_generate = take_legacy("tcag");
    let legacy_in_path = take_legacy("inPath");
    let legacy_auto_update = take_legacy("aupd");

    let mut tray = take_object(&mut opts, "tray");
    default_field(&mut tray, "show", json!(true));
    default_field(&mut tray, "minimizeTo", json!(true));
    default_field(&mut tray, "closeTo", json!(false));
    opts.insert("tray".to_owned(), Value::Object(tray));

    let mut triggercmd = take_object(&mut opts, "triggercmd");
    first_truthy(
        &mut triggercmd,
        "overwriteFile",
        legacy_overwrite,
        json!("keep"),
    );
    first_truthy(
        &mut triggercmd,
        "addCommands",
        legacy_add,
        json!("favourited"),
    );
    if !triggercmd.contains_key("autoGenerate") {
        let on = legacy_generate.as_ref().and_then(Value::as_str) == Some("on");
        triggercmd.insert("autoGenerate".to_owned(), json!(on));
    }
    if !triggercmd.contains_key("inPath") {
        let in_path = legacy_in_path.as_ref().is_some_and(is_truthy);
        triggercmd.insert("inPath".to_owned(), json!(in_path));
    }
    opts.insert("triggercmd".to_owned(), Value::Object(triggercmd));

    let mut updates = take_object(&mut opts, "updates");
    if !updates.contains_key("autoCheck") {
        let auto_check = legacy_auto_update.as_ref().and_then(Value::as_str) == Some("on");
        updates.insert("autoCheck".to_owned(), json!(auto_check));
    }
    if !updates.contains_key("periodic") {
        updates.insert(
            "periodic".to_owned(),
            json!({ "enable": false, "interval": crate::model::variables::DEFAULT_PERIODIC_HOURS }),
        );
    }
    opts.insert("updates".to_owned(), Value::Object(updates));

    root.insert("configOpts".to_owned(), Value::Object(opts));
    Value::Object(root)
}

/// Converts the legacy `{name: true}` map into `{favourites: [...], recent: [...]}` and
/// cleans the current shape down to unique string entries.
fn favourites_lists(value: Value) -> Value {
    let Value::Object(mut root) = value else {
        return json!({ "favourites": [], "recent": [] });
    };

    let favourites = match root.remove("favourites") {
        Some(Value::Array(items)) => unique_strings(items, usize::MAX),
        _ => root
            .iter()
            .filter(|(key, flag)| key.as_str() != "recent" && **flag == Value::Bool(true))
            .map(|(key, _)| key.clone())
            .collect(),
    };
    let recent = match root.remove("recent") {
        Some(Value::Array(items)) => unique_strings(items, RECENT_LIMIT),
        _ => Vec::new(),
    };

    json!({ "favourites": favourites, "recent": recent })
}

fn unique_strings(items: Vec<Value>, limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let Value::String(name) = item else {
            continue;
        };
        if out.len() == limit {
            break;
        }
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    }
}

fn default_field(map: &mut Map<String, Value>, key: &str, default: Value) {
    if !map.contains_key(key) {
        map.insert(key.to_owned(), default);
    }
}

/// `existing || legacy || default`, with JavaScript truthiness.
fn first_truthy(map: &mut Map<String, Value>, key: &str, legacy: Option<Value>, default: Value) {
    if map.get(key).is_some_and(is_truthy) {
        return;
    }
    let value = legacy.filter(is_truthy).unwrap_or(default);
    map.insert(key.to_owned(), value);
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::{migrate_favourites, migrate_variables};
    use crate::model::fixtures::{legacy_variables_json, variables_json};
    use crate::model::{AddCommands, OverwriteFile, VariablesRecord};
    use rstest::rstest;
    use serde_json::{json, Value};

    #[test]
    fn legacy_flags_move_into_config_opts() {
        let migrated = migrate_variables(legacy_variables_json(&["A.xlfc"]));
        assert!(migrated.changed);
        let value = migrated.value;
        for legacy in ["tcuo", "tcao", "tcag", "inPath", "aupd"] {
            assert!(value.get(legacy).is_none(), "{legacy} should be removed");
        }
        assert_eq!(
            value["configOpts"]["triggercmd"],
            json!({
                "overwriteFile": "overwrite",
                "addCommands": "all",
                "autoGenerate": true,
                "inPath": true
            })
        );
        for legacy in ["tcuo", "tcao", "tcag", "inPath", "aupd"] {
            assert!(
                value["configOpts"].get(legacy).is_none(),
                "configOpts.{legacy} should be removed"
            );
        }
        assert_eq!(value["configOpts"]["updates"]["autoCheck"], json!(true));
        assert_eq!(
            value["configOpts"]["updates"]["periodic"],
            json!({ "enable": false, "interval": 24 })
        );
        assert_eq!(
            value["configOpts"]["tray"],
            json!({ "show": true, "minimizeTo": true, "closeTo": false })
        );
    }

    #[test]
    fn legacy_record_decodes_after_migration() {
        let loaded = VariablesRecord::from_value(legacy_variables_json(&["A.xlfc"])).unwrap();
        assert!(loaded.changed);
        let opts = loaded.value.config_opts;
        assert_eq!(opts.triggercmd.overwrite_file, OverwriteFile::Overwrite);
        assert_eq!(opts.triggercmd.add_commands, AddCommands::All);
        assert!(opts.triggercmd.auto_generate);
        assert!(opts.triggercmd.in_path);
        assert!(opts.updates.auto_check);
    }

    #[test]
    fn top_level_flags_are_honoured_when_config_opts_has_none() {
        let migrated = migrate_variables(json!({ "tcuo": "overwrite", "aupd": "on" }));
        let value = migrated.value;
        assert!(value.get("tcuo").is_none());
        assert!(value.get("aupd").is_none());
        assert_eq!(
            value["configOpts"]["triggercmd"]["overwriteFile"],
            json!("overwrite")
        );
        assert_eq!(value["configOpts"]["updates"]["autoCheck"], json!(true));
    }

    #[rstest]
    #[case::missing(json!({ "configOpts": {} }))]
    #[case::off(json!({ "configOpts": { "aupd": "off" } }))]
    #[case::bool_true(json!({ "configOpts": { "aupd": true } }))]
    #[case::string_true(json!({ "configOpts": { "aupd": "true" } }))]
    fn auto_check_only_follows_legacy_on(#[case] input: Value) {
        let migrated = migrate_variables(input);
        assert_eq!(
            migrated.value["configOpts"]["updates"]["autoCheck"],
            json!(false)
        );
        assert!(migrated.value["configOpts"].get("aupd").is_none());
    }

    #[test]
    fn current_shape_is_unchanged() {
        let current = variables_json(&["A.xlfc"]);
        let migrated = migrate_variables(current.clone());
        assert!(!migrated.changed);
        assert_eq!(migrated.value, current);
    }

    #[rstest]
    #[case::legacy(legacy_variables_json(&["A.xlfc", "B.xlfc"]))]
    #[case::current(variables_json(&[]))]
    #[case::bare(json!({ "version": "1.0.0" }))]
    #[case::partial_opts(json!({ "configOpts": { "tray": { "show": false } } }))]
    #[case::not_an_object(json!([1, 2, 3]))]
    fn variables_migration_is_idempotent(#[case] input: Value) {
        let once = migrate_variables(input).value;
        let twice = migrate_variables(once.clone());
        assert_eq!(twice.value, once);
        assert!(!twice.changed);
    }

    #[test]
    fn partial_tray_keeps_existing_values() {
        let migrated = migrate_variables(json!({ "configOpts": { "tray": { "show": false } } }));
        assert_eq!(
            migrated.value["configOpts"]["tray"],
            json!({ "show": false, "minimizeTo": true, "closeTo": false })
        );
    }

    #[test]
    fn empty_overwrite_mode_falls_back_to_legacy_then_default() {
        let migrated = migrate_variables(json!({
            "configOpts": { "tcuo": "overwrite", "triggercmd": { "overwriteFile": "" } }
        }));
        assert_eq!(
            migrated.value["configOpts"]["triggercmd"]["overwriteFile"],
            json!("overwrite")
        );
    }

    #[rstest]
    #[case::legacy(json!({ "a": true, "b": false, "c": true }))]
    #[case::current(json!({ "favourites": ["a", 3, "a"], "recent": ["x", null] }))]
    #[case::null(Value::Null)]
    #[case::array(json!(["a"]))]
    fn favourites_migration_is_idempotent(#[case] input: Value) {
        let once = migrate_favourites(input).value;
        let twice = migrate_favourites(once.clone());
        assert_eq!(twice.value, once);
        assert!(!twice.changed);
    }

    #[test]
    fn favourites_are_cleaned_and_recent_capped() {
        let migrated = migrate_favourites(json!({
            "favourites": ["a", 3, "a", "b"],
            "recent": ["1", "2", "3", "4", "5", "6"],
            "extra": true
        }));
        assert_eq!(
            migrated.value,
            json!({
                "favourites": ["a", "b"],
                "recent": ["1", "2", "3", "4", "5"]
            })
        );
    }
}
