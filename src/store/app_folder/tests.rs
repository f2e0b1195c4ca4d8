// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use serde_json::json;

use super::{AppFolder, StoreError, WriteDurability};
use crate::model::fixtures::{app_table, legacy_variables_json, variables_json};
use crate::model::{ConfigText, FavouritesRecord, FirstRun, VariablesRecord};

struct AppFolderTestCtx {
    _tmp: tempfile::TempDir,
    root: std::path::PathBuf,
    folder: AppFolder,
}

impl AppFolderTestCtx {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("launcher");
        std::fs::create_dir_all(&root).unwrap();
        let folder = AppFolder::new(&root);
        Self {
            _tmp: tmp,
            root,
            folder,
        }
    }

    fn write_variables(&self, value: &serde_json::Value) {
        std::fs::create_dir_all(self.root.join("utils")).unwrap();
        std::fs::write(self.root.join("utils/xldbv.json"), value.to_string()).unwrap();
    }
}

#[fixture]
fn ctx() -> AppFolderTestCtx {
    AppFolderTestCtx::new()
}

#[rstest]
fn paths_follow_the_variables_layout(ctx: AppFolderTestCtx) {
    let variables = VariablesRecord::fresh();
    let folder = &ctx.folder;

    assert_eq!(folder.variables_path(), ctx.root.join("utils/xldbv.json"));
    assert_eq!(
        folder.favourites_path(&variables).unwrap(),
        ctx.root.join("utils/xldbf.json")
    );
    assert_eq!(
        folder.consolidated_path(&variables).unwrap(),
        ctx.root.join("utils/xlauncher.xlfc")
    );
    assert_eq!(
        folder.config_path(&variables).unwrap(),
        ctx.root.join("utils/xlaunch.cfg")
    );
    assert_eq!(
        folder.category_path(&variables, "Games.xlfc").unwrap(),
        ctx.root.join("xldb/Games.xlfc")
    );
}

#[rstest]
fn category_path_rejects_traversal(ctx: AppFolderTestCtx) {
    let variables = VariablesRecord::fresh();
    let err = ctx
        .folder
        .category_path(&variables, "../escape.xlfc")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRelativePath { .. }), "{err:?}");
}

#[rstest]
fn write_outside_root_is_refused(ctx: AppFolderTestCtx) {
    let outside = ctx.root.parent().unwrap().join("outside.json");
    let err = ctx.folder.write_file(&outside, b"{}").unwrap_err();
    assert!(matches!(err, StoreError::PathOutsideRoot { .. }), "{err:?}");
    assert!(!outside.exists());
}

#[rstest]
fn load_variables_migrates_legacy_shape(ctx: AppFolderTestCtx) {
    ctx.write_variables(&legacy_variables_json(&[]));
    let loaded = ctx.folder.load_variables().unwrap();
    assert!(loaded.changed);
    assert!(loaded.value.config_opts.triggercmd.auto_generate);
}

#[rstest]
fn load_variables_reports_validation_failures(ctx: AppFolderTestCtx) {
    let mut value = variables_json(&[]);
    value["firstRun"] = json!(7);
    ctx.write_variables(&value);
    let err = ctx.folder.load_variables().unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }), "{err:?}");
}

#[rstest]
fn save_variables_refuses_invalid_records(ctx: AppFolderTestCtx) {
    let mut variables = VariablesRecord::fresh();
    variables.directories.utils = "../elsewhere".to_owned();
    let err = ctx.folder.save_variables(&variables).unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
    assert!(!ctx.folder.variables_path().exists());
}

#[rstest]
fn variables_round_trip_as_pretty_json(ctx: AppFolderTestCtx) {
    let mut variables = VariablesRecord::fresh();
    variables.xldb_files.push("Games.xlfc".to_owned());
    ctx.folder.save_variables(&variables).unwrap();

    let text = std::fs::read_to_string(ctx.folder.variables_path()).unwrap();
    assert!(text.starts_with("{\n  \"version\": \"1.0.0\""));
    assert!(text.ends_with("}\n"));
    assert_eq!(ctx.folder.load_variables().unwrap().value, variables);
}

#[rstest]
fn missing_favourites_file_is_empty(ctx: AppFolderTestCtx) {
    let loaded = ctx.folder.load_favourites(&VariablesRecord::fresh()).unwrap();
    assert_eq!(loaded.value, FavouritesRecord::new());
}

#[rstest]
fn write_category_pretty_prints_and_passes_raw_text_through(ctx: AppFolderTestCtx) {
    let variables = VariablesRecord::fresh();
    ctx.folder
        .write_category(&variables, "A.xlfc", r#"{"app":"cmd"}"#)
        .unwrap();
    ctx.folder
        .write_category(&variables, "B.xlfc", "not json")
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(ctx.root.join("xldb/A.xlfc")).unwrap(),
        "{\n  \"app\": \"cmd\"\n}\n"
    );
    assert_eq!(
        std::fs::read_to_string(ctx.root.join("xldb/B.xlfc")).unwrap(),
        "not json"
    );
    assert_eq!(
        ctx.folder.load_category(&variables, "A.xlfc").unwrap(),
        app_table(&[("app", "cmd")])
    );
}

#[rstest]
fn rename_and_remove_category_files(ctx: AppFolderTestCtx) {
    let variables = VariablesRecord::fresh();
    ctx.folder
        .write_category(&variables, "C1.xlfc", r#"{"app":"cmd"}"#)
        .unwrap();
    ctx.folder
        .rename_category(&variables, "C1.xlfc", "C2.xlfc")
        .unwrap();
    assert!(!ctx.root.join("xldb/C1.xlfc").exists());
    assert!(ctx.root.join("xldb/C2.xlfc").is_file());

    ctx.folder.remove_category(&variables, "C2.xlfc").unwrap();
    assert!(!ctx.root.join("xldb/C2.xlfc").exists());
    ctx.folder.remove_category(&variables, "C2.xlfc").unwrap();
}

#[rstest]
fn list_directory_is_sorted_and_skips_directories(ctx: AppFolderTestCtx) {
    let dir = ctx.root.join("xldb");
    std::fs::create_dir_all(dir.join("nested")).unwrap();
    std::fs::write(dir.join("b.xlfc"), "{}").unwrap();
    std::fs::write(dir.join("a.xlfc"), "{}").unwrap();
    std::fs::write(dir.join(".launchdeck.tmp.a.xlfc.1"), "{}").unwrap();

    let names = ctx.folder.list_directory(&dir).unwrap();
    assert_eq!(names, ["a.xlfc", "b.xlfc"]);
}

#[rstest]
fn config_text_is_created_with_defaults(ctx: AppFolderTestCtx) {
    let variables = VariablesRecord::fresh();
    let config = ctx.folder.load_config_text(&variables).unwrap();
    assert_eq!(config, ConfigText::with_defaults());

    let on_disk = std::fs::read_to_string(ctx.root.join("utils/xlaunch.cfg")).unwrap();
    assert!(on_disk.starts_with("maxLogEntries=1001\n"));
    assert!(on_disk.ends_with("messagePrefix='Launching:'"));
}

#[rstest]
fn load_or_init_lays_out_a_fresh_root(ctx: AppFolderTestCtx) {
    let variables = ctx.folder.load_or_init().unwrap();
    assert_eq!(variables.first_run, FirstRun::FreshInstall);
    assert!(ctx.root.join("utils/xldbv.json").is_file());
    assert!(ctx.root.join("utils/xldbf.json").is_file());
    assert!(ctx.root.join("utils/xlaunch.cfg").is_file());
    assert!(ctx.root.join("utils/xlauncher.xlfc").is_file());
    assert!(ctx.root.join("xldb").is_dir());

    let again = ctx.folder.load_or_init().unwrap();
    assert_eq!(again, variables);
}

#[rstest]
fn missing_categories_are_reported(ctx: AppFolderTestCtx) {
    let mut variables = VariablesRecord::fresh();
    variables.xldb_files = vec!["A.xlfc".to_owned(), "B.xlfc".to_owned()];
    ctx.folder
        .write_category(&variables, "A.xlfc", "{}")
        .unwrap();
    assert_eq!(ctx.folder.missing_categories(&variables), ["B.xlfc"]);
}

#[rstest]
fn durable_writes_land_on_disk(ctx: AppFolderTestCtx) {
    let folder = AppFolder::new(&ctx.root).with_durability(WriteDurability::Durable);
    let variables = VariablesRecord::fresh();
    folder
        .write_consolidated(&variables, &app_table(&[("a", "1")]))
        .unwrap();
    assert_eq!(
        folder.load_consolidated(&variables).unwrap(),
        app_table(&[("a", "1")])
    );
}

#[cfg(unix)]
#[rstest]
fn writes_refuse_symlinked_directories(ctx: AppFolderTestCtx) {
    use std::os::unix::fs::symlink;

    let outside = ctx.root.parent().unwrap().join("outside");
    std::fs::create_dir_all(&outside).unwrap();
    symlink(&outside, ctx.root.join("xldb")).unwrap();

    let err = ctx
        .folder
        .write_category(&VariablesRecord::fresh(), "A.xlfc", "{}")
        .unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }), "{err:?}");
    assert!(!outside.join("A.xlfc").exists());
}
