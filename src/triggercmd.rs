// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Export of the launch list as TRIGGERcmd commands.
//!
//! Every exported app becomes one command record that calls back into the launcher
//! (`xlaunch <name>`). Records we wrote earlier are recognised by their trigger and
//! command prefixes, so a `keep` export replaces exactly those and leaves everything else
//! in the file alone.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    AddCommands, AppTable, FavouritesRecord, OverwriteFile, TriggerCmdOpts, VariablesRecord,
};
use crate::store::app_folder::write_atomic;
use crate::store::{AppFolder, StoreError};

pub const DATA_DIR: &str = ".TRIGGERcmdData";
pub const COMMANDS_FILE: &str = "commands.json";
pub const TRIGGER_PREFIX: &str = "XLauncher:";
pub const COMMAND_PREFIX: &str = "xlaunch";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCommand {
    pub trigger: String,
    pub command: String,
    pub off_command: String,
    pub ground: String,
    pub voice: String,
    pub voice_reply: String,
    /// A string on purpose: the consumer expects `"false"`, not a JSON boolean.
    pub allow_params: String,
}

impl TriggerCommand {
    pub fn for_app(name: &str) -> Self {
        Self {
            trigger: format!("{TRIGGER_PREFIX} {}", title_case(name)),
            command: format!("{COMMAND_PREFIX} {name}"),
            off_command: String::new(),
            ground: "foreground".to_owned(),
            voice: name.to_owned(),
            voice_reply: String::new(),
            allow_params: "false".to_owned(),
        }
    }
}

/// Lower-cases `name`, then upper-cases every word character (`[A-Za-z0-9_]`) that starts
/// a word.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for ch in name.to_lowercase().chars() {
        let word = ch.is_ascii_alphanumeric() || ch == '_';
        if word && !in_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        in_word = word;
    }
    out
}

/// Whether an existing record in the commands file was generated by us.
fn is_own_record(record: &Value) -> bool {
    let starts_with = |key: &str, prefix: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|value| value.starts_with(prefix))
    };
    starts_with("trigger", TRIGGER_PREFIX) && starts_with("command", COMMAND_PREFIX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub target: PathBuf,
    /// Records generated from the launch list.
    pub exported: usize,
    /// Foreign records carried over from the existing file.
    pub kept: usize,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot determine the home directory")]
    NoHomeDir,
    #[error("cannot read the launch list: {0}")]
    Consolidated(#[source] StoreError),
    #[error("cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write the commands file: {0}")]
    Write(#[source] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCmdExporter {
    target: PathBuf,
}

impl TriggerCmdExporter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Exporter for `<home>/.TRIGGERcmdData/commands.json`.
    pub fn for_home() -> Result<Self, ExportError> {
        Self::default_target()
            .map(Self::new)
            .ok_or(ExportError::NoHomeDir)
    }

    pub fn default_target() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DATA_DIR).join(COMMANDS_FILE))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Command records for the launch list, in launch-list order.
    pub fn build_commands(
        consolidated: &AppTable,
        favourites: &FavouritesRecord,
        add: AddCommands,
    ) -> Vec<TriggerCommand> {
        consolidated
            .apps()
            .map(|(name, _)| name)
            .filter(|name| match add {
                AddCommands::All => true,
                AddCommands::Favourited => favourites.is_favourite(name),
            })
            .map(TriggerCommand::for_app)
            .collect()
    }

    /// Final file content: with `keep`, foreign records of `existing` first, then ours.
    ///
    /// An `existing` text that is missing, unparsable or not an array counts as empty.
    pub fn merge(
        existing: Option<&str>,
        commands: &[TriggerCommand],
        overwrite: OverwriteFile,
    ) -> Result<(Vec<Value>, usize), serde_json::Error> {
        let mut records: Vec<Value> = match (overwrite, existing) {
            (OverwriteFile::Keep, Some(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Array(items)) => items.into_iter().filter(|r| !is_own_record(r)).collect(),
                Ok(_) | Err(_) => {
                    tracing::debug!("existing commands file is not a JSON array, replacing it");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };
        let kept = records.len();
        for command in commands {
            records.push(serde_json::to_value(command)?);
        }
        Ok((records, kept))
    }

    /// Regenerates the commands file from the persisted launch list and favourites.
    pub fn export(
        &self,
        folder: &AppFolder,
        variables: &VariablesRecord,
    ) -> Result<ExportSummary, ExportError> {
        let opts: TriggerCmdOpts = variables.config_opts.triggercmd;
        let consolidated = folder
            .load_consolidated(variables)
            .map_err(ExportError::Consolidated)?;
        let favourites = match folder.load_favourites(variables) {
            Ok(loaded) => loaded.value,
            Err(err) => {
                tracing::warn!(error = %err, "cannot read favourites, exporting none as favourited");
                FavouritesRecord::new()
            }
        };

        let commands = Self::build_commands(&consolidated, &favourites, opts.add_commands);
        let existing = match opts.overwrite_file {
            OverwriteFile::Keep => std::fs::read_to_string(&self.target).ok(),
            OverwriteFile::Overwrite => None,
        };
        let encode = |source| ExportError::Encode {
            path: self.target.clone(),
            source,
        };
        let (records, kept) =
            Self::merge(existing.as_deref(), &commands, opts.overwrite_file).map_err(encode)?;
        let mut json = serde_json::to_string_pretty(&records).map_err(encode)?;
        json.push('\n');

        let parent = self.target.parent().unwrap_or_else(|| Path::new("."));
        write_atomic(parent, &self.target, json.as_bytes(), folder.durability())
            .map_err(ExportError::Write)?;

        tracing::info!(
            target = ?self.target,
            exported = commands.len(),
            kept,
            "TRIGGERcmd commands written"
        );
        Ok(ExportSummary {
            target: self.target.clone(),
            exported: commands.len(),
            kept,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{json, Value};

    use super::{title_case, TriggerCmdExporter, TriggerCommand};
    use crate::model::fixtures::app_table;
    use crate::model::{AddCommands, FavouritesRecord, OverwriteFile, PLACEHOLDER_KEY};
    use crate::store::AppFolder;

    #[rstest]
    #[case("half-life 2", "Half-Life 2")]
    #[case("VLC media PLAYER", "Vlc Media Player")]
    #[case("my_app", "My_app")]
    #[case("x.y", "X.Y")]
    fn title_case_capitalizes_word_starts(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(title_case(name), expected);
    }

    #[test]
    fn record_shape_matches_the_commands_file() {
        let value = serde_json::to_value(TriggerCommand::for_app("doom")).unwrap();
        assert_eq!(
            value,
            json!({
                "trigger": "XLauncher: Doom",
                "command": "xlaunch doom",
                "offCommand": "",
                "ground": "foreground",
                "voice": "doom",
                "voiceReply": "",
                "allowParams": "false"
            })
        );
    }

    #[test]
    fn favourited_mode_filters_and_skips_placeholder() {
        let mut table = app_table(&[("Doom", "doom"), ("Vim", "vim")]);
        table.insert(PLACEHOLDER_KEY, " ");
        let mut favourites = FavouritesRecord::new();
        favourites.toggle("Vim");

        let only_favs =
            TriggerCmdExporter::build_commands(&table, &favourites, AddCommands::Favourited);
        assert_eq!(only_favs, [TriggerCommand::for_app("Vim")]);

        let all = TriggerCmdExporter::build_commands(&table, &favourites, AddCommands::All);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn keep_replaces_only_own_records() {
        let existing = json!([
            { "trigger": "Lights on", "command": "lights on" },
            { "trigger": "XLauncher: Old", "command": "xlaunch Old" },
            { "trigger": "XLauncher: Custom", "command": "custom.exe" }
        ])
        .to_string();
        let commands = [TriggerCommand::for_app("New")];

        let (records, kept) =
            TriggerCmdExporter::merge(Some(&existing), &commands, OverwriteFile::Keep).unwrap();
        assert_eq!(kept, 2);
        let triggers: Vec<&str> = records
            .iter()
            .filter_map(|r| r.get("trigger").and_then(Value::as_str))
            .collect();
        assert_eq!(triggers, ["Lights on", "XLauncher: Custom", "XLauncher: New"]);
    }

    #[test]
    fn merge_serializes_every_command() {
        let commands = [TriggerCommand::for_app("Doom"), TriggerCommand::for_app("vim")];
        let (records, kept) =
            TriggerCmdExporter::merge(None, &commands, OverwriteFile::Overwrite).unwrap();
        assert_eq!(kept, 0);
        assert_eq!(records.len(), commands.len());
        assert_eq!(records[1]["trigger"], "XLauncher: Vim");
        assert_eq!(records[1]["command"], "xlaunch vim");
        assert_eq!(records[1]["allowParams"], "false");
    }

    #[rstest]
    #[case(Some("not json"), OverwriteFile::Keep)]
    #[case(Some(r#"{"a":1}"#), OverwriteFile::Keep)]
    #[case(None, OverwriteFile::Keep)]
    #[case(Some(r#"[{"trigger":"Lights on"}]"#), OverwriteFile::Overwrite)]
    fn unusable_or_overwritten_file_yields_new_records_only(
        #[case] existing: Option<&str>,
        #[case] overwrite: OverwriteFile,
    ) {
        let commands = [TriggerCommand::for_app("New")];
        let (records, kept) = TriggerCmdExporter::merge(existing, &commands, overwrite).unwrap();
        assert_eq!(kept, 0);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn export_reads_persisted_files_and_creates_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let folder = AppFolder::new(dir.path().join("app"));
        let mut variables = folder.load_or_init().unwrap();
        variables.config_opts.triggercmd.add_commands = AddCommands::All;
        folder
            .write_consolidated(&variables, &app_table(&[("doom", "doom"), ("vim", "vim")]))
            .unwrap();

        let target = dir.path().join("home/.TRIGGERcmdData/commands.json");
        let summary = TriggerCmdExporter::new(&target)
            .export(&folder, &variables)
            .unwrap();
        assert_eq!(summary.exported, 2);

        let written: Vec<TriggerCommand> =
            serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(
            written,
            [TriggerCommand::for_app("doom"), TriggerCommand::for_app("vim")]
        );
    }
}
