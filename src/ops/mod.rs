// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog edits applied to a session.
//!
//! Row-level edits only touch the staging buffer; category add/rename/remove also produce
//! file actions that the caller runs right away. A batch of ops is all-or-nothing: on the
//! first error the session is left untouched.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{
    AppName, AppTable, CategoryName, FavouritesRecord, NameError, Session, StagingBuffer,
    VariablesRecord,
};
use crate::store::{AppFolder, KvStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOp {
    AddCategory {
        name: String,
    },
    RenameCategory {
        from: String,
        to: String,
    },
    RemoveCategory {
        name: String,
    },
    AddApp {
        category: String,
        name: String,
        command: String,
    },
    EditApp {
        category: String,
        from: String,
        name: String,
        command: String,
    },
    RemoveApp {
        category: String,
        name: String,
    },
    ToggleFavourite {
        name: String,
    },
}

/// File work an op needs done immediately, outside the save pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    WriteCategory { file: String, contents: String },
    RenameCategory { from: String, to: String },
    RemoveCategory { file: String },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryRef {
    Category(String),
    App { category: String, name: String },
    Favourite(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<EntryRef>,
    pub removed: Vec<EntryRef>,
    pub updated: Vec<EntryRef>,
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<EntryRef>,
    removed: BTreeSet<EntryRef>,
    updated: BTreeSet<EntryRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, entry: EntryRef) {
        self.removed.remove(&entry);
        self.updated.remove(&entry);
        self.added.insert(entry);
    }

    fn record_removed(&mut self, entry: EntryRef) {
        let was_added = self.added.remove(&entry);
        self.updated.remove(&entry);
        if !was_added {
            self.removed.insert(entry);
        }
    }

    fn record_updated(&mut self, entry: EntryRef) {
        if self.added.contains(&entry) || self.removed.contains(&entry) {
            return;
        }
        self.updated.insert(entry);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub actions: Vec<FileAction>,
    pub delta: Delta,
    /// Starred state after the last `ToggleFavourite` in the batch.
    pub starred: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Category,
    App,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("invalid {kind:?} name {value:?}: {source}")]
    InvalidName {
        kind: ObjectKind,
        value: String,
        source: NameError,
    },
    #[error("command for {name:?} must not be empty")]
    EmptyCommand { name: String },
    #[error("{kind:?} {name:?} already exists")]
    AlreadyExists { kind: ObjectKind, name: String },
    #[error("{kind:?} {name:?} not found")]
    NotFound { kind: ObjectKind, name: String },
    #[error("staged content of {file:?} is not a valid category: {reason}")]
    CorruptCategory { file: String, reason: String },
}

/// Applies `ops` in order to the session's variables, favourites and staging buffer.
pub fn apply_ops(session: &mut Session, ops: &[CatalogOp]) -> Result<ApplyResult, ApplyError> {
    let mut result = ApplyResult {
        applied: 0,
        actions: Vec::new(),
        delta: Delta::default(),
        starred: None,
    };
    if ops.is_empty() {
        return Ok(result);
    }

    let mut draft = Draft {
        variables: session.variables().clone(),
        favourites: session.favourites().clone(),
        staging: session.staging().clone(),
        consolidated: session.consolidated(),
    };
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut draft, op, &mut result, &mut delta)?;
        result.applied += 1;
    }

    let Draft {
        variables,
        favourites,
        staging,
        ..
    } = draft;
    *session.variables_mut() = variables;
    session.set_favourites(favourites);
    session.set_staging(staging);

    result.delta = delta.finish();
    Ok(result)
}

/// Runs the immediate file actions of an applied batch. Failures are logged and returned,
/// never fatal: the staged state stays authoritative until the next save.
pub fn run_file_actions(
    folder: &AppFolder,
    variables: &VariablesRecord,
    actions: &[FileAction],
) -> Vec<(FileAction, StoreError)> {
    let mut failures = Vec::new();
    for action in actions {
        let outcome = match action {
            FileAction::WriteCategory { file, contents } => {
                folder.write_category(variables, file, contents)
            }
            FileAction::RenameCategory { from, to } => folder.rename_category(variables, from, to),
            FileAction::RemoveCategory { file } => folder.remove_category(variables, file),
        };
        match outcome {
            Ok(()) => tracing::debug!(action = ?action, "file action done"),
            Err(err) => {
                tracing::warn!(action = ?action, error = %err, "file action failed");
                failures.push((action.clone(), err));
            }
        }
    }
    failures
}

/// Applies `ops`, runs their file actions and persists the staging buffer to `kv`.
pub fn apply_and_persist(
    folder: &AppFolder,
    kv: &mut KvStore,
    session: &mut Session,
    ops: &[CatalogOp],
) -> Result<ApplyResult, ApplyError> {
    let result = apply_ops(session, ops)?;
    run_file_actions(folder, session.variables(), &result.actions);
    kv.save_staging(session.staging());
    if let Err(err) = kv.flush() {
        tracing::warn!(error = %err, "cannot persist staged edits");
    }
    Ok(result)
}

struct Draft<'a> {
    variables: VariablesRecord,
    favourites: FavouritesRecord,
    staging: StagingBuffer,
    consolidated: &'a AppTable,
}

// Per-op implementation.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
