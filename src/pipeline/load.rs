// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{display_name_of, AppTable, Session};
use crate::store::{AppFolder, KvStore, StoreError};
use crate::update::{UpdateClient, UpdateStatus};

use super::progress::{Progress, StatusLine, StepCounter};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Client for the startup update check; `None` skips the check.
    pub update_client: Option<UpdateClient>,
    /// Resume unsaved edits: a category already staged in the key-value store keeps its
    /// staged text instead of being replaced by the disk copy.
    pub keep_staged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub lines: Vec<StatusLine>,
    pub update: Option<UpdateStatus>,
    /// The variables or favourites file was migrated and written back.
    pub migrated: bool,
    pub categories_loaded: usize,
    pub categories_failed: Vec<String>,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Ready { session: Session, report: LoadReport },
    /// `firstRun` is 1 or 2: only the variables file was read.
    NeedsSetup { session: Session, report: LoadReport },
}

impl LoadOutcome {
    pub fn session(&self) -> &Session {
        match self {
            Self::Ready { session, .. } | Self::NeedsSetup { session, .. } => session,
        }
    }

    pub fn report(&self) -> &LoadReport {
        match self {
            Self::Ready { report, .. } | Self::NeedsSetup { report, .. } => report,
        }
    }

    pub fn needs_setup(&self) -> bool {
        matches!(self, Self::NeedsSetup { .. })
    }

    pub fn into_session(self) -> Session {
        match self {
            Self::Ready { session, .. } | Self::NeedsSetup { session, .. } => session,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot load the variables file: {0}")]
    Variables(#[source] StoreError),
}

/// Startup load.
///
/// Only the variables file is fatal. Every later step logs its failure, records a status
/// line and moves on. The staging buffer starts from whatever `kv` holds, and categories
/// that cannot be read keep that prior staged copy.
pub async fn load_session(
    folder: &AppFolder,
    kv: &KvStore,
    options: &LoadOptions,
    progress: &dyn Progress,
) -> Result<LoadOutcome, LoadError> {
    let mut report = LoadReport::default();
    let mut counter = StepCounter::new(1);

    // Init.
    let loaded = folder.load_variables().map_err(LoadError::Variables)?;
    if loaded.changed {
        report.migrated = true;
        match folder.save_variables(&loaded.value) {
            Ok(()) => tracing::info!("variables file migrated"),
            Err(err) => tracing::warn!(error = %err, "cannot write migrated variables file"),
        }
    }
    let mut session = Session::new(loaded.value);
    session.set_staging(kv.load_staging());
    counter.advance(progress, "variables");

    if session.needs_setup() {
        tracing::info!(first_run = ?session.variables().first_run, "setup required");
        progress.finish();
        return Ok(LoadOutcome::NeedsSetup { session, report });
    }

    let check_update = session.variables().config_opts.updates.auto_check;
    let files = session.variables().xldb_files.clone();
    counter.extend_total(1 + usize::from(check_update) + 1 + files.len() + 2);

    // CheckUpdate.
    if check_update {
        if let Some(client) = &options.update_client {
            let status = client.check(session.variables()).await;
            if !matches!(status, UpdateStatus::UpToDate { .. }) {
                push_line(&mut report, progress, StatusLine::Note(status.to_string()));
            }
            report.update = Some(status);
        }
        counter.advance(progress, "update check");
    }

    // LoadConsolidated.
    let main_file = session.variables().main_xlfc.clone();
    match folder.read_consolidated(session.variables()) {
        Ok(raw) => match AppTable::parse(&raw) {
            Ok(table) => {
                session.set_consolidated(table);
                session.staging_mut().set_consolidated(raw);
            }
            Err(err) => {
                tracing::warn!(file = %main_file, error = %err, "consolidated file is not valid");
                push_line(&mut report, progress, StatusLine::Failed(main_file.clone()));
                fall_back_to_staged_consolidated(&mut session);
            }
        },
        Err(err) => {
            tracing::warn!(file = %main_file, error = %err, "cannot read consolidated file");
            push_line(&mut report, progress, StatusLine::Failed(main_file.clone()));
            fall_back_to_staged_consolidated(&mut session);
        }
    }
    counter.advance(progress, "launch list");

    // LoadCategories.
    let mut preloaded = BTreeMap::new();
    for file in &files {
        let outcome = folder
            .read_category(session.variables(), file)
            .and_then(|raw| match AppTable::parse(&raw) {
                Ok(_) => Ok(raw),
                Err(source) => Err(StoreError::Json {
                    path: file.into(),
                    source,
                }),
            });
        match outcome {
            Ok(raw) => {
                if options.keep_staged && session.staging().contains(file) {
                    tracing::debug!(file = %file, "keeping unsaved staged copy");
                } else {
                    session.staging_mut().set(file.clone(), raw.clone());
                }
                preloaded.insert(file.clone(), raw);
                report.categories_loaded += 1;
            }
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping category");
                report.categories_failed.push(file.clone());
                push_line(
                    &mut report,
                    progress,
                    StatusLine::Failed(display_name_of(file).to_owned()),
                );
            }
        }
        counter.advance(progress, display_name_of(file));
    }

    // LoadConfigText.
    match folder.load_config_text(session.variables()) {
        Ok(config) => session.set_config_text(config),
        Err(err) => {
            tracing::warn!(error = %err, "cannot read text config, using defaults");
            push_line(
                &mut report,
                progress,
                StatusLine::Failed(session.variables().config.clone()),
            );
        }
    }
    counter.advance(progress, "config");

    // LoadFavorites.
    match folder.load_favourites(session.variables()) {
        Ok(loaded) => {
            if loaded.changed {
                report.migrated = true;
                if let Err(err) = folder.save_favourites(session.variables(), &loaded.value) {
                    tracing::warn!(error = %err, "cannot write migrated favourites file");
                }
            }
            session.set_favourites(loaded.value);
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot read favourites, starting empty");
            push_line(
                &mut report,
                progress,
                StatusLine::Failed("favourites".to_owned()),
            );
        }
    }
    counter.advance(progress, "favourites");

    // Done.
    for (file, raw) in &preloaded {
        session.staging_mut().set_if_absent(file, raw);
    }
    let stale = session.staging_mut().retain_files(&files);
    if !stale.is_empty() {
        tracing::debug!(files = ?stale, "dropped staged copies of unregistered categories");
    }
    progress.finish();

    tracing::info!(
        categories = report.categories_loaded,
        failed = report.categories_failed.len(),
        apps = session.consolidated().len(),
        "session loaded"
    );
    Ok(LoadOutcome::Ready { session, report })
}

fn push_line(report: &mut LoadReport, progress: &dyn Progress, line: StatusLine) {
    progress.line(&line);
    report.lines.push(line);
}

fn fall_back_to_staged_consolidated(session: &mut Session) {
    let staged = session
        .staging()
        .consolidated()
        .and_then(|raw| AppTable::parse(raw).ok());
    if let Some(table) = staged {
        tracing::debug!("using staged copy of the consolidated file");
        session.set_consolidated(table);
    }
}
