// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use thiserror::Error;

use crate::model::{
    display_name_of, AppTable, FirstRun, Session, ValidationError, VariablesRecord,
};
use crate::store::{stitch, AppFolder, KvStore, StitchSummary, StoreError, VARIABLES_FILE};
use crate::triggercmd::TriggerCmdExporter;

use super::progress::{Progress, StatusLine, StepCounter};
use super::ActiveFlag;

pub const DEFAULT_RESCAN_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Pause after every step; purely cosmetic pacing for progress displays.
    pub step_delay: Duration,
    /// Wait before the single re-scan of an empty consolidation pass.
    pub rescan_delay: Duration,
    /// Export target used when `configOpts.triggercmd.autoGenerate` is on; `None` skips it.
    pub export: Option<TriggerCmdExporter>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            step_delay: Duration::ZERO,
            rescan_delay: DEFAULT_RESCAN_DELAY,
            export: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub lines: Vec<StatusLine>,
    /// Category files with staged content.
    pub attempted: usize,
    pub written: usize,
    /// Present when consolidation wrote the launch file.
    pub stitch: Option<StitchSummary>,
    /// `None` when the export did not run.
    pub exported: Option<bool>,
    pub setup_completed: bool,
    /// The active flag was cleared from outside before the run finished.
    pub cancelled: bool,
}

impl SaveReport {
    pub fn failures(&self) -> usize {
        self.lines.iter().filter(|line| line.is_failure()).count()
    }

    pub fn stitched(&self) -> bool {
        self.stitch.is_some()
    }

    fn push(&mut self, progress: &dyn Progress, line: StatusLine) {
        progress.line(&line);
        self.lines.push(line);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Completed(SaveReport),
    /// Another save holds the active flag; nothing was done.
    AlreadyActive,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("refusing to save an invalid variables record: {0}")]
    InvalidVariables(#[source] ValidationError),
}

/// The save/reload/stitch cycle.
///
/// Every step runs to completion before the next starts. Once started the run never
/// fails: each step records its failure as a status line and the cycle moves on. The only
/// refusal happens up front, when the variables record does not validate.
#[derive(Debug, Clone)]
pub struct SavePipeline {
    folder: AppFolder,
    options: SaveOptions,
    active: ActiveFlag,
}

impl SavePipeline {
    pub fn new(folder: AppFolder, options: SaveOptions) -> Self {
        Self {
            folder,
            options,
            active: ActiveFlag::new(),
        }
    }

    pub fn folder(&self) -> &AppFolder {
        &self.folder
    }

    pub fn options(&self) -> &SaveOptions {
        &self.options
    }

    /// Handle to the running flag; clearing it cancels the run at its next step.
    pub fn active_flag(&self) -> ActiveFlag {
        self.active.clone()
    }

    pub async fn run(
        &self,
        session: &mut Session,
        kv: &mut KvStore,
        progress: &dyn Progress,
    ) -> Result<SaveOutcome, SaveError> {
        session
            .variables()
            .validate()
            .map_err(SaveError::InvalidVariables)?;
        if !self.active.try_begin() {
            tracing::debug!("save already running, request ignored");
            return Ok(SaveOutcome::AlreadyActive);
        }

        let report = self.run_steps(session, progress).await;

        // Idle.
        kv.save_staging(session.staging());
        if let Err(err) = kv.flush() {
            tracing::warn!(error = %err, "cannot persist the staging buffer");
        }
        self.active.finish();
        progress.finish();

        tracing::info!(
            attempted = report.attempted,
            written = report.written,
            stitched = report.stitched(),
            failures = report.failures(),
            cancelled = report.cancelled,
            "save finished"
        );
        Ok(SaveOutcome::Completed(report))
    }

    async fn run_steps(&self, session: &mut Session, progress: &dyn Progress) -> SaveReport {
        let mut report = SaveReport::default();
        let entry_first_run = session.variables().first_run;
        let variables = session.variables().clone();
        let files = variables.xldb_files.clone();
        let export = variables.config_opts.triggercmd.auto_generate;
        let mut counter = StepCounter::new(2 + files.len() + 2 + usize::from(export));

        // Favourites.
        if !self.proceed(&mut report) {
            return report;
        }
        if let Err(err) = self.folder.save_favourites(&variables, session.favourites()) {
            tracing::warn!(error = %err, "cannot write favourites");
            report.push(progress, StatusLine::Failed("favourites".to_owned()));
        }
        self.step_done(&mut counter, progress, "favourites").await;

        // Variables, so that consolidation sees the current category list.
        if !self.proceed(&mut report) {
            return report;
        }
        if let Err(err) = self.folder.save_variables(&variables) {
            tracing::warn!(error = %err, "cannot write variables");
            report.push(progress, StatusLine::Failed(VARIABLES_FILE.to_owned()));
        }
        self.step_done(&mut counter, progress, "variables").await;

        // Write phase.
        for file in &files {
            if !self.proceed(&mut report) {
                return report;
            }
            let display = display_name_of(file);
            if let Some(raw) = session.staging().get(file) {
                report.attempted += 1;
                match self.folder.write_category(&variables, file, raw) {
                    Ok(()) => {
                        report.written += 1;
                        report.push(progress, StatusLine::Done(display.to_owned()));
                    }
                    Err(err) => {
                        tracing::warn!(file = %file, error = %err, "cannot write category");
                        report.push(progress, StatusLine::Failed(display.to_owned()));
                    }
                }
            } else {
                tracing::debug!(file = %file, "nothing staged for category");
            }
            self.step_done(&mut counter, progress, display).await;
        }

        // Consolidation.
        if !self.proceed(&mut report) {
            return report;
        }
        match stitch(&self.folder, self.options.rescan_delay).await {
            Ok(summary) => report.stitch = Some(summary),
            Err(err) => {
                tracing::warn!(error = %err, "consolidation failed");
                report.push(progress, StatusLine::Failed(variables.main_xlfc.clone()));
            }
        }
        self.step_done(&mut counter, progress, "consolidation").await;

        // Reload.
        if !self.proceed(&mut report) {
            return report;
        }
        reload(&self.folder, &variables, session, &mut report, progress);
        self.step_done(&mut counter, progress, "reload").await;

        // Export.
        if export {
            if !self.proceed(&mut report) {
                return report;
            }
            match &self.options.export {
                Some(exporter) => match exporter.export(&self.folder, &variables) {
                    Ok(_) => report.exported = Some(true),
                    Err(err) => {
                        tracing::warn!(error = %err, "TRIGGERcmd export failed");
                        report.exported = Some(false);
                        report.push(
                            progress,
                            StatusLine::Failed("TRIGGERcmd commands".to_owned()),
                        );
                    }
                },
                None => tracing::debug!("no export target configured, skipping export"),
            }
            self.step_done(&mut counter, progress, "export").await;
        }

        // First-run completion.
        if entry_first_run == FirstRun::SetupIncomplete && report.stitched() {
            if !self.proceed(&mut report) {
                return report;
            }
            session.variables_mut().first_run = FirstRun::Normal;
            match self.folder.save_variables(session.variables()) {
                Ok(()) => {
                    report.setup_completed = true;
                    tracing::info!("initial setup completed");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "cannot record setup completion");
                    session.variables_mut().first_run = entry_first_run;
                    report.push(progress, StatusLine::Failed(VARIABLES_FILE.to_owned()));
                }
            }
        }

        report
    }

    fn proceed(&self, report: &mut SaveReport) -> bool {
        if self.active.is_active() {
            return true;
        }
        if !report.cancelled {
            tracing::info!("save cancelled, skipping remaining steps");
        }
        report.cancelled = true;
        false
    }

    async fn step_done(&self, counter: &mut StepCounter, progress: &dyn Progress, label: &str) {
        counter.advance(progress, label);
        if !self.options.step_delay.is_zero() {
            tokio::time::sleep(self.options.step_delay).await;
        }
    }
}

/// Replaces staged content with what is on disk now.
///
/// A category that cannot be read back keeps its staged copy; that is a note, not a
/// failure, since the write itself already reported.
fn reload(
    folder: &AppFolder,
    variables: &VariablesRecord,
    session: &mut Session,
    report: &mut SaveReport,
    progress: &dyn Progress,
) {
    for file in &variables.xldb_files {
        match folder.read_category(variables, file) {
            Ok(raw) => session.staging_mut().set(file.clone(), raw),
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "cannot reload category");
                report.push(
                    progress,
                    StatusLine::Note(format!("kept staged copy of {}", display_name_of(file))),
                );
            }
        }
    }

    let consolidated = folder
        .read_consolidated(variables)
        .and_then(|raw| match AppTable::parse(&raw) {
            Ok(table) => Ok((raw, table)),
            Err(source) => Err(StoreError::Json {
                path: variables.main_xlfc.clone().into(),
                source,
            }),
        });
    match consolidated {
        Ok((raw, table)) => {
            session.set_consolidated(table);
            session.staging_mut().set_consolidated(raw);
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot reload the launch list");
            report.push(
                progress,
                StatusLine::Note(format!("kept previous {}", variables.main_xlfc)),
            );
        }
    }
}
