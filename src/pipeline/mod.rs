// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Startup load and the save/reload/stitch cycle.
//!
//! Both pipelines run strictly one step after another: no step starts before the previous
//! step's I/O finished, so progress and the cancellation flag stay meaningful and category
//! files are always written in `xldbFiles` order.

pub mod load;
pub mod progress;
pub mod save;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::model::Session;
use crate::store::{AppFolder, StoreError};

pub use load::{load_session, LoadError, LoadOptions, LoadOutcome, LoadReport};
pub use progress::{
    BarProgress, LogProgress, Progress, RecordingProgress, SilentProgress, StatusLine,
};
pub use save::{
    SaveError, SaveOptions, SaveOutcome, SavePipeline, SaveReport, DEFAULT_RESCAN_DELAY,
};

/// Shared "pipeline running" flag.
///
/// Doubles as the guard against a second concurrent save and as a cooperative
/// cancellation point: clearing it from outside makes the running pipeline stop before
/// its next step.
#[derive(Debug, Clone, Default)]
pub struct ActiveFlag(Arc<AtomicBool>);

impl ActiveFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the flag; false when a run is already active.
    pub fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Asks a running pipeline to stop at its next step boundary.
    pub fn cancel(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn finish(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Final write-back on exit: variables and favourites.
///
/// Both are attempted; the first error is returned.
pub fn persist_session(folder: &AppFolder, session: &Session) -> Result<(), StoreError> {
    let variables = folder.save_variables(session.variables());
    let favourites = folder.save_favourites(session.variables(), session.favourites());
    if let Err(err) = &favourites {
        tracing::warn!(error = %err, "cannot persist favourites");
    }
    variables.and(favourites)
}
