// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Mutex;

/// One human-readable line of the status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Done(String),
    Failed(String),
    Note(String),
}

impl StatusLine {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(name) => write!(f, "\u{2714} {name}"),
            Self::Failed(name) => write!(f, "Failed to update {name}"),
            Self::Note(text) => f.write_str(text),
        }
    }
}

/// Receives progress of a running pipeline. Purely cosmetic; nothing depends on it.
pub trait Progress {
    /// `fraction` is `completed / total`, in `0.0..=1.0`.
    fn step(&self, fraction: f32, label: &str);

    fn line(&self, line: &StatusLine);

    fn finish(&self) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn step(&self, _fraction: f32, _label: &str) {}

    fn line(&self, _line: &StatusLine) {}
}

/// Forwards progress to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn step(&self, fraction: f32, label: &str) {
        tracing::debug!(progress = fraction, step = label, "pipeline progress");
    }

    fn line(&self, line: &StatusLine) {
        if line.is_failure() {
            tracing::warn!("{line}");
        } else {
            tracing::info!("{line}");
        }
    }
}

/// Collects lines in memory, for tests and for callers that render them afterwards.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    steps: Mutex<Vec<f32>>,
    lines: Mutex<Vec<StatusLine>>,
}

impl RecordingProgress {
    pub fn steps(&self) -> Vec<f32> {
        self.steps.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<StatusLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Progress for RecordingProgress {
    fn step(&self, fraction: f32, _label: &str) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(fraction);
        }
    }

    fn line(&self, line: &StatusLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.clone());
        }
    }
}

/// `indicatif` bar on stderr, used by the CLI.
pub struct BarProgress {
    bar: indicatif::ProgressBar,
}

const BAR_LENGTH: u64 = 1000;

impl BarProgress {
    pub fn new(prefix: &str) -> Self {
        let bar = indicatif::ProgressBar::new(BAR_LENGTH);
        let style = indicatif::ProgressStyle::with_template("{prefix} [{bar:30}] {percent:>3}% {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_prefix(prefix.to_owned());
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: indicatif::ProgressBar::hidden(),
        }
    }
}

impl Progress for BarProgress {
    fn step(&self, fraction: f32, label: &str) {
        let position = (f64::from(fraction.clamp(0.0, 1.0)) * BAR_LENGTH as f64).round() as u64;
        self.bar.set_position(position);
        self.bar.set_message(label.to_owned());
    }

    fn line(&self, line: &StatusLine) {
        self.bar.println(line.to_string());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Monotonic `completed / total` counter behind the progress fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StepCounter {
    completed: usize,
    total: usize,
}

impl StepCounter {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total: total.max(1),
        }
    }

    /// Grows the total once more work is known; never shrinks it.
    pub(crate) fn extend_total(&mut self, total: usize) {
        self.total = self.total.max(total).max(self.completed);
    }

    pub(crate) fn advance(&mut self, progress: &dyn Progress, label: &str) {
        self.completed = (self.completed + 1).min(self.total);
        progress.step(self.fraction(), label);
    }

    pub(crate) fn fraction(&self) -> f32 {
        self.completed as f32 / self.total as f32
    }
}
