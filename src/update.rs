// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Remote version check against `<uurl>/version.json`.
//!
//! A failed check is never an error for the caller: it degrades to
//! [`UpdateStatus::Unavailable`]. There is no retry and no timeout beyond what the HTTP
//! client does on its own.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::VariablesRecord;

pub const VERSION_FILE: &str = "version.json";

/// Version descriptor published next to the release files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, Value>,
    #[serde(default)]
    pub main_files: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate {
        version: String,
    },
    Available {
        current: String,
        latest: String,
        comment: Option<String>,
    },
    Unavailable {
        reason: String,
    },
}

impl UpdateStatus {
    /// Any difference between the published and the installed version counts as an update.
    pub fn compare(current: &str, info: VersionInfo) -> Self {
        if info.version == current {
            Self::UpToDate {
                version: info.version,
            }
        } else {
            Self::Available {
                current: current.to_owned(),
                latest: info.version,
                comment: info.comment,
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate { version } => write!(f, "Up to date ({version})"),
            Self::Available {
                current,
                latest,
                comment,
            } => {
                write!(f, "Update available: {latest} (installed {current})")?;
                if let Some(comment) = comment.as_deref().filter(|c| !c.trim().is_empty()) {
                    write!(f, " - {comment}")?;
                }
                Ok(())
            }
            Self::Unavailable { reason } => write!(f, "Error checking for updates: {reason}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("no update URL configured")]
    NoUrl,
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
    #[error("cannot parse {url}: {source}")]
    Parse {
        url: String,
        source: reqwest::Error,
    },
}

/// `<base>/version.json`; `None` when no base URL is configured.
pub fn version_url(base: &str) -> Option<String> {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}/{VERSION_FILE}"))
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClient {
    http: reqwest::Client,
}

impl UpdateClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn fetch(&self, base_url: &str) -> Result<VersionInfo, UpdateError> {
        let url = version_url(base_url).ok_or(UpdateError::NoUrl)?;
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| UpdateError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .json::<VersionInfo>()
            .await
            .map_err(|source| UpdateError::Parse { url, source })
    }

    pub async fn check(&self, variables: &VariablesRecord) -> UpdateStatus {
        let current = variables.version.to_string();
        match self.fetch(&variables.uurl).await {
            Ok(info) => {
                let status = UpdateStatus::compare(&current, info);
                tracing::info!(status = %status, "update check finished");
                status
            }
            Err(err) => {
                tracing::warn!(error = %err, "update check failed");
                UpdateStatus::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Checks every `interval`, starting immediately, until `max_checks` checks ran
    /// (forever when `None`).
    pub async fn watch<F>(
        &self,
        variables: &VariablesRecord,
        interval: Duration,
        max_checks: Option<usize>,
        mut on_status: F,
    ) where
        F: FnMut(&UpdateStatus),
    {
        let mut ticker = tokio::time::interval(interval);
        let mut checks = 0usize;
        loop {
            if max_checks.is_some_and(|max| checks >= max) {
                break;
            }
            ticker.tick().await;
            let status = self.check(variables).await;
            on_status(&status);
            checks += 1;
        }
    }
}
