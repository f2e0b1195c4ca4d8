// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Starting an app from the launch list.

use std::io;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::model::{Session, PLACEHOLDER_KEY};

/// Runs a command line. The seam exists so tests never start real processes.
pub trait Spawner {
    fn spawn(&self, command: &str) -> io::Result<()>;
}

/// Hands the command line to the platform shell, detached from our stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellSpawner;

impl Spawner for ShellSpawner {
    fn spawn(&self, command: &str) -> io::Result<()> {
        let mut process = if cfg!(windows) {
            let mut process = Command::new("cmd");
            process.args(["/C", command]);
            process
        } else {
            let mut process = Command::new("sh");
            process.args(["-c", command]);
            process
        };
        process
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no app named {0:?} in the launch list")]
    UnknownApp(String),
    #[error("cannot start {name:?}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub name: String,
    pub command: String,
}

/// Starts `name` from the consolidated list and moves it to the front of the recent list.
///
/// Persisting the updated favourites record is left to the caller.
pub fn launch(
    session: &mut Session,
    name: &str,
    spawner: &dyn Spawner,
) -> Result<Launched, LaunchError> {
    let command = session
        .consolidated()
        .get(name)
        .filter(|_| name != PLACEHOLDER_KEY)
        .ok_or_else(|| LaunchError::UnknownApp(name.to_owned()))?
        .to_owned();

    spawner
        .spawn(&command)
        .map_err(|source| LaunchError::Spawn {
            name: name.to_owned(),
            source,
        })?;

    let prefix = session
        .config_text()
        .get("messagePrefix")
        .unwrap_or("Launching:");
    tracing::info!(command = %command, "{prefix} {name}");
    session.favourites_mut().push_recent(name);

    Ok(Launched {
        name: name.to_owned(),
        command,
    })
}
