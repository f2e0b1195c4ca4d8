// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Consolidation of every category file into the main launch file.

use std::time::Duration;

use thiserror::Error;

use crate::model::{AppTable, VariablesRecord};

use super::app_folder::{AppFolder, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StitchSummary {
    /// Category files that were read and parsed.
    pub categories: usize,
    /// Category files that could not be read or parsed.
    pub skipped: Vec<String>,
    /// Entries in the written consolidated file.
    pub apps: usize,
    /// Names defined by more than one category.
    pub collisions: usize,
    /// Whether the empty first pass forced a second scan.
    pub rescanned: bool,
}

#[derive(Debug, Error)]
pub enum StitchError {
    #[error("cannot read the variables file: {0}")]
    Variables(#[source] StoreError),
    #[error("no usable entries in {categories} category file(s) after a re-scan")]
    Empty { categories: usize },
    #[error("cannot write the consolidated file: {0}")]
    Write(#[source] StoreError),
}

/// Rebuilds the consolidated file from the category files listed in the variables file.
///
/// The variables file is read from disk, not taken from memory, so the result reflects
/// what was persisted. Categories are merged in `xldbFiles` order and the later category
/// wins a name collision. Placeholder rows of empty categories are dropped. An empty union is re-scanned once after `rescan_delay`; if it is
/// still empty nothing is written.
pub async fn stitch(folder: &AppFolder, rescan_delay: Duration) -> Result<StitchSummary, StitchError> {
    let variables = folder
        .load_variables()
        .map_err(StitchError::Variables)?
        .value;

    let mut pass = union_categories(folder, &variables);
    let mut rescanned = false;
    if pass.table.is_empty() {
        tracing::debug!(delay = ?rescan_delay, "empty consolidation pass, re-scanning");
        tokio::time::sleep(rescan_delay).await;
        pass = union_categories(folder, &variables);
        rescanned = true;
    }

    if pass.table.is_empty() {
        return Err(StitchError::Empty {
            categories: variables.xldb_files.len(),
        });
    }

    folder
        .write_consolidated(&variables, &pass.table)
        .map_err(StitchError::Write)?;

    let summary = StitchSummary {
        categories: pass.read,
        skipped: pass.skipped,
        apps: pass.table.len(),
        collisions: pass.collisions,
        rescanned,
    };
    tracing::info!(
        categories = summary.categories,
        apps = summary.apps,
        skipped = summary.skipped.len(),
        "consolidated launch file written"
    );
    Ok(summary)
}

struct UnionPass {
    table: AppTable,
    read: usize,
    skipped: Vec<String>,
    collisions: usize,
}

fn union_categories(folder: &AppFolder, variables: &VariablesRecord) -> UnionPass {
    let mut pass = UnionPass {
        table: AppTable::new(),
        read: 0,
        skipped: Vec::new(),
        collisions: 0,
    };

    for file in &variables.xldb_files {
        match folder.load_category(variables, file) {
            Ok(mut table) => {
                table.strip_placeholder();
                let collisions = pass.table.merge_from(&table);
                if collisions > 0 {
                    tracing::debug!(file = %file, collisions, "category overrides earlier entries");
                }
                pass.collisions += collisions;
                pass.read += 1;
            }
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping unreadable category");
                pass.skipped.push(file.clone());
            }
        }
    }

    pass
}
