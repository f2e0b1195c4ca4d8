// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::category::AppTable;
use super::config_text::ConfigText;
use super::favourites::FavouritesRecord;
use super::staging::StagingBuffer;
use super::variables::VariablesRecord;

/// Everything a running launcher works against.
///
/// Built by the load pipeline, mutated by catalog edits, written back by the save pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    variables: VariablesRecord,
    favourites: FavouritesRecord,
    staging: StagingBuffer,
    consolidated: AppTable,
    config_text: ConfigText,
}

impl Session {
    pub fn new(variables: VariablesRecord) -> Self {
        Self {
            variables,
            favourites: FavouritesRecord::new(),
            staging: StagingBuffer::new(),
            consolidated: AppTable::new(),
            config_text: ConfigText::with_defaults(),
        }
    }

    pub fn variables(&self) -> &VariablesRecord {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariablesRecord {
        &mut self.variables
    }

    pub fn favourites(&self) -> &FavouritesRecord {
        &self.favourites
    }

    pub fn favourites_mut(&mut self) -> &mut FavouritesRecord {
        &mut self.favourites
    }

    pub fn set_favourites(&mut self, favourites: FavouritesRecord) {
        self.favourites = favourites;
    }

    pub fn staging(&self) -> &StagingBuffer {
        &self.staging
    }

    pub fn staging_mut(&mut self) -> &mut StagingBuffer {
        &mut self.staging
    }

    pub fn set_staging(&mut self, staging: StagingBuffer) {
        self.staging = staging;
    }

    /// The consolidated launch list as last read from disk.
    pub fn consolidated(&self) -> &AppTable {
        &self.consolidated
    }

    pub fn set_consolidated(&mut self, consolidated: AppTable) {
        self.consolidated = consolidated;
    }

    pub fn config_text(&self) -> &ConfigText {
        &self.config_text
    }

    pub fn config_text_mut(&mut self) -> &mut ConfigText {
        &mut self.config_text
    }

    pub fn set_config_text(&mut self, config_text: ConfigText) {
        self.config_text = config_text;
    }

    pub fn needs_setup(&self) -> bool {
        self.variables.first_run.needs_setup()
    }
}
