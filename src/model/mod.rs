// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed records of the launcher.
//!
//! A session holds the variables record, the favourites record, the staging buffer of
//! unsaved category edits, the consolidated launch list and the text config.

pub mod category;
pub mod config_text;
pub mod favourites;
#[doc(hidden)]
pub mod fixtures;
pub mod ids;
pub mod session;
pub mod staging;
pub mod variables;
pub mod version;

pub use category::{format_for_disk, AppTable, PLACEHOLDER_COMMAND, PLACEHOLDER_KEY};
pub use config_text::ConfigText;
pub use favourites::{FavouritesRecord, RECENT_LIMIT};
pub use ids::{
    display_name_of, AppName, CategoryName, Name, NameError, CATEGORY_EXT, LEGACY_CATEGORY_EXT,
};
pub use session::Session;
pub use staging::StagingBuffer;
pub use variables::{
    AddCommands, ConfigOpts, Directories, FirstRun, OverwriteFile, PeriodicOpts, Rows,
    TrayOpts, TriggerCmdOpts, UpdatesOpts, ValidationError, VariablesRecord,
};
pub use version::{ParseVersionError, Version};
