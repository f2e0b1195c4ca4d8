// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence of the app folder on disk.
//!
//! `AppFolder` is the file gateway (read/write/rename/remove/list inside the app root) plus
//! typed load/save of the variables, favourites, category, consolidated and config files.
//! `KvStore` keeps the staging buffer between runs, and `stitch` rebuilds the consolidated
//! launch file.

pub mod app_folder;
pub mod kv;
pub mod paths;
pub mod stitch;

pub use app_folder::{
    AppFolder, StoreError, WriteDurability, FAVOURITES_FILE, STATE_FILE, UTILS_DIR,
    VARIABLES_FILE,
};
pub use kv::KvStore;
pub use paths::{category_display_name, category_file_name, join_path};
pub use stitch::{stitch, StitchError, StitchSummary};
