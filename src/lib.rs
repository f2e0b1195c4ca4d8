// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Launchdeck: data lifecycle of a desktop application launcher.
//!
//! Apps (name + command) live in per-category files under the app root. Edits go to a
//! staging buffer first; the save pipeline writes the staged categories, stitches them into
//! one consolidated launch file, reads everything back and optionally regenerates the
//! TRIGGERcmd export.

pub mod launch;
pub mod migrate;
pub mod model;
pub mod ops;
pub mod pipeline;
pub mod query;
pub mod store;
pub mod triggercmd;
pub mod update;
