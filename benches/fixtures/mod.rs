// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::time::Duration;

use criterion::Criterion;
use launchdeck::model::fixtures::{numbered_apps, variables_json};
use launchdeck::model::{Session, StagingBuffer};
use launchdeck::store::AppFolder;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 4 categories of 25 apps.
    Small,
    /// 32 categories of 60 apps.
    Medium,
}

impl Case {
    fn shape(self) -> (usize, usize) {
        match self {
            Self::Small => (4, 25),
            Self::Medium => (32, 60),
        }
    }
}

pub struct AppRoot {
    _tmp: tempfile::TempDir,
    pub folder: AppFolder,
    pub files: Vec<String>,
}

/// App root with the categories of `case` on disk and registered in the variables file.
pub fn app_root(case: Case) -> AppRoot {
    let (categories, apps) = case.shape();
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("launcher");
    std::fs::create_dir_all(root.join("utils")).expect("utils dir");
    std::fs::create_dir_all(root.join("xldb")).expect("xldb dir");

    let files: Vec<String> = (0..categories).map(|i| format!("Cat{i:03}.xlfc")).collect();
    let names: Vec<&str> = files.iter().map(String::as_str).collect();
    std::fs::write(
        root.join("utils/xldbv.json"),
        variables_json(&names).to_string(),
    )
    .expect("variables file");

    for (index, file) in files.iter().enumerate() {
        let table = numbered_apps(&format!("Cat{index:03}"), apps);
        std::fs::write(
            root.join("xldb").join(file),
            table.to_compact_json().expect("encode category"),
        )
        .expect("category file");
    }

    AppRoot {
        _tmp: tmp,
        folder: AppFolder::new(root),
        files,
    }
}

/// Session over `root` with every category staged with one extra app.
pub fn edited_session(root: &AppRoot) -> Session {
    let variables = root.folder.load_variables().expect("variables").value;
    let mut session = Session::new(variables);
    let mut staging = StagingBuffer::new();
    for file in &root.files {
        let mut table = root
            .folder
            .load_category(session.variables(), file)
            .expect("category");
        table.insert(format!("{file} extra"), "true");
        staging.set_table(file, &table).expect("stage category");
    }
    session.set_staging(staging);
    session
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub fn criterion() -> Criterion {
    let sample_size = env_usize("BENCH_SAMPLE_SIZE", 30).clamp(10, 200);
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 2).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}
