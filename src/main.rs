// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Launchdeck CLI entrypoint.
//!
//! Every invocation loads the app root, runs one command and writes back what it changed.
//! Staged category edits survive between invocations in the state file until `save`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use launchdeck::launch::{launch, ShellSpawner};
use launchdeck::model::variables::DEFAULT_PERIODIC_HOURS;
use launchdeck::model::{FirstRun, Session, VariablesRecord};
use launchdeck::ops::{apply_and_persist, CatalogOp};
use launchdeck::pipeline::{
    load_session, persist_session, BarProgress, LoadOptions, LoadOutcome, SaveOptions,
    SaveOutcome, SavePipeline, SilentProgress, DEFAULT_RESCAN_DELAY,
};
use launchdeck::query::{fuzzy_rows, main_rows, page, table_rows, WildcardFilter};
use launchdeck::store::{category_file_name, stitch, AppFolder, KvStore, WriteDurability};
use launchdeck::triggercmd::TriggerCmdExporter;
use launchdeck::update::UpdateClient;

#[derive(Debug, Parser)]
#[command(name = "launchdeck", version, about = "Catalog, save and launch desktop apps")]
struct Cli {
    /// App root holding `utils/` and the category directory.
    #[arg(long, env = "LAUNCHDECK_ROOT", default_value = ".")]
    root: PathBuf,

    /// fsync every write (slower).
    #[arg(long)]
    durable_writes: bool,

    /// `-v` for info logs, `-vv` for debug logs.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lay out a fresh app root, or move a fresh install on to pending setup.
    Init,
    /// Load everything and report counts and the update state.
    Status,
    /// Print the launch list (or one category) page by page.
    List {
        #[arg(long)]
        search: Option<String>,
        /// Rank by fuzzy match instead of wildcard filtering.
        #[arg(long, requires = "search")]
        fuzzy: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// List the staged content of this category instead.
        #[arg(long)]
        category: Option<String>,
    },
    /// Start an app from the launch list.
    Launch { app: String },
    /// Star or unstar an app.
    Fav { app: String },
    /// Stage category edits.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Stage app edits.
    App {
        #[command(subcommand)]
        action: AppAction,
    },
    /// Write staged edits, rebuild the launch list and reload.
    Save {
        /// Skip the TRIGGERcmd export even when auto-generation is on.
        #[arg(long)]
        no_export: bool,
    },
    /// Rebuild the launch list from the category files on disk.
    Stitch,
    /// Regenerate the TRIGGERcmd commands file.
    Export,
    /// Compare the installed version with the update server.
    CheckUpdate {
        /// Keep checking on the configured period.
        #[arg(long)]
        watch: bool,
    },
    /// Print the JSON Schema of the variables file.
    Schema,
}

#[derive(Debug, Subcommand)]
enum CategoryAction {
    Add { name: String },
    Rename { from: String, to: String },
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
enum AppAction {
    Add {
        category: String,
        name: String,
        command: String,
    },
    Edit {
        category: String,
        from: String,
        name: String,
        command: String,
    },
    Remove {
        category: String,
        name: String,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("LAUNCHDECK_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("launchdeck: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let durability = if cli.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    let folder = AppFolder::new(&cli.root).with_durability(durability);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Schema => {
            let schema = schemars::schema_for!(VariablesRecord);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Init => init(&folder)?,
        Command::Status => runtime.block_on(status(&folder))?,
        Command::List {
            search,
            fuzzy,
            page,
            category,
        } => {
            let (session, _) = runtime.block_on(ready_session(&folder))?;
            list(&session, search.as_deref(), fuzzy, page, category.as_deref())?;
        }
        Command::Launch { app } => {
            let (mut session, _) = runtime.block_on(ready_session(&folder))?;
            let launched = launch(&mut session, &app, &ShellSpawner)?;
            folder
                .save_favourites(session.variables(), session.favourites())
                .context("cannot record the recent list")?;
            println!("launched {}", launched.name);
        }
        Command::Fav { app } => {
            let op = CatalogOp::ToggleFavourite { name: app.clone() };
            let state = match edit(&runtime, &folder, op)? {
                Some(true) => "starred",
                _ => "unstarred",
            };
            println!("{app} {state}");
        }
        Command::Category { action } => {
            let op = match action {
                CategoryAction::Add { name } => CatalogOp::AddCategory { name },
                CategoryAction::Rename { from, to } => CatalogOp::RenameCategory { from, to },
                CategoryAction::Remove { name } => CatalogOp::RemoveCategory { name },
            };
            edit(&runtime, &folder, op)?;
            println!("staged; run `launchdeck save` to rebuild the launch list");
        }
        Command::App { action } => {
            let op = match action {
                AppAction::Add {
                    category,
                    name,
                    command,
                } => CatalogOp::AddApp {
                    category,
                    name,
                    command,
                },
                AppAction::Edit {
                    category,
                    from,
                    name,
                    command,
                } => CatalogOp::EditApp {
                    category,
                    from,
                    name,
                    command,
                },
                AppAction::Remove { category, name } => CatalogOp::RemoveApp { category, name },
            };
            edit(&runtime, &folder, op)?;
            println!("staged; run `launchdeck save` to write it");
        }
        Command::Save { no_export } => runtime.block_on(save(&folder, no_export))?,
        Command::Stitch => {
            let summary = runtime.block_on(stitch(&folder, DEFAULT_RESCAN_DELAY))?;
            println!(
                "{} apps from {} categories ({} skipped, {} overridden)",
                summary.apps,
                summary.categories,
                summary.skipped.len(),
                summary.collisions
            );
        }
        Command::Export => {
            let variables = folder.load_variables()?.value;
            let summary = TriggerCmdExporter::for_home()?.export(&folder, &variables)?;
            println!(
                "{} commands written to {} ({} foreign kept)",
                summary.exported,
                summary.target.display(),
                summary.kept
            );
        }
        Command::CheckUpdate { watch } => {
            let variables = folder.load_variables()?.value;
            let client = UpdateClient::new();
            runtime.block_on(async {
                if watch {
                    let interval = variables
                        .config_opts
                        .updates
                        .periodic_interval()
                        .unwrap_or(Duration::from_secs(u64::from(DEFAULT_PERIODIC_HOURS) * 3600));
                    client
                        .watch(&variables, interval, None, |status| println!("{status}"))
                        .await;
                } else {
                    println!("{}", client.check(&variables).await);
                }
            });
        }
    }
    Ok(())
}

/// Pending edits from earlier invocations win over the disk copies until `save`.
fn resume_options() -> LoadOptions {
    LoadOptions {
        keep_staged: true,
        ..LoadOptions::default()
    }
}

fn open_kv(folder: &AppFolder) -> anyhow::Result<KvStore> {
    KvStore::open(folder.root(), folder.state_path(), folder.durability())
        .context("cannot open the state file")
}

/// Loads a session that has finished setup, without the update check.
async fn ready_session(folder: &AppFolder) -> anyhow::Result<(Session, KvStore)> {
    let kv = open_kv(folder)?;
    let outcome = load_session(folder, &kv, &resume_options(), &SilentProgress).await?;
    if outcome.needs_setup() {
        bail!("setup is not complete; run `launchdeck init` and then `launchdeck save`");
    }
    Ok((outcome.into_session(), kv))
}

/// Like [`ready_session`], but also accepts a root whose setup is pending.
async fn editable_session(folder: &AppFolder) -> anyhow::Result<(Session, KvStore)> {
    let kv = open_kv(folder)?;
    let outcome = load_session(folder, &kv, &resume_options(), &SilentProgress).await?;
    let session = match outcome {
        LoadOutcome::Ready { session, .. } => session,
        LoadOutcome::NeedsSetup { mut session, .. } => {
            if session.variables().first_run == FirstRun::FreshInstall {
                bail!("fresh install; run `launchdeck init` first");
            }
            let favourites = folder.load_favourites(session.variables())?.value;
            session.set_favourites(favourites);
            session
        }
    };
    Ok((session, kv))
}

fn init(folder: &AppFolder) -> anyhow::Result<()> {
    let mut variables = folder.load_or_init()?;
    match variables.first_run {
        FirstRun::FreshInstall => {
            variables.first_run = FirstRun::SetupIncomplete;
            folder.save_variables(&variables)?;
            println!(
                "initialized {}; add categories, then run `launchdeck save` to finish setup",
                folder.root().display()
            );
        }
        FirstRun::SetupIncomplete => {
            println!("setup pending; run `launchdeck save` to finish it");
        }
        FirstRun::Normal => println!("already set up"),
    }
    Ok(())
}

async fn status(folder: &AppFolder) -> anyhow::Result<()> {
    let kv = open_kv(folder)?;
    let options = LoadOptions {
        update_client: Some(UpdateClient::new()),
        ..resume_options()
    };
    let outcome = load_session(folder, &kv, &options, &BarProgress::new("load")).await?;
    let session = outcome.session();
    let variables = session.variables();

    println!("version     {}", variables.version);
    if outcome.needs_setup() {
        println!("setup       pending ({:?})", variables.first_run);
        return Ok(());
    }
    let report = outcome.report();
    println!(
        "categories  {} loaded, {} failed",
        report.categories_loaded,
        report.categories_failed.len()
    );
    println!("apps        {}", session.consolidated().apps().count());
    println!("favourites  {}", session.favourites().favourites().len());
    if let Some(update) = &report.update {
        println!("update      {update}");
    }
    for file in folder.missing_categories(variables) {
        println!("missing     {file}");
    }
    Ok(())
}

fn list(
    session: &Session,
    search: Option<&str>,
    fuzzy: bool,
    requested: usize,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let variables = session.variables();
    let (rows, page_size) = match category {
        Some(name) => {
            let file = category_file_name(name)?;
            if !variables.has_category(&file) {
                bail!("no category named {name:?}");
            }
            let table = session
                .staging()
                .table(&file)
                .with_context(|| format!("staged copy of {name} is not valid JSON"))?;
            (table_rows(&table, session.favourites()), variables.rows.edit)
        }
        None => (
            main_rows(session.consolidated(), session.favourites()),
            variables.rows.main,
        ),
    };

    let rows = match search {
        Some(term) if fuzzy => fuzzy_rows(rows, term),
        Some(term) => WildcardFilter::new(term)?.filter(rows),
        None => rows,
    };

    let shown = page(&rows, page_size, requested);
    for row in shown.items {
        let star = if row.starred {
            variables.favourite.as_str()
        } else {
            " "
        };
        println!("{star} {}\t{}", row.name, row.command);
    }
    println!("-- page {}/{} ({} apps)", shown.number, shown.count, rows.len());
    Ok(())
}

/// Applies one staged edit and writes back variables and favourites.
fn edit(
    runtime: &tokio::runtime::Runtime,
    folder: &AppFolder,
    op: CatalogOp,
) -> anyhow::Result<Option<bool>> {
    let (mut session, mut kv) = runtime.block_on(editable_session(folder))?;
    let result = apply_and_persist(folder, &mut kv, &mut session, std::slice::from_ref(&op))?;
    persist_session(folder, &session)?;
    Ok(result.starred)
}

async fn save(folder: &AppFolder, no_export: bool) -> anyhow::Result<()> {
    let (mut session, mut kv) = editable_session(folder).await?;

    let export = if no_export {
        None
    } else {
        match TriggerCmdExporter::for_home() {
            Ok(exporter) => Some(exporter),
            Err(err) => {
                tracing::warn!(error = %err, "TRIGGERcmd export disabled");
                None
            }
        }
    };
    let pipeline = SavePipeline::new(
        folder.clone(),
        SaveOptions {
            export,
            ..SaveOptions::default()
        },
    );

    match pipeline
        .run(&mut session, &mut kv, &BarProgress::new("save"))
        .await?
    {
        SaveOutcome::Completed(report) => {
            println!(
                "wrote {}/{} categories, {} failure(s){}",
                report.written,
                report.attempted,
                report.failures(),
                if report.stitched() { "" } else { ", launch list not rebuilt" }
            );
            if report.setup_completed {
                println!("setup complete");
            }
            if report.failures() > 0 {
                bail!("save finished with {} failure(s)", report.failures());
            }
        }
        SaveOutcome::AlreadyActive => println!("a save is already running"),
    }
    Ok(())
}
