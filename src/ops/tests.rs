// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{
    apply_and_persist, apply_ops, run_file_actions, ApplyError, CatalogOp, EntryRef, FileAction,
    ObjectKind,
};
use crate::model::fixtures::app_table;
use crate::model::{AppTable, Session, VariablesRecord, PLACEHOLDER_KEY};
use crate::store::{AppFolder, KvStore};

fn add_app(category: &str, name: &str, command: &str) -> CatalogOp {
    CatalogOp::AddApp {
        category: category.to_owned(),
        name: name.to_owned(),
        command: command.to_owned(),
    }
}

/// Session with categories `Games` (`{"Doom": "doom"}`) and `Tools` (`{"Vim": "vim"}`).
#[fixture]
fn session() -> Session {
    let mut variables = VariablesRecord::fresh();
    variables.xldb_files = vec!["Games.xlfc".to_owned(), "Tools.xlfc".to_owned()];
    let mut session = Session::new(variables);
    session
        .staging_mut()
        .set_table("Games.xlfc", &app_table(&[("Doom", "doom")]))
        .unwrap();
    session
        .staging_mut()
        .set_table("Tools.xlfc", &app_table(&[("Vim", "vim")]))
        .unwrap();
    session.set_consolidated(app_table(&[("Doom", "doom"), ("Vim", "vim")]));
    session
}

fn staged(session: &Session, file: &str) -> AppTable {
    session.staging().table(file).unwrap()
}

#[rstest]
fn add_category_seeds_placeholder_and_registers_file(mut session: Session) {
    let result = apply_ops(
        &mut session,
        &[CatalogOp::AddCategory {
            name: " Media ".to_owned(),
        }],
    )
    .unwrap();

    assert_eq!(
        session.variables().xldb_files,
        ["Games.xlfc", "Tools.xlfc", "Media.xlfc"]
    );
    assert!(staged(&session, "Media.xlfc").is_placeholder_only());
    assert_eq!(
        result.actions,
        [FileAction::WriteCategory {
            file: "Media.xlfc".to_owned(),
            contents: r#"{" ":" "}"#.to_owned(),
        }]
    );
    assert_eq!(
        result.delta.added,
        [EntryRef::Category("Media.xlfc".to_owned())]
    );
}

#[rstest]
fn first_app_replaces_the_placeholder(mut session: Session) {
    apply_ops(
        &mut session,
        &[
            CatalogOp::AddCategory {
                name: "Media".to_owned(),
            },
            add_app("Media", "VLC", "  vlc  "),
        ],
    )
    .unwrap();

    let table = staged(&session, "Media.xlfc");
    assert!(!table.contains(PLACEHOLDER_KEY));
    assert_eq!(table, app_table(&[("VLC", "vlc")]));
}

#[rstest]
fn duplicate_category_is_rejected(mut session: Session) {
    let err = apply_ops(
        &mut session,
        &[CatalogOp::AddCategory {
            name: "Games".to_owned(),
        }],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ApplyError::AlreadyExists {
            kind: ObjectKind::Category,
            name: "Games".to_owned()
        }
    );
}

#[rstest]
fn rename_category_preserves_content_and_position(mut session: Session) {
    let before = staged(&session, "Games.xlfc");
    let result = apply_ops(
        &mut session,
        &[CatalogOp::RenameCategory {
            from: "Games".to_owned(),
            to: "Fun".to_owned(),
        }],
    )
    .unwrap();

    assert_eq!(session.variables().xldb_files, ["Fun.xlfc", "Tools.xlfc"]);
    assert!(!session.staging().contains("Games.xlfc"));
    assert_eq!(staged(&session, "Fun.xlfc"), before);
    assert_eq!(
        result.actions,
        [FileAction::RenameCategory {
            from: "Games.xlfc".to_owned(),
            to: "Fun.xlfc".to_owned(),
        }]
    );
}

#[rstest]
fn rename_onto_existing_category_is_rejected(mut session: Session) {
    let err = apply_ops(
        &mut session,
        &[CatalogOp::RenameCategory {
            from: "Games".to_owned(),
            to: "Tools".to_owned(),
        }],
    )
    .unwrap_err();
    assert!(matches!(err, ApplyError::AlreadyExists { .. }));
}

#[rstest]
fn remove_category_strikes_it_everywhere(mut session: Session) {
    let result = apply_ops(
        &mut session,
        &[CatalogOp::RemoveCategory {
            name: "Tools".to_owned(),
        }],
    )
    .unwrap();
    assert_eq!(session.variables().xldb_files, ["Games.xlfc"]);
    assert!(!session.staging().contains("Tools.xlfc"));
    assert_eq!(
        result.actions,
        [FileAction::RemoveCategory {
            file: "Tools.xlfc".to_owned()
        }]
    );
}

#[rstest]
fn add_app_overwrites_existing_command(mut session: Session) {
    let result = apply_ops(&mut session, &[add_app("Games", "Doom", "doom -fast")]).unwrap();
    assert_eq!(staged(&session, "Games.xlfc").get("Doom"), Some("doom -fast"));
    assert_eq!(result.delta.updated.len(), 1);
}

#[rstest]
#[case("", "cmd")]
#[case("Quake", "   ")]
fn add_app_validates_input(mut session: Session, #[case] name: &str, #[case] command: &str) {
    let err = apply_ops(&mut session, &[add_app("Games", name, command)]).unwrap_err();
    assert!(matches!(
        err,
        ApplyError::InvalidName { .. } | ApplyError::EmptyCommand { .. }
    ));
}

#[rstest]
fn add_app_to_unknown_category_fails(mut session: Session) {
    let err = apply_ops(&mut session, &[add_app("Nope", "x", "y")]).unwrap_err();
    assert_eq!(
        err,
        ApplyError::NotFound {
            kind: ObjectKind::Category,
            name: "Nope".to_owned()
        }
    );
}

#[rstest]
fn edit_app_renames_in_place_and_carries_favourites(mut session: Session) {
    apply_ops(
        &mut session,
        &[
            add_app("Games", "Quake", "quake"),
            CatalogOp::ToggleFavourite {
                name: "Doom".to_owned(),
            },
            CatalogOp::EditApp {
                category: "Games".to_owned(),
                from: "Doom".to_owned(),
                name: "Doom II".to_owned(),
                command: "doom2".to_owned(),
            },
        ],
    )
    .unwrap();

    let pairs: Vec<(String, String)> = staged(&session, "Games.xlfc")
        .iter()
        .map(|(n, c)| (n.to_owned(), c.to_owned()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("Doom II".to_owned(), "doom2".to_owned()),
            ("Quake".to_owned(), "quake".to_owned())
        ]
    );
    assert!(session.favourites().is_favourite("Doom II"));
    assert!(!session.favourites().is_favourite("Doom"));
}

#[rstest]
fn edit_app_onto_existing_name_is_rejected(mut session: Session) {
    apply_ops(&mut session, &[add_app("Games", "Quake", "quake")]).unwrap();
    let err = apply_ops(
        &mut session,
        &[CatalogOp::EditApp {
            category: "Games".to_owned(),
            from: "Doom".to_owned(),
            name: "Quake".to_owned(),
            command: "x".to_owned(),
        }],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApplyError::AlreadyExists {
            kind: ObjectKind::App,
            ..
        }
    ));
}

#[rstest]
fn remove_app_forgets_favourite_and_recent(mut session: Session) {
    session.favourites_mut().toggle("Vim");
    session.favourites_mut().push_recent("Vim");
    apply_ops(
        &mut session,
        &[CatalogOp::RemoveApp {
            category: "Tools".to_owned(),
            name: "Vim".to_owned(),
        }],
    )
    .unwrap();
    assert!(staged(&session, "Tools.xlfc").is_empty());
    assert!(session.favourites().favourites().is_empty());
    assert!(session.favourites().recent().is_empty());
}

#[rstest]
fn toggle_favourite_twice_is_identity(mut session: Session) {
    let before = session.favourites().clone();
    let toggle = CatalogOp::ToggleFavourite {
        name: "Vim".to_owned(),
    };
    let first = apply_ops(&mut session, std::slice::from_ref(&toggle)).unwrap();
    assert_eq!(first.starred, Some(true));
    let second = apply_ops(&mut session, &[toggle]).unwrap();
    assert_eq!(second.starred, Some(false));
    assert_eq!(session.favourites(), &before);
}

#[rstest]
fn toggle_unknown_app_fails(mut session: Session) {
    let err = apply_ops(
        &mut session,
        &[CatalogOp::ToggleFavourite {
            name: "Ghost".to_owned(),
        }],
    )
    .unwrap_err();
    assert!(matches!(err, ApplyError::NotFound { .. }));
}

#[rstest]
fn failing_batch_leaves_session_untouched(mut session: Session) {
    let before = session.clone();
    let err = apply_ops(
        &mut session,
        &[
            add_app("Games", "Quake", "quake"),
            CatalogOp::RemoveCategory {
                name: "Missing".to_owned(),
            },
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ApplyError::NotFound { .. }));
    assert_eq!(session, before);
}

#[rstest]
fn corrupt_staged_category_is_reported(mut session: Session) {
    session.staging_mut().set("Games.xlfc", "{ not json");
    let err = apply_ops(&mut session, &[add_app("Games", "Quake", "quake")]).unwrap_err();
    assert!(matches!(err, ApplyError::CorruptCategory { .. }));
}

#[rstest]
fn apply_and_persist_runs_file_actions_and_stages(mut session: Session) {
    let dir = tempfile::tempdir().unwrap();
    let folder = AppFolder::new(dir.path());
    let mut kv = KvStore::in_memory();

    apply_and_persist(
        &folder,
        &mut kv,
        &mut session,
        &[CatalogOp::AddCategory {
            name: "Media".to_owned(),
        }],
    )
    .unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("xldb/Media.xlfc")).unwrap();
    assert_eq!(on_disk, "{\n  \" \": \" \"\n}\n");
    assert_eq!(kv.load_staging(), session.staging().clone());
}

#[rstest]
fn file_action_failures_are_collected(session: Session) {
    let dir = tempfile::tempdir().unwrap();
    let folder = AppFolder::new(dir.path());
    let failures = run_file_actions(
        &folder,
        session.variables(),
        &[FileAction::RenameCategory {
            from: "Missing.xlfc".to_owned(),
            to: "Other.xlfc".to_owned(),
        }],
    );
    assert_eq!(failures.len(), 1);
}
