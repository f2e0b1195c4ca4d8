// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Category/app mutation helpers used by `apply_ops`.
fn apply_op(
    draft: &mut Draft<'_>,
    op: &CatalogOp,
    result: &mut ApplyResult,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        CatalogOp::AddCategory { name } => {
            let file = category_name(name)?.file_name();
            if draft.variables.has_category(&file) {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Category,
                    name: name.trim().to_owned(),
                });
            }
            let placeholder = AppTable::placeholder();
            store_table(&mut draft.staging, &file, &placeholder)?;
            draft.variables.register_category(&file);
            result.actions.push(FileAction::WriteCategory {
                file: file.clone(),
                contents: staged_text(&draft.staging, &file),
            });
            delta.record_added(EntryRef::Category(file));
            Ok(())
        }
        CatalogOp::RenameCategory { from, to } => {
            let from_file = existing_category(&draft.variables, from)?;
            let to_file = category_name(to)?.file_name();
            if from_file == to_file {
                return Ok(());
            }
            if draft.variables.has_category(&to_file) {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Category,
                    name: to.trim().to_owned(),
                });
            }
            draft.staging.rename(&from_file, &to_file);
            draft.variables.rename_category(&from_file, &to_file);
            result.actions.push(FileAction::RenameCategory {
                from: from_file.clone(),
                to: to_file.clone(),
            });
            delta.record_removed(EntryRef::Category(from_file));
            delta.record_added(EntryRef::Category(to_file));
            Ok(())
        }
        CatalogOp::RemoveCategory { name } => {
            let file = existing_category(&draft.variables, name)?;
            draft.staging.remove(&file);
            draft.variables.unregister_category(&file);
            result.actions.push(FileAction::RemoveCategory { file: file.clone() });
            delta.record_removed(EntryRef::Category(file));
            Ok(())
        }
        CatalogOp::AddApp {
            category,
            name,
            command,
        } => {
            let file = existing_category(&draft.variables, category)?;
            let name = app_name(name)?;
            let command = non_empty_command(&name, command)?;
            let mut table = staged_table(&draft.staging, &file)?;
            table.strip_placeholder();
            let entry = EntryRef::App {
                category: file.clone(),
                name: name.as_str().to_owned(),
            };
            if table.insert(name.as_str(), command).is_some() {
                delta.record_updated(entry);
            } else {
                delta.record_added(entry);
            }
            store_table(&mut draft.staging, &file, &table)
        }
        CatalogOp::EditApp {
            category,
            from,
            name,
            command,
        } => {
            let file = existing_category(&draft.variables, category)?;
            let from = app_name(from)?;
            let name = app_name(name)?;
            let command = non_empty_command(&name, command)?;
            let mut table = staged_table(&draft.staging, &file)?;
            if !table.contains(from.as_str()) {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::App,
                    name: from.into_string(),
                });
            }
            if from != name && table.contains(name.as_str()) {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::App,
                    name: name.into_string(),
                });
            }
            table.rename(from.as_str(), name.as_str(), command);
            store_table(&mut draft.staging, &file, &table)?;

            if from == name {
                delta.record_updated(EntryRef::App {
                    category: file,
                    name: name.into_string(),
                });
            } else {
                draft.favourites.rename(from.as_str(), name.as_str());
                delta.record_removed(EntryRef::App {
                    category: file.clone(),
                    name: from.into_string(),
                });
                delta.record_added(EntryRef::App {
                    category: file,
                    name: name.into_string(),
                });
            }
            Ok(())
        }
        CatalogOp::RemoveApp { category, name } => {
            let file = existing_category(&draft.variables, category)?;
            let name = app_name(name)?;
            let mut table = staged_table(&draft.staging, &file)?;
            if table.remove(name.as_str()).is_none() {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::App,
                    name: name.into_string(),
                });
            }
            store_table(&mut draft.staging, &file, &table)?;
            if draft.favourites.forget(name.as_str()) {
                delta.record_updated(EntryRef::Favourite(name.as_str().to_owned()));
            }
            delta.record_removed(EntryRef::App {
                category: file,
                name: name.into_string(),
            });
            Ok(())
        }
        CatalogOp::ToggleFavourite { name } => {
            let name = app_name(name)?;
            if !app_known(draft, name.as_str()) {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::App,
                    name: name.into_string(),
                });
            }
            let starred = draft.favourites.toggle(name.as_str());
            result.starred = Some(starred);
            delta.record_updated(EntryRef::Favourite(name.into_string()));
            Ok(())
        }
    }
}

fn category_name(raw: &str) -> Result<CategoryName, ApplyError> {
    CategoryName::new(raw).map_err(|source| ApplyError::InvalidName {
        kind: ObjectKind::Category,
        value: raw.to_owned(),
        source,
    })
}

fn app_name(raw: &str) -> Result<AppName, ApplyError> {
    AppName::new(raw).map_err(|source| ApplyError::InvalidName {
        kind: ObjectKind::App,
        value: raw.to_owned(),
        source,
    })
}

/// File name of a registered category, by display name.
fn existing_category(variables: &VariablesRecord, raw: &str) -> Result<String, ApplyError> {
    let file = category_name(raw)?.file_name();
    if !variables.has_category(&file) {
        return Err(ApplyError::NotFound {
            kind: ObjectKind::Category,
            name: raw.trim().to_owned(),
        });
    }
    Ok(file)
}

fn non_empty_command(name: &AppName, command: &str) -> Result<String, ApplyError> {
    let command = command.trim();
    if command.is_empty() {
        return Err(ApplyError::EmptyCommand {
            name: name.as_str().to_owned(),
        });
    }
    Ok(command.to_owned())
}

fn staged_table(staging: &StagingBuffer, file: &str) -> Result<AppTable, ApplyError> {
    staging
        .table(file)
        .map_err(|err| ApplyError::CorruptCategory {
            file: file.to_owned(),
            reason: err.to_string(),
        })
}

fn store_table(staging: &mut StagingBuffer, file: &str, table: &AppTable) -> Result<(), ApplyError> {
    staging
        .set_table(file, table)
        .map_err(|err| ApplyError::CorruptCategory {
            file: file.to_owned(),
            reason: err.to_string(),
        })
}

fn staged_text(staging: &StagingBuffer, file: &str) -> String {
    staging.get(file).unwrap_or_default().to_owned()
}

/// An app can be starred once it is in the launch list or in any staged category.
fn app_known(draft: &Draft<'_>, name: &str) -> bool {
    if draft.consolidated.contains(name) {
        return true;
    }
    draft
        .variables
        .xldb_files
        .iter()
        .filter_map(|file| draft.staging.table(file).ok())
        .any(|table| table.contains(name))
}
