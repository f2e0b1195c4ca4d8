// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// App folder filesystem helpers: relative-path checks, symlink-safe directory creation
/// and atomic writes.
fn validate_relative_path(field: &'static str, path: &Path) -> Result<(), StoreError> {
    let invalid = || StoreError::InvalidRelativePath {
        field,
        value: path.to_path_buf(),
    };

    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(invalid());
    }

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(invalid());
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

fn to_relative_path(root: &Path, path: &Path, field: &'static str) -> Result<PathBuf, StoreError> {
    let relative = if path.is_absolute() {
        path.strip_prefix(root)
            .map(PathBuf::from)
            .map_err(|_| StoreError::PathOutsideRoot {
                root: root.to_path_buf(),
                path: path.to_path_buf(),
            })?
    } else {
        // Relative roots (the default `.`) produce relative paths; compare component-wise.
        match path.strip_prefix(root) {
            Ok(stripped) => stripped.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    };

    validate_relative_path(field, &relative)?;
    Ok(relative)
}

fn create_dir_all_safe(root: &Path, relative: &Path) -> Result<(), StoreError> {
    if relative.as_os_str().is_empty() {
        return Ok(());
    }

    validate_relative_path("dir", relative)?;

    let mut current = root.to_path_buf();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };

        current.push(part);

        match fs::symlink_metadata(&current) {
            Ok(md) => {
                if md.file_type().is_symlink() {
                    return Err(StoreError::SymlinkRefused { path: current });
                }
                if !md.is_dir() {
                    return Err(StoreError::Io {
                        path: current,
                        source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
                    });
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|source| StoreError::Io {
                    path: current.clone(),
                    source,
                })?;
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: current,
                    source,
                })
            }
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn sync_parent_dir(path: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Writes `contents` to a temp file next to `path` and renames it into place.
///
/// `path` must resolve inside `root`; missing parent directories are created, symlinks on
/// the way are refused.
pub(crate) fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let relative = to_relative_path(root, path, "path")?;
    let parent_rel = relative.parent().unwrap_or_else(|| Path::new(""));
    create_dir_all_safe(root, parent_rel)?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        "{TMP_PREFIX}{}.{nanos}",
        file_name.to_string_lossy()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        sync_parent_dir(path)?;
    }

    Ok(())
}
