// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{display_name_of, CategoryName, NameError};

/// Joins path fragments with `/`, normalizing `\` and collapsing repeated separators.
///
/// A leading separator on the first fragment is kept, so absolute paths stay absolute.
pub fn join_path<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(part);
    }

    let mut out = String::with_capacity(joined.len());
    let mut previous_was_separator = false;
    for ch in joined.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        out.push(ch);
    }
    out
}

/// `"Games"` -> `"Games.xlfc"`, validating the display name on the way.
pub fn category_file_name(display: &str) -> Result<String, NameError> {
    Ok(CategoryName::new(display)?.file_name())
}

pub fn category_display_name(file: &str) -> &str {
    display_name_of(file)
}

/// True for a single path segment that is safe to create inside a directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::{category_display_name, category_file_name, is_plain_file_name, join_path};
    use rstest::rstest;

    #[rstest]
    #[case(&["utils", "xldbv.json"], "utils/xldbv.json")]
    #[case(&["/opt/app/", "/utils/"], "/opt/app/utils/")]
    #[case(&["C:\\apps\\launcher", "xldb"], "C:/apps/launcher/xldb")]
    #[case(&["a//b", "", "c"], "a/b/c")]
    fn join_path_normalizes_separators(#[case] parts: &[&str], #[case] expected: &str) {
        assert_eq!(join_path(parts), expected);
    }

    #[test]
    fn category_names_map_to_files() {
        assert_eq!(category_file_name(" Games ").unwrap(), "Games.xlfc");
        assert!(category_file_name("a/b").is_err());
        assert_eq!(category_display_name("Games.xlfc"), "Games");
    }

    #[test]
    fn plain_file_names() {
        assert!(is_plain_file_name("xldbf.json"));
        assert!(!is_plain_file_name("../x"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }
}
