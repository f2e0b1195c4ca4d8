// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Launchdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Launchdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only views over the launch list.
//!
//! Ordering, wildcard and fuzzy search, and pagination of the rows a front end renders.

use std::cmp::Ordering;
use std::num::NonZeroU32;

use regex::{Regex, RegexBuilder};

use crate::model::{AppTable, FavouritesRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub command: String,
    pub starred: bool,
}

/// Rows of `table` in file order, placeholder skipped.
pub fn table_rows(table: &AppTable, favourites: &FavouritesRecord) -> Vec<Row> {
    table
        .apps()
        .map(|(name, command)| Row {
            name: name.to_owned(),
            command: command.to_owned(),
            starred: favourites.is_favourite(name),
        })
        .collect()
}

/// Launch-list order: starred apps by name, then the rest in consolidated order.
pub fn main_rows(consolidated: &AppTable, favourites: &FavouritesRecord) -> Vec<Row> {
    let (mut starred, unstarred): (Vec<Row>, Vec<Row>) = table_rows(consolidated, favourites)
        .into_iter()
        .partition(|row| row.starred);
    starred.sort_by(|a, b| compare_names(&a.name, &b.name));
    starred.extend(unstarred);
    starred
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Search term with `*` (any run) and `?` (one character) wildcards.
///
/// Matching ignores case and is anchored at the start of the name unless the term itself
/// starts with `*`. It is never anchored at the end, so `vl` finds `VLC`.
#[derive(Debug, Clone)]
pub struct WildcardFilter {
    regex: Option<Regex>,
}

impl WildcardFilter {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        if term.is_empty() {
            return Ok(Self { regex: None });
        }

        let mut pattern = String::with_capacity(term.len() * 2 + 1);
        if !term.starts_with('*') {
            pattern.push('^');
        }
        let mut buf = [0u8; 4];
        for ch in term.chars() {
            match ch {
                '*' => pattern.push_str(".*"),
                '?' => pattern.push('.'),
                other => pattern.push_str(&regex::escape(other.encode_utf8(&mut buf))),
            }
        }
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.as_ref().map_or(true, |regex| regex.is_match(name))
    }

    pub fn filter(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter().filter(|row| self.is_match(&row.name)).collect()
    }
}

/// Rows whose name contains `term` as a subsequence, best match first.
///
/// An empty term returns the rows unchanged.
pub fn fuzzy_rows(rows: Vec<Row>, term: &str) -> Vec<Row> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }

    let mut scored: Vec<(i64, usize, Row)> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            fuzzy_score(&needle, &row.name.to_lowercase()).map(|score| (score, idx, row))
        })
        .collect();
    scored.sort_by(|(score_a, idx_a, _), (score_b, idx_b, _)| {
        score_b.cmp(score_a).then_with(|| idx_a.cmp(idx_b))
    });
    scored.into_iter().map(|(_, _, row)| row).collect()
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let stats = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());

    let mut score = (ratio * 1000.0).round() as i64;
    score -= stats.span as i64;
    score -= (stats.first as i64) / 4;
    score += (stats.consecutive as i64) * 40;
    if stats.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    }
    Some(score)
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut wanted = needle.chars().peekable();
    let mut first = None;
    let mut last = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0;
    let mut start_boundary = false;
    let mut prev: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = wanted.peek() else {
            break;
        };
        if ch == want {
            wanted.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|p| idx == p + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }
        prev = Some(ch);
    }

    if wanted.peek().is_some() {
        return None;
    }
    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last - first + 1,
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, ' ' | '-' | '_' | '.' | ':' | '/')
}

/// Number of pages for `rows` rows; never zero, so an empty list still has page 1.
pub fn page_count(rows: usize, page_size: NonZeroU32) -> usize {
    let size = page_size.get() as usize;
    rows.div_ceil(size).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based.
    pub number: usize,
    pub count: usize,
    pub items: &'a [T],
}

/// Page `requested` (1-based) of `rows`, clamped into `1..=page_count`.
pub fn page<T>(rows: &[T], page_size: NonZeroU32, requested: usize) -> Page<'_, T> {
    let count = page_count(rows.len(), page_size);
    let number = requested.clamp(1, count);
    let size = page_size.get() as usize;
    let start = (number - 1) * size;
    let end = (start + size).min(rows.len());
    Page {
        number,
        count,
        items: rows.get(start..end).unwrap_or(&[]),
    }
}
