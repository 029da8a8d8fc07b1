// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tab-separated export row parsing.

/// One tab-separated export row.
///
/// Missing columns read as `None`, so short rows never index out of bounds.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    line: &'a str,
}

impl<'a> Row<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line }
    }

    pub fn len(&self) -> usize {
        self.line.split('\t').count()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Rows with a single column carry no data (blank lines, stray text).
    pub fn has_data(&self) -> bool {
        self.line.contains('\t')
    }

    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.line.split('\t').nth(index)
    }

    /// Field value, with empty strings treated as absent
    pub fn non_empty(&self, index: usize) -> Option<&'a str> {
        self.field(index).filter(|s| !s.is_empty())
    }

    /// Field parsed as a leading integer (see [`parse_int_prefix`])
    pub fn int(&self, index: usize) -> Option<i64> {
        self.field(index).and_then(parse_int_prefix)
    }

    pub fn line(&self) -> &'a str {
        self.line
    }
}

/// Parse the leading decimal integer of `s`.
///
/// Leading whitespace and a single sign are accepted and parsing stops at
/// the first non-digit, so `"12px"` is 12. Returns `None` when no digit
/// follows, or on overflow.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
