// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented append-only file shared by the done and error logs.
//!
//! Every entry is written with a single `write_all` on an `O_APPEND` handle
//! and synced before returning, so concurrent completions never interleave
//! partial lines as long as writers serialize on the owning log.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub(crate) struct AppendFile {
    file: File,
    path: PathBuf,
}

impl AppendFile {
    /// Open or create the file, creating parent directories as needed.
    ///
    /// A final line missing its newline is terminated so the next entry
    /// starts on its own line. The line itself is kept.
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        if ends_mid_line(&mut file)? {
            warn!(path = %path.display(), "terminating unfinished final log line");
            file.write_all(b"\n")?;
            file.sync_data()?;
        }

        Ok(Self {
            file,
            path: path.to_owned(),
        })
    }

    /// Append one line; `line` must not contain a newline.
    pub(crate) fn append_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.file.write_all(&buf)?;
        self.file.sync_data()
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether the file is non-empty and its last byte is not a newline.
fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read every line of a log, tolerating a missing file.
///
/// Blank and whitespace-only lines are dropped and lines are trimmed. A
/// final line without a trailing newline still counts: an interrupted
/// append leaves at most a prefix of an entry, which matches nothing.
/// Lines that are not valid UTF-8 are skipped with a warning.
pub(crate) fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut lines = Vec::new();
    for (index, raw) in bytes.split(|b| *b == b'\n').enumerate() {
        match std::str::from_utf8(raw) {
            Ok(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
            Err(e) => warn!(
                path = %path.display(),
                line = index + 1,
                error = %e,
                "skipping log line that is not UTF-8",
            ),
        }
    }
    Ok(lines)
}

/// Collapse a message onto one line.
pub(crate) fn single_line(message: &str) -> String {
    message
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "append_tests.rs"]
mod tests;
