// Copyright (c) 2025-2026 the sentinel-packs contributors
// SPDX-License-Identifier: Apache-2.0

//! Splitting a query file into its comment header and query body.
//!
//! A query file starts with an optional block of `//` comment lines, possibly
//! interleaved with blank lines. The non-empty comment text becomes the
//! description; everything from the first non-comment line onwards is the
//! query body.

/// Line-comment marker recognised in query file headers.
pub const COMMENT_MARKER: &str = "//";

/// Result of splitting a query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHeader {
    /// Comment lines joined with single spaces, if any carried text.
    pub description: Option<String>,
    /// Query text from the first non-comment line, trimmed.
    pub body: String,
}

/// Split raw query file text into description and body.
///
/// Any line ending style is accepted; the body is rejoined with `\n`. Blank
/// lines inside the header are skipped. When the file has no non-comment line
/// at all, the body starts at the first line, so the comment text is returned
/// as the body as well.
pub fn parse_header(text: &str) -> QueryHeader {
    let lines = split_lines(text);

    let mut fragments: Vec<&str> = Vec::new();
    let mut body_start = 0;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed.strip_prefix(COMMENT_MARKER) {
            Some(comment) => {
                let comment = comment.trim();
                if !comment.is_empty() {
                    fragments.push(comment);
                }
            }
            None => {
                body_start = idx;
                break;
            }
        }
    }

    let description = if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(" "))
    };

    let body = lines.get(body_start..).map_or_else(String::new, |rest| rest.join("\n"));

    QueryHeader {
        description,
        body: body.trim().to_string(),
    }
}

/// Split on `\n`, `\r\n` and lone `\r`, dropping the terminators.
fn split_lines(text: &str) -> Vec<&str> {
    text.split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .collect()
}
