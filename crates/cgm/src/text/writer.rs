// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Column-tracking statement writer for the clear-text encoding.
//!
//! Statements are wrapped at the configured column by breaking between
//! top-level tokens only: never inside a quoted string, a point, or a
//! number. Continuation lines repeat the statement's indent.

use std::io;

pub struct ClearTextWriter<'a> {
    sink: &'a mut dyn io::Write,
    wrap_column: usize,
}

impl<'a> ClearTextWriter<'a> {
    pub fn new(sink: &'a mut dyn io::Write, wrap_column: u16) -> Self {
        ClearTextWriter {
            sink,
            // A wrap column below the indent width would wrap forever.
            wrap_column: usize::from(wrap_column.max(16)),
        }
    }

    /// Write one statement with the given line indent, soft-wrapping
    /// between tokens.
    pub fn statement(&mut self, indent: &str, body: &str) -> io::Result<()> {
        let mut line = String::from(indent);
        let base = indent.len();
        for token in split_tokens(body) {
            let sep = if line.len() == base { "" } else { " " };
            if line.len() + sep.len() + token.len() > self.wrap_column && line.len() > base {
                self.sink.write_all(line.as_bytes())?;
                self.sink.write_all(b"\n")?;
                line.clear();
                line.push_str(indent);
                line.push_str(token);
            } else {
                line.push_str(sep);
                line.push_str(token);
            }
        }
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")
    }

    /// An empty output line.
    pub fn blank_line(&mut self) -> io::Result<()> {
        self.sink.write_all(b"\n")
    }
}

/// Split a statement body at spaces outside single-quoted strings.
/// Doubled quotes inside a string toggle twice, which is harmless.
fn split_tokens(body: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut in_quote = false;
    for (i, c) in body.char_indices() {
        match c {
            '\'' => {
                in_quote = !in_quote;
                if start.is_none() {
                    start = Some(i);
                }
            }
            ' ' if !in_quote => {
                if let Some(s) = start.take() {
                    tokens.push(&body[s..i]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&body[s..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(wrap: u16, indent: &str, body: &str) -> String {
        let mut out = Vec::new();
        let mut writer = ClearTextWriter::new(&mut out, wrap);
        writer.statement(indent, body).expect("vec sink");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_split_tokens_respects_quotes() {
        let tokens = split_tokens("mfdesc 'a b c' done;");
        assert_eq!(tokens, vec!["mfdesc", "'a b c'", "done;"]);
    }

    #[test]
    fn test_split_tokens_doubled_quote() {
        let tokens = split_tokens("mfdesc 'it''s here';");
        assert_eq!(tokens, vec!["mfdesc", "'it''s here';"]);
    }

    #[test]
    fn test_short_statement_single_line() {
        assert_eq!(render(80, "  ", "circle 1.0000 2.0000 3.0000;"),
            "  circle 1.0000 2.0000 3.0000;\n");
    }

    #[test]
    fn test_wrap_repeats_indent() {
        let body = "line (1.0000,2.0000) (3.0000,4.0000) (5.0000,6.0000);";
        let out = render(30, "  ", body);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.len() > 1, "expected wrapping: {:?}", lines);
        for line in &lines {
            assert!(line.starts_with("  "));
            assert!(line.len() <= 30, "line too long: {:?}", line);
        }
        // Tokens must survive wrapping intact and in order.
        let rejoined = lines
            .iter()
            .map(|l| l.trim_start())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, body);
    }

    #[test]
    fn test_never_wraps_inside_point() {
        let body = "line (11111.0000,22222.0000) (33333.0000,44444.0000);";
        let out = render(30, "  ", body);
        for line in out.lines() {
            let opens = line.matches('(').count();
            let closes = line.matches(')').count();
            assert_eq!(opens, closes, "point split across lines: {:?}", line);
        }
    }

    #[test]
    fn test_oversized_token_overflows_line() {
        let long = format!("mfdesc '{}';", "A".repeat(100));
        let out = render(80, " ", &long);
        // The quoted string is one token; it may overflow but never splits.
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().nth(1).expect("second line").contains(&"A".repeat(100)));
    }
}
