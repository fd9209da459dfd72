// src/exec/quoting.rs

//! Quoting helpers for the two shell dialects.
//!
//! Commands are written in POSIX style with single quotes around arguments
//! that contain spaces. cmd.exe has no single-quote syntax, so before running
//! on Windows every double quote is dropped and every single quote becomes a
//! double quote.

/// Rewrite a POSIX-style command for cmd.exe.
///
/// `gradle build -p 'C:\My Project'` becomes `gradle build -p "C:\My Project"`.
pub fn to_cmd_quoting(command: &str) -> String {
    command
        .chars()
        .filter(|&c| c != '"')
        .map(|c| if c == '\'' { '"' } else { c })
        .collect()
}

/// Wrap `s` in single quotes for `/bin/sh`, escaping embedded single quotes.
pub fn sh_single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}
