//! `format` command.
//!
//! Usage:
//!   format [SIZE]
//!
//! SIZE takes a B, KB or MB suffix (powers of 1024) and defaults to 256KB,
//! the largest image the 64-bit free-block bitmap can describe. It must come
//! out to between 3 and 64 blocks of 4096 B.
//!
//! Output:
//!   OK
//!   CANNOT CREATE FILE
//!
//! The current image is truncated and rebuilt with only the root directory;
//! the working directory returns to `/`.

use super::Status;
use crate::context::Context;
use crate::fs::consts::{BLOCK_SIZE, DEFAULT_FS_BYTES, MAX_OBJECTS, RESERVED_BLOCKS};
use log::error;
use std::io::Write;

pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let fs_bytes = match argv {
        [] => DEFAULT_FS_BYTES,
        [size] => parse_size(size).ok_or(Status::CannotCreateFile)?,
        _ => return Err(Status::CannotCreateFile.into()),
    };

    let num_blocks = fs_bytes / BLOCK_SIZE as u64;
    if !(RESERVED_BLOCKS..=MAX_OBJECTS).contains(&num_blocks) {
        return Err(Status::CannotCreateFile.into());
    }

    if let Err(e) = context.format_fs(num_blocks) {
        error!("format failed: {e:#}");
        return Err(Status::CannotCreateFile.into());
    }
    writeln!(out, "OK")?;
    Ok(())
}

/// Parse a size string like "256KB", "12288B" or "4096".
fn parse_size(s: &str) -> Option<u64> {
    let (num_part, unit_part) = split_number_unit(s);
    if num_part.is_empty() {
        return None;
    }
    let base: u64 = num_part.parse().ok()?;
    let mul = match unit_part.to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB" => 1_024,
        "MB" => 1_024 * 1_024,
        _ => return None,
    };
    base.checked_mul(mul)
}

/// Split string into (numeric_part, unit_part) at first non-digit.
fn split_number_unit(s: &str) -> (&str, &str) {
    let idx = s
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s.split_at(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Session;

    #[test]
    fn sizes() {
        assert_eq!(parse_size("256KB"), Some(256 * 1024));
        assert_eq!(parse_size("12288b"), Some(12288));
        assert_eq!(parse_size("4096"), Some(4096));
        assert_eq!(parse_size("1mb"), Some(1024 * 1024));
        assert_eq!(parse_size("KB"), None);
        assert_eq!(parse_size("10GB"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn split() {
        assert_eq!(split_number_unit("600MB"), ("600", "MB"));
        assert_eq!(split_number_unit("42"), ("42", ""));
        assert_eq!(split_number_unit("MB"), ("", "MB"));
    }

    #[test]
    fn format_wipes_and_resets_cwd() {
        let mut s = Session::formatted();
        s.run("mkdir a");
        s.run("cd a");
        assert_eq!(s.run("format 48KB"), "OK\n");
        assert_eq!(s.run("pwd"), "/\n");
        assert_eq!(s.run("ls"), "");
        assert!(s.run("statfs").contains("blocks: 12 total"));
    }

    #[test]
    fn out_of_range_sizes_are_refused() {
        let mut s = Session::formatted();
        assert_eq!(s.run("format 8KB"), "CANNOT CREATE FILE\n");
        assert_eq!(s.run("format 1MB"), "CANNOT CREATE FILE\n");
        assert_eq!(s.run("format lots"), "CANNOT CREATE FILE\n");
        s.run("mkdir still-here");
        assert_eq!(s.run("ls"), "DIR: still-here\n");
    }
}
