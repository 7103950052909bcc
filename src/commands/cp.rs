use super::{Status, basename, destination_file, not_found_as};
use crate::context::Context;
use crate::fs::error::FsError;
use crate::fs::path::resolve;
use std::io::Write;

/// Copy command: `cp <src> <dst>`
///
/// `dst` may name a file (created or overwritten) or a directory, which
/// receives a file with the source's name.
///
/// Outputs:
///   OK
///   FILE NOT FOUND
///   PATH NOT FOUND
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [src, dst] = argv else {
        return Err(Status::PathNotFound.into());
    };
    let fs = context.fs()?;
    let cwd = context.cwd();

    let src_ino = resolve(fs, cwd, src).map_err(|e| not_found_as(e, Status::FileNotFound))?;
    let content = fs.read_all(src_ino).map_err(|e| match e {
        FsError::NotAFile => Status::FileNotFound.into(),
        other => anyhow::Error::from(other),
    })?;

    let dst_ino = destination_file(fs, cwd, dst, basename(src))?;
    if dst_ino != src_ino {
        fs.write(dst_ino, 0, &content)?;
    }
    writeln!(out, "OK")?;
    Ok(())
}
