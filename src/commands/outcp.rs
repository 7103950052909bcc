use super::{Status, not_found_as};
use crate::context::Context;
use crate::fs::error::FsError;
use crate::fs::path::resolve;
use std::io::Write;

/// outcp s1 s2
/// Copy a file from the filesystem (s1) to the host filesystem (s2).
///
/// Outputs:
///   OK
///   FILE NOT FOUND      (s1 missing or not a file)
///   PATH NOT FOUND      (s2 cannot be written)
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [fs_src, host_dest] = argv else {
        return Err(Status::PathNotFound.into());
    };
    let fs = context.fs()?;
    let ino = resolve(fs, context.cwd(), fs_src)
        .map_err(|e| not_found_as(e, Status::FileNotFound))?;
    let content = fs.read_all(ino).map_err(|e| match e {
        FsError::NotAFile => Status::FileNotFound.into(),
        other => anyhow::Error::from(other),
    })?;

    std::fs::write(host_dest, &content).map_err(|e| {
        log::debug!("outcp: cannot write {host_dest}: {e}");
        Status::PathNotFound
    })?;
    writeln!(out, "OK")?;
    Ok(())
}
