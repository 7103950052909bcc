use super::{Status, destination_file};
use crate::context::Context;
use crate::fs::consts::BLOCK_SIZE;
use crate::fs::error::FsError;
use std::io::Write;
use std::path::Path;

/// incp <host_src> <fs_dest>
/// Copies a host file into the filesystem.
/// Outputs: OK | FILE NOT FOUND | PATH NOT FOUND | FILE TOO LARGE
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [host_src, fs_dest] = argv else {
        return Err(Status::PathNotFound.into());
    };
    let data = std::fs::read(host_src).map_err(|e| {
        log::debug!("incp: cannot read {host_src}: {e}");
        Status::FileNotFound
    })?;
    if data.len() > BLOCK_SIZE {
        return Err(FsError::FileTooLarge.into());
    }

    let src_name = Path::new(host_src)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(*host_src);
    let fs = context.fs()?;
    let ino = destination_file(fs, context.cwd(), fs_dest, src_name)?;
    fs.write(ino, 0, &data)?;
    writeln!(out, "OK")?;
    Ok(())
}
