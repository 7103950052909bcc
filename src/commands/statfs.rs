use crate::context::Context;
use std::io::Write;

/// statfs
/// Prints block and inode usage of the mounted filesystem.
pub fn handle_argv(
    _argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let stats = context.fs()?.stat()?;
    writeln!(out, "block size: {} B", stats.block_size)?;
    writeln!(
        out,
        "blocks: {} total, {} used, {} free",
        stats.total_blocks, stats.used_blocks, stats.free_blocks
    )?;
    writeln!(out, "inodes: {} used, {} free", stats.inodes_used, stats.inodes_free)?;
    writeln!(out, "directories: {}", stats.directories)?;
    writeln!(out, "files: {}", stats.files)?;
    Ok(())
}
