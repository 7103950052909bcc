use super::{Status, basename, not_found_as};
use crate::context::Context;
use crate::fs::layout::InodeKind;
use crate::fs::path::resolve;
use std::io::Write;

/// info <path>
/// Prints: "NAME - SIZE B - i-node INODE - block BLOCK - mode MODE" for files,
///         "NAME - N entries - i-node INODE - block BLOCK - mode MODE" for directories,
/// MODE being the octal type and permission bits.
/// On error: "FILE NOT FOUND"
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [path] = argv else {
        return Err(Status::FileNotFound.into());
    };
    let fs = context.fs()?;
    let ino = resolve(fs, context.cwd(), path).map_err(|e| not_found_as(e, Status::FileNotFound))?;
    let inode = fs.inode(ino)?;

    let amount = match inode.kind {
        InodeKind::File { size } => format!("{size} B"),
        InodeKind::Directory { children } => format!("{children} entries"),
    };
    writeln!(
        out,
        "{} - {amount} - i-node {} - block {} - mode {:o}",
        basename(path),
        inode.inode_no,
        inode.data_block,
        inode.mode()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::Session;

    #[test]
    fn describes_files_and_directories() {
        let mut s = Session::formatted();
        s.run("mkdir docs");
        s.run("write docs/a.txt hello");
        assert_eq!(
            s.run("info docs/a.txt"),
            "a.txt - 5 B - i-node 3 - block 4 - mode 100644\n"
        );
        assert_eq!(
            s.run("info docs"),
            "docs - 1 entries - i-node 2 - block 3 - mode 40755\n"
        );
        assert_eq!(s.run("info /"), "/ - 1 entries - i-node 1 - block 2 - mode 40755\n");
        assert_eq!(s.run("info ghost"), "FILE NOT FOUND\n");
    }
}
