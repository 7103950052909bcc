use super::{Status, basename, not_found_as};
use crate::context::Context;
use crate::fs::path::resolve;
use std::io::Write;

/// `ls [path]`
///
/// Lists a directory in storage order, one `DIR: name` or `FILE: name` line
/// per entry. A file path prints a single line for the file itself.
/// Invalid path: PATH NOT FOUND.
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let target = match argv {
        [] => ".",
        [path] => *path,
        _ => return Err(Status::PathNotFound.into()),
    };
    let fs = context.fs()?;
    let ino = resolve(fs, context.cwd(), target)
        .map_err(|e| not_found_as(e, Status::PathNotFound))?;
    let inode = fs.inode(ino)?;

    if inode.is_file() {
        writeln!(out, "FILE: {}", basename(target))?;
        return Ok(());
    }
    for entry in fs.list(ino)? {
        let kind = if fs.inode(entry.inode_no)?.is_dir() {
            "DIR"
        } else {
            "FILE"
        };
        writeln!(out, "{kind}: {}", entry.name_str())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::Session;

    #[test]
    fn lists_in_creation_order() {
        let mut s = Session::formatted();
        s.run("touch zz");
        s.run("mkdir aa");
        s.run("touch mm");
        assert_eq!(s.run("ls"), "FILE: zz\nDIR: aa\nFILE: mm\n");
        assert_eq!(s.run("ls /"), "FILE: zz\nDIR: aa\nFILE: mm\n");
        assert_eq!(s.run("ls aa"), "");
        assert_eq!(s.run("ls /zz"), "FILE: zz\n");
    }

    #[test]
    fn bad_path() {
        let mut s = Session::formatted();
        assert_eq!(s.run("ls nowhere"), "PATH NOT FOUND\n");
    }
}
