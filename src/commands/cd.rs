//! `cd [path]`
//!
//! Changes the working directory; without an argument goes to `/`.
//! Outputs: OK | PATH NOT FOUND

use super::{Status, not_found_as};
use crate::context::Context;
use crate::fs::path::walk;
use std::io::Write;

pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let target = match argv {
        [] => "/",
        [path] => *path,
        _ => return Err(Status::PathNotFound.into()),
    };
    let fs = context.fs()?;
    let next = walk(fs, context.cwd(), target).map_err(|e| not_found_as(e, Status::PathNotFound))?;
    if !fs.inode(next.inode_no())?.is_dir() {
        return Err(Status::PathNotFound.into());
    }
    context.cwd = next;
    writeln!(out, "OK")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::Session;

    #[test]
    fn moves_around() {
        let mut s = Session::formatted();
        s.run("mkdir a");
        s.run("mkdir a/b");
        assert_eq!(s.run("cd a/b"), "OK\n");
        assert_eq!(s.run("pwd"), "/a/b\n");
        assert_eq!(s.run("cd .."), "OK\n");
        assert_eq!(s.run("pwd"), "/a\n");
        s.run("touch here");
        assert_eq!(s.run("ls /a"), "DIR: b\nFILE: here\n");
        assert_eq!(s.run("cd"), "OK\n");
        assert_eq!(s.run("pwd"), "/\n");
    }

    #[test]
    fn refuses_files_and_missing() {
        let mut s = Session::formatted();
        s.run("touch f");
        assert_eq!(s.run("cd f"), "PATH NOT FOUND\n");
        assert_eq!(s.run("cd ghost"), "PATH NOT FOUND\n");
        assert_eq!(s.run("pwd"), "/\n");
    }
}
