use super::{Status, not_found_as};
use crate::context::Context;
use crate::fs::consts::BLOCK_SIZE;
use crate::fs::error::FsError;
use crate::fs::path::{resolve, resolve_parent};
use std::io::Write;

/// write f1 some text
/// Replaces the content of f1 (creating it if needed) with the remaining
/// arguments joined by single spaces.
/// Outputs: OK | PATH NOT FOUND | FILE NOT FOUND | FILE TOO LARGE | ...
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let Some((target, words)) = argv.split_first() else {
        return Err(Status::PathNotFound.into());
    };
    let text = words.join(" ");
    if text.len() > BLOCK_SIZE {
        return Err(FsError::FileTooLarge.into());
    }
    let fs = context.fs()?;
    let cwd = context.cwd();

    let ino = match resolve(fs, cwd, target) {
        Ok(ino) => ino,
        Err(FsError::NotFound) => {
            let (parent, name) =
                resolve_parent(fs, cwd, target).map_err(|e| not_found_as(e, Status::PathNotFound))?;
            fs.create(parent, name)?
        }
        Err(e) => return Err(not_found_as(e, Status::PathNotFound)),
    };
    fs.write(ino, 0, text.as_bytes())?;
    writeln!(out, "OK")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::Session;
    use crate::fs::consts::BLOCK_SIZE;

    #[test]
    fn overwrite_truncates_to_new_length() {
        let mut s = Session::formatted();
        assert_eq!(s.run("write f a much longer first line"), "OK\n");
        assert_eq!(s.run("write f short"), "OK\n");
        assert_eq!(s.run("cat f"), "short\n");
    }

    #[test]
    fn too_large_leaves_file_alone() {
        let mut s = Session::formatted();
        s.run("write f keep");
        let big = "x".repeat(BLOCK_SIZE + 1);
        assert_eq!(s.run(&format!("write f {big}")), "FILE TOO LARGE\n");
        assert_eq!(s.run("cat f"), "keep\n");
    }

    #[test]
    fn too_large_creates_nothing() {
        let mut s = Session::formatted();
        let big = "x".repeat(BLOCK_SIZE + 1);
        assert_eq!(s.run(&format!("write fresh {big}")), "FILE TOO LARGE\n");
        assert_eq!(s.run("ls"), "");
        assert!(s.run("statfs").contains("inodes: 1 used, 63 free"));
    }

    #[test]
    fn bad_targets() {
        let mut s = Session::formatted();
        s.run("mkdir d");
        assert_eq!(s.run("write d hi"), "FILE NOT FOUND\n");
        assert_eq!(s.run("write nope/f hi"), "PATH NOT FOUND\n");
        assert_eq!(s.run("write"), "PATH NOT FOUND\n");
    }
}
