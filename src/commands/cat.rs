use super::{Status, not_found_as};
use crate::context::Context;
use crate::fs::error::FsError;
use crate::fs::path::resolve;
use std::io::Write;

/// cat s1
/// Prints the file content, or FILE NOT FOUND.
pub fn handle_argv(
    argv: &[&str],
    context: &mut Context,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let [target] = argv else {
        return Err(Status::FileNotFound.into());
    };
    let fs = context.fs()?;
    let ino = resolve(fs, context.cwd(), target)
        .map_err(|e| not_found_as(e, Status::FileNotFound))?;
    let content = fs.read_all(ino).map_err(|e| match e {
        FsError::NotAFile => Status::FileNotFound.into(),
        other => anyhow::Error::from(other),
    })?;
    writeln!(out, "{}", String::from_utf8_lossy(&content))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::Session;

    #[test]
    fn prints_content() {
        let mut s = Session::formatted();
        s.run("write note hello there");
        assert_eq!(s.run("cat note"), "hello there\n");
    }

    #[test]
    fn missing_or_directory_is_file_not_found() {
        let mut s = Session::formatted();
        s.run("mkdir d");
        assert_eq!(s.run("cat nope"), "FILE NOT FOUND\n");
        assert_eq!(s.run("cat d"), "FILE NOT FOUND\n");
        assert_eq!(s.run("cat d/x/y"), "FILE NOT FOUND\n");
    }
}
