use crate::context::Context;
use crate::fs::error::FsError;
use crate::fs::path::{self, WorkingDir};
use crate::fs::{BlockDevice, FileSystem};
use colored::Colorize;
use std::collections::HashMap;
use std::io::{self, Write};
use thiserror::Error;

pub mod cat;
pub mod cd;
pub mod clear;
pub mod cp;
pub mod exit;
pub mod format;
pub mod incp;
pub mod info;
pub mod load;
pub mod ls;
pub mod mkdir;
pub mod outcp;
pub mod pwd;
pub mod statfs;
pub mod touch;
pub mod write;

/// Outcomes a command reports with a bare status word instead of an error message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[error("FILE NOT FOUND")]
    FileNotFound,
    #[error("PATH NOT FOUND")]
    PathNotFound,
    #[error("EXIST")]
    Exist,
    #[error("CANNOT CREATE FILE")]
    CannotCreateFile,
}

/// Status word for engine errors the user can cause; `None` for real failures.
pub fn status_word(err: &FsError) -> Option<&'static str> {
    let word = match err {
        FsError::NotFound | FsError::NotADirectory => "PATH NOT FOUND",
        FsError::NotAFile => "FILE NOT FOUND",
        FsError::AlreadyExists => "EXIST",
        FsError::NoSpace => "NO SPACE",
        FsError::DirectoryFull => "DIRECTORY FULL",
        FsError::TooManyObjects | FsError::TableFull => "TOO MANY OBJECTS",
        FsError::InvalidName(_) => "INVALID NAME",
        FsError::FileTooLarge => "FILE TOO LARGE",
        _ => return None,
    };
    Some(word)
}

type Handler = fn(&[&str], &mut Context, &mut dyn Write) -> anyhow::Result<()>;

pub struct Registry {
    pub map: HashMap<&'static str, Handler>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let mut map = HashMap::new();
        map.insert("cat", cat::handle_argv as Handler);
        map.insert("cd", cd::handle_argv as Handler);
        map.insert("clear", clear::handle_argv as Handler);
        map.insert("cp", cp::handle_argv as Handler);
        map.insert("exit", exit::handle_argv as Handler);
        map.insert("format", format::handle_argv as Handler);
        map.insert("incp", incp::handle_argv as Handler);
        map.insert("info", info::handle_argv as Handler);
        map.insert("load", load::handle_argv as Handler);
        map.insert("ls", ls::handle_argv as Handler);
        map.insert("mkdir", mkdir::handle_argv as Handler);
        map.insert("outcp", outcp::handle_argv as Handler);
        map.insert("pwd", pwd::handle_argv as Handler);
        map.insert("statfs", statfs::handle_argv as Handler);
        map.insert("touch", touch::handle_argv as Handler);
        map.insert("write", write::handle_argv as Handler);

        Self { map }
    }

    pub fn dispatch(
        &self,
        name: &str,
        argv: &[&str],
        context: &mut Context,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let Some(handler) = self.map.get(name) else {
            return writeln!(out, "{}", format!("Unknown command: {name}").red());
        };
        match handler(argv, context, out) {
            Ok(()) => Ok(()),
            Err(err) => report(&err, out),
        }
    }

    /// Splits one input line into command and arguments and dispatches it.
    /// Blank lines and `#` comments are skipped.
    pub fn run_line(
        &self,
        line: &str,
        context: &mut Context,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        let mut it = trimmed.split_whitespace();
        let Some(command) = it.next() else {
            return Ok(());
        };
        let args: Vec<&str> = it.collect();
        self.dispatch(command, &args, context, out)
    }
}

fn report(err: &anyhow::Error, out: &mut dyn Write) -> io::Result<()> {
    if let Some(status) = err.downcast_ref::<Status>() {
        return writeln!(out, "{status}");
    }
    if let Some(word) = err.downcast_ref::<FsError>().and_then(status_word) {
        return writeln!(out, "{word}");
    }
    log::debug!("command failed: {err:?}");
    writeln!(out, "{}", format!("ERROR: {err:#}").red())
}

/// Maps "no such object" engine errors to `status`, leaving the rest alone.
pub(crate) fn not_found_as(err: FsError, status: Status) -> anyhow::Error {
    match err {
        FsError::NotFound | FsError::NotADirectory => status.into(),
        other => other.into(),
    }
}

/// Last component of `path`, `/` for the root.
pub(crate) fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit('/').next() {
        Some(b) if !b.is_empty() => b,
        _ => "/",
    }
}

/// Inode of the regular file `dst` should denote, creating it when missing.
/// A directory destination receives a new file named `src_name`.
pub(crate) fn destination_file<D: BlockDevice>(
    fs: &FileSystem<D>,
    cwd: &WorkingDir,
    dst: &str,
    src_name: &str,
) -> anyhow::Result<u64> {
    match path::resolve(fs, cwd, dst) {
        Ok(ino) => {
            let inode = fs.inode(ino)?;
            if inode.is_file() {
                return Ok(ino);
            }
            match fs.lookup(ino, src_name) {
                Ok(existing) if fs.inode(existing)?.is_file() => Ok(existing),
                Ok(_) => Err(Status::Exist.into()),
                Err(FsError::NotFound) => Ok(fs.create(ino, src_name)?),
                Err(e) => Err(e.into()),
            }
        }
        Err(FsError::NotFound) => {
            let (parent, name) = path::resolve_parent(fs, cwd, dst)
                .map_err(|e| not_found_as(e, Status::PathNotFound))?;
            Ok(fs.create(parent, name)?)
        }
        Err(e) => Err(not_found_as(e, Status::PathNotFound)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::fs::consts::MAX_OBJECTS;
    use tempfile::TempDir;

    pub struct Session {
        pub dir: TempDir,
        pub ctx: Context,
        pub registry: Registry,
    }

    impl Session {
        pub fn formatted() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let dir = tempfile::tempdir().unwrap();
            let mut ctx = Context::new();
            ctx.open_fs(dir.path().join("test.img")).unwrap();
            ctx.format_fs(MAX_OBJECTS).unwrap();
            Self {
                dir,
                ctx,
                registry: Registry::new(),
            }
        }

        /// Runs one line and returns what it printed.
        pub fn run(&mut self, line: &str) -> String {
            let mut out = Vec::new();
            self.registry.run_line(line, &mut self.ctx, &mut out).unwrap();
            String::from_utf8(out).unwrap()
        }

        pub fn host_path(&self, name: &str) -> String {
            self.dir.path().join(name).to_string_lossy().into_owned()
        }
    }
}
