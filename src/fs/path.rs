//! `/`-separated path resolution on top of `FileSystem::lookup`.
//!
//! The filesystem itself stores no `.` or `..` entries, so the walk keeps a
//! stack of `(name, inode_no)` pairs from the root and pops it on `..`.

use crate::fs::consts::ROOT_INODE_NO;
use crate::fs::device::BlockDevice;
use crate::fs::error::{FsError, Result};
use crate::fs::filesystem::FileSystem;

/// Position in the tree, as the chain of directories walked from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingDir {
    stack: Vec<(String, u64)>,
}

impl WorkingDir {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn inode_no(&self) -> u64 {
        self.stack.last().map_or(ROOT_INODE_NO, |&(_, ino)| ino)
    }

    pub fn name(&self) -> &str {
        self.stack.last().map_or("/", |(name, _)| name.as_str())
    }

    /// Absolute textual form, `/` for the root.
    pub fn display(&self) -> String {
        if self.stack.is_empty() {
            return "/".to_string();
        }
        self.stack
            .iter()
            .map(|(name, _)| format!("/{name}"))
            .collect()
    }

    fn push(&mut self, name: &str, inode_no: u64) {
        self.stack.push((name.to_string(), inode_no));
    }

    // ".." at the root stays at the root
    fn pop(&mut self) {
        self.stack.pop();
    }
}

/// Walks `path` from `cwd` (or from the root when it starts with `/`).
/// The last component may name a file; every earlier one must be a directory.
pub fn walk<D: BlockDevice>(
    fs: &FileSystem<D>,
    cwd: &WorkingDir,
    path: &str,
) -> Result<WorkingDir> {
    let mut at = if path.starts_with('/') {
        WorkingDir::root()
    } else {
        cwd.clone()
    };

    for component in path.split('/').filter(|c| !c.is_empty()) {
        match component {
            "." => {}
            ".." => at.pop(),
            name => {
                let ino = fs.lookup(at.inode_no(), name)?;
                at.push(name, ino);
            }
        }
    }
    Ok(at)
}

/// Inode number `path` points at.
pub fn resolve<D: BlockDevice>(fs: &FileSystem<D>, cwd: &WorkingDir, path: &str) -> Result<u64> {
    walk(fs, cwd, path).map(|w| w.inode_no())
}

/// Splits `path` into the directory that should hold it and the final name.
/// The final component is not looked up.
pub fn resolve_parent<'p, D: BlockDevice>(
    fs: &FileSystem<D>,
    cwd: &WorkingDir,
    path: &'p str,
) -> Result<(u64, &'p str)> {
    let trimmed = path.trim_end_matches('/');
    let (dir, name) = match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => (".", trimmed),
    };
    if name.is_empty() || name == "." || name == ".." {
        return Err(FsError::InvalidName(path.to_string()));
    }

    let parent = resolve(fs, cwd, dir)?;
    if !fs.inode(parent)?.is_dir() {
        return Err(FsError::NotADirectory);
    }
    Ok((parent, name))
}
