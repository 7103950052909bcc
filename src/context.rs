use crate::fs::error::FsError;
use crate::fs::path::WorkingDir;
use crate::fs::{FileDevice, FileSystem};
use anyhow::{Context as _, Result, anyhow};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Shell session state: the image, the mounted filesystem and the working directory.
pub struct Context {
    pub(crate) fs: Option<FileSystem<FileDevice>>,
    pub(crate) fs_path: Option<PathBuf>,
    pub(crate) cwd: WorkingDir,
    pub(crate) running: bool,
    pub(crate) load_depth: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            fs: None,
            fs_path: None,
            cwd: WorkingDir::root(),
            running: true,
            load_depth: 0,
        }
    }

    /// Remembers `path` as the image and mounts it if it already holds a
    /// filesystem. Returns whether a filesystem was mounted.
    pub fn open_fs<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        let path = path.as_ref();
        self.close_fs();
        self.fs_path = Some(path.to_path_buf());

        if !path.exists() {
            info!("image {} does not exist yet", path.display());
            return Ok(false);
        }
        let device = FileDevice::open(path)
            .with_context(|| format!("cannot open image {}", path.display()))?;
        match FileSystem::mount(device) {
            Ok(fs) => {
                self.fs = Some(fs);
                Ok(true)
            }
            Err(FsError::DeviceIo(e)) => {
                Err(e).with_context(|| format!("cannot read image {}", path.display()))
            }
            Err(e) => {
                warn!("image {} is not mountable: {e}", path.display());
                Ok(false)
            }
        }
    }

    /// Recreates the image with `num_blocks` blocks and mounts the fresh filesystem.
    pub fn format_fs(&mut self, num_blocks: u64) -> Result<()> {
        let path = self
            .fs_path
            .clone()
            .ok_or_else(|| anyhow!("no image file selected"))?;
        self.close_fs();
        self.fs_path = Some(path.clone());

        let device = FileDevice::create(&path, num_blocks)
            .with_context(|| format!("cannot create image {}", path.display()))?;
        self.fs = Some(FileSystem::format(device)?);
        info!("formatted {} with {num_blocks} blocks", path.display());
        Ok(())
    }

    pub fn close_fs(&mut self) {
        self.fs = None;
        self.cwd = WorkingDir::root();
    }

    pub fn fs(&self) -> Result<&FileSystem<FileDevice>> {
        self.fs
            .as_ref()
            .ok_or_else(|| anyhow!("filesystem is not formatted, run `format` first"))
    }

    pub fn fs_path(&self) -> Option<&Path> {
        self.fs_path.as_deref()
    }

    pub fn cwd(&self) -> &WorkingDir {
        &self.cwd
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_remembered_not_mounted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.img");
        let mut ctx = Context::new();
        assert!(!ctx.open_fs(&path).unwrap());
        assert_eq!(ctx.fs_path(), Some(path.as_path()));
        assert!(ctx.fs().is_err());
    }

    #[test]
    fn format_then_reopen_mounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.img");
        let mut ctx = Context::new();
        ctx.open_fs(&path).unwrap();
        ctx.format_fs(16).unwrap();
        assert_eq!(ctx.fs().unwrap().stat().unwrap().total_blocks, 16);

        let mut again = Context::new();
        assert!(again.open_fs(&path).unwrap());
    }

    #[test]
    fn garbage_image_is_not_mounted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.img");
        std::fs::write(&path, vec![0xAB; 8192]).unwrap();
        let mut ctx = Context::new();
        assert!(!ctx.open_fs(&path).unwrap());
    }
}
