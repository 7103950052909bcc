//! Block devices the engine runs on.
//!
//! Every call moves exactly one block. Both implementations serialize access
//! through an internal mutex so a device can be shared between threads.

use crate::fs::consts::BLOCK_SIZE;
use log::trace;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

pub trait BlockDevice: Send + Sync {
    /// Number of addressable blocks.
    fn num_blocks(&self) -> u64;

    /// Reads block `block_no` into `buf`; `buf.len()` must equal `block_size()`.
    fn read_block(&self, block_no: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Writes `buf` over block `block_no`; `buf.len()` must equal `block_size()`.
    fn write_block(&self, block_no: u64, buf: &[u8]) -> io::Result<()>;

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

fn check_request(dev: &impl BlockDevice, block_no: u64, len: usize) -> io::Result<()> {
    if block_no >= dev.num_blocks() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("block {block_no} out of range ({} blocks)", dev.num_blocks()),
        ));
    }
    if len != dev.block_size() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("buffer of {len} B, block size is {}", dev.block_size()),
        ));
    }
    Ok(())
}

/// Filesystem image stored in a host file.
#[derive(Debug)]
pub struct FileDevice {
    file: Mutex<File>,
    num_blocks: u64,
    block_size: usize,
}

impl FileDevice {
    /// Opens an existing image; the block count is derived from its length.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file, BLOCK_SIZE)
    }

    /// Creates (or truncates) an image of `num_blocks` zeroed blocks.
    pub fn create<P: AsRef<Path>>(path: P, num_blocks: u64) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(num_blocks * BLOCK_SIZE as u64)?;
        Self::from_file(file, BLOCK_SIZE)
    }

    /// Wraps an already opened image with a caller-chosen block size.
    pub fn from_file(file: File, block_size: usize) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            num_blocks: len / block_size as u64,
            block_size,
        })
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "image file lock poisoned"))
    }
}

impl BlockDevice for FileDevice {
    fn num_blocks(&self) -> u64 {
        self.num_blocks
    }

    fn read_block(&self, block_no: u64, buf: &mut [u8]) -> io::Result<()> {
        check_request(self, block_no, buf.len())?;
        trace!("read block {block_no}");
        let mut f = self.lock()?;
        f.seek(SeekFrom::Start(block_no * self.block_size as u64))?;
        f.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&self, block_no: u64, buf: &[u8]) -> io::Result<()> {
        check_request(self, block_no, buf.len())?;
        trace!("write block {block_no}");
        let mut f = self.lock()?;
        f.seek(SeekFrom::Start(block_no * self.block_size as u64))?;
        f.write_all(buf)?;
        f.flush()?;
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.block_size
    }
}

/// Volatile device backed by a byte vector.
#[derive(Debug)]
pub struct RamDevice {
    inner: Mutex<Vec<u8>>,
    num_blocks: u64,
}

impl RamDevice {
    pub fn new(num_blocks: u64) -> Self {
        Self {
            inner: Mutex::new(vec![0u8; num_blocks as usize * BLOCK_SIZE]),
            num_blocks,
        }
    }
}

impl BlockDevice for RamDevice {
    fn num_blocks(&self) -> u64 {
        self.num_blocks
    }

    fn read_block(&self, block_no: u64, buf: &mut [u8]) -> io::Result<()> {
        check_request(self, block_no, buf.len())?;
        let start = block_no as usize * BLOCK_SIZE;
        let data = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "ram disk lock poisoned"))?;
        buf.copy_from_slice(&data[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_no: u64, buf: &[u8]) -> io::Result<()> {
        check_request(self, block_no, buf.len())?;
        let start = block_no as usize * BLOCK_SIZE;
        let mut data = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "ram disk lock poisoned"))?;
        data[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }
}

impl<D: BlockDevice + ?Sized> BlockDevice for std::sync::Arc<D> {
    fn num_blocks(&self) -> u64 {
        (**self).num_blocks()
    }

    fn read_block(&self, block_no: u64, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_block(block_no, buf)
    }

    fn write_block(&self, block_no: u64, buf: &[u8]) -> io::Result<()> {
        (**self).write_block(block_no, buf)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }
}

/// Allocates a zeroed block buffer.
pub(crate) fn block_buf() -> Vec<u8> {
    vec![0u8; BLOCK_SIZE]
}
