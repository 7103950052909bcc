use crate::fs::consts::{BLOCK_SIZE, FILENAME_MAXLEN, MAX_OBJECTS};
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FsError {
    #[error("invalid filesystem magic {found:#x}")]
    InvalidMagic { found: u64 },
    #[error("block size {found} does not match device block size {expected}")]
    InvalidBlockSize { found: u64, expected: u64 },
    #[error("no free data block left")]
    NoSpace,
    #[error("object limit of {MAX_OBJECTS} reached")]
    TooManyObjects,
    #[error("inode table is full")]
    TableFull,
    #[error("directory block cannot hold another entry")]
    DirectoryFull,
    #[error("not found")]
    NotFound,
    #[error("content would exceed one {BLOCK_SIZE} B block")]
    FileTooLarge,
    #[error("not a directory")]
    NotADirectory,
    #[error("not a regular file")]
    NotAFile,
    #[error("invalid name {0:?} (1..={FILENAME_MAXLEN} bytes, no '/' or NUL, not . or ..)")]
    InvalidName(String),
    #[error("entry already exists")]
    AlreadyExists,
    #[error("device has {0} blocks, at least 3 are required")]
    DeviceTooSmall(u64),
    #[error("inode slot {slot} holds an unknown mode {mode:#o}")]
    CorruptedInode { slot: u64, mode: u32 },
    #[error("corrupted superblock: {field} = {value:#x}")]
    CorruptedSuperblock { field: &'static str, value: u64 },
    #[error("filesystem lock poisoned")]
    LockPoisoned,
    #[error("device I/O error: {0}")]
    DeviceIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;
