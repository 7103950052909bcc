use crate::fs::consts::{
    BLOCK_SIZE, DIR_ENTRY_SIZE, FILENAME_MAXLEN, FS_MAGIC, FS_VERSION, INODE_RECORD_SIZE,
    PERM_MASK, S_IFDIR, S_IFMT, S_IFREG, SUPERBLOCK_SIZE,
};
use crate::fs::error::{FsError, Result};
use std::fmt;

fn u64_at(buf: &[u8], off: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[off..off + 8]);
    u64::from_le_bytes(raw)
}

fn u32_at(buf: &[u8], off: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[off..off + 4]);
    u32::from_le_bytes(raw)
}

// Structure that represents the filesystem's Superblock - 40 B, rest of block 0 is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superblock {
    pub magic: u64,        // 8 B (offset 0..7)
    pub version: u64,      // 8 B (offset 8..15)
    pub block_size: u64,   // 8 B (offset 16..23)
    pub inodes_count: u64, // 8 B (offset 24..31)
    pub free_blocks: u64,  // 8 B (offset 32..39), bit i set => block i free
}

impl Superblock {
    pub fn new(inodes_count: u64, free_blocks: u64) -> Self {
        Self {
            magic: FS_MAGIC,
            version: FS_VERSION,
            block_size: BLOCK_SIZE as u64,
            inodes_count,
            free_blocks,
        }
    }

    pub fn serialize(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), BLOCK_SIZE);
        out.fill(0);
        out[0..8].copy_from_slice(&self.magic.to_le_bytes());
        out[8..16].copy_from_slice(&self.version.to_le_bytes());
        out[16..24].copy_from_slice(&self.block_size.to_le_bytes());
        out[24..32].copy_from_slice(&self.inodes_count.to_le_bytes());
        out[32..SUPERBLOCK_SIZE].copy_from_slice(&self.free_blocks.to_le_bytes());
    }

    pub fn deserialize(inp: &[u8]) -> Self {
        debug_assert!(inp.len() >= SUPERBLOCK_SIZE);
        Self {
            magic: u64_at(inp, 0),
            version: u64_at(inp, 8),
            block_size: u64_at(inp, 16),
            inodes_count: u64_at(inp, 24),
            free_blocks: u64_at(inp, 32),
        }
    }
}

/// Type of object a directory entry is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    File,
    Directory,
}

/// What `size_or_children` means for a record, chosen by the mode's type bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeKind {
    File { size: u64 },
    Directory { children: u64 },
}

impl InodeKind {
    fn type_bits(&self) -> u32 {
        match self {
            InodeKind::File { .. } => S_IFREG,
            InodeKind::Directory { .. } => S_IFDIR,
        }
    }

    fn raw(&self) -> u64 {
        match *self {
            InodeKind::File { size } => size,
            InodeKind::Directory { children } => children,
        }
    }
}

// Structure that represents one inode table slot - 32 B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeRecord {
    pub inode_no: u64,   // 8 (offset 0)
    pub perm: u32,       // 4 (offset 8), stored together with the type bits
    pub data_block: u64, // 8 (offset 16); offset 12..15 reserved
    pub kind: InodeKind, // 8 (offset 24)
}

impl InodeRecord {
    pub fn new_file(inode_no: u64, data_block: u64, perm: u32) -> Self {
        Self {
            inode_no,
            perm: perm & PERM_MASK,
            data_block,
            kind: InodeKind::File { size: 0 },
        }
    }

    pub fn new_dir(inode_no: u64, data_block: u64, perm: u32) -> Self {
        Self {
            inode_no,
            perm: perm & PERM_MASK,
            data_block,
            kind: InodeKind::Directory { children: 0 },
        }
    }

    /// Full on-disk mode: type bits plus permission bits.
    pub fn mode(&self) -> u32 {
        self.kind.type_bits() | (self.perm & PERM_MASK)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, InodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, InodeKind::File { .. })
    }

    pub fn size(&self) -> Option<u64> {
        match self.kind {
            InodeKind::File { size } => Some(size),
            InodeKind::Directory { .. } => None,
        }
    }

    pub fn children(&self) -> Option<u64> {
        match self.kind {
            InodeKind::Directory { children } => Some(children),
            InodeKind::File { .. } => None,
        }
    }

    pub fn serialize(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), INODE_RECORD_SIZE);
        out[0..8].copy_from_slice(&self.inode_no.to_le_bytes());
        out[8..12].copy_from_slice(&self.mode().to_le_bytes());
        out[12..16].fill(0);
        out[16..24].copy_from_slice(&self.data_block.to_le_bytes());
        out[24..32].copy_from_slice(&self.kind.raw().to_le_bytes());
    }

    /// `slot` is only used to describe a corrupted record.
    pub fn deserialize(inp: &[u8], slot: u64) -> Result<Self> {
        debug_assert_eq!(inp.len(), INODE_RECORD_SIZE);
        let mode = u32_at(inp, 8);
        let raw = u64_at(inp, 24);
        let kind = match mode & S_IFMT {
            S_IFREG => InodeKind::File { size: raw },
            S_IFDIR => InodeKind::Directory { children: raw },
            _ => return Err(FsError::CorruptedInode { slot, mode }),
        };
        Ok(Self {
            inode_no: u64_at(inp, 0),
            perm: mode & PERM_MASK,
            data_block: u64_at(inp, 16),
            kind,
        })
    }
}

// One slot of a directory's entry array - 264 B
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: [u8; FILENAME_MAXLEN], // NUL padded
    pub inode_no: u64,
}

impl DirectoryEntry {
    pub fn from_name(name: &str, inode_no: u64) -> Result<Self> {
        validate_name(name)?;
        let mut buf = [0u8; FILENAME_MAXLEN];
        buf[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self {
            name: buf,
            inode_no,
        })
    }

    fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FILENAME_MAXLEN);
        &self.name[..end]
    }

    pub fn name_str(&self) -> &str {
        std::str::from_utf8(self.name_bytes()).unwrap_or("<invalid>")
    }

    pub fn name_eq(&self, name: &str) -> bool {
        self.name_bytes() == name.as_bytes()
    }

    pub fn serialize(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), DIR_ENTRY_SIZE);
        out[0..FILENAME_MAXLEN].copy_from_slice(&self.name);
        out[FILENAME_MAXLEN] = 0;
        out[FILENAME_MAXLEN + 1..DIR_ENTRY_SIZE].copy_from_slice(&self.inode_no.to_le_bytes());
    }

    pub fn deserialize(inp: &[u8]) -> Self {
        debug_assert_eq!(inp.len(), DIR_ENTRY_SIZE);
        let mut name = [0u8; FILENAME_MAXLEN];
        name.copy_from_slice(&inp[0..FILENAME_MAXLEN]);
        Self {
            name,
            inode_no: u64_at(inp, FILENAME_MAXLEN + 1),
        }
    }
}

impl fmt::Debug for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DirectoryEntry({}, inode={})",
            self.name_str(),
            self.inode_no
        )
    }
}

/// Accepts 1..=255 bytes without '/' or NUL, excluding "." and "..".
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.len() > FILENAME_MAXLEN
        || name == "."
        || name == ".."
        || name.bytes().any(|b| b == b'/' || b == 0)
    {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}
