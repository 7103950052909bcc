use crate::fs::allocator::{free_block_count, is_block_free};
use crate::fs::consts::{
    BLOCK_SIZE, DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, MAX_OBJECTS, RESERVED_BLOCKS, ROOT_INODE_NO,
};
use crate::fs::device::BlockDevice;
use crate::fs::error::{FsError, Result};
use crate::fs::layout::{DirectoryEntry, InodeRecord, ObjectKind, Superblock};
use crate::fs::{directory, file, inode_table, superblock};
use std::sync::{Mutex, MutexGuard};

/// Usage figures reported by `statfs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    pub block_size: u64,
    pub total_blocks: u64,
    pub used_blocks: u64,
    pub free_blocks: u64,
    pub inodes_used: u64,
    pub inodes_free: u64,
    pub directories: u64,
    pub files: u64,
}

/// A mounted filesystem.
///
/// The superblock lives behind one mutex. Every operation takes it for its
/// whole duration and hands the guarded `Superblock` down to the components,
/// so allocations, inode appends and directory updates never interleave.
pub struct FileSystem<D: BlockDevice> {
    device: D,
    sb: Mutex<Superblock>,
}

impl<D: BlockDevice> FileSystem<D> {
    /// Formats `device` and mounts the result.
    pub fn format(device: D) -> Result<Self> {
        let sb = superblock::format(&device)?;
        Ok(Self {
            device,
            sb: Mutex::new(sb),
        })
    }

    pub fn mount(device: D) -> Result<Self> {
        let sb = superblock::mount(&device)?;
        Ok(Self {
            device,
            sb: Mutex::new(sb),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Superblock>> {
        self.sb.lock().map_err(|_| FsError::LockPoisoned)
    }

    pub fn root_inode_no(&self) -> u64 {
        ROOT_INODE_NO
    }

    /// Copy of the in-memory superblock.
    pub fn superblock(&self) -> Result<Superblock> {
        Ok(*self.lock()?)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn inode(&self, inode_no: u64) -> Result<InodeRecord> {
        let sb = self.lock()?;
        inode_table::find_by_id(&self.device, &sb, inode_no)
    }

    pub fn lookup(&self, dir_no: u64, name: &str) -> Result<u64> {
        let sb = self.lock()?;
        let dir = inode_table::find_by_id(&self.device, &sb, dir_no)?;
        directory::lookup(&self.device, &dir, name)
    }

    pub fn list(&self, dir_no: u64) -> Result<Vec<DirectoryEntry>> {
        let sb = self.lock()?;
        let dir = inode_table::find_by_id(&self.device, &sb, dir_no)?;
        directory::list(&self.device, &dir)
    }

    /// Creates an empty regular file; returns its inode number.
    pub fn create(&self, parent_no: u64, name: &str) -> Result<u64> {
        self.create_with_perm(parent_no, name, ObjectKind::File, DEFAULT_FILE_PERM)
    }

    /// Creates an empty directory; returns its inode number.
    pub fn mkdir(&self, parent_no: u64, name: &str) -> Result<u64> {
        self.create_with_perm(parent_no, name, ObjectKind::Directory, DEFAULT_DIR_PERM)
    }

    pub fn create_with_perm(
        &self,
        parent_no: u64,
        name: &str,
        kind: ObjectKind,
        perm: u32,
    ) -> Result<u64> {
        let mut sb = self.lock()?;
        directory::create_entry(&self.device, &mut sb, parent_no, name, kind, perm)
    }

    pub fn read(&self, inode_no: u64, offset: u64, length: usize) -> Result<Vec<u8>> {
        let sb = self.lock()?;
        let inode = inode_table::find_by_id(&self.device, &sb, inode_no)?;
        file::read(&self.device, &inode, offset, length)
    }

    pub fn write(&self, inode_no: u64, offset: u64, data: &[u8]) -> Result<usize> {
        let sb = self.lock()?;
        let mut inode = inode_table::find_by_id(&self.device, &sb, inode_no)?;
        file::write(&self.device, &sb, &mut inode, offset, data)
    }

    /// Whole content of a regular file.
    pub fn read_all(&self, inode_no: u64) -> Result<Vec<u8>> {
        self.read(inode_no, 0, BLOCK_SIZE)
    }

    pub fn stat(&self) -> Result<FsStats> {
        let sb = self.lock()?;
        let records = inode_table::load_all(&self.device, &sb)?;
        let directories = records.iter().filter(|r| r.is_dir()).count() as u64;
        let total_blocks = self.device.num_blocks().min(MAX_OBJECTS);
        let free_blocks = free_block_count(&sb);
        Ok(FsStats {
            block_size: sb.block_size,
            total_blocks,
            used_blocks: total_blocks.saturating_sub(free_blocks),
            free_blocks,
            inodes_used: sb.inodes_count,
            inodes_free: MAX_OBJECTS.saturating_sub(sb.inodes_count),
            directories,
            files: sb.inodes_count.saturating_sub(directories),
        })
    }

    /// Checks that the bitmap marks exactly the reserved blocks and the
    /// blocks owned by inodes as used, and that no two inodes share a block
    /// or a number.
    pub fn check_consistency(&self) -> Result<bool> {
        let sb = self.lock()?;
        let records = inode_table::load_all(&self.device, &sb)?;
        let mut owned = 0u64;
        for r in &records {
            if r.data_block >= MAX_OBJECTS || owned & (1 << r.data_block) != 0 {
                return Ok(false);
            }
            owned |= 1 << r.data_block;
        }
        let mut numbers: Vec<u64> = records.iter().map(|r| r.inode_no).collect();
        numbers.sort_unstable();
        numbers.dedup();
        if numbers.len() != records.len() {
            return Ok(false);
        }

        let total = self.device.num_blocks().min(MAX_OBJECTS);
        let expected_used = (0..total)
            .filter(|&b| b < RESERVED_BLOCKS || owned & (1 << b) != 0)
            .count() as u64;
        let actual_used = (0..total).filter(|&b| !is_block_free(&sb, b)).count() as u64;
        Ok(expected_used == actual_used
            && (0..total).all(|b| owned & (1 << b) == 0 || !is_block_free(&sb, b)))
    }
}
