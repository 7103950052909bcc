//! Superblock manager: mount-time validation, persistence, and format.

use crate::fs::consts::{
    BLOCK_SIZE, DEFAULT_DIR_PERM, FS_MAGIC, INODE_RECORD_SIZE, INODE_TABLE_BLOCK, MAX_OBJECTS,
    RESERVED_BLOCKS, ROOT_DIR_BLOCK, ROOT_INODE_NO, SUPERBLOCK_BLOCK, SUPERBLOCK_SIZE,
};
use crate::fs::device::{BlockDevice, block_buf};
use crate::fs::error::{FsError, Result};
use crate::fs::layout::{InodeRecord, Superblock};
use log::{debug, info};

/// Reads block 0 and checks it describes a filesystem this engine can drive.
pub fn mount(device: &impl BlockDevice) -> Result<Superblock> {
    let expected = device.block_size() as u64;
    if (expected as usize) < SUPERBLOCK_SIZE {
        return Err(FsError::InvalidBlockSize {
            found: BLOCK_SIZE as u64,
            expected,
        });
    }
    // Sized by the device so a foreign block size still yields a readable header
    let mut block0 = vec![0u8; expected as usize];
    device.read_block(SUPERBLOCK_BLOCK, &mut block0)?;
    let sb = Superblock::deserialize(&block0);

    if sb.magic != FS_MAGIC {
        return Err(FsError::InvalidMagic { found: sb.magic });
    }
    if sb.block_size != expected || expected != BLOCK_SIZE as u64 {
        return Err(FsError::InvalidBlockSize {
            found: sb.block_size,
            expected,
        });
    }
    if sb.inodes_count > MAX_OBJECTS {
        return Err(FsError::CorruptedSuperblock {
            field: "inodes_count",
            value: sb.inodes_count,
        });
    }
    // Reserved blocks and blocks the device lacks can never be free
    if sb.free_blocks & !initial_free_bitmap(device.num_blocks()) != 0 {
        return Err(FsError::CorruptedSuperblock {
            field: "free_blocks",
            value: sb.free_blocks,
        });
    }

    info!(
        "mounted: version={} inodes={} free_blocks={:#018x}",
        sb.version, sb.inodes_count, sb.free_blocks
    );
    Ok(sb)
}

/// Overwrites block 0 with `sb`.
pub fn persist(device: &impl BlockDevice, sb: &Superblock) -> Result<()> {
    let mut block0 = block_buf();
    sb.serialize(&mut block0);
    device.write_block(SUPERBLOCK_BLOCK, &block0)?;
    debug!(
        "superblock persisted: inodes={} free_blocks={:#018x}",
        sb.inodes_count, sb.free_blocks
    );
    Ok(())
}

/// Initial bitmap: every block the device has, minus the reserved ones.
pub fn initial_free_bitmap(num_blocks: u64) -> u64 {
    let present = if num_blocks >= MAX_OBJECTS {
        u64::MAX
    } else {
        (1u64 << num_blocks) - 1
    };
    present & !((1u64 << RESERVED_BLOCKS) - 1)
}

/// Writes an empty filesystem: root directory (inode 1, block 2) and nothing else.
pub fn format(device: &impl BlockDevice) -> Result<Superblock> {
    let num_blocks = device.num_blocks();
    if num_blocks < RESERVED_BLOCKS {
        return Err(FsError::DeviceTooSmall(num_blocks));
    }
    let expected = device.block_size() as u64;
    if expected != BLOCK_SIZE as u64 {
        return Err(FsError::InvalidBlockSize {
            found: BLOCK_SIZE as u64,
            expected,
        });
    }

    // Root directory content: no entries yet
    device.write_block(ROOT_DIR_BLOCK, &block_buf())?;

    // Inode table with only the root record
    let mut table = block_buf();
    InodeRecord::new_dir(ROOT_INODE_NO, ROOT_DIR_BLOCK, DEFAULT_DIR_PERM)
        .serialize(&mut table[..INODE_RECORD_SIZE]);
    device.write_block(INODE_TABLE_BLOCK, &table)?;

    let sb = Superblock::new(1, initial_free_bitmap(num_blocks));
    persist(device, &sb)?;

    info!(
        "formatted {} blocks ({} B), {} data blocks free",
        num_blocks,
        num_blocks * BLOCK_SIZE as u64,
        sb.free_blocks.count_ones()
    );
    Ok(sb)
}
