//! Free-block bitmap allocator. Bit i of `free_blocks` set means block i is free.

use crate::fs::consts::{FIRST_ALLOCATABLE_BLOCK, MAX_OBJECTS, RESERVED_BLOCKS};
use crate::fs::device::BlockDevice;
use crate::fs::error::{FsError, Result};
use crate::fs::layout::Superblock;
use crate::fs::superblock::persist;
use log::{debug, warn};

pub fn is_block_free(sb: &Superblock, block: u64) -> bool {
    block < MAX_OBJECTS && sb.free_blocks & (1u64 << block) != 0
}

pub fn free_block_count(sb: &Superblock) -> u64 {
    sb.free_blocks.count_ones() as u64
}

/// Takes the lowest free block at or above the scan start and persists the
/// superblock before returning it. Only blocks the device actually has and
/// that are not reserved are considered.
pub fn allocate_block(device: &impl BlockDevice, sb: &mut Superblock) -> Result<u64> {
    let end = device.num_blocks().min(MAX_OBJECTS);
    let start = FIRST_ALLOCATABLE_BLOCK.max(RESERVED_BLOCKS);
    let Some(block) = (start..end).find(|&b| is_block_free(sb, b)) else {
        warn!("allocation failed: bitmap exhausted");
        return Err(FsError::NoSpace);
    };

    sb.free_blocks &= !(1u64 << block);
    persist(device, sb)?;
    debug!("allocated block {block}, {} left", free_block_count(sb));
    Ok(block)
}
