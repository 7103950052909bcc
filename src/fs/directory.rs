//! Directory engine. A directory's data block is a packed array of
//! `DirectoryEntry` slots; the first `children` slots are live, in append order.

use crate::fs::allocator::allocate_block;
use crate::fs::consts::{DIR_ENTRY_SIZE, DIR_MAX_ENTRIES, MAX_OBJECTS};
use crate::fs::device::{BlockDevice, block_buf};
use crate::fs::error::{FsError, Result};
use crate::fs::inode_table;
use crate::fs::layout::{
    DirectoryEntry, InodeKind, InodeRecord, ObjectKind, Superblock, validate_name,
};
use log::{debug, warn};

fn entry_range(index: u64) -> std::ops::Range<usize> {
    let start = index as usize * DIR_ENTRY_SIZE;
    start..start + DIR_ENTRY_SIZE
}

fn children_of(dir: &InodeRecord) -> Result<u64> {
    dir.children().ok_or(FsError::NotADirectory)
}

fn entries_in(block: &[u8], children: u64) -> Vec<DirectoryEntry> {
    (0..children.min(DIR_MAX_ENTRIES))
        .map(|i| DirectoryEntry::deserialize(&block[entry_range(i)]))
        .collect()
}

/// The live entries of `dir`, exactly `children` of them, in storage order.
pub fn list(device: &impl BlockDevice, dir: &InodeRecord) -> Result<Vec<DirectoryEntry>> {
    let children = children_of(dir)?;
    let mut block = block_buf();
    device.read_block(dir.data_block, &mut block)?;
    Ok(entries_in(&block, children))
}

/// Inode number of the first entry named `name`.
pub fn lookup(device: &impl BlockDevice, dir: &InodeRecord, name: &str) -> Result<u64> {
    list(device, dir)?
        .iter()
        .find(|e| e.name_eq(name))
        .map(|e| e.inode_no)
        .ok_or(FsError::NotFound)
}

/// Creates a new object under `parent_no` and links it as `name`.
///
/// Every check that can fail without I/O runs before the data block is
/// allocated, and the block is allocated before the inode record is
/// appended, so a rejected call leaves the bitmap, table and parent as
/// they were.
pub fn create_entry(
    device: &impl BlockDevice,
    sb: &mut Superblock,
    parent_no: u64,
    name: &str,
    kind: ObjectKind,
    perm: u32,
) -> Result<u64> {
    let mut parent = inode_table::find_by_id(device, sb, parent_no)?;
    let children = children_of(&parent)?;
    validate_name(name)?;
    if children >= DIR_MAX_ENTRIES {
        warn!("directory {parent_no} is full ({children} entries)");
        return Err(FsError::DirectoryFull);
    }

    let mut parent_block = block_buf();
    device.read_block(parent.data_block, &mut parent_block)?;
    if entries_in(&parent_block, children)
        .iter()
        .any(|e| e.name_eq(name))
    {
        return Err(FsError::AlreadyExists);
    }

    let inode_no = sb.inodes_count + 1;
    if inode_no > MAX_OBJECTS {
        warn!("refusing inode {inode_no}: limit is {MAX_OBJECTS}");
        return Err(FsError::TooManyObjects);
    }

    let entry = DirectoryEntry::from_name(name, inode_no)?;
    let data_block = allocate_block(device, sb)?;
    device.write_block(data_block, &block_buf())?;

    let record = match kind {
        ObjectKind::File => InodeRecord::new_file(inode_no, data_block, perm),
        ObjectKind::Directory => InodeRecord::new_dir(inode_no, data_block, perm),
    };
    inode_table::append(device, sb, &record)?;

    entry.serialize(&mut parent_block[entry_range(children)]);
    device.write_block(parent.data_block, &parent_block)?;
    parent.kind = InodeKind::Directory {
        children: children + 1,
    };
    inode_table::update(device, sb, &parent)?;

    debug!("created {kind:?} {name:?} as inode {inode_no} (block {data_block}) in {parent_no}");
    Ok(inode_no)
}
