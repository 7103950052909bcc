//! The inode table: one block of packed 32 B records, append-only.
//!
//! Only the first `inodes_count` slots are meaningful; everything after is
//! ignored. All functions expect the caller to hold the filesystem lock,
//! which is what the `&mut Superblock` / `&Superblock` argument stands for.

use crate::fs::consts::{INODE_RECORD_SIZE, INODE_TABLE_BLOCK, MAX_OBJECTS};
use crate::fs::device::{BlockDevice, block_buf};
use crate::fs::error::{FsError, Result};
use crate::fs::layout::{InodeRecord, Superblock};
use crate::fs::superblock::persist;
use log::{debug, error};

fn slot_range(slot: u64) -> std::ops::Range<usize> {
    let start = slot as usize * INODE_RECORD_SIZE;
    start..start + INODE_RECORD_SIZE
}

fn read_table(device: &impl BlockDevice) -> Result<Vec<u8>> {
    let mut table = block_buf();
    device.read_block(INODE_TABLE_BLOCK, &mut table)?;
    Ok(table)
}

/// Finds the slot index holding `inode_no` in an already loaded table block.
fn find_slot(table: &[u8], sb: &Superblock, inode_no: u64) -> Result<Option<(u64, InodeRecord)>> {
    for slot in 0..sb.inodes_count {
        let rec = InodeRecord::deserialize(&table[slot_range(slot)], slot)?;
        if rec.inode_no == inode_no {
            return Ok(Some((slot, rec)));
        }
    }
    Ok(None)
}

/// Writes `record` into the next free slot, then bumps and persists `inodes_count`.
pub fn append(device: &impl BlockDevice, sb: &mut Superblock, record: &InodeRecord) -> Result<()> {
    if sb.inodes_count >= MAX_OBJECTS {
        return Err(FsError::TableFull);
    }
    let mut table = read_table(device)?;
    record.serialize(&mut table[slot_range(sb.inodes_count)]);
    device.write_block(INODE_TABLE_BLOCK, &table)?;

    sb.inodes_count += 1;
    persist(device, sb)?;
    debug!(
        "inode {} appended at slot {}",
        record.inode_no,
        sb.inodes_count - 1
    );
    Ok(())
}

pub fn find_by_id(
    device: &impl BlockDevice,
    sb: &Superblock,
    inode_no: u64,
) -> Result<InodeRecord> {
    let table = read_table(device)?;
    find_slot(&table, sb, inode_no)?
        .map(|(_, rec)| rec)
        .ok_or(FsError::NotFound)
}

/// Overwrites the slot of `record.inode_no` in place.
pub fn update(device: &impl BlockDevice, sb: &Superblock, record: &InodeRecord) -> Result<()> {
    let mut table = read_table(device)?;
    let Some((slot, _)) = find_slot(&table, sb, record.inode_no)? else {
        error!("update of inode {} which was never appended", record.inode_no);
        return Err(FsError::NotFound);
    };
    record.serialize(&mut table[slot_range(slot)]);
    device.write_block(INODE_TABLE_BLOCK, &table)?;
    debug!("inode {} updated in slot {slot}", record.inode_no);
    Ok(())
}

/// All populated records in slot order.
pub fn load_all(device: &impl BlockDevice, sb: &Superblock) -> Result<Vec<InodeRecord>> {
    let table = read_table(device)?;
    (0..sb.inodes_count)
        .map(|slot| InodeRecord::deserialize(&table[slot_range(slot)], slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::consts::ROOT_INODE_NO;
    use crate::fs::device::RamDevice;
    use crate::fs::layout::InodeKind;
    use crate::fs::superblock::{format, mount};

    fn formatted() -> (RamDevice, Superblock) {
        let dev = RamDevice::new(MAX_OBJECTS);
        let sb = format(&dev).unwrap();
        (dev, sb)
    }

    #[test]
    fn append_and_find() {
        let (dev, mut sb) = formatted();
        let rec = InodeRecord::new_file(2, 3, 0o644);
        append(&dev, &mut sb, &rec).unwrap();
        assert_eq!(sb.inodes_count, 2);
        assert_eq!(mount(&dev).unwrap().inodes_count, 2);
        assert_eq!(find_by_id(&dev, &sb, 2).unwrap(), rec);
        assert!(find_by_id(&dev, &sb, ROOT_INODE_NO).unwrap().is_dir());
    }

    #[test]
    fn missing_id_is_not_found() {
        let (dev, sb) = formatted();
        assert!(matches!(find_by_id(&dev, &sb, 9), Err(FsError::NotFound)));
    }

    #[test]
    fn slots_past_count_are_ignored() {
        let (dev, mut sb) = formatted();
        append(&dev, &mut sb, &InodeRecord::new_file(2, 3, 0o644)).unwrap();
        // Pretend the append never happened: the record is still in the block
        sb.inodes_count = 1;
        assert!(matches!(find_by_id(&dev, &sb, 2), Err(FsError::NotFound)));
    }

    #[test]
    fn update_in_place() {
        let (dev, mut sb) = formatted();
        let mut rec = InodeRecord::new_file(2, 3, 0o644);
        append(&dev, &mut sb, &rec).unwrap();
        append(&dev, &mut sb, &InodeRecord::new_dir(3, 4, 0o755)).unwrap();

        rec.kind = InodeKind::File { size: 42 };
        update(&dev, &sb, &rec).unwrap();
        assert_eq!(find_by_id(&dev, &sb, 2).unwrap().size(), Some(42));
        assert!(find_by_id(&dev, &sb, 3).unwrap().is_dir());
        assert_eq!(load_all(&dev, &sb).unwrap().len(), 3);
    }

    #[test]
    fn update_of_unknown_inode_fails() {
        let (dev, sb) = formatted();
        let rec = InodeRecord::new_file(17, 5, 0o644);
        assert!(matches!(update(&dev, &sb, &rec), Err(FsError::NotFound)));
    }

    #[test]
    fn full_table_rejects_append() {
        let (dev, mut sb) = formatted();
        for ino in 2..=MAX_OBJECTS {
            append(&dev, &mut sb, &InodeRecord::new_file(ino, 3, 0o644)).unwrap();
        }
        assert_eq!(sb.inodes_count, MAX_OBJECTS);
        let extra = InodeRecord::new_file(MAX_OBJECTS + 1, 3, 0o644);
        assert!(matches!(append(&dev, &mut sb, &extra), Err(FsError::TableFull)));
        assert_eq!(load_all(&dev, &sb).unwrap().len(), MAX_OBJECTS as usize);
    }
}
