//! Content of regular files: exactly one data block, bounded by the recorded size.

use crate::fs::consts::BLOCK_SIZE;
use crate::fs::device::{BlockDevice, block_buf};
use crate::fs::error::{FsError, Result};
use crate::fs::inode_table;
use crate::fs::layout::{InodeKind, InodeRecord, Superblock};
use log::debug;

/// Reads up to `length` bytes starting at `offset`. Reading at or past the
/// end of the file yields an empty vector.
pub fn read(
    device: &impl BlockDevice,
    inode: &InodeRecord,
    offset: u64,
    length: usize,
) -> Result<Vec<u8>> {
    let size = inode.size().ok_or(FsError::NotAFile)?;
    let size = size.min(BLOCK_SIZE as u64);
    if offset >= size {
        return Ok(Vec::new());
    }

    let start = offset as usize;
    let end = start + length.min((size - offset) as usize);
    let mut block = block_buf();
    device.read_block(inode.data_block, &mut block)?;
    Ok(block[start..end].to_vec())
}

/// Writes `data` at `offset` and sets the size to `offset + data.len()`.
/// `inode` is updated in memory and in the table.
pub fn write(
    device: &impl BlockDevice,
    sb: &Superblock,
    inode: &mut InodeRecord,
    offset: u64,
    data: &[u8],
) -> Result<usize> {
    if !inode.is_file() {
        return Err(FsError::NotAFile);
    }
    let end = offset
        .checked_add(data.len() as u64)
        .filter(|&end| end <= BLOCK_SIZE as u64)
        .ok_or(FsError::FileTooLarge)?;

    let mut block = block_buf();
    device.read_block(inode.data_block, &mut block)?;
    block[offset as usize..end as usize].copy_from_slice(data);
    device.write_block(inode.data_block, &block)?;

    inode.kind = InodeKind::File { size: end };
    inode_table::update(device, sb, inode)?;
    debug!(
        "inode {}: wrote {} B at {offset}, size now {end}",
        inode.inode_no,
        data.len()
    );
    Ok(data.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::consts::{MAX_OBJECTS, ROOT_INODE_NO};
    use crate::fs::device::RamDevice;
    use crate::fs::directory::create_entry;
    use crate::fs::layout::ObjectKind;
    use crate::fs::superblock::format;

    fn with_file() -> (RamDevice, Superblock, InodeRecord) {
        let dev = RamDevice::new(MAX_OBJECTS);
        let mut sb = format(&dev).unwrap();
        let ino = create_entry(&dev, &mut sb, ROOT_INODE_NO, "f", ObjectKind::File, 0o644).unwrap();
        let rec = inode_table::find_by_id(&dev, &sb, ino).unwrap();
        (dev, sb, rec)
    }

    #[test]
    fn round_trip_sets_size() {
        let (dev, sb, mut rec) = with_file();
        let payload = b"hello block world";
        assert_eq!(write(&dev, &sb, &mut rec, 0, payload).unwrap(), payload.len());

        let stored = inode_table::find_by_id(&dev, &sb, rec.inode_no).unwrap();
        assert_eq!(stored.size(), Some(payload.len() as u64));
        assert_eq!(read(&dev, &stored, 0, payload.len()).unwrap(), payload);
    }

    #[test]
    fn repeated_reads_match() {
        let (dev, sb, mut rec) = with_file();
        write(&dev, &sb, &mut rec, 0, b"stable").unwrap();
        let first = read(&dev, &rec, 0, 6).unwrap();
        let second = read(&dev, &rec, 0, 6).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reads_past_end_are_empty() {
        let (dev, sb, mut rec) = with_file();
        write(&dev, &sb, &mut rec, 0, b"0123456789").unwrap();
        assert!(read(&dev, &rec, 10, 5).unwrap().is_empty());
        assert!(read(&dev, &rec, 15, 5).unwrap().is_empty());
        assert_eq!(read(&dev, &rec, 8, 100).unwrap(), b"89");
    }

    #[test]
    fn fresh_file_reads_empty() {
        let (dev, _sb, rec) = with_file();
        assert!(read(&dev, &rec, 0, 64).unwrap().is_empty());
    }

    #[test]
    fn offset_write_sets_size_to_end_of_write() {
        let (dev, sb, mut rec) = with_file();
        write(&dev, &sb, &mut rec, 0, b"abcdefgh").unwrap();
        write(&dev, &sb, &mut rec, 2, b"XY").unwrap();
        assert_eq!(rec.size(), Some(4));
        assert_eq!(read(&dev, &rec, 0, 16).unwrap(), b"abXY");
    }

    #[test]
    fn block_sized_write_fits() {
        let (dev, sb, mut rec) = with_file();
        let full = vec![0x5Au8; BLOCK_SIZE];
        write(&dev, &sb, &mut rec, 0, &full).unwrap();
        assert_eq!(read(&dev, &rec, 0, usize::MAX).unwrap(), full);
    }

    #[test]
    fn overflowing_write_changes_nothing() {
        let (dev, sb, mut rec) = with_file();
        write(&dev, &sb, &mut rec, 0, b"keep").unwrap();
        let err = write(&dev, &sb, &mut rec, BLOCK_SIZE as u64 - 2, b"toolong").unwrap_err();
        assert!(matches!(err, FsError::FileTooLarge));
        let err = write(&dev, &sb, &mut rec, u64::MAX, b"x").unwrap_err();
        assert!(matches!(err, FsError::FileTooLarge));

        let stored = inode_table::find_by_id(&dev, &sb, rec.inode_no).unwrap();
        assert_eq!(stored.size(), Some(4));
        assert_eq!(read(&dev, &stored, 0, 4).unwrap(), b"keep");
    }

    #[test]
    fn directories_have_no_content() {
        let (dev, sb, _) = with_file();
        let mut root = inode_table::find_by_id(&dev, &sb, ROOT_INODE_NO).unwrap();
        assert!(matches!(read(&dev, &root, 0, 1), Err(FsError::NotAFile)));
        assert!(matches!(write(&dev, &sb, &mut root, 0, b"x"), Err(FsError::NotAFile)));
    }
}
