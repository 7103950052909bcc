pub const FS_MAGIC: u64 = 0x2020_0406;
pub const FS_VERSION: u64 = 1;
pub const BLOCK_SIZE: usize = 4096;

// Fixed block numbers
pub const SUPERBLOCK_BLOCK: u64 = 0;
pub const INODE_TABLE_BLOCK: u64 = 1;
pub const ROOT_DIR_BLOCK: u64 = 2;
pub const FIRST_ALLOCATABLE_BLOCK: u64 = 2; // allocator scan start
pub const RESERVED_BLOCKS: u64 = 3;

pub const ROOT_INODE_NO: u64 = 1;
pub const MAX_OBJECTS: u64 = 64; // inode table capacity, also bitmap width

pub const SUPERBLOCK_SIZE: usize = 40; // 5 x u64
pub const INODE_RECORD_SIZE: usize = 32; // 32 B
pub const FILENAME_MAXLEN: usize = 255;
pub const DIR_ENTRY_SIZE: usize = 264; // name (255) + pad (1) + inode_no (8)
pub const DIR_MAX_ENTRIES: u64 = (BLOCK_SIZE / DIR_ENTRY_SIZE) as u64; // 15

// Mode bits (POSIX layout)
pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;
pub const PERM_MASK: u32 = 0o7777;
pub const DEFAULT_DIR_PERM: u32 = 0o755;
pub const DEFAULT_FILE_PERM: u32 = 0o644;

pub const DEFAULT_FS_BYTES: u64 = MAX_OBJECTS * BLOCK_SIZE as u64; // 256 KiB
