pub mod allocator;
pub mod consts;
pub mod device;
pub mod directory;
pub mod error;
pub mod file;
pub mod filesystem;
pub mod inode_table;
pub mod layout;
pub mod path;
pub mod superblock;

pub use device::{BlockDevice, FileDevice, RamDevice};
pub use error::{FsError, Result};
pub use filesystem::{FileSystem, FsStats};
pub use layout::{DirectoryEntry, InodeKind, InodeRecord, ObjectKind, Superblock};
pub use path::WorkingDir;
