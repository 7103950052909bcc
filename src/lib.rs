//! minifs: a tiny inode filesystem where every object owns exactly one block,
//! plus the interactive shell that drives it over an image file.

pub mod commands;
pub mod context;
pub mod fs;
pub mod utils;
