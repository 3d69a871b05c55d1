pub mod entry;
pub mod file;
