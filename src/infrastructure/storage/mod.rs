//! File-backed storage adapters: blob buckets and local device storage

pub mod blob;
pub mod local;

pub use blob::FsBlobStorage;
pub use local::{FileLocalStorage, MemoryLocalStorage};
