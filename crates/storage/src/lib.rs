#![forbid(unsafe_code)]

pub mod kv;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError, keys};
