//! Storage abstraction and implementations for deskwell.
//!
//! This crate provides the append/query contract the pipeline and the
//! progression engine consume, with a JSON-file reference backend and an
//! in-memory backend.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Result, Storage, StorageError};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
