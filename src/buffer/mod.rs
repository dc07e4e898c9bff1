//! Buffer module - in-memory state for open files
//!
//! The store maps absolute file paths to records holding the last known
//! content, dirty flag and selection. Everything else in the core (the
//! navigation stack, session persistence, the launch server) works in terms
//! of these records.

mod store;

pub use store::{BufferStore, FileRecord};
