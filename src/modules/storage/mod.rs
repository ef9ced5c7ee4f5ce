//! Storage module for uploaded report images
//!
//! Provides a local-directory store with collision-resistant file names,
//! extension allow-listing and best-effort removal.

mod local_storage;

pub use local_storage::{LocalStorage, UploadedFile};
