#![forbid(unsafe_code)]

pub mod remote;
pub mod repository;
pub mod sqlite;

pub use repository::{ProgressRepository, SessionStore, Storage, StorageError, TokenSource};
