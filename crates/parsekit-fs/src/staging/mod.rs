//! Staging root resolution and the queued manager that mutates it.

mod dirs;
mod manager;
mod queue;
mod root;

pub use dirs::{group_container, user_data, user_home};
pub use manager::StagingManager;
pub use queue::WorkQueue;
pub use root::{STAGING_DIRECTORY, StagingConfig, StorageScheme};
