//! Local file staging for the parsekit SDK.
//!
//! Downloads are materialised somewhere temporary by the transport; this crate
//! owns the directory they are persisted into and every mutation performed
//! there.
//!
//! - [`primitives`] - Synchronous atomic filesystem operations
//! - [`StagingConfig`] - Staging root resolution (private, app group, explicit)
//! - [`StagingManager`] - Queued, non-blocking mutations against that root

mod error;
pub mod primitives;
pub mod protection;
mod staging;

pub use error::{Error, Result};
pub use primitives::{atomic_write, copy_item, move_item, remove_dir_contents};
pub use protection::Protection;
pub use staging::{
    STAGING_DIRECTORY, StagingConfig, StagingManager, StorageScheme, WorkQueue, group_container,
    user_data, user_home,
};
