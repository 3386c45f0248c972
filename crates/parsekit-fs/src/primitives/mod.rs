pub mod atomic_write;
pub mod copy;
pub mod relocate;

pub use atomic_write::{Options, atomic_write};
pub use copy::copy_item;
pub use relocate::{move_item, remove_dir_contents};
