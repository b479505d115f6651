pub mod error;
pub use error::{FsError, SharedError};

pub mod gallery;
pub use gallery::Gallery;

pub mod entity;
pub use entity::{Entity, Kind, Attributes};

pub mod content;
pub mod index;
pub use index::PathIndex;

pub mod tree;
pub use tree::TreeBuilder;

pub mod adapter;
pub use adapter::{Filesystem, DirEntry, OpenFlags};

#[cfg(test)]
pub mod fake;
