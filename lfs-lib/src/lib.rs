pub mod error;
pub mod ids;
pub mod serde;
pub mod quality;
pub mod path;
pub mod media;
