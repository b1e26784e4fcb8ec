//! Sub-resource groups.
//!
//! Each group borrows the client's [`Dispatcher`](crate::Dispatcher) and
//! maps its methods onto fixed API paths.

mod engines;
mod files;
mod finetunes;
mod images;
mod models;

pub use engines::Engines;
pub use files::Files;
pub use finetunes::Finetunes;
pub use images::Images;
pub use models::Models;
