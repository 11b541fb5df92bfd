//! Domain layer: catalog rows, gallery descriptors and the naming convention
//!
//! Everything here is pure: no I/O, no configuration.

pub mod catalog;
pub mod gallery;
pub mod naming;

pub use catalog::CatalogRow;
pub use gallery::{ImageDescriptor, dedupe, filter_by_level};
pub use naming::{NamingConvention, strip_revision_suffix};
