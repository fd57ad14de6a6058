//! Templates and their storage

/// Template and fragment entities
pub mod entity;
/// Collection of active templates
pub mod store;

pub use entity::{Template, TemplateMetadata, TileFragment};
pub use store::TemplateStore;
