// ─── Template Customizer ───
// Filters, relocates and rewrites the scaffold archive for one selection,
// then synthesizes per-release build configuration.

pub mod archive;
pub mod customizer;
pub mod placeholders;
pub mod properties;
pub mod root;
pub mod selection;

pub use archive::{ArchiveCodec, TemplateEntry, ZipCodec};
pub use customizer::TemplateCustomizer;
pub use selection::{ModIdentity, Selection};
