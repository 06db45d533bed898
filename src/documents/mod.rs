// src/documents/mod.rs
pub mod loader;

pub use loader::{load_document, normalize_newlines, SourceDocument};
