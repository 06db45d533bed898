// src/extractors/mod.rs
pub mod classify;
pub mod requirements;
pub mod section;

// Re-export key extraction types for convenience
pub use classify::{Category, Classification, RequirementClassifier};
pub use requirements::RequirementSegmenter;
pub use section::{SectionExtractor, SectionScan, SectionStatus};
