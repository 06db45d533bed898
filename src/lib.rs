//! Annual report requirements from municipal-bond official statements.
//!
//! Pulls the "Content of Annual Reports" section out of an official statement,
//! splits it into requirements and flags which of five known categories appear.
//!
//! ```
//! use annual_report_reqs::Pipeline;
//!
//! let doc = "Section 4. Content of Annual Reports.\n(a) The annual budget.\nSection 5. Next.\n";
//! let report = Pipeline::default().process_text("OS1.txt", doc);
//! assert_eq!(report.requirements, vec!["The annual budget"]);
//! assert!(report.classification.budget);
//! ```

pub mod config;
pub mod documents;
pub mod extractors;
pub mod pipeline;
pub mod runner;
pub mod storage;
pub mod utils;

pub use config::{PipelineConfig, UnterminatedPolicy};
pub use extractors::{
    Category, Classification, RequirementClassifier, RequirementSegmenter, SectionExtractor,
    SectionScan, SectionStatus,
};
pub use pipeline::{DocumentReport, Pipeline};
pub use utils::AppError;
