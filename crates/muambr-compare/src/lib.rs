//! The comparison pipeline: extractor fan-out, currency context, and ranking.

pub mod labels;
pub mod orchestrator;
pub mod processor;
pub mod service;

pub use labels::{ContextLabels, EnglishLabels};
pub use orchestrator::{CollectRequest, ExtractionOrchestrator, OrchestratorConfig};
pub use processor::{ComparisonProcessor, DEFAULT_OUTLIER_FACTOR};
pub use service::{BuildError, ComparisonService};
