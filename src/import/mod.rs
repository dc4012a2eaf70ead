pub mod normalize;
pub mod pipeline;

pub use normalize::{normalize_page, parse_published_at};
pub use pipeline::{BatchReport, INITIAL_STATUS, ImportFailure, ImportOutcome, ImportPipeline};
