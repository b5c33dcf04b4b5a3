pub mod analysis;
pub mod jobs;
pub mod risk;

pub use analysis::{AnalysisService, AnalysisStore};
pub use jobs::JobTracker;
