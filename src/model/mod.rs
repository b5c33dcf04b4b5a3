pub mod analysis;
pub mod config;
pub mod document_type;
pub mod job;

pub use analysis::*;
pub use config::{Config, SummaryConfig};
pub use document_type::DocumentType;
pub use job::{Job, JobStatus};
