pub mod gift;
pub mod io;
pub mod models;
pub mod store;

// Re-export key types for easier usage
pub use gift::{ExportOptions, ParsedBank, Severity, ValidationFinding, ValidationReport};
pub use io::*;
pub use models::*;
pub use store::{ImportSummary, QuestionBank, StoreError};
