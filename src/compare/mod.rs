//! Fleet comparison: fetch runtimes from many hosts at once and classify
//! how consistent each runtime's version is across them.

pub mod engine;
pub mod status;

pub use engine::{
    build_comparison, host_label, CompareOutcome, CompareReport, Comparator, ComparisonData,
    ComparisonSummary, RuntimeComparison, ServerRuntimes, HOST_TIMEOUT,
};
pub use status::{ComparisonStatus, VersionCell, ERROR_MARKER, MISSING_MARKER};
