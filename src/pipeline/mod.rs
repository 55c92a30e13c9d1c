//! Data-quality pipeline: raw batch in, validated batch plus a cleaning
//! report out.

pub mod category;
pub mod cleaner;
pub mod loader;
pub(crate) mod normalizer;
pub mod record;
pub mod report;

pub use category::{CategoryPayload, CategoryTag, FALLBACK_SECTOR};
pub use cleaner::{clean, CleanOutcome, UNKNOWN_CATEGORICAL, UNKNOWN_COMPANY};
pub use record::{JobPosting, RawPosting};
pub use report::{CleaningReport, RowRejection};
