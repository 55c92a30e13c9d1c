//! Analytics core for a national job-postings dataset.
//!
//! The crate turns a loosely shaped raw batch into (a) a validated,
//! normalized dataset and (b) derived labor-market signals:
//!
//! - a per-sector labor-shortage index ([`analytics::shortage`]),
//! - a per-sector growth score ([`analytics::growth`]),
//! - skill-to-salary recommendations ([`analytics::recommend`]),
//! - a smoothed time-series trend with a visual band ([`analytics::trend`]).
//!
//! Presentation concerns (charts, exports, CLI wiring) live in hosting
//! applications; everything here is plain structured data and pure
//! functions. Control flow is `loader` → [`pipeline::clean`] →
//! [`analytics::aggregate`] → the four signals, with [`session`] offering a
//! memoized front door for interactive hosts.
//!
//! Cleaning order matters: each step filters or repairs the set that
//! survived the previous one, so later steps never resurrect dropped rows.
//! The steps are: empty-column detection, numeric coercion, the positive
//! salary gate, the outlier cut (percentile vs. configured ceiling, lower
//! wins), experience validation, the date gate, text normalization,
//! engagement fills, sector extraction, and exact-duplicate removal.

pub mod analytics;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod telemetry;

pub use config::{CleanConfig, ConfigError};
pub use error::{InsightError, InvalidWindowError, SchemaError};
pub use pipeline::{CleanOutcome, CleaningReport, JobPosting, RawPosting};
pub use session::DatasetSession;
