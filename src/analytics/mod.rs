//! Scoring engine over the validated batch: grouped statistics and the four
//! derived signals consumed by presentation surfaces.

pub mod aggregate;
pub mod growth;
pub mod recommend;
pub mod shortage;
pub mod stats;
pub mod trend;

pub use aggregate::{
    MarketStats, MonthBucket, SectorMonthStats, SectorStats, SkillLexicon, SkillStats,
};
pub use growth::GrowthScore;
pub use recommend::{FitLevel, Recommendation, SectorFitEntry, UpskillSuggestion};
pub use shortage::ShortageScore;
pub use trend::{SmoothedSeries, TrendPoint};
