use super::aggregate::{MarketStats, SectorStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Composite 0-100 market-momentum estimate for one sector.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthScore {
    pub sector: String,
    /// Absolute market share of posting volume (not doubled: growth cares
    /// about share, not relative imbalance).
    pub volume_weight: f64,
    /// Salary premium relative to the overall market mean, capped at 100.
    pub salary_weight: f64,
    /// Mean views as an engagement proxy, capped at 100.
    pub engagement_weight: f64,
    /// `0.4*volume + 0.3*salary + 0.3*engagement`.
    pub score: f64,
}

/// Computes the growth score per sector. Zero-posting sectors are omitted.
/// The composite is monotonically non-decreasing in each weighted component
/// by construction.
pub fn compute(
    sectors: &BTreeMap<String, SectorStats>,
    market: &MarketStats,
) -> BTreeMap<String, GrowthScore> {
    let total = market.total_postings;
    sectors
        .values()
        .filter(|stats| stats.count > 0 && total > 0)
        .map(|stats| {
            let volume_weight = 100.0 * stats.count as f64 / total as f64;
            let salary_weight = match market.mean_salary {
                Some(market_mean) if market_mean > 0.0 => {
                    (100.0 * stats.mean_salary.unwrap_or(0.0) / market_mean).min(100.0)
                }
                _ => 0.0,
            };
            let engagement_weight = stats.mean_views.unwrap_or(0.0).min(100.0);
            let score = 0.4 * volume_weight + 0.3 * salary_weight + 0.3 * engagement_weight;
            let entry = GrowthScore {
                sector: stats.sector.clone(),
                volume_weight,
                salary_weight,
                engagement_weight,
                score,
            };
            (stats.sector.clone(), entry)
        })
        .collect()
}

/// The `n` fastest-growing sectors, score descending with sector name as the
/// deterministic tie-break.
pub fn top_sectors(scores: &BTreeMap<String, GrowthScore>, n: usize) -> Vec<&GrowthScore> {
    let mut ordered: Vec<&GrowthScore> = scores.values().collect();
    ordered.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.sector.cmp(&b.sector)));
    ordered.truncate(n);
    ordered
}
