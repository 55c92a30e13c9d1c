use super::aggregate::{MarketStats, SectorStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reference monthly salary (SGD) against which wage pressure is read.
const SALARY_REFERENCE: f64 = 5000.0;

/// Composite 0-100 labor-shortage estimate for one sector, with the four
/// normalized sub-scores it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct ShortageScore {
    pub sector: String,
    /// Share-of-volume sub-score: rewards sectors carrying a
    /// disproportionate share of postings.
    pub volume_score: f64,
    /// Inverse mean-views sub-score: fewer views per posting reads as weaker
    /// supply interest.
    pub views_score: f64,
    /// Inverse mean-applications sub-score: fewer applicants per posting
    /// reads as shortage.
    pub applications_score: f64,
    /// Wage-pressure sub-score: sectors bidding up pay relative to the
    /// reference salary are read as under supply pressure.
    pub salary_score: f64,
    /// `0.3*volume + 0.2*views + 0.3*applications + 0.2*salary`, one decimal.
    pub index: f64,
}

/// Computes the shortage index per sector. Sectors with zero postings are
/// omitted rather than scored; every sub-score is clamped to `[0, 100]`
/// after computation to guard against runaway inputs.
pub fn compute(
    sectors: &BTreeMap<String, SectorStats>,
    market: &MarketStats,
) -> BTreeMap<String, ShortageScore> {
    let total = market.total_postings;
    sectors
        .values()
        .filter(|stats| stats.count > 0 && total > 0)
        .map(|stats| {
            let volume_score = clamp(200.0 * stats.count as f64 / total as f64);
            let views_score = clamp(100.0 - 50.0 * stats.mean_views.unwrap_or(0.0) / 100.0);
            let applications_score =
                clamp(100.0 - 50.0 * stats.mean_applications.unwrap_or(0.0) / 5.0);
            let salary_score = clamp(50.0 * stats.mean_salary.unwrap_or(0.0) / SALARY_REFERENCE);
            let index = round_one_decimal(
                0.3 * volume_score
                    + 0.2 * views_score
                    + 0.3 * applications_score
                    + 0.2 * salary_score,
            );
            let score = ShortageScore {
                sector: stats.sector.clone(),
                volume_score,
                views_score,
                applications_score,
                salary_score,
                index,
            };
            (stats.sector.clone(), score)
        })
        .collect()
}

/// Stable ranked order: composite desc, then volume sub-score desc, then
/// sector name, for callers presenting a ranking.
pub fn ranked(scores: &BTreeMap<String, ShortageScore>) -> Vec<&ShortageScore> {
    let mut ordered: Vec<&ShortageScore> = scores.values().collect();
    ordered.sort_by(|a, b| {
        b.index
            .total_cmp(&a.index)
            .then(b.volume_score.total_cmp(&a.volume_score))
            .then_with(|| a.sector.cmp(&b.sector))
    });
    ordered
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sector(name: &str, count: usize, views: f64, applications: f64, salary: f64) -> SectorStats {
        SectorStats {
            sector: name.to_string(),
            count,
            mean_salary: Some(salary),
            median_salary: Some(salary),
            p90_salary: Some(salary),
            mean_views: Some(views),
            mean_applications: Some(applications),
            mean_experience: Some(3.0),
            skill_tags: BTreeSet::new(),
        }
    }

    fn market(total: usize) -> MarketStats {
        MarketStats {
            total_postings: total,
            mean_salary: Some(5000.0),
            mean_views: Some(100.0),
            mean_applications: Some(5.0),
        }
    }

    #[test]
    fn dominant_starved_sector_outranks_minor_saturated_one() {
        let mut sectors = BTreeMap::new();
        sectors.insert("A".to_string(), sector("A", 90, 20.0, 1.0, 6000.0));
        sectors.insert("B".to_string(), sector("B", 10, 300.0, 12.0, 4000.0));

        let scores = compute(&sectors, &market(100));
        let a = scores.get("A").expect("sector A scored");
        let b = scores.get("B").expect("sector B scored");
        assert!(a.index > b.index, "A {} should exceed B {}", a.index, b.index);
        assert_eq!(ranked(&scores)[0].sector, "A");
    }

    #[test]
    fn sub_scores_saturate_at_bounds() {
        let mut sectors = BTreeMap::new();
        sectors.insert("Hot".to_string(), sector("Hot", 100, 250.0, 15.0, 90_000.0));
        let scores = compute(&sectors, &market(100));
        let hot = scores.get("Hot").expect("scored");
        assert_eq!(hot.volume_score, 100.0);
        assert_eq!(hot.views_score, 0.0);
        assert_eq!(hot.applications_score, 0.0);
        assert_eq!(hot.salary_score, 100.0);
    }

    #[test]
    fn zero_posting_sectors_are_omitted() {
        let mut sectors = BTreeMap::new();
        sectors.insert("Ghost".to_string(), sector("Ghost", 0, 0.0, 0.0, 0.0));
        assert!(compute(&sectors, &market(10)).is_empty());
    }

    #[test]
    fn composite_rounds_to_one_decimal() {
        let mut sectors = BTreeMap::new();
        sectors.insert("A".to_string(), sector("A", 33, 77.0, 3.3, 4321.0));
        let scores = compute(&sectors, &market(100));
        let index = scores.get("A").expect("scored").index;
        assert_eq!((index * 10.0).round() / 10.0, index);
    }

    #[test]
    fn ranking_breaks_ties_by_volume_then_name() {
        // Same composite by construction: identical inputs, different names.
        let mut sectors = BTreeMap::new();
        sectors.insert("Beta".to_string(), sector("Beta", 50, 100.0, 5.0, 5000.0));
        sectors.insert("Alpha".to_string(), sector("Alpha", 50, 100.0, 5.0, 5000.0));
        let scores = compute(&sectors, &market(100));
        let order: Vec<&str> = ranked(&scores)
            .into_iter()
            .map(|score| score.sector.as_str())
            .collect();
        assert_eq!(order, vec!["Alpha", "Beta"]);
    }
}
