use super::aggregate::{MarketStats, SectorStats, SkillStats};
use super::growth;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Skills backed by fewer matching postings than this are excluded from
/// upskill suggestions as statistically unreliable.
pub const MIN_SKILL_SUPPORT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLevel {
    Perfect,
    Good,
    Developing,
}

impl FitLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Good => "Good",
            Self::Developing => "Developing",
        }
    }

    fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.75 {
            Self::Perfect
        } else if ratio >= 0.50 {
            Self::Good
        } else {
            Self::Developing
        }
    }
}

/// One skill the user does not yet hold, worth acquiring for its salary
/// premium over the user's target.
#[derive(Debug, Clone, Serialize)]
pub struct UpskillSuggestion {
    pub skill: String,
    /// `p90 salary of the skill - target salary`; always positive here.
    pub premium: f64,
    /// Number of postings backing the p90 figure.
    pub support: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectorFitEntry {
    pub sector: String,
    /// Share of the user's skills observed in this sector's titles.
    pub match_ratio: f64,
    pub fit: FitLevel,
    pub growth_score: f64,
}

/// Personalized output of the recommender. Empty inputs produce an empty
/// recommendation, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// Premium descending, ties broken by higher support.
    pub top_upskills: Vec<UpskillSuggestion>,
    /// Match ratio descending, then growth score, then sector name.
    pub sector_fit: Vec<SectorFitEntry>,
    /// p90 salary of the user's best already-held tracked skill; degrades to
    /// the target salary unchanged when no held skill is tracked.
    pub salary_potential: f64,
}

pub fn recommend(
    skill_stats: &BTreeMap<String, SkillStats>,
    user_skills: &BTreeSet<String>,
    target_salary: f64,
    sectors: &BTreeMap<String, SectorStats>,
    market: &MarketStats,
) -> Recommendation {
    Recommendation {
        top_upskills: upskill_suggestions(skill_stats, user_skills, target_salary),
        sector_fit: sector_fit(user_skills, sectors, market),
        salary_potential: salary_potential(skill_stats, user_skills, target_salary),
    }
}

fn upskill_suggestions(
    skill_stats: &BTreeMap<String, SkillStats>,
    user_skills: &BTreeSet<String>,
    target_salary: f64,
) -> Vec<UpskillSuggestion> {
    let mut suggestions: Vec<UpskillSuggestion> = skill_stats
        .values()
        .filter(|stats| !user_skills.contains(&stats.skill))
        .filter(|stats| stats.count >= MIN_SKILL_SUPPORT)
        .filter_map(|stats| {
            let premium = stats.p90_salary? - target_salary;
            (premium > 0.0).then(|| UpskillSuggestion {
                skill: stats.skill.clone(),
                premium,
                support: stats.count,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.premium
            .total_cmp(&a.premium)
            .then(b.support.cmp(&a.support))
            .then_with(|| a.skill.cmp(&b.skill))
    });
    suggestions
}

fn sector_fit(
    user_skills: &BTreeSet<String>,
    sectors: &BTreeMap<String, SectorStats>,
    market: &MarketStats,
) -> Vec<SectorFitEntry> {
    // No held skills means no meaningful ratio; return an empty fit list
    // rather than dividing by zero.
    if user_skills.is_empty() {
        return Vec::new();
    }

    let growth_scores = growth::compute(sectors, market);
    let mut entries: Vec<SectorFitEntry> = sectors
        .values()
        .filter(|stats| stats.count > 0)
        .map(|stats| {
            let overlap = user_skills.intersection(&stats.skill_tags).count();
            let match_ratio = overlap as f64 / user_skills.len() as f64;
            let growth_score = growth_scores
                .get(&stats.sector)
                .map(|entry| entry.score)
                .unwrap_or(0.0);
            SectorFitEntry {
                sector: stats.sector.clone(),
                match_ratio,
                fit: FitLevel::from_ratio(match_ratio),
                growth_score,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.match_ratio
            .total_cmp(&a.match_ratio)
            .then(b.growth_score.total_cmp(&a.growth_score))
            .then_with(|| a.sector.cmp(&b.sector))
    });
    entries
}

fn salary_potential(
    skill_stats: &BTreeMap<String, SkillStats>,
    user_skills: &BTreeSet<String>,
    target_salary: f64,
) -> f64 {
    user_skills
        .iter()
        .filter_map(|skill| skill_stats.get(skill).and_then(|stats| stats.p90_salary))
        .fold(None::<f64>, |best, p90| {
            Some(best.map_or(p90, |current| current.max(p90)))
        })
        .unwrap_or(target_salary)
}
