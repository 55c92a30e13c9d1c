use super::stats;
use crate::pipeline::record::JobPosting;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Year-month time bucket. Orders chronologically; displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Tracked-skill vocabulary: a label plus the lowercase substrings that
/// count as a mention of it in a posting title.
#[derive(Debug, Clone)]
pub struct SkillLexicon {
    entries: Vec<SkillEntry>,
}

#[derive(Debug, Clone)]
struct SkillEntry {
    label: String,
    aliases: Vec<String>,
    emerging: bool,
}

impl SkillLexicon {
    /// The vocabulary the dashboard tracks, with the alias lists the source
    /// system matched on. Matching is case-insensitive substring, so broad
    /// aliases ("ai", "bi") over-match on purpose; the source counts the
    /// same way.
    pub fn standard() -> Self {
        const ENTRIES: [(&str, &[&str], bool); 9] = [
            ("Python", &["python"], false),
            ("Java", &["java"], false),
            ("C++", &["c++", "c plus plus"], false),
            ("JavaScript", &["javascript", "node"], false),
            ("SQL", &["sql"], false),
            ("Cloud", &["aws", "azure", "gcp", "cloud"], true),
            ("Data", &["data", "analytics", "bi"], true),
            ("AI/ML", &["ai", "machine learning", "ml"], true),
            ("DevOps", &["devops", "docker", "kubernetes"], true),
        ];

        Self {
            entries: ENTRIES
                .into_iter()
                .map(|(label, aliases, emerging)| SkillEntry {
                    label: label.to_string(),
                    aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
                    emerging,
                })
                .collect(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    /// Skills flagged as emerging market needs.
    pub fn emerging_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.emerging)
            .map(|entry| entry.label.as_str())
    }

    /// Labels mentioned in the given title.
    pub fn matches(&self, title: &str) -> Vec<&str> {
        let lowered = title.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.aliases.iter().any(|alias| lowered.contains(alias)))
            .map(|entry| entry.label.as_str())
            .collect()
    }
}

/// Immutable per-sector summary snapshot. Zero-count groups never appear;
/// means over an empty subset are `None` rather than a sentinel value.
#[derive(Debug, Clone, Serialize)]
pub struct SectorStats {
    pub sector: String,
    pub count: usize,
    pub mean_salary: Option<f64>,
    pub median_salary: Option<f64>,
    pub p90_salary: Option<f64>,
    pub mean_views: Option<f64>,
    pub mean_applications: Option<f64>,
    pub mean_experience: Option<f64>,
    /// Tracked skills observed in this sector's titles.
    pub skill_tags: BTreeSet<String>,
}

/// One sector × month cell of the employment heatmap.
#[derive(Debug, Clone, Serialize)]
pub struct SectorMonthStats {
    pub sector: String,
    pub bucket: MonthBucket,
    pub count: usize,
    pub mean_salary: Option<f64>,
    pub mean_experience: Option<f64>,
}

/// Per tracked skill: how many postings mention it and the 90th-percentile
/// salary among them.
#[derive(Debug, Clone, Serialize)]
pub struct SkillStats {
    pub skill: String,
    pub count: usize,
    pub p90_salary: Option<f64>,
}

/// Whole-market reference figures the sector scores normalize against.
#[derive(Debug, Clone, Serialize)]
pub struct MarketStats {
    pub total_postings: usize,
    pub mean_salary: Option<f64>,
    pub mean_views: Option<f64>,
    pub mean_applications: Option<f64>,
}

pub fn market_stats(postings: &[JobPosting]) -> MarketStats {
    MarketStats {
        total_postings: postings.len(),
        mean_salary: stats::mean(&collect(postings, |p| p.salary)),
        mean_views: stats::mean(&collect(postings, |p| p.views as f64)),
        mean_applications: stats::mean(&collect(postings, |p| p.applications as f64)),
    }
}

pub fn sector_stats(
    postings: &[JobPosting],
    lexicon: &SkillLexicon,
) -> BTreeMap<String, SectorStats> {
    let mut groups: BTreeMap<&str, Vec<&JobPosting>> = BTreeMap::new();
    for posting in postings {
        groups.entry(posting.sector.as_str()).or_default().push(posting);
    }

    groups
        .into_iter()
        .map(|(sector, members)| {
            let salaries = stats::sorted_finite(&collect_refs(&members, |p| p.salary));
            let skill_tags = members
                .iter()
                .flat_map(|posting| lexicon.matches(&posting.title))
                .map(str::to_string)
                .collect();
            let summary = SectorStats {
                sector: sector.to_string(),
                count: members.len(),
                mean_salary: stats::mean(&salaries),
                median_salary: stats::median(&salaries),
                p90_salary: stats::percentile(&salaries, 90.0),
                mean_views: stats::mean(&collect_refs(&members, |p| p.views as f64)),
                mean_applications: stats::mean(&collect_refs(&members, |p| p.applications as f64)),
                mean_experience: stats::mean(&collect_refs(&members, |p| p.experience_years)),
                skill_tags,
            };
            (sector.to_string(), summary)
        })
        .collect()
}

pub fn sector_month_stats(
    postings: &[JobPosting],
) -> BTreeMap<(String, MonthBucket), SectorMonthStats> {
    let mut groups: BTreeMap<(&str, MonthBucket), Vec<&JobPosting>> = BTreeMap::new();
    for posting in postings {
        let Some(date) = posting.posting_date else {
            continue;
        };
        groups
            .entry((posting.sector.as_str(), MonthBucket::from_date(date)))
            .or_default()
            .push(posting);
    }

    groups
        .into_iter()
        .map(|((sector, bucket), members)| {
            let cell = SectorMonthStats {
                sector: sector.to_string(),
                bucket,
                count: members.len(),
                mean_salary: stats::mean(&collect_refs(&members, |p| p.salary)),
                mean_experience: stats::mean(&collect_refs(&members, |p| p.experience_years)),
            };
            ((sector.to_string(), bucket), cell)
        })
        .collect()
}

pub fn skill_stats(
    postings: &[JobPosting],
    lexicon: &SkillLexicon,
) -> BTreeMap<String, SkillStats> {
    let mut salaries_by_skill: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for label in lexicon.labels() {
        salaries_by_skill.entry(label).or_default();
    }
    for posting in postings {
        for label in lexicon.matches(&posting.title) {
            salaries_by_skill
                .entry(label)
                .or_default()
                .push(posting.salary);
        }
    }

    salaries_by_skill
        .into_iter()
        .map(|(skill, salaries)| {
            let sorted = stats::sorted_finite(&salaries);
            let summary = SkillStats {
                skill: skill.to_string(),
                count: sorted.len(),
                p90_salary: stats::percentile(&sorted, 90.0),
            };
            (skill.to_string(), summary)
        })
        .collect()
}

/// Posting volume per month, ascending by bucket. Undated postings (possible
/// when the cleaner ran without `require_date`) are omitted.
pub fn monthly_posting_counts(postings: &[JobPosting]) -> Vec<(MonthBucket, f64)> {
    let mut counts: BTreeMap<MonthBucket, usize> = BTreeMap::new();
    for posting in postings {
        if let Some(date) = posting.posting_date {
            *counts.entry(MonthBucket::from_date(date)).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(bucket, count)| (bucket, count as f64))
        .collect()
}

/// Arbitrary salary percentile over a posting subset, using the same
/// interpolation rule as every other statistic in the crate.
pub fn salary_percentile(postings: &[JobPosting], p: f64) -> Option<f64> {
    let sorted = stats::sorted_finite(&collect(postings, |posting| posting.salary));
    stats::percentile(&sorted, p)
}

fn collect(postings: &[JobPosting], value: impl Fn(&JobPosting) -> f64) -> Vec<f64> {
    postings.iter().map(value).collect()
}

fn collect_refs(postings: &[&JobPosting], value: impl Fn(&JobPosting) -> f64) -> Vec<f64> {
    postings.iter().map(|posting| value(posting)).collect()
}
