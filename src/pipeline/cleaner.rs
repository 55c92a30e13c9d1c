use super::category::{self, FALLBACK_SECTOR};
use super::normalizer::{collapse_whitespace, normalize_field};
use super::record::{JobPosting, RawPosting};
use super::report::{CleaningReport, RowRejection};
use crate::analytics::stats;
use crate::config::CleanConfig;
use chrono::{DateTime, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, info};

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_CATEGORICAL: &str = "Unknown";

/// A validated batch plus the per-step accounting of how it got that way.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub postings: Vec<JobPosting>,
    pub report: CleaningReport,
}

/// Transforms a raw batch into a validated one. Malformed rows are filtered
/// and tallied, never raised; each step's predicate runs over the set that
/// survived the previous step, so later steps cannot resurrect a dropped
/// row. See the crate docs for the full step ordering.
pub fn clean(raw: &[RawPosting], config: &CleanConfig) -> CleanOutcome {
    let mut report = CleaningReport {
        input_rows: raw.len(),
        ..CleaningReport::default()
    };

    // Step 1: columns empty across the whole batch are structural noise;
    // record them so the quality report can surface the schema drift.
    report.empty_columns = empty_columns(raw);
    if !report.empty_columns.is_empty() {
        debug!(columns = ?report.empty_columns, "batch carries fully empty columns");
    }

    // Steps 2-3: numeric coercion, then the positive-salary gate.
    let mut rows: Vec<CoercedRow> = Vec::with_capacity(raw.len());
    for posting in raw {
        match CoercedRow::from_raw(posting) {
            Ok(row) => rows.push(row),
            Err(reason) => report.reject(reason),
        }
    }
    rows.retain(|row| match row.salary {
        Some(salary) if salary > 0.0 => true,
        _ => {
            report.reject(RowRejection::NonPositiveSalary);
            false
        }
    });

    // Step 4: outlier cut over the salaries that survived, capped by the
    // configured ceiling. The lower bound of the two wins.
    let surviving: Vec<f64> = rows.iter().filter_map(|row| row.salary).collect();
    let sorted = stats::sorted_finite(&surviving);
    let cap = stats::percentile(&sorted, config.salary_outlier_percentile)
        .map(|cutoff| cutoff.min(config.salary_ceiling))
        .unwrap_or(config.salary_ceiling);
    report.effective_salary_cap = Some(cap);
    rows.retain(|row| {
        let salary = row.salary.unwrap_or(0.0);
        if salary > cap {
            report.reject(RowRejection::SalaryOutlier);
            false
        } else if salary < config.salary_floor {
            report.reject(RowRejection::BelowSalaryFloor);
            false
        } else {
            true
        }
    });

    // Steps 5-9: row-local validation and normalization.
    let mut postings: Vec<JobPosting> = Vec::with_capacity(rows.len());
    for row in rows {
        match finalize_row(row, config, &mut report) {
            Ok(posting) => postings.push(posting),
            Err(reason) => report.reject(reason),
        }
    }

    // Step 10: exact-duplicate removal, first occurrence wins.
    let mut seen: HashSet<DedupeKey> = HashSet::with_capacity(postings.len());
    postings.retain(|posting| {
        if seen.insert(dedupe_key(posting)) {
            true
        } else {
            report.reject(RowRejection::Duplicate);
            false
        }
    });

    report.output_rows = postings.len();
    for line in report.tally_lines() {
        debug!("removed: {line}");
    }
    info!(
        input = report.input_rows,
        output = report.output_rows,
        removed = report.total_removed(),
        clamped = report.clamped_experience,
        "cleaned job-posting batch"
    );

    CleanOutcome { postings, report }
}

/// Numeric fields after step 2. `None` means the source value was absent
/// (fillable later); a present-but-garbage value never gets this far.
struct CoercedRow<'a> {
    raw: &'a RawPosting,
    salary: Option<f64>,
    experience_years: f64,
    views: Option<f64>,
    applications: Option<f64>,
}

impl<'a> CoercedRow<'a> {
    fn from_raw(raw: &'a RawPosting) -> Result<Self, RowRejection> {
        Ok(Self {
            raw,
            salary: coerce_optional(raw.salary.as_deref())?,
            // Absent experience means "none stated", which the source data
            // treats as zero.
            experience_years: coerce_optional(raw.experience_years.as_deref())?.unwrap_or(0.0),
            views: coerce_optional(raw.views.as_deref())?,
            applications: coerce_optional(raw.applications.as_deref())?,
        })
    }
}

fn coerce_optional(value: Option<&str>) -> Result<Option<f64>, RowRejection> {
    match value {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| RowRejection::CoercionFailed),
    }
}

fn finalize_row(
    row: CoercedRow<'_>,
    config: &CleanConfig,
    report: &mut CleaningReport,
) -> Result<JobPosting, RowRejection> {
    // Step 5: negative experience is a data error; excess is plausibly a
    // typo and is pulled back to the cap instead of dropped.
    let mut experience_years = row.experience_years;
    if experience_years < 0.0 {
        return Err(RowRejection::NegativeExperience);
    }
    if experience_years > config.max_experience_years {
        experience_years = config.max_experience_years;
        report.clamped_experience += 1;
    }

    // Step 6: date gate.
    let posting_date = row.raw.posting_date.as_deref().and_then(parse_posting_date);
    if config.require_date && posting_date.is_none() {
        return Err(RowRejection::MissingDate);
    }

    // Step 7: text normalization; an empty title is unusable.
    let title = row
        .raw
        .title
        .as_deref()
        .map(normalize_field)
        .unwrap_or_default();
    if title.is_empty() {
        return Err(RowRejection::BlankTitle);
    }
    let employment_type = normalize_categorical(row.raw.employment_type.as_deref());
    let position_level = normalize_categorical(row.raw.position_level.as_deref());

    // Step 8: engagement fills and sentinel company.
    let views = coerce_count(row.views)?;
    let applications = coerce_count(row.applications)?;
    let company = row
        .raw
        .company
        .as_deref()
        .map(collapse_whitespace)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

    // Step 9: sector extraction with explicit fallback.
    let payload = category::decode(row.raw.categories.as_deref());
    let sector = match category::primary_sector(&payload) {
        Some(sector) => sector,
        None => {
            report.sector_fallbacks += 1;
            FALLBACK_SECTOR.to_string()
        }
    };

    Ok(JobPosting {
        id: row.raw.id.clone(),
        title,
        company,
        sector,
        employment_type,
        position_level,
        salary: row.salary.unwrap_or(0.0),
        experience_years,
        posting_date,
        views,
        applications,
    })
}

fn normalize_categorical(value: Option<&str>) -> String {
    value
        .map(normalize_field)
        .filter(|normalized| !normalized.is_empty())
        .unwrap_or_else(|| UNKNOWN_CATEGORICAL.to_string())
}

fn coerce_count(value: Option<f64>) -> Result<u64, RowRejection> {
    match value {
        None => Ok(0),
        Some(count) if count < 0.0 => Err(RowRejection::NegativeEngagement),
        Some(count) => Ok(count.round() as u64),
    }
}

fn parse_posting_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

fn empty_columns(raw: &[RawPosting]) -> Vec<&'static str> {
    if raw.is_empty() {
        return Vec::new();
    }

    let optional_columns: [(&'static str, fn(&RawPosting) -> bool); 10] = [
        ("title", |row| row.title.is_none()),
        ("postedCompany_name", |row| row.company.is_none()),
        ("categories", |row| row.categories.is_none()),
        ("employmentTypes", |row| row.employment_type.is_none()),
        ("positionLevels", |row| row.position_level.is_none()),
        ("average_salary", |row| row.salary.is_none()),
        ("minimumYearsExperience", |row| {
            row.experience_years.is_none()
        }),
        ("metadata_newPostingDate", |row| row.posting_date.is_none()),
        ("metadata_totalNumberOfView", |row| row.views.is_none()),
        ("metadata_totalNumberJobApplication", |row| {
            row.applications.is_none()
        }),
    ];

    optional_columns
        .into_iter()
        .filter_map(|(name, is_empty)| raw.iter().all(is_empty).then_some(name))
        .collect()
}

type DedupeKey = (
    String,
    String,
    String,
    String,
    String,
    String,
    u64,
    u64,
    Option<NaiveDate>,
    u64,
    u64,
);

// Exact row equality over every field; salaries are finite by this point so
// the bit pattern is a faithful identity.
fn dedupe_key(posting: &JobPosting) -> DedupeKey {
    (
        posting.id.clone(),
        posting.title.clone(),
        posting.company.clone(),
        posting.sector.clone(),
        posting.employment_type.clone(),
        posting.position_level.clone(),
        posting.salary.to_bits(),
        posting.experience_years.to_bits(),
        posting.posting_date,
        posting.views,
        posting.applications,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_posting(id: &str) -> RawPosting {
        RawPosting {
            id: id.to_string(),
            title: Some("data engineer".to_string()),
            company: Some("Acme Pte Ltd".to_string()),
            categories: Some(r#"[{"category": "Information Technology"}]"#.to_string()),
            employment_type: Some("full time".to_string()),
            position_level: Some("senior".to_string()),
            salary: Some("8000".to_string()),
            experience_years: Some("5".to_string()),
            posting_date: Some("2024-03-01".to_string()),
            views: Some("120".to_string()),
            applications: Some("4".to_string()),
        }
    }

    #[test]
    fn normalizes_surviving_rows() {
        let outcome = clean(&[raw_posting("JOB-1")], &CleanConfig::default());
        assert_eq!(outcome.postings.len(), 1);
        let posting = &outcome.postings[0];
        assert_eq!(posting.title, "Data Engineer");
        assert_eq!(posting.employment_type, "Full Time");
        assert_eq!(posting.position_level, "Senior");
        assert_eq!(posting.sector, "Information Technology");
        assert_eq!(posting.salary, 8000.0);
        assert_eq!(posting.views, 120);
    }

    #[test]
    fn missing_company_gets_sentinel() {
        let mut raw = raw_posting("JOB-1");
        raw.company = None;
        let outcome = clean(&[raw], &CleanConfig::default());
        assert_eq!(outcome.postings[0].company, UNKNOWN_COMPANY);
    }

    #[test]
    fn garbage_salary_is_a_coercion_failure() {
        let mut raw = raw_posting("JOB-1");
        raw.salary = Some("competitive".to_string());
        let outcome = clean(&[raw], &CleanConfig::default());
        assert!(outcome.postings.is_empty());
        assert_eq!(outcome.report.removed_for(RowRejection::CoercionFailed), 1);
    }

    #[test]
    fn negative_experience_drops_but_excess_clamps() {
        let mut negative = raw_posting("JOB-NEG");
        negative.experience_years = Some("-3".to_string());
        let mut excessive = raw_posting("JOB-BIG");
        excessive.experience_years = Some("200".to_string());

        let outcome = clean(&[negative, excessive], &CleanConfig::default());
        assert_eq!(outcome.postings.len(), 1);
        assert_eq!(outcome.postings[0].id, "JOB-BIG");
        assert_eq!(outcome.postings[0].experience_years, 40.0);
        assert_eq!(outcome.report.clamped_experience, 1);
        assert_eq!(
            outcome.report.removed_for(RowRejection::NegativeExperience),
            1
        );
    }

    #[test]
    fn date_requirement_is_configurable() {
        let mut undated = raw_posting("JOB-1");
        undated.posting_date = None;

        let strict = clean(std::slice::from_ref(&undated), &CleanConfig::default());
        assert!(strict.postings.is_empty());
        assert_eq!(strict.report.removed_for(RowRejection::MissingDate), 1);

        let lenient_config = CleanConfig {
            require_date: false,
            ..CleanConfig::default()
        };
        let lenient = clean(&[undated], &lenient_config);
        assert_eq!(lenient.postings.len(), 1);
        assert_eq!(lenient.postings[0].posting_date, None);
    }

    #[test]
    fn unparseable_sector_payload_falls_back_to_other() {
        let mut raw = raw_posting("JOB-1");
        raw.categories = Some("{broken".to_string());
        let outcome = clean(&[raw], &CleanConfig::default());
        assert_eq!(outcome.postings[0].sector, FALLBACK_SECTOR);
        assert_eq!(outcome.report.sector_fallbacks, 1);
    }

    #[test]
    fn ceiling_caps_the_outlier_percentile() {
        let mut rows: Vec<RawPosting> = (0..50)
            .map(|i| {
                let mut row = raw_posting(&format!("JOB-{i}"));
                row.salary = Some("4000".to_string());
                row
            })
            .collect();
        let mut outlier = raw_posting("JOB-RICH");
        outlier.salary = Some("90000".to_string());
        rows.push(outlier);

        let outcome = clean(&rows, &CleanConfig::default());
        assert!(outcome
            .postings
            .iter()
            .all(|posting| posting.salary <= 50_000.0));
        assert_eq!(outcome.report.removed_for(RowRejection::SalaryOutlier), 1);
    }

    #[test]
    fn empty_column_detection_reports_structural_noise() {
        let mut a = raw_posting("JOB-1");
        a.position_level = None;
        let mut b = raw_posting("JOB-2");
        b.position_level = None;
        let outcome = clean(&[a, b], &CleanConfig::default());
        assert_eq!(outcome.report.empty_columns, vec!["positionLevels"]);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let outcome = clean(&[], &CleanConfig::default());
        assert!(outcome.postings.is_empty());
        assert_eq!(outcome.report.input_rows, 0);
        assert_eq!(outcome.report.total_removed(), 0);
    }
}
