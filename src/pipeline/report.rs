use serde::Serialize;
use std::collections::BTreeMap;

/// Why a row was excluded from the validated batch. Internal tally
/// classification only; row-level defects are counted, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRejection {
    CoercionFailed,
    NonPositiveSalary,
    BelowSalaryFloor,
    SalaryOutlier,
    NegativeExperience,
    MissingDate,
    BlankTitle,
    NegativeEngagement,
    Duplicate,
}

impl RowRejection {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::CoercionFailed,
            Self::NonPositiveSalary,
            Self::BelowSalaryFloor,
            Self::SalaryOutlier,
            Self::NegativeExperience,
            Self::MissingDate,
            Self::BlankTitle,
            Self::NegativeEngagement,
            Self::Duplicate,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CoercionFailed => "numeric coercion failed",
            Self::NonPositiveSalary => "salary missing or non-positive",
            Self::BelowSalaryFloor => "salary below floor",
            Self::SalaryOutlier => "salary above outlier cap",
            Self::NegativeExperience => "negative experience",
            Self::MissingDate => "posting date missing or unparseable",
            Self::BlankTitle => "title blank after normalization",
            Self::NegativeEngagement => "negative views or applications",
            Self::Duplicate => "exact duplicate row",
        }
    }
}

/// Per-step accounting for one cleaning run. Observability only; nothing
/// downstream branches on it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    /// Removal tallies keyed by rejection reason; reasons with zero removals
    /// are absent.
    pub removed: BTreeMap<RowRejection, usize>,
    /// Rows whose experience exceeded the cap and was pulled back to it.
    pub clamped_experience: usize,
    /// Rows whose category payload fell back to the "Other" sector.
    pub sector_fallbacks: usize,
    /// Columns that were 100% empty across the input batch.
    pub empty_columns: Vec<&'static str>,
    /// Effective salary cap applied in the outlier step: the lower of the
    /// configured ceiling and the percentile cutoff.
    pub effective_salary_cap: Option<f64>,
}

impl CleaningReport {
    pub(crate) fn reject(&mut self, reason: RowRejection) {
        *self.removed.entry(reason).or_insert(0) += 1;
    }

    pub fn removed_for(&self, reason: RowRejection) -> usize {
        self.removed.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_removed(&self) -> usize {
        self.removed.values().sum()
    }

    /// Human-readable tally lines in step order, for log output or a
    /// quality report surface.
    pub fn tally_lines(&self) -> Vec<String> {
        RowRejection::ordered()
            .into_iter()
            .filter_map(|reason| {
                let count = self.removed_for(reason);
                (count > 0).then(|| format!("{}: {count}", reason.label()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_accumulate_per_reason() {
        let mut report = CleaningReport::default();
        report.reject(RowRejection::Duplicate);
        report.reject(RowRejection::Duplicate);
        report.reject(RowRejection::BlankTitle);
        assert_eq!(report.removed_for(RowRejection::Duplicate), 2);
        assert_eq!(report.total_removed(), 3);
    }

    #[test]
    fn tally_lines_follow_step_order_and_skip_zeroes() {
        let mut report = CleaningReport::default();
        report.reject(RowRejection::Duplicate);
        report.reject(RowRejection::NonPositiveSalary);
        let lines = report.tally_lines();
        assert_eq!(
            lines,
            vec![
                "salary missing or non-positive: 1".to_string(),
                "exact duplicate row: 1".to_string(),
            ]
        );
    }
}
