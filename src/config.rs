use std::env;
use std::hash::{Hash, Hasher};

/// Tunable thresholds consumed by the cleaning pipeline.
///
/// The coded defaults come from the data-quality audit of the source
/// dataset; hosting applications can override any of them through the
/// `LABOR_*` environment variables or by building the struct directly.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanConfig {
    /// Rows with a monthly salary below this value are dropped.
    pub salary_floor: f64,
    /// Hard upper bound on monthly salary; combined with the percentile
    /// cutoff, the lower of the two wins.
    pub salary_ceiling: f64,
    /// Percentile (0-100) of the surviving salary distribution used as the
    /// outlier cutoff.
    pub salary_outlier_percentile: f64,
    /// Experience above this many years is clamped, not dropped.
    pub max_experience_years: f64,
    /// When set, rows without a parseable posting date are dropped.
    pub require_date: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            salary_floor: 500.0,
            salary_ceiling: 50_000.0,
            salary_outlier_percentile: 99.9,
            max_experience_years: 40.0,
            require_date: true,
        }
    }
}

impl CleanConfig {
    /// Loads the config from `LABOR_*` environment variables, falling back
    /// to the coded defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            salary_floor: read_f64("LABOR_SALARY_FLOOR", defaults.salary_floor)?,
            salary_ceiling: read_f64("LABOR_SALARY_CEILING", defaults.salary_ceiling)?,
            salary_outlier_percentile: read_f64(
                "LABOR_SALARY_OUTLIER_PERCENTILE",
                defaults.salary_outlier_percentile,
            )?,
            max_experience_years: read_f64(
                "LABOR_MAX_EXPERIENCE_YEARS",
                defaults.max_experience_years,
            )?,
            require_date: read_bool("LABOR_REQUIRE_DATE", defaults.require_date)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the thresholds form a coherent range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.salary_floor < 0.0 || self.salary_ceiling <= self.salary_floor {
            return Err(ConfigError::InvalidSalaryBounds {
                floor: self.salary_floor,
                ceiling: self.salary_ceiling,
            });
        }
        if !(0.0..=100.0).contains(&self.salary_outlier_percentile) {
            return Err(ConfigError::InvalidPercentile {
                value: self.salary_outlier_percentile,
            });
        }
        if self.max_experience_years < 0.0 {
            return Err(ConfigError::InvalidExperienceCap {
                value: self.max_experience_years,
            });
        }
        Ok(())
    }
}

// Hash by bit pattern so the session cache can key on the active config.
impl Hash for CleanConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.salary_floor.to_bits().hash(state);
        self.salary_ceiling.to_bits().hash(state);
        self.salary_outlier_percentile.to_bits().hash(state);
        self.max_experience_years.to_bits().hash(state);
        self.require_date.hash(state);
    }
}

fn read_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { key, raw }),
        Err(_) => Ok(default),
    }
}

fn read_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, raw }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{raw}'")]
    InvalidNumber { key: &'static str, raw: String },
    #[error("{key} must be a boolean flag, got '{raw}'")]
    InvalidFlag { key: &'static str, raw: String },
    #[error("salary floor {floor} and ceiling {ceiling} do not form a valid range")]
    InvalidSalaryBounds { floor: f64, ceiling: f64 },
    #[error("salary outlier percentile {value} must be within 0-100")]
    InvalidPercentile { value: f64 },
    #[error("experience cap {value} must be non-negative")]
    InvalidExperienceCap { value: f64 },
}
