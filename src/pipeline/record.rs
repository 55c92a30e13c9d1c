use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the raw batch, exactly as ingested. Field presence is not
/// guaranteed; everything except the posting id arrives as an optional
/// string and is coerced (or rejected) by the cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct RawPosting {
    #[serde(rename = "metadata_jobPostId")]
    pub id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub title: Option<String>,
    #[serde(
        rename = "postedCompany_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub company: Option<String>,
    /// Nested category payload, a JSON-ish string of `{"category": ...}`
    /// tags. Decoded by [`crate::pipeline::category`].
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub categories: Option<String>,
    #[serde(
        rename = "employmentTypes",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub employment_type: Option<String>,
    #[serde(
        rename = "positionLevels",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub position_level: Option<String>,
    #[serde(
        rename = "average_salary",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub salary: Option<String>,
    #[serde(
        rename = "minimumYearsExperience",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub experience_years: Option<String>,
    #[serde(
        rename = "metadata_newPostingDate",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub posting_date: Option<String>,
    #[serde(
        rename = "metadata_totalNumberOfView",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub views: Option<String>,
    #[serde(
        rename = "metadata_totalNumberJobApplication",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub applications: Option<String>,
}

/// One validated job posting. Every invariant the cleaner enforces holds
/// here: non-empty title-cased `title`, strictly positive `salary` at or
/// below the effective cap, experience within `[0, max]`, non-negative
/// engagement counters, and a non-empty `sector`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub sector: String,
    pub employment_type: String,
    pub position_level: String,
    /// Monthly, currency-denominated.
    pub salary: f64,
    pub experience_years: f64,
    /// Always `Some` when the batch was cleaned with `require_date` on.
    pub posting_date: Option<NaiveDate>,
    pub views: u64,
    pub applications: u64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
