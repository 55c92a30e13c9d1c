use super::record::RawPosting;
use crate::error::SchemaError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Columns the batch must carry to be considered the job-posting schema at
/// all. Anything else missing degrades row by row instead.
const REQUIRED_COLUMNS: [&str; 4] = [
    "metadata_jobPostId",
    "title",
    "average_salary",
    "metadata_newPostingDate",
];

pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawPosting>, SchemaError> {
    let file = std::fs::File::open(path)?;
    parse_records(file)
}

/// Reads a raw batch from CSV. Individual rows that fail to deserialize are
/// skipped (the source feed is known to contain ragged lines); only a
/// structural mismatch (unreadable headers or a missing required column)
/// fails the whole batch.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<RawPosting>, SchemaError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(SchemaError::Malformed)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(SchemaError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.deserialize::<RawPosting>() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                debug!(error = %err, "skipping unreadable row");
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, total = records.len(), "batch read with ragged rows");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "metadata_jobPostId,title,postedCompany_name,categories,employmentTypes,positionLevels,average_salary,minimumYearsExperience,metadata_newPostingDate,metadata_totalNumberOfView,metadata_totalNumberJobApplication";

    #[test]
    fn parses_well_formed_rows() {
        let data = format!(
            "{HEADER}\nJOB-1,Data Engineer,Acme,,Full Time,Senior,8000,5,2024-03-01,120,4\n"
        );
        let records = parse_records(data.as_bytes()).expect("batch parses");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "JOB-1");
        assert_eq!(records[0].salary.as_deref(), Some("8000"));
        assert_eq!(records[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn blank_fields_become_none() {
        let data = format!("{HEADER}\nJOB-2, , ,,,,  ,,,,\n");
        let records = parse_records(data.as_bytes()).expect("batch parses");
        assert_eq!(records[0].title, None);
        assert_eq!(records[0].salary, None);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let data = "metadata_jobPostId,title\nJOB-1,Cook\n";
        let err = parse_records(data.as_bytes()).expect_err("schema mismatch detected");
        assert!(matches!(err, SchemaError::MissingColumn("average_salary")));
    }
}
