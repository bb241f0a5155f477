use super::views::DashboardRow;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Flush(std::io::Error),
    #[error("csv output was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

const HEADER: [&str; 9] = [
    "id",
    "name",
    "department",
    "owner",
    "due",
    "status",
    "score",
    "last_updated",
    "issues",
];

/// Renders dashboard rows as CSV with a header line.
pub fn export_dashboard_csv(rows: &[DashboardRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for row in rows {
        let due = row.due.to_string();
        let score = row.score.to_string();
        let last_updated = row.last_updated.to_string();
        let issues = row.issue_count.to_string();
        writer.write_record([
            row.id.as_str(),
            row.name.as_str(),
            row.dept_label,
            row.owner.as_str(),
            due.as_str(),
            row.status_label,
            score.as_str(),
            last_updated.as_str(),
            issues.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
