use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::ResultRecord;

/// Write the combined records to a CSV file, one row per record, header
/// row from the record's field order, no index column.
pub fn write_records(path: impl AsRef<Path>, records: &[ResultRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Could not create output file {:?}", path))?;

    for record in records {
        writer
            .serialize(record)
            .context("Failed to serialize record")?;
    }
    writer.flush().context("Failed to flush output file")?;

    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Query;

    #[test]
    fn writes_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        let query = Query {
            suburb: "Ponsonby".to_string(),
            region: "Auckland".to_string(),
        };
        let mut full = ResultRecord::skipped(&query);
        full.median_estimate = "$1,250,000".to_string();
        full.chosen_area = "Ponsonby - Auckland".to_string();
        let skipped = ResultRecord::skipped(&query);

        write_records(&path, &[full, skipped]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "suburb,region,median_estimate,period1,capital_growth,period2,chosen_area"
        );
        assert!(lines[1].starts_with("Ponsonby,Auckland,\"$1,250,000\""));
        assert!(lines[2].ends_with("NA - NA"));
    }

    #[test]
    fn empty_run_writes_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        write_records(&path, &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
