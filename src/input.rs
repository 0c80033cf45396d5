use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook, Reader, Xlsx};
use tracing::info;

use crate::models::Query;

/// Load the query spreadsheet: XLSX or CSV, picked by file extension.
///
/// Both formats need a header row with "Suburb" and "Region" columns.
/// Rows with an empty suburb are dropped.
pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<Query>> {
    let path = path.as_ref();
    let is_excel = path
        .extension()
        .map_or(false, |ext| ext == "xlsx" || ext == "xls");

    let queries = if is_excel {
        load_xlsx(path)?
    } else {
        load_csv(path)?
    };

    info!("Loaded {} queries from {:?}", queries.len(), path);
    Ok(queries)
}

fn load_csv(path: &Path) -> Result<Vec<Query>> {
    let file =
        File::open(path).with_context(|| format!("Could not open input file {:?}", path))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut queries = Vec::new();
    for row in reader.deserialize() {
        let query: Query = row.with_context(|| format!("Bad row in {:?}", path))?;
        if !query.suburb.is_empty() {
            queries.push(query);
        }
    }
    Ok(queries)
}

fn load_xlsx(path: &Path) -> Result<Vec<Query>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Could not open workbook {:?}", path))?;

    let worksheets = workbook.worksheets();
    let Some((_name, range)) = worksheets.first() else {
        bail!("Workbook {:?} has no worksheets", path);
    };

    let mut suburb_idx = None;
    let mut region_idx = None;
    let mut queries = Vec::new();

    for (row_idx, row) in range.rows().enumerate() {
        if row_idx == 0 {
            for (col_idx, cell) in row.iter().enumerate() {
                match cell.to_string().trim().to_lowercase().as_str() {
                    "suburb" => suburb_idx = Some(col_idx),
                    "region" => region_idx = Some(col_idx),
                    _ => {}
                }
            }
            if suburb_idx.is_none() || region_idx.is_none() {
                bail!("Workbook {:?} is missing a Suburb or Region header", path);
            }
            continue;
        }

        let cell_text = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default()
        };

        let suburb = cell_text(suburb_idx);
        if suburb.is_empty() {
            continue;
        }
        queries.push(Query {
            suburb,
            region: cell_text(region_idx),
        });
    }

    Ok(queries)
}
