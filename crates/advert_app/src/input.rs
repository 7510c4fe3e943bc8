//! Job list sources: a spreadsheet or CSV file with a header row, one job per
//! data row, URL and title taken from named columns.

use std::io;
use std::path::Path;

use advert_core::InputRow;
use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load rows from `path`. Workbooks are read from their first sheet; any
/// other extension is parsed as CSV.
pub fn load_rows(path: &Path, url_column: &str, title_column: &str) -> Result<Vec<InputRow>> {
    if is_workbook(path) {
        load_rows_from_workbook(path, url_column, title_column)
            .with_context(|| format!("cannot read jobs from workbook {}", path.display()))
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open input file {}", path.display()))?;
        load_rows_from_reader(file, url_column, title_column)
            .with_context(|| format!("cannot read jobs from {}", path.display()))
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

pub fn load_rows_from_reader<R: io::Read>(
    reader: R,
    url_column: &str,
    title_column: &str,
) -> Result<Vec<InputRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().context("missing header row")?.clone();
    let columns = Columns::locate(headers.iter(), url_column, title_column)?;

    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed row {row_index}"))?;
        rows.push(columns.row(row_index, |idx| record.get(idx).map(str::to_string)));
    }
    Ok(rows)
}

fn load_rows_from_workbook(
    path: &Path,
    url_column: &str,
    title_column: &str,
) -> Result<Vec<InputRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no sheets"))??;

    let mut sheet_rows = range.rows();
    let header = sheet_rows.next().context("missing header row")?;
    let header_names: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
    let columns = Columns::locate(
        header_names.iter().map(String::as_str),
        url_column,
        title_column,
    )?;

    Ok(sheet_rows
        .enumerate()
        .map(|(row_index, cells)| columns.row(row_index, |idx| cell_text(cells.get(idx))))
        .collect())
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

/// Positions of the URL and (optional) title columns in the header row.
struct Columns {
    url: usize,
    title: Option<usize>,
}

impl Columns {
    fn locate<'a>(
        headers: impl Iterator<Item = &'a str>,
        url_column: &str,
        title_column: &str,
    ) -> Result<Self> {
        let names: Vec<&str> = headers.map(str::trim).collect();
        let Some(url) = names.iter().position(|h| *h == url_column) else {
            bail!("URL column {url_column:?} not found (columns: {names:?})");
        };
        let title = names.iter().position(|h| *h == title_column);
        Ok(Self { url, title })
    }

    fn row(&self, row_index: usize, cell: impl Fn(usize) -> Option<String>) -> InputRow {
        InputRow {
            row_index,
            url: cell(self.url),
            title: self.title.and_then(&cell),
        }
    }
}
