use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::columns::{HeaderCell, normalize_columns};
use crate::error::ScrapeError;
use crate::record::{CellValue, SquadRow};

/// A located table with its headers still in source form.
#[derive(Debug, Clone)]
pub struct ExtractedTable {
    pub id: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ExtractedTable {
    /// Normalizes the headers and keys every body row by them.
    pub fn into_rows(self) -> Vec<SquadRow> {
        let columns = normalize_columns(&self.headers);
        self.rows
            .into_iter()
            .map(|cells| SquadRow::from_cells(&columns, cells))
            .collect()
    }
}

pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|err| ScrapeError::Selector(format!("{css}: {err:?}")))
}

/// First `<table>` whose id contains `id_fragment`.
pub fn find_table<'a>(
    document: &'a Html,
    id_fragment: &str,
) -> Result<Option<ElementRef<'a>>, ScrapeError> {
    let tables = selector("table[id]")?;
    Ok(document.select(&tables).find(|table| {
        table
            .value()
            .attr("id")
            .is_some_and(|id| id.contains(id_fragment))
    }))
}

pub fn extract_table(table: ElementRef<'_>) -> Result<ExtractedTable, ScrapeError> {
    let id = table.value().attr("id").unwrap_or_default().to_string();
    let headers = read_headers(table)?;

    let footer_rows = selector("tfoot > tr")?;
    let cells = selector("th, td")?;
    let rows = body_rows(table)?
        .into_iter()
        .chain(table.select(&footer_rows))
        .map(|tr| {
            tr.select(&cells)
                .map(|cell| CellValue::infer(&cell_text(cell)))
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(ExtractedTable { id, headers, rows })
}

/// Header rows expanded by `colspan`. One header row gives scalar headers;
/// several give one tuple per leaf column, top row first.
fn read_headers(table: ElementRef<'_>) -> Result<Vec<HeaderCell>, ScrapeError> {
    let header_rows = selector("thead > tr")?;
    let cells = selector("th, td")?;

    let mut levels: Vec<Vec<String>> = Vec::new();
    for tr in table.select(&header_rows) {
        let mut level = Vec::new();
        for cell in tr.select(&cells) {
            let span = cell
                .value()
                .attr("colspan")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .max(1);
            let label = cell_text(cell);
            level.extend(std::iter::repeat_n(label, span));
        }
        levels.push(level);
    }

    let width = levels.iter().map(Vec::len).max().unwrap_or(0);
    if levels.len() <= 1 {
        let level = levels.pop().unwrap_or_default();
        return Ok(level.into_iter().map(HeaderCell::Scalar).collect());
    }

    Ok((0..width)
        .map(|col| {
            HeaderCell::Tuple(
                levels
                    .iter()
                    .map(|level| level.get(col).cloned().unwrap_or_default())
                    .collect(),
            )
        })
        .collect())
}

/// Detail links from the player cell of every body row, in row order.
pub fn extract_player_links(
    table: ElementRef<'_>,
    base: &Url,
) -> Result<Vec<Option<String>>, ScrapeError> {
    let anchor = selector(r#"th[data-stat="player"] a[href], td[data-stat="player"] a[href]"#)?;
    Ok(body_rows(table)?
        .into_iter()
        .map(|tr| {
            tr.select(&anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| base.join(href).ok())
                .map(|url| url.to_string())
        })
        .collect())
}

/// `<tbody>` rows that carry data. Row extraction and link resolution both
/// walk this list so their indices line up.
fn body_rows(table: ElementRef<'_>) -> Result<Vec<ElementRef<'_>>, ScrapeError> {
    let rows = selector("tbody > tr")?;
    Ok(table
        .select(&rows)
        .filter(|tr| !is_interstitial_row(*tr))
        .collect())
}

/// Repeated header rows and spacer rows inside the body.
fn is_interstitial_row(tr: ElementRef<'_>) -> bool {
    tr.value()
        .classes()
        .any(|class| matches!(class, "thead" | "over_header" | "spacer"))
}

pub fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of the first element matching `css`.
pub fn first_text(document: &Html, css: &str) -> Result<Option<String>, ScrapeError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .map(cell_text)
        .filter(|text| !text.is_empty()))
}
