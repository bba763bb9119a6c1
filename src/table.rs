//! Tabular view of a result set.
//!
//! The table always shows the full flattened row set: no row cap and no
//! constant-column pruning beyond what [`schema::columns()`] does. Sorting is
//! by a single column; pagination slices the sorted rows.

use std::{borrow::Cow, cmp::Ordering, fmt, fmt::Write as _};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    data::{Row, Value, locale_compare},
    format::{field_label, format_value},
    metadata::ColumnMetadata,
    normalize::{GROUP_FIELD, flatten_rows},
    schema,
};

pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const EMPTY_TABLE_MESSAGE: &str = "No results for this query";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    /// Parses `column[:asc|desc]`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (column, direction) = match spec.rsplit_once(':') {
            Some((column, direction)) => (column, Some(direction)),
            None => (spec, None),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(anyhow!("Sort directive is missing a column"));
        }
        let direction = match direction
            .map(|d| d.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => return Err(anyhow!("Unknown sort direction '{other}'")),
        };
        Ok(SortState {
            column: column.to_string(),
            direction,
        })
    }
}

/// Page, page size and sort of one table. Every transition returns a new
/// value; changing the sort or the page size always returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    pub page: usize,
    pub rows_per_page: usize,
    pub sort: Option<SortState>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            sort: None,
        }
    }
}

impl TableSettings {
    /// Same column cycles asc → desc → unsorted; another column starts at asc.
    pub fn toggle_sort(&self, column: &str) -> Self {
        let sort = match &self.sort {
            Some(current) if current.column == column => match current.direction {
                SortDirection::Asc => Some(SortState {
                    column: column.to_string(),
                    direction: SortDirection::Desc,
                }),
                SortDirection::Desc => None,
            },
            _ => Some(SortState {
                column: column.to_string(),
                direction: SortDirection::Asc,
            }),
        };
        Self {
            page: 1,
            sort,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: Option<SortState>) -> Self {
        Self {
            page: 1,
            sort,
            ..self.clone()
        }
    }

    pub fn with_rows_per_page(&self, rows_per_page: usize) -> Self {
        Self {
            page: 1,
            rows_per_page: rows_per_page.max(1),
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize, total_rows: usize) -> Self {
        let last = self.total_pages(total_rows).max(1);
        Self {
            page: page.clamp(1, last),
            ..self.clone()
        }
    }

    pub fn next_page(&self, total_rows: usize) -> Self {
        self.with_page(self.page.saturating_add(1), total_rows)
    }

    pub fn previous_page(&self, total_rows: usize) -> Self {
        self.with_page(self.page.saturating_sub(1), total_rows)
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.rows_per_page.max(1))
    }
}

/// Stable single-column sort. Missing and null cells go last in either
/// direction.
pub fn sort_rows(rows: &[Row], sort: Option<&SortState>) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if let Some(sort) = sort {
        sorted.sort_by(|a, b| compare_cells(a.get(&sort.column), b.get(&sort.column), sort.direction));
    }
    sorted
}

fn compare_cells(left: Option<&Value>, right: Option<&Value>, direction: SortDirection) -> Ordering {
    let is_empty = |value: Option<&Value>| matches!(value, None | Some(Value::Null));
    match (is_empty(left), is_empty(right)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let ord = match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Some(a), Some(b)) => locale_compare(&a.as_display(), &b.as_display()),
        _ => Ordering::Equal,
    };
    if direction.is_ascending() {
        ord
    } else {
        ord.reverse()
    }
}

/// Header text for a column: grouping prefixes are dropped.
pub fn column_header(column: &str) -> String {
    let prefix = format!("{GROUP_FIELD}.");
    field_label(&column.replace(&prefix, ""))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub headers: Vec<String>,
    pub numeric: Vec<bool>,
    pub cells: Vec<Vec<String>>,
    pub page: usize,
    pub rows_per_page: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub sort: Option<SortState>,
}

impl TableView {
    pub fn build(rows: &[Row], metadata: &[ColumnMetadata], settings: &TableSettings) -> Self {
        let flattened = flatten_rows(rows);
        Self::from_flattened(&flattened, metadata, settings)
    }

    pub fn from_flattened(
        flattened: &[Row],
        metadata: &[ColumnMetadata],
        settings: &TableSettings,
    ) -> Self {
        let columns = schema::columns(flattened);
        let numeric_fields = schema::numeric_fields(flattened);
        let sorted = sort_rows(flattened, settings.sort.as_ref());

        let rows_per_page = settings.rows_per_page.max(1);
        let total_pages = sorted.len().div_ceil(rows_per_page);
        let page = settings.page.clamp(1, total_pages.max(1));
        let start = (page - 1).saturating_mul(rows_per_page);
        let cells = sorted
            .iter()
            .skip(start)
            .take(rows_per_page)
            .map(|row| {
                columns
                    .iter()
                    .map(|column| format_value(row.get(column), column, metadata))
                    .collect()
            })
            .collect();

        Self {
            headers: columns.iter().map(|c| column_header(c)).collect(),
            numeric: columns.iter().map(|c| numeric_fields.contains(c)).collect(),
            columns,
            cells,
            page,
            rows_per_page,
            total_rows: sorted.len(),
            total_pages,
            sort: settings.sort.clone(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn range_label(&self) -> String {
        let start = self
            .page
            .saturating_sub(1)
            .saturating_mul(self.rows_per_page)
            .saturating_add(1);
        let end = self
            .page
            .saturating_mul(self.rows_per_page)
            .min(self.total_rows);
        format!("Showing {start} to {end} of {} results", self.total_rows)
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }

    pub fn render(&self) -> String {
        if self.total_rows == 0 {
            return format!("{EMPTY_TABLE_MESSAGE}\n");
        }
        let headers: Vec<String> = self
            .columns
            .iter()
            .zip(&self.headers)
            .map(|(column, header)| match &self.sort {
                Some(sort) if &sort.column == column => {
                    format!("{header} {}", sort.direction.marker())
                }
                _ => header.clone(),
            })
            .collect();
        let mut output = render_grid(&headers, &self.cells, &self.numeric);
        let _ = writeln!(output);
        let _ = writeln!(output, "{}  |  {}", self.range_label(), self.page_label());
        output
    }
}

/// Aligned grid with a dashed separator under the header. Columns flagged in
/// `right_align` are padded on the left.
pub fn render_grid(headers: &[String], rows: &[Vec<String>], right_align: &[bool]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(&sanitize_cell(cell)));
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, right_align));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, right_align));
    }
    output
}

fn format_row(values: &[String], widths: &[usize], right_align: &[bool]) -> String {
    let cells = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (value, width))| {
            let sanitized = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&sanitized)));
            if right_align.get(idx).copied().unwrap_or(false) {
                format!("{padding}{sanitized}")
            } else {
                format!("{sanitized}{padding}")
            }
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_spec_parsing() {
        let parsed = SortState::parse("total:desc").unwrap();
        assert_eq!(parsed.column, "total");
        assert_eq!(parsed.direction, SortDirection::Desc);
        assert_eq!(
            SortState::parse("region").unwrap().direction,
            SortDirection::Asc
        );
        assert!(SortState::parse(":asc").is_err());
        assert!(SortState::parse("total:sideways").is_err());
    }

    #[test]
    fn headers_drop_group_prefix() {
        assert_eq!(column_header("group.dept_name"), "Dept Name");
        assert_eq!(column_header("total_spend"), "Total Spend");
    }

    #[test]
    fn grid_right_aligns_flagged_columns() {
        let headers = vec!["name".to_string(), "qty".to_string()];
        let rows = vec![
            vec!["Alice".to_string(), "5".to_string()],
            vec!["Bob".to_string(), "1,200".to_string()],
        ];
        let rendered = render_grid(&headers, &rows, &[false, true]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec!["name     qty", "-----  -----", "Alice      5", "Bob    1,200"]
        );
    }

    #[test]
    fn grid_replaces_control_characters() {
        let headers = vec!["note".to_string()];
        let rows = vec![vec!["line1\nline2\tvalue".to_string()]];
        let rendered = render_grid(&headers, &rows, &[]);
        assert_eq!(rendered.lines().nth(2), Some("line1 line2 value"));
    }
}
