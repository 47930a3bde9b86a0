//! View state for the admin data tables.
//!
//! DESIGN
//! ======
//! The table never owns its rows. Callers pass a slice on every read, and
//! the state applies tab filter, select filters, global search and (unless
//! sorting is external) the current sort, then slices out the current page.
//!
//! In external sort mode the state still tracks the sort indicator but
//! leaves ordering to the server: [`DataTableState::toggle_sort`] returns
//! the [`SortChange`] to send, falling back to `created_at desc` when the
//! sort is cleared.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Tab or select value that disables its filter.
pub const ALL: &str = "all";
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

// =============================================================================
// ROWS AND COLUMNS
// =============================================================================

/// A row the table can display.
pub trait TableRow {
    /// Stable id used for row selection.
    fn row_id(&self) -> String;

    /// Display text for `column`, or `None` when the row has no such cell.
    fn cell(&self, column: &str) -> Option<String>;
}

/// JSON objects work as rows: `id` is the row id and every field is a cell.
impl TableRow for serde_json::Value {
    fn row_id(&self) -> String {
        self.get("id").map(json_text).unwrap_or_default()
    }

    fn cell(&self, column: &str) -> Option<String> {
        self.get(column).filter(|v| !v.is_null()).map(json_text)
    }
}

fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    /// Hideable columns can be toggled from the column menu.
    pub hideable: bool,
}

impl Column {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), sortable: true, hideable: true }
    }

    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.hideable = false;
        self
    }
}

// =============================================================================
// SORTING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

/// Sort request for a server-sorted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortChange {
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl SortChange {
    fn default_order() -> Self {
        Self { sort_by: DEFAULT_SORT_COLUMN.to_owned(), sort_order: SortOrder::Desc }
    }
}

/// Numbers compare numerically, everything else case-insensitively. Missing
/// cells sort first.
fn compare_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        },
    }
}

// =============================================================================
// FILTERS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabOption {
    pub value: String,
    pub label: String,
    /// Column the tab filters on; `None` means the tab shows everything.
    pub column: Option<String>,
    /// Cell text a row must have to appear under this tab.
    pub value_match: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabFilter {
    pub options: Vec<TabOption>,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    /// Cell text to match; defaults to `value`.
    pub value_match: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectFilter {
    pub column: String,
    pub label: String,
    pub options: Vec<SelectOption>,
    pub default_value: Option<String>,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct DataTableState {
    columns: Vec<Column>,
    hidden: BTreeSet<String>,
    sort: Option<SortState>,
    external_sort: bool,
    search: String,
    tab_filter: Option<TabFilter>,
    active_tab: String,
    select_filters: Vec<SelectFilter>,
    select_values: BTreeMap<String, String>,
    page_index: usize,
    page_size: usize,
    selected: BTreeSet<String>,
}

impl DataTableState {
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            hidden: BTreeSet::new(),
            sort: None,
            external_sort: false,
            search: String::new(),
            tab_filter: None,
            active_tab: String::new(),
            select_filters: Vec::new(),
            select_values: BTreeMap::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            selected: BTreeSet::new(),
        }
    }

    /// Leave ordering to the server; see [`Self::toggle_sort`].
    #[must_use]
    pub fn with_external_sort(mut self) -> Self {
        self.external_sort = true;
        self
    }

    /// The initial tab is `default_value`, else the first option.
    #[must_use]
    pub fn with_tab_filter(mut self, filter: TabFilter) -> Self {
        self.active_tab = filter
            .default_value
            .clone()
            .or_else(|| filter.options.first().map(|o| o.value.clone()))
            .unwrap_or_default();
        self.tab_filter = Some(filter);
        self
    }

    /// Each filter starts at its `default_value`, else [`ALL`].
    #[must_use]
    pub fn with_select_filters(mut self, filters: Vec<SelectFilter>) -> Self {
        self.select_values = filters
            .iter()
            .map(|f| (f.column.clone(), f.default_value.clone().unwrap_or_else(|| ALL.to_owned())))
            .collect();
        self.select_filters = filters;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    // --- Columns ---

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn is_column_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }

    /// Pinned columns ignore hide requests. Returns whether anything changed.
    pub fn set_column_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.id == id) else {
            return false;
        };
        if visible {
            self.hidden.remove(id)
        } else if column.hideable {
            self.hidden.insert(id.to_owned())
        } else {
            false
        }
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| self.is_column_visible(&c.id))
    }

    // --- Sorting ---

    #[must_use]
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Cycle `column` through ascending, descending and unsorted. A different
    /// column starts again at ascending.
    ///
    /// Returns the request to send when sorting is external; `None` for
    /// client-sorted tables and unsortable or unknown columns.
    pub fn toggle_sort(&mut self, column: &str) -> Option<SortChange> {
        if !self.columns.iter().any(|c| c.id == column && c.sortable) {
            return None;
        }
        self.sort = match self.sort.take() {
            Some(SortState { column: current, order: SortOrder::Asc }) if current == column => {
                Some(SortState { column: current, order: SortOrder::Desc })
            }
            Some(SortState { column: current, order: SortOrder::Desc }) if current == column => None,
            _ => Some(SortState { column: column.to_owned(), order: SortOrder::Asc }),
        };
        self.page_index = 0;
        self.external_sort.then(|| self.sort_change())
    }

    /// What a server-sorted table should request for the current sort.
    #[must_use]
    pub fn sort_change(&self) -> SortChange {
        self.sort.as_ref().map_or_else(SortChange::default_order, |s| SortChange {
            sort_by: s.column.clone(),
            sort_order: s.order,
        })
    }

    // --- Filtering ---

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: &str) {
        query.clone_into(&mut self.search);
        self.page_index = 0;
    }

    #[must_use]
    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    /// Empty values are ignored.
    pub fn set_tab(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        value.clone_into(&mut self.active_tab);
        self.page_index = 0;
    }

    #[must_use]
    pub fn select_value(&self, column: &str) -> Option<&str> {
        self.select_values.get(column).map(String::as_str)
    }

    /// Empty columns or values are ignored.
    pub fn set_select_filter(&mut self, column: &str, value: &str) {
        if column.is_empty() || value.is_empty() {
            return;
        }
        self.select_values.insert(column.to_owned(), value.to_owned());
        self.page_index = 0;
    }

    /// `(column, required cell text)` pairs currently in force.
    fn active_filters(&self) -> Vec<(&str, &str)> {
        let mut filters = Vec::new();
        if self.active_tab != ALL {
            let tab = self
                .tab_filter
                .iter()
                .flat_map(|f| &f.options)
                .find(|o| o.value == self.active_tab);
            if let Some(TabOption { column: Some(column), value_match: Some(wanted), .. }) = tab {
                filters.push((column.as_str(), wanted.as_str()));
            }
        }
        for (column, value) in &self.select_values {
            if value == ALL {
                continue;
            }
            let wanted = self
                .select_filters
                .iter()
                .find(|f| &f.column == column)
                .and_then(|f| f.options.iter().find(|o| &o.value == value))
                .and_then(|o| o.value_match.as_deref())
                .unwrap_or(value);
            filters.push((column.as_str(), wanted));
        }
        filters
    }

    fn matches_search<R: TableRow>(&self, row: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.visible_columns()
            .filter_map(|c| row.cell(&c.id))
            .any(|text| text.to_lowercase().contains(&needle))
    }

    /// Rows passing every filter, in display order.
    pub fn filtered_rows<'a, R: TableRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        let filters = self.active_filters();
        let mut out: Vec<&R> = rows
            .iter()
            .filter(|row| filters.iter().all(|(column, wanted)| row.cell(column).as_deref() == Some(*wanted)))
            .filter(|row| self.matches_search(*row))
            .collect();
        if let Some(sort) = self.sort.as_ref().filter(|_| !self.external_sort) {
            out.sort_by(|a, b| {
                let ord = compare_cells(a.cell(&sort.column).as_deref(), b.cell(&sort.column).as_deref());
                match sort.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        out
    }

    // --- Pagination ---

    #[must_use]
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total_rows / page_size)`, never less than one.
    #[must_use]
    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    /// Clamped to the last page.
    pub fn set_page_index(&mut self, index: usize, total_rows: usize) {
        self.page_index = index.min(self.page_count(total_rows) - 1);
    }

    /// Zero is treated as one. Returns to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page_index = 0;
    }

    #[must_use]
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    #[must_use]
    pub fn can_next_page(&self, total_rows: usize) -> bool {
        self.page_index + 1 < self.page_count(total_rows)
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next_page(&mut self, total_rows: usize) {
        if self.can_next_page(total_rows) {
            self.page_index += 1;
        }
    }

    /// The current page of [`Self::filtered_rows`].
    pub fn page_rows<'a, R: TableRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        self.filtered_rows(rows)
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    // --- Row selection ---

    #[must_use]
    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selected.contains(row_id)
    }

    /// Returns the new selected state of the row.
    pub fn toggle_row(&mut self, row_id: &str) -> bool {
        if self.selected.remove(row_id) {
            false
        } else {
            self.selected.insert(row_id.to_owned());
            true
        }
    }

    /// Select or clear every row on the current page.
    pub fn set_page_selected<R: TableRow>(&mut self, rows: &[R], selected: bool) {
        for row in self.page_rows(rows) {
            let id = row.row_id();
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }

    /// True when the current page is non-empty and fully selected.
    pub fn is_page_selected<R: TableRow>(&self, rows: &[R]) -> bool {
        let page = self.page_rows(rows);
        !page.is_empty() && page.iter().all(|row| self.selected.contains(&row.row_id()))
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}
