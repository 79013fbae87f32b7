//! Table view logic: column selection, sorting, pagination and cell text.

use crate::schema::{self, Basis};
use crate::{FoodRecord, FoodValue, statics};
use std::{cmp::Ordering, ops::Range};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Nutrient columns the table may show, in order. Only those present in the
/// first record of a dataset are used.
pub const NUTRIENT_COLUMNS: &[&str] = &[
    "Calories (per 100g)",
    "Protein (per 100g)",
    "Fat (per 100g)",
    "Carbohydrates (per 100g)",
    "Fiber dietary (per 100g)",
    "Sodium (per 100g)",
];

pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub key: String,
    pub kind: ColumnKind,
}

impl TableColumn {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: column_kind(key),
        }
    }

    pub fn label(&self) -> &str {
        schema::display_label(&self.key)
    }
}

pub fn column_kind(key: &str) -> ColumnKind {
    if key == statics::FIELD_FOOD_NAME {
        ColumnKind::Text
    } else {
        ColumnKind::Number
    }
}

/// The columns shown by the table. Computed once per dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    columns: Vec<TableColumn>,
}

impl TableColumns {
    /// Name column plus every allow-listed nutrient column present in `sample`.
    pub fn from_sample(sample: Option<&FoodRecord>) -> Self {
        let mut columns = vec![TableColumn::new(statics::FIELD_FOOD_NAME)];
        if let Some(sample) = sample {
            columns.extend(
                NUTRIENT_COLUMNS
                    .iter()
                    .filter(|key| sample.has_field(key))
                    .map(|key| TableColumn::new(key)),
            );
        }
        Self { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }
}

impl Default for TableColumns {
    fn default() -> Self {
        Self::from_sample(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            SortDirection::Ascending => statics::EN_GLYPH_SORT_ASC,
            SortDirection::Descending => statics::EN_GLYPH_SORT_DESC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Paging and sorting state of the table. Owned by the app and changed only
/// through user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    page: usize,
    page_size: usize,
    sort: Option<SortState>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            sort: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn total_pages(&self, record_count: usize) -> usize {
        record_count.div_ceil(self.page_size)
    }

    /// Keeps the page inside `[1, total_pages]` (page 1 for an empty dataset).
    pub fn clamp_page(&mut self, record_count: usize) {
        let last = self.total_pages(record_count).max(1);
        self.page = self.page.clamp(1, last);
    }

    /// Header click: flip direction on the active column, otherwise sort the
    /// new column ascending. Always returns to page 1.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.column == column => SortState {
                column: current.column,
                direction: current.direction.toggled(),
            },
            _ => SortState {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            },
        });
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size != self.page_size {
            self.page_size = page_size;
            self.page = 1;
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, record_count: usize) -> bool {
        self.page < self.total_pages(record_count)
    }

    pub fn prev_page(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    pub fn next_page(&mut self, record_count: usize) {
        if self.has_next(record_count) {
            self.page += 1;
        }
    }

    /// Positions (into the sorted order) covered by the current page.
    pub fn page_range(&self, record_count: usize) -> Range<usize> {
        let start = ((self.page.max(1) - 1) * self.page_size).min(record_count);
        let end = (start + self.page_size).min(record_count);
        start..end
    }

    /// Record indices for the current page: sort the full dataset, then slice.
    pub fn visible_rows(&mut self, records: &[FoodRecord]) -> Vec<usize> {
        self.clamp_page(records.len());
        let order = sort_order(records, self.sort.as_ref());
        order[self.page_range(records.len())].to_vec()
    }
}

/// Record indices in display order. The sort is stable, so equal keys keep
/// their dataset order in both directions.
pub fn sort_order(records: &[FoodRecord], sort: Option<&SortState>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    let Some(sort) = sort else {
        return order;
    };

    match column_kind(&sort.column) {
        ColumnKind::Text => {
            let keys: Vec<(String, String)> =
                records.iter().map(|r| text_sort_key(r, &sort.column)).collect();
            order.sort_by(|&a, &b| apply_direction(keys[a].cmp(&keys[b]), sort.direction));
        }
        ColumnKind::Number => {
            let keys: Vec<f64> = records
                .iter()
                .map(|r| r.number(&sort.column).unwrap_or(f64::NEG_INFINITY))
                .collect();
            order.sort_by(|&a, &b| apply_direction(keys[a].total_cmp(&keys[b]), sort.direction));
        }
    }
    order
}

fn text_sort_key(record: &FoodRecord, column: &str) -> (String, String) {
    match record.get(column) {
        Some(FoodValue::String(s)) => collation_key(s),
        Some(other) if !other.is_blank() => collation_key(&format_value(Some(other))),
        _ => (String::new(), String::new()),
    }
}

/// Case-insensitive key that ignores accents first (`Éclair` sorts with
/// `eclair`), then breaks ties on the lowercase text.
pub fn collation_key(text: &str) -> (String, String) {
    let lower = text.to_lowercase();
    let folded = lower.nfd().filter(|c| !is_combining_mark(*c)).collect();
    (folded, lower)
}

fn apply_direction(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Text for one table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellText {
    pub text: String,
    pub estimated: bool,
}

impl CellText {
    fn plain(text: String) -> Self {
        Self {
            text,
            estimated: false,
        }
    }
}

pub fn format_number(v: f64) -> String {
    format!("{v:.2}")
}

/// Numbers with two decimals, other non-empty text verbatim, otherwise `N/A`.
pub fn format_value(value: Option<&FoodValue>) -> String {
    match value {
        Some(v @ FoodValue::Number(_)) => v
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| statics::EN_NOT_AVAILABLE.to_string()),
        Some(FoodValue::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(FoodValue::Bool(b)) => b.to_string(),
        _ => statics::EN_NOT_AVAILABLE.to_string(),
    }
}

/// Nutrient columns read numeric strings as numbers, so `"12.5"` shows as
/// `12.50`. Text columns are shown as stored.
pub fn format_cell(record: &FoodRecord, key: &str) -> CellText {
    if column_kind(key) == ColumnKind::Number {
        match record.number(key) {
            Some(v) => return CellText::plain(format_number(v)),
            None if key == schema::ENERGY.key(Basis::Per100g) => {
                return estimated_calories_cell(record);
            }
            None => {}
        }
    }
    CellText::plain(format_value(record.get(key)))
}

fn estimated_calories_cell(record: &FoodRecord) -> CellText {
    let protein = schema::PROTEIN.stored_value(record, Basis::Per100g);
    let carbs = schema::CARBOHYDRATES.stored_value(record, Basis::Per100g);
    let fat = schema::FAT.stored_value(record, Basis::Per100g);

    if protein.is_none() && carbs.is_none() && fat.is_none() {
        return CellText::plain(statics::EN_NOT_AVAILABLE.to_string());
    }

    let kcal = schema::estimate_kcal(
        protein.unwrap_or(0.0),
        carbs.unwrap_or(0.0),
        fat.unwrap_or(0.0),
    );
    CellText {
        text: format!("{} {}", format_number(kcal), statics::EN_BADGE_ESTIMATED),
        estimated: true,
    }
}
