// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "nutriview: Food Nutrition Browser";

pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_EXPORT_JSON: &str = "Download JSON...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_SEARCH: &str = "Search";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_VIEW: &str = "View";
pub const EN_BTN_CLOSE: &str = "Close";
pub const EN_BTN_PREV_PAGE: &str = "<- Previous";
pub const EN_BTN_NEXT_PAGE: &str = "Next ->";

pub const EN_WINDOW_ABOUT: &str = "About";

pub const EN_ABOUT_HEADING: &str = "nutriview: Food Nutrition Browser";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_ESTIMATE_NOTE: &str =
    "Estimated calories use 4 kcal/g protein, 4 kcal/g carbohydrates and 9 kcal/g fat.";

pub const EN_HOME_HEADING: &str = "nutriview: Food Nutrition Browser";
pub const EN_HOME_LOADING: &str = "Loading food data...";
pub const EN_HOME_INSTRUCTIONS: &str = "Open a food data file (.json/.gz) to begin.";

pub const EN_HEADING_SEARCH: &str = "Search";
pub const EN_HEADING_FOODS: &str = "Foods";
pub const EN_HEADING_DETAILS: &str = "Details";

pub const EN_LABEL_TOTAL_FOODS: &str = "Total foods:";
pub const EN_LABEL_PER_PAGE: &str = "Items per page:";
pub const EN_LABEL_QUANTITY: &str = "Quantity:";
pub const EN_LABEL_UNIT: &str = "Unit:";
pub const EN_HINT_SEARCH: &str = "e.g. cheddar cheese";
pub const EN_HINT_QUANTITY: &str = "1";

pub const EN_SEARCH_ENTER_QUERY: &str = "Please enter a food name to search.";
pub const EN_TABLE_NO_DATA: &str = "No data to display.";
pub const EN_SELECT_FOOD: &str = "Select a food from the table or the search results.";

// Small glyphs used in tables/headers.
pub const EN_GLYPH_SORT_ASC: &str = "^";
pub const EN_GLYPH_SORT_DESC: &str = "v";

pub const EN_COL_DETAILS: &str = "Details";

pub const EN_UNIT_GRAM: &str = "gram";
pub const EN_UNIT_OUNCE: &str = "ounce";

pub const EN_NOT_AVAILABLE: &str = "N/A";
pub const EN_BADGE_ESTIMATED: &str = "(estimated)";
pub const EN_COUNT_ERROR: &str = "Error";
pub const EN_EMPTY: &str = "";

pub const EN_ERR_LOAD: &str = "Error loading food data. Please ensure the file exists and is valid.";

// Dataset field names (FIELD_ prefix).
pub const FIELD_FOOD_NAME: &str = "Food Name";
pub const FIELD_FDC_ID: &str = "fdc_id";

// Files.
pub const DEFAULT_DATA_FILE: &str = "food_data.json";
pub const EXPORT_FILE_NAME: &str = "food_nutrition_data.json";
pub const EN_FILTER_FOOD_DATA: &str = "Food data";

// Environment variables (ENV_ prefix).
pub const ENV_DATA_PATH: &str = "NUTRIVIEW_DATA";
pub const ENV_PAGE_SIZE: &str = "NUTRIVIEW_PAGE_SIZE";
pub const ENV_THEME: &str = "NUTRIVIEW_THEME";

pub const GRAMS_PER_OUNCE: f64 = 28.3495;
