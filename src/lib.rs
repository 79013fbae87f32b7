//! Core library for nutriview, a desktop browser for food nutrition datasets.
//! Provides dataset loading/export, the nutrient schema, table sorting and paging,
//! name search and quantity-based nutrient scaling, plus the egui front end.

pub mod config;
mod dataset;
pub mod detail;
mod gui;
pub mod schema;
pub mod search;
pub mod statics;
pub mod table;
mod value;

pub use config::AppConfig;
pub use dataset::{Dataset, DatasetError, DatasetFormat, FoodRecord};
pub use gui::run_gui;
pub use value::{FoodNumber, FoodValue};
