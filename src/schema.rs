//! Static nutrient schema: which dataset fields hold each nutrient, per basis,
//! and the unit each nutrient is displayed in.

use crate::FoodRecord;

/// The quantity a stored nutrient value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    Per100g,
    PerGram,
    PerOunce,
}

/// One logical nutrient with its per-basis field keys. A record may still
/// lack the gram/ounce fields; callers fall back to the per-100g value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutrientEntry {
    pub label: &'static str,
    pub per_100g: &'static str,
    pub per_gram: &'static str,
    pub per_ounce: &'static str,
    pub unit: &'static str,
}

impl NutrientEntry {
    pub fn key(&self, basis: Basis) -> &'static str {
        match basis {
            Basis::Per100g => self.per_100g,
            Basis::PerGram => self.per_gram,
            Basis::PerOunce => self.per_ounce,
        }
    }

    /// Reads the stored value for `basis`, without any fallback.
    pub fn stored_value(&self, record: &FoodRecord, basis: Basis) -> Option<f64> {
        record.number(self.key(basis))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutrientCategory {
    pub name: &'static str,
    pub entries: &'static [NutrientEntry],
}

macro_rules! nutrient {
    ($label:expr, $field:expr, $unit:expr) => {
        NutrientEntry {
            label: $label,
            per_100g: concat!($field, " (per 100g)"),
            per_gram: concat!($field, " (per gram)"),
            per_ounce: concat!($field, " (per ounce)"),
            unit: $unit,
        }
    };
}

pub const ENERGY: NutrientEntry = nutrient!("Energy", "Calories", "kcal");
pub const PROTEIN: NutrientEntry = nutrient!("Protein", "Protein", "g");
pub const FAT: NutrientEntry = nutrient!("Fat", "Fat", "g");
pub const CARBOHYDRATES: NutrientEntry = nutrient!("Carbohydrates", "Carbohydrates", "g");

const MACROS: &[NutrientEntry] = &[
    ENERGY,
    PROTEIN,
    FAT,
    CARBOHYDRATES,
    nutrient!("Fiber", "Fiber dietary", "g"),
    nutrient!("Sugars", "Sugars", "g"),
];

const MINERALS: &[NutrientEntry] = &[
    nutrient!("Calcium", "Calcium", "mg"),
    nutrient!("Iron", "Iron", "mg"),
    nutrient!("Magnesium", "Magnesium", "mg"),
    nutrient!("Phosphorus", "Phosphorus", "mg"),
    nutrient!("Potassium", "Potassium", "mg"),
    nutrient!("Sodium", "Sodium", "mg"),
    nutrient!("Zinc", "Zinc", "mg"),
    nutrient!("Copper", "Copper", "mg"),
    nutrient!("Manganese", "Manganese", "mg"),
    nutrient!("Selenium", "Selenium", "mcg"),
];

const VITAMINS: &[NutrientEntry] = &[
    nutrient!("Vitamin C", "Vitamin C ascorbic acid", "mg"),
    nutrient!("Vitamin A", "Vitamin A", "mcg"),
    nutrient!("Vitamin E", "Vitamin E", "mg"),
    nutrient!("Vitamin D", "Vitamin D", "mcg"),
    nutrient!("Thiamin (B1)", "Thiamin", "mg"),
    nutrient!("Riboflavin (B2)", "Riboflavin", "mg"),
    nutrient!("Niacin (B3)", "Niacin", "mg"),
    nutrient!("Vitamin B6", "Vitamin B6", "mg"),
    nutrient!("Folate", "Folate, DFE", "mcg"),
    nutrient!("Vitamin B12", "Vitamin B12", "mcg"),
    nutrient!("Vitamin K", "Vitamin K", "mcg"),
];

/// Categories in display order.
pub const NUTRIENT_SCHEMA: &[NutrientCategory] = &[
    NutrientCategory {
        name: "Macros",
        entries: MACROS,
    },
    NutrientCategory {
        name: "Minerals",
        entries: MINERALS,
    },
    NutrientCategory {
        name: "Vitamins",
        entries: VITAMINS,
    },
];

/// Kilocalories per gram for protein, carbohydrates and fat.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBOHYDRATES: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

pub fn estimate_kcal(protein_g: f64, carbohydrates_g: f64, fat_g: f64) -> f64 {
    protein_g * KCAL_PER_G_PROTEIN + carbohydrates_g * KCAL_PER_G_CARBOHYDRATES + fat_g * KCAL_PER_G_FAT
}

/// Header label for a field key: the key without its trailing `(per ...)` part.
pub fn display_label(field: &str) -> &str {
    match field.rfind(" (") {
        Some(idx) if field.ends_with(')') => &field[..idx],
        _ => field,
    }
}
