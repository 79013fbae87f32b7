//! Detail view logic: scale every schema nutrient of one food to a quantity.

use crate::schema::{self, Basis, NUTRIENT_SCHEMA, NutrientEntry};
use crate::table::format_number;
use crate::{FoodRecord, statics};

/// Units the user can scale by. Per-100g data is only a fallback source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Gram,
    Ounce,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Gram, Unit::Ounce];

    pub fn basis(self) -> Basis {
        match self {
            Unit::Gram => Basis::PerGram,
            Unit::Ounce => Basis::PerOunce,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Gram => statics::EN_UNIT_GRAM,
            Unit::Ounce => statics::EN_UNIT_OUNCE,
        }
    }

    /// Converts a per-100g value into a per-unit value.
    fn from_per_100g(self, v: f64) -> f64 {
        match self {
            Unit::Gram => v / 100.0,
            Unit::Ounce => v / 100.0 * statics::GRAMS_PER_OUNCE,
        }
    }
}

/// Parses the quantity field. Anything that is not a positive finite number
/// becomes 1.
pub fn parse_quantity(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(q) if q.is_finite() && q > 0.0 => q,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NutrientAmount {
    Measured(f64),
    Estimated(f64),
    NotAvailable,
}

impl NutrientAmount {
    pub fn value(self) -> Option<f64> {
        match self {
            NutrientAmount::Measured(v) | NutrientAmount::Estimated(v) => Some(v),
            NutrientAmount::NotAvailable => None,
        }
    }

    pub fn is_estimated(self) -> bool {
        matches!(self, NutrientAmount::Estimated(_))
    }

    pub fn display(self, unit: &str) -> String {
        match self {
            NutrientAmount::Measured(v) => format!("{} {unit}", format_number(v)),
            NutrientAmount::Estimated(v) => {
                format!("{} {unit} {}", format_number(v), statics::EN_BADGE_ESTIMATED)
            }
            NutrientAmount::NotAvailable => statics::EN_NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub unit: &'static str,
    pub amount: NutrientAmount,
}

impl DetailRow {
    pub fn text(&self) -> String {
        self.amount.display(self.unit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailGroup {
    pub name: &'static str,
    pub rows: Vec<DetailRow>,
}

/// Everything the detail panel shows for one food at one quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDetail {
    pub name: String,
    pub fdc_id: String,
    pub quantity: f64,
    pub unit: Unit,
    pub groups: Vec<DetailGroup>,
}

impl FoodDetail {
    pub fn row(&self, label: &str) -> Option<&DetailRow> {
        self.groups
            .iter()
            .flat_map(|g| g.rows.iter())
            .find(|r| r.label == label)
    }
}

/// Value of `entry` per one `unit`: the unit's own field if numeric, else the
/// per-100g field converted.
pub fn per_unit_value(entry: &NutrientEntry, record: &FoodRecord, unit: Unit) -> Option<f64> {
    entry.stored_value(record, unit.basis()).or_else(|| {
        entry
            .stored_value(record, Basis::Per100g)
            .map(|v| unit.from_per_100g(v))
    })
}

fn scaled_amount(entry: &NutrientEntry, record: &FoodRecord, quantity: f64, unit: Unit) -> NutrientAmount {
    match per_unit_value(entry, record, unit) {
        Some(v) => NutrientAmount::Measured(v * quantity),
        None => NutrientAmount::NotAvailable,
    }
}

fn calorie_amount(record: &FoodRecord, quantity: f64, unit: Unit) -> NutrientAmount {
    match per_unit_value(&schema::ENERGY, record, unit) {
        Some(kcal) if kcal != 0.0 => NutrientAmount::Measured(kcal * quantity),
        _ => {
            let macro_value = |e: &NutrientEntry| per_unit_value(e, record, unit).unwrap_or(0.0);
            let protein = macro_value(&schema::PROTEIN);
            let carbs = macro_value(&schema::CARBOHYDRATES);
            let fat = macro_value(&schema::FAT);
            if protein == 0.0 && carbs == 0.0 && fat == 0.0 {
                return NutrientAmount::NotAvailable;
            }
            NutrientAmount::Estimated(schema::estimate_kcal(protein, carbs, fat) * quantity)
        }
    }
}

pub fn compute_detail(record: &FoodRecord, quantity: f64, unit: Unit) -> FoodDetail {
    let groups = NUTRIENT_SCHEMA
        .iter()
        .map(|category| DetailGroup {
            name: category.name,
            rows: category
                .entries
                .iter()
                .map(|entry| DetailRow {
                    label: entry.label,
                    unit: entry.unit,
                    amount: if *entry == schema::ENERGY {
                        calorie_amount(record, quantity, unit)
                    } else {
                        scaled_amount(entry, record, quantity, unit)
                    },
                })
                .collect(),
        })
        .collect();

    FoodDetail {
        name: record.name().to_string(),
        fdc_id: record.fdc_id_label(),
        quantity,
        unit,
        groups,
    }
}

/// The food shown in the detail panel plus its quantity inputs.
#[derive(Debug, Clone)]
pub struct SelectedFood {
    pub index: usize,
    pub quantity_input: String,
    pub unit: Unit,
    detail: FoodDetail,
}

impl SelectedFood {
    pub fn new(index: usize, record: &FoodRecord) -> Self {
        let quantity_input = statics::EN_HINT_QUANTITY.to_string();
        let unit = Unit::default();
        let detail = compute_detail(record, parse_quantity(&quantity_input), unit);
        Self {
            index,
            quantity_input,
            unit,
            detail,
        }
    }

    /// Rebuild the detail from the current inputs, replacing the previous one.
    pub fn recompute(&mut self, record: &FoodRecord) {
        self.detail = compute_detail(record, parse_quantity(&self.quantity_input), self.unit);
    }

    pub fn detail(&self) -> &FoodDetail {
        &self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::{NutrientAmount, SelectedFood, Unit, compute_detail, parse_quantity, per_unit_value};
    use crate::schema::{self, NUTRIENT_SCHEMA};
    use crate::{FoodRecord, FoodValue, statics};

    #[test]
    fn parse_quantity_coerces_bad_input_to_one() {
        assert_eq!(parse_quantity("2.5"), 2.5);
        assert_eq!(parse_quantity(" 50 "), 50.0);
        assert_eq!(parse_quantity("0"), 1.0);
        assert_eq!(parse_quantity("-3"), 1.0);
        assert_eq!(parse_quantity("abc"), 1.0);
        assert_eq!(parse_quantity(""), 1.0);
        assert_eq!(parse_quantity("NaN"), 1.0);
        assert_eq!(parse_quantity("inf"), 1.0);
    }

    #[test]
    fn cheddar_calories_are_estimated_from_macros() {
        let cheddar = FoodRecord::named("Cheddar Cheese", 328637)
            .with_number("Protein (per gram)", 0.25)
            .with_number("Fat (per gram)", 0.33)
            .with_number("Carbohydrates (per gram)", 0.01);

        let detail = compute_detail(&cheddar, 50.0, Unit::Gram);
        let energy = detail.row("Energy").unwrap();
        assert!(energy.amount.is_estimated());
        let kcal = energy.amount.value().unwrap();
        assert!((kcal - 200.5).abs() < 1e-9, "got {kcal}");
        assert_eq!(energy.text(), "200.50 kcal (estimated)");
    }

    #[test]
    fn explicit_calories_are_scaled_not_estimated() {
        let record = FoodRecord::named("Sugar", 1).with_number("Calories (per gram)", 4.0);
        let detail = compute_detail(&record, 10.0, Unit::Gram);
        let energy = detail.row("Energy").unwrap();
        assert_eq!(energy.amount, NutrientAmount::Measured(40.0));
        assert_eq!(energy.text(), "40.00 kcal");
    }

    #[test]
    fn zero_calories_with_zero_macros_is_not_available() {
        let record = FoodRecord::named("Water", 1)
            .with_number("Calories (per gram)", 0.0)
            .with_number("Protein (per gram)", 0.0);
        let detail = compute_detail(&record, 100.0, Unit::Gram);
        assert_eq!(
            detail.row("Energy").unwrap().amount,
            NutrientAmount::NotAvailable
        );
        assert_eq!(detail.row("Energy").unwrap().text(), statics::EN_NOT_AVAILABLE);
    }

    #[test]
    fn missing_category_is_not_available_everywhere() {
        let record = FoodRecord::named("Plain", 1).with_number("Protein (per gram)", 0.1);
        let detail = compute_detail(&record, 3.0, Unit::Ounce);

        let vitamins = detail.groups.iter().find(|g| g.name == "Vitamins").unwrap();
        assert_eq!(vitamins.rows.len(), 11);
        for row in &vitamins.rows {
            assert_eq!(row.amount, NutrientAmount::NotAvailable);
            assert_eq!(row.text(), statics::EN_NOT_AVAILABLE);
        }
    }

    #[test]
    fn every_schema_entry_gets_a_row() {
        let detail = compute_detail(&FoodRecord::default(), 1.0, Unit::Gram);
        let rows: usize = detail.groups.iter().map(|g| g.rows.len()).sum();
        let entries: usize = NUTRIENT_SCHEMA.iter().map(|c| c.entries.len()).sum();
        assert_eq!(rows, entries);
    }

    #[test]
    fn ounce_values_fall_back_to_per_100g() {
        let record = FoodRecord::named("Iron rich", 1).with_number("Iron (per 100g)", 10.0);
        let per_ounce = per_unit_value(&NUTRIENT_SCHEMA[1].entries[1], &record, Unit::Ounce).unwrap();
        assert!((per_ounce - 2.83495).abs() < 1e-9);

        let detail = compute_detail(&record, 2.0, Unit::Ounce);
        assert_eq!(detail.row("Iron").unwrap().text(), "5.67 mg");
    }

    #[test]
    fn unit_field_wins_over_per_100g() {
        let record = FoodRecord::named("x", 1)
            .with_number("Protein (per 100g)", 50.0)
            .with_number("Protein (per ounce)", 1.0);
        assert_eq!(per_unit_value(&schema::PROTEIN, &record, Unit::Ounce), Some(1.0));
        assert_eq!(per_unit_value(&schema::PROTEIN, &record, Unit::Gram), Some(0.5));
    }

    #[test]
    fn non_numeric_unit_field_uses_fallback() {
        let mut record = FoodRecord::named("x", 1).with_number("Fat (per 100g)", 20.0);
        record.insert("Fat (per gram)", FoodValue::String("N/A".to_string()));
        assert_eq!(per_unit_value(&schema::FAT, &record, Unit::Gram), Some(0.2));
    }

    #[test]
    fn selected_food_recomputes_on_input_change() {
        let record = FoodRecord::named("Sugar", 1).with_number("Calories (per gram)", 4.0);
        let mut selected = SelectedFood::new(0, &record);
        assert_eq!(selected.detail().quantity, 1.0);
        assert_eq!(selected.detail().row("Energy").unwrap().text(), "4.00 kcal");

        selected.quantity_input = "25".to_string();
        selected.recompute(&record);
        assert_eq!(selected.detail().row("Energy").unwrap().text(), "100.00 kcal");

        selected.quantity_input = "-1".to_string();
        selected.unit = Unit::Ounce;
        selected.recompute(&record);
        assert_eq!(selected.detail().quantity, 1.0);
        assert_eq!(selected.detail().unit, Unit::Ounce);
    }
}
