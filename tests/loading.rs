use pretty_assertions::assert_eq;

use std::io::Write;

use flate2::{Compression, write::GzEncoder};
use nutriview::{Dataset, DatasetError, DatasetFormat, statics};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SAMPLE: &str = r#"[
  {
    "fdc_id": 328637,
    "Food Name": "Cheese, cheddar",
    "Calories (per 100g)": NaN,
    "Protein (per 100g)": 25.0,
    "Fat (per 100g)": 33.0,
    "Carbohydrates (per 100g)": 1.0,
    "Protein (per gram)": 0.25,
    "Fat (per gram)": 0.33,
    "Carbohydrates (per gram)": 0.01
  },
  {
    "fdc_id": 323505,
    "Food Name": "Kale, raw",
    "Calories (per 100g)": 35,
    "Protein (per 100g)": 2.92,
    "Fat (per 100g)": 1.49,
    "Carbohydrates (per 100g)": 4.42
  }
]"#;

#[test]
fn loads_plain_json_with_nan_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(statics::DEFAULT_DATA_FILE);
    std::fs::write(&path, SAMPLE)?;

    let dataset = Dataset::load_path(&path)?;
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.format, DatasetFormat::Json);
    assert_eq!(dataset.source_path.as_deref(), Some(path.as_path()));
    assert_eq!(dataset.records[0].name(), "Cheese, cheddar");
    assert_eq!(dataset.records[0].number("Calories (per 100g)"), None);
    assert_eq!(dataset.records[1].fdc_id(), Some(323505));
    assert_eq!(
        dataset.columns.keys(),
        vec![
            "Food Name",
            "Calories (per 100g)",
            "Protein (per 100g)",
            "Fat (per 100g)",
            "Carbohydrates (per 100g)",
        ]
    );
    Ok(())
}

#[test]
fn loads_gzip_by_magic_even_without_extension() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("foods.json");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(SAMPLE.as_bytes())?;
    std::fs::write(&path, encoder.finish()?)?;

    let dataset = Dataset::load_path(&path)?;
    assert_eq!(dataset.format, DatasetFormat::GzipJson);
    assert_eq!(dataset.len(), 2);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.json");

    let err = Dataset::load_path(&path).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }), "got {err:?}");
    Ok(())
}

#[test]
fn malformed_or_wrong_shape_files_fail() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "[{ \"Food Name\": ")?;
    assert!(matches!(
        Dataset::load_path(&broken).unwrap_err(),
        DatasetError::Parse(_)
    ));

    let object_root = dir.path().join("object.json");
    std::fs::write(&object_root, "{ \"foods\": [] }")?;
    assert!(matches!(
        Dataset::load_path(&object_root).unwrap_err(),
        DatasetError::NotAnArray { found: "object" }
    ));
    Ok(())
}

#[test]
fn empty_array_loads_as_empty_dataset() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "[]")?;

    let dataset = Dataset::load_path(&path)?;
    assert!(dataset.is_empty());
    assert_eq!(dataset.columns.keys(), vec![statics::FIELD_FOOD_NAME]);
    Ok(())
}
