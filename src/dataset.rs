use crate::table::TableColumns;
use crate::value::whole_f64_to_i64;
use crate::{FoodValue, statics};
use anyhow::Context;
use flate2::{Compression, GzBuilder, read::GzDecoder};
use indexmap::IndexMap;
use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    GzipJson,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("gzip decompress")]
    Gzip(#[source] std::io::Error),
    #[error("food data file is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("parsing food data: {0:#}")]
    Parse(anyhow::Error),
    #[error("food data must be a JSON array of records, found {found}")]
    NotAnArray { found: &'static str },
    #[error("record {index} must be an object, found {found}")]
    RecordNotObject { index: usize, found: &'static str },
}

/// One food item: an ordered field-name to value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FoodRecord {
    fields: IndexMap<String, FoodValue>,
}

impl FoodRecord {
    pub fn new(fields: IndexMap<String, FoodValue>) -> Self {
        Self { fields }
    }

    /// Convenience constructor with the two identifying fields set.
    pub fn named(name: &str, fdc_id: i64) -> Self {
        let mut record = Self::default();
        record.insert(statics::FIELD_FOOD_NAME, FoodValue::String(name.to_string()));
        record.insert(
            statics::FIELD_FDC_ID,
            FoodValue::Number(crate::value::FoodNumber::I64(fdc_id)),
        );
        record
    }

    pub fn with_number(mut self, key: &str, value: f64) -> Self {
        self.insert(key, FoodValue::Number(crate::value::FoodNumber::F64(value)));
        self
    }

    pub fn insert(&mut self, key: &str, value: FoodValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn fields(&self) -> &IndexMap<String, FoodValue> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FoodValue> {
        self.fields.get(key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FoodValue::as_f64)
    }

    pub fn name(&self) -> &str {
        self.get(statics::FIELD_FOOD_NAME)
            .and_then(FoodValue::as_str)
            .unwrap_or(statics::EN_EMPTY)
    }

    pub fn fdc_id(&self) -> Option<i64> {
        match self.get(statics::FIELD_FDC_ID)? {
            FoodValue::Number(n) => n.as_i64(),
            FoodValue::String(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_f64_to_i64))
            }
            _ => None,
        }
    }

    /// Identifier as shown to the user.
    pub fn fdc_id_label(&self) -> String {
        self.fdc_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| statics::EN_NOT_AVAILABLE.to_string())
    }
}

/// The in-memory food dataset plus the table columns derived from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source_path: Option<PathBuf>,
    pub format: DatasetFormat,
    pub records: Vec<FoodRecord>,
    pub columns: TableColumns,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl Dataset {
    pub fn from_records(records: Vec<FoodRecord>) -> Self {
        let columns = TableColumns::from_sample(records.first());
        Self {
            source_path: None,
            format: DatasetFormat::Json,
            records,
            columns,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, DatasetError> {
        let root = FoodValue::parse_json(text).map_err(DatasetError::Parse)?;
        let FoodValue::Array(items) = root else {
            return Err(DatasetError::NotAnArray {
                found: root.type_name(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let FoodValue::Object(fields) = item else {
                return Err(DatasetError::RecordNotObject {
                    index,
                    found: item.type_name(),
                });
            };
            records.push(FoodRecord::new(fields));
        }

        Ok(Self::from_records(records))
    }

    pub fn load_path(path: &Path) -> Result<Self, DatasetError> {
        let bytes = fs::read(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format = detect_format(path, &bytes);
        debug!(?path, ?format, len = bytes.len(), "read food data file");

        let text_bytes = match format {
            DatasetFormat::Json => bytes,
            DatasetFormat::GzipJson => {
                let mut decoder = GzDecoder::new(&bytes[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).map_err(DatasetError::Gzip)?;
                out
            }
        };

        let text = std::str::from_utf8(&text_bytes)?;
        let mut dataset = Self::from_json_str(text)?;
        dataset.source_path = Some(path.to_path_buf());
        dataset.format = format;
        info!("Loaded {} food items from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FoodRecord> {
        self.records.get(index)
    }

    /// The whole dataset as 4-space indented JSON.
    pub fn to_json_pretty(&self) -> String {
        let root = FoodValue::Array(
            self.records
                .iter()
                .map(|r| FoodValue::Object(r.fields().clone()))
                .collect(),
        );
        root.to_json_pretty()
    }

    pub fn export_bytes(&self, format: DatasetFormat) -> anyhow::Result<Vec<u8>> {
        let text = self.to_json_pretty();
        match format {
            DatasetFormat::Json => Ok(text.into_bytes()),
            DatasetFormat::GzipJson => {
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder
                    .write_all(text.as_bytes())
                    .context("gzip compress")?;
                let bytes = encoder.finish().context("gzip finish")?;
                Ok(bytes)
            }
        }
    }

    pub fn export_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let format = if has_gz_extension(path) {
            DatasetFormat::GzipJson
        } else {
            DatasetFormat::Json
        };
        let bytes = self.export_bytes(format)?;
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;
        info!("Exported {} food items to {}", self.len(), path.display());
        Ok(())
    }
}

fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

fn detect_format(path: &Path, bytes: &[u8]) -> DatasetFormat {
    if has_gz_extension(path) {
        return DatasetFormat::GzipJson;
    }
    // Gzip magic: 1F 8B
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return DatasetFormat::GzipJson;
    }
    DatasetFormat::Json
}
