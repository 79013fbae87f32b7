use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

/// A JSON number that keeps integers apart from floats, so identifiers such as
/// `fdc_id` are written back as integers on export.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// `328637.0` style values written by float-only tools.
pub(crate) fn whole_f64_to_i64(v: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    (v.is_finite() && v.fract() == 0.0 && (-LIMIT..LIMIT).contains(&v)).then_some(v as i64)
}

impl FoodNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FoodNumber::I64(v) => Some(*v),
            FoodNumber::U64(v) => i64::try_from(*v).ok(),
            FoodNumber::F64(v) => whole_f64_to_i64(*v),
        }
    }

    pub fn as_f64_lossy(&self) -> f64 {
        match self {
            FoodNumber::I64(v) => *v as f64,
            FoodNumber::U64(v) => *v as f64,
            FoodNumber::F64(v) => *v,
        }
    }

    fn write_json(&self, out: &mut String) {
        match self {
            FoodNumber::I64(v) => out.push_str(&v.to_string()),
            FoodNumber::U64(v) => out.push_str(&v.to_string()),
            FoodNumber::F64(v) => {
                // Plain JSON has no spelling for NaN/Infinity.
                if !v.is_finite() {
                    out.push_str("null");
                    return;
                }
                let mut buf = ryu::Buffer::new();
                out.push_str(buf.format(*v));
            }
        }
    }
}

/// One value of a dataset record. Records are flat in practice, but nested
/// arrays/objects are kept so that export never drops data.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodValue {
    Null,
    Bool(bool),
    Number(FoodNumber),
    String(String),
    Array(Vec<FoodValue>),
    Object(IndexMap<String, FoodValue>),
}

impl FoodValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FoodValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of a cell: numbers as-is, strings parsed as floats.
    /// Non-finite results count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            FoodValue::Number(n) => n.as_f64_lossy(),
            FoodValue::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }

    /// True for `null`, empty strings and the other shapes a table cell cannot show.
    pub fn is_blank(&self) -> bool {
        match self {
            FoodValue::Null => true,
            FoodValue::String(s) => s.trim().is_empty(),
            FoodValue::Number(FoodNumber::F64(v)) => !v.is_finite(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FoodValue::Null => "null",
            FoodValue::Bool(_) => "bool",
            FoodValue::Number(_) => "number",
            FoodValue::String(_) => "string",
            FoodValue::Array(_) => "array",
            FoodValue::Object(_) => "object",
        }
    }

    pub fn parse_json(text: &str) -> anyhow::Result<FoodValue> {
        Ok(json5::from_str::<FoodValue>(text)?)
    }

    /// Serialize as JSON with 4-space indentation and a trailing newline.
    pub fn to_json_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0);
        out.push('\n');
        out
    }

    fn write_json(&self, out: &mut String, indent: usize) {
        match self {
            FoodValue::Null => out.push_str("null"),
            FoodValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            FoodValue::Number(n) => n.write_json(out),
            FoodValue::String(s) => write_escaped_string(out, s),
            FoodValue::Array(values) => {
                out.push('[');
                if !values.is_empty() {
                    out.push('\n');
                    for (i, v) in values.iter().enumerate() {
                        out.push_str(&" ".repeat(indent + 4));
                        v.write_json(out, indent + 4);
                        if i + 1 != values.len() {
                            out.push(',');
                        }
                        out.push('\n');
                    }
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            FoodValue::Object(map) => {
                out.push('{');
                if !map.is_empty() {
                    out.push('\n');
                    for (i, (k, v)) in map.iter().enumerate() {
                        out.push_str(&" ".repeat(indent + 4));
                        write_escaped_string(out, k);
                        out.push_str(": ");
                        v.write_json(out, indent + 4);
                        if i + 1 != map.len() {
                            out.push(',');
                        }
                        out.push('\n');
                    }
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl<'de> Deserialize<'de> for FoodValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = FoodValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FoodValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FoodValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(FoodValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FoodValue::Number(FoodNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                // The parser reports non-negative integers as u64; keep them
                // comparable with identifiers built in code.
                Ok(FoodValue::Number(match i64::try_from(v) {
                    Ok(v) => FoodNumber::I64(v),
                    Err(_) => FoodNumber::U64(v),
                }))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(FoodValue::Number(FoodNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FoodValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(FoodValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<FoodValue>()? {
                    values.push(value);
                }
                Ok(FoodValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, FoodValue>()? {
                    values.insert(key, value);
                }
                Ok(FoodValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
