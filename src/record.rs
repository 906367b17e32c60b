use serde_json::{Map, Number, Value};

/// One table cell after extraction, before any field-specific coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Absent,
}

impl CellValue {
    /// Types raw cell text the way a table reader would: integers, then
    /// floats, then text. Empty cells are absent.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Absent;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return CellValue::Int(n);
        }
        if looks_numeric(trimmed)
            && let Ok(f) = trimmed.parse::<f64>()
        {
            return CellValue::Float(f);
        }
        CellValue::Text(trimmed.to_string())
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Absent,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else {
                    n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Absent)
                }
            }
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// JSON form used for raw snapshots. Non-finite floats become null.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Absent => Value::Null,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) if f.is_finite() => Some(f.to_string()),
            _ => None,
        }
    }
}

fn looks_numeric(raw: &str) -> bool {
    raw.chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
}

/// A table row as an ordered list of named cells. Column order is kept so the
/// raw snapshot reads like the source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquadRow {
    cells: Vec<(String, CellValue)>,
}

impl SquadRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(columns: &[String], values: Vec<CellValue>) -> Self {
        let mut values = values.into_iter();
        let cells = columns
            .iter()
            .map(|name| (name.clone(), values.next().unwrap_or(CellValue::Absent)))
            .collect();
        Self { cells }
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let cells = object
            .iter()
            .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
            .collect();
        Self { cells }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.iter().any(|(k, _)| k == key)
    }

    /// Replaces the value of an existing column or appends a new one.
    pub fn set(&mut self, key: &str, value: CellValue) {
        match self.cells.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((key.to_string(), value)),
        }
    }

    /// First candidate key holding a present value.
    pub fn lookup(&self, keys: &[&str]) -> Option<&CellValue> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_absent())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.cells {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

/// Replaces non-finite numbers with null at any depth.
pub fn scrub_json(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => Value::Null,
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(scrub_json).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, scrub_json(v)))
                .collect(),
        ),
        other => other,
    }
}
