use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the scorer reads. Everything else on a record is carried in `extra`.
pub const SCORED_FIELDS: [&str; 4] = ["patient_id", "blood_pressure", "temperature", "age"];

/// A patient record as supplied by the API.
///
/// Fields are loosely typed: any of them may be missing or hold the wrong
/// kind of value. Missing and `null` are both stored as `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PatientRecord {
    #[serde(default)]
    pub patient_id: Value,
    #[serde(default)]
    pub blood_pressure: Value,
    #[serde(default)]
    pub temperature: Value,
    #[serde(default)]
    pub age: Value,
    /// name, gender, visit_date, diagnosis, medications, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientRecord {
    /// Build a record from an arbitrary JSON value.
    ///
    /// Returns None only for `null`. Values that are not objects yield a
    /// record with every field absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }

        let field = |name: &str| value.get(name).cloned().unwrap_or(Value::Null);
        let extra = value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| !SCORED_FIELDS.contains(&key.as_str()))
                    .map(|(key, v)| (key.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Some(PatientRecord {
            patient_id: field("patient_id"),
            blood_pressure: field("blood_pressure"),
            temperature: field("temperature"),
            age: field("age"),
            extra,
        })
    }

    /// Patient name, when the API sent one as text
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// Render an opaque patient id for display ("DEMO001" rather than "\"DEMO001\"").
pub fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Null => "(no id)".to_string(),
        other => other.to_string(),
    }
}

/// Response envelope of `GET /patients`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientResponse {
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub patients: Option<Vec<Value>>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl PatientResponse {
    /// Records come from `data`, falling back to `patients`.
    pub fn into_page(self) -> PatientPage {
        let records = self
            .data
            .filter(|d| !d.is_empty())
            .or(self.patients)
            .unwrap_or_default();

        PatientPage {
            records,
            total_records: self.total_records,
            pagination: self.pagination,
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_previous: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// One page of raw records, as returned by the data source.
///
/// Records stay as raw JSON so a `null` entry reaches the scorer and is
/// reported per record.
#[derive(Debug, Clone, Default)]
pub struct PatientPage {
    pub records: Vec<Value>,
    pub total_records: Option<u64>,
    pub pagination: Option<Pagination>,
    pub metadata: Option<Metadata>,
}
