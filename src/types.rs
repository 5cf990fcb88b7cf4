use crate::error::{Result, ShardwiseError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Document identifier: the stringified value of the configured id field.
pub type DocumentId = String;

/// A dynamically typed field value, arbitrarily nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Array(Vec<FieldValue>),
    Object(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// String form used as a document identity. Containers and nulls have none.
    pub fn as_id(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null | FieldValue::Array(_) | FieldValue::Object(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldValue::Array(_) | FieldValue::Object(_))
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(val: &serde_json::Value) -> Self {
        match val {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else {
                    n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null)
                }
            }
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Array(arr) => {
                FieldValue::Array(arr.iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(obj) => FieldValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&FieldValue> for serde_json::Value {
    fn from(val: &FieldValue) -> Self {
        match val {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Integer(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            FieldValue::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// A document: an insertion-ordered map of field names to values.
///
/// The identity of a document is the value of the id field configured on the
/// index (see [`crate::config::IndexConfig::id_field`]), so a `Document`
/// carries no separate id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub fields: IndexMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a [`Document`] from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ShardwiseError::InvalidDocument`] if the value is not a JSON
    /// object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| ShardwiseError::InvalidDocument("Expected JSON object".to_string()))?;
        Ok(Document {
            fields: obj
                .iter()
                .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                .collect(),
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }

    /// Builder-style field insertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Resolve the document identity from `id_field`.
    ///
    /// # Errors
    ///
    /// [`ShardwiseError::MissingField`] when the field is absent or null,
    /// [`ShardwiseError::InvalidDocument`] when it is a container or empty.
    pub fn id(&self, id_field: &str) -> Result<DocumentId> {
        let value = match self.fields.get(id_field) {
            None | Some(FieldValue::Null) => {
                return Err(ShardwiseError::MissingField(format!(
                    "id field {:?} not found",
                    id_field
                )))
            }
            Some(v) => v,
        };
        match value.as_id() {
            Some(id) if !id.is_empty() => Ok(id),
            Some(_) => Err(ShardwiseError::InvalidDocument(format!(
                "id field {:?} is empty",
                id_field
            ))),
            None => Err(ShardwiseError::InvalidDocument(format!(
                "id field {:?} must be a scalar value",
                id_field
            ))),
        }
    }
}

/// One search match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub id: DocumentId,
    pub score: f32,
    /// Stored fields selected by `return_fields`, keyed by flattened name.
    pub values: IndexMap<String, FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    /// Total number of matches before thresholds and pagination.
    pub hit_number: u64,
    pub max_score: f32,
    pub duration: Duration,
    pub query: String,
    pub hits: Vec<Hit>,
}

/// Load a JSON array of documents from `path`.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let items = value.as_array().ok_or_else(|| {
        ShardwiseError::InvalidDocument("Expected a JSON array of documents".to_string())
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Document::from_json(item).map_err(|e| ShardwiseError::at_index(index, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_field_order_and_nesting() {
        let doc = Document::from_json(&json!({
            "sku": 7,
            "name": "Widget",
            "meta": {"color": "red", "tags": ["a", "b"]},
            "gone": null
        }))
        .unwrap();

        let keys: Vec<&str> = doc.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["sku", "name", "meta", "gone"]);
        assert_eq!(doc.get("sku"), Some(&FieldValue::Integer(7)));
        assert_eq!(doc.get("gone"), Some(&FieldValue::Null));
        match doc.get("meta") {
            Some(FieldValue::Object(map)) => {
                assert_eq!(
                    map.get("tags"),
                    Some(&FieldValue::Array(vec!["a".into(), "b".into()]))
                );
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            Document::from_json(&json!([1, 2])),
            Err(ShardwiseError::InvalidDocument(_))
        ));
    }

    #[test]
    fn id_is_stringified_scalar() {
        let doc = Document::new().with("id", 42i64);
        assert_eq!(doc.id("id").unwrap(), "42");

        let doc = Document::new().with("id", "abc");
        assert_eq!(doc.id("id").unwrap(), "abc");
    }

    #[test]
    fn id_errors() {
        let doc = Document::new().with("name", "x");
        assert!(matches!(doc.id("id"), Err(ShardwiseError::MissingField(_))));

        let doc = Document::new().with("id", "");
        assert!(matches!(doc.id("id"), Err(ShardwiseError::InvalidDocument(_))));

        let mut doc = Document::new();
        doc.insert("id", FieldValue::Array(vec!["a".into()]));
        assert!(matches!(doc.id("id"), Err(ShardwiseError::InvalidDocument(_))));
    }

    #[test]
    fn to_json_matches_input() {
        let input = json!({"id": "1", "price": 9.5, "ok": true, "tags": ["x"]});
        let doc = Document::from_json(&input).unwrap();
        assert_eq!(doc.to_json(), input);
    }

    #[test]
    fn load_documents_reads_array() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, r#"[{"id": "1"}, {"id": "2", "name": "b"}]"#).unwrap();

        let docs = load_documents(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].get("name"), Some(&FieldValue::Text("b".to_string())));
    }

    #[test]
    fn load_documents_reports_bad_item() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, r#"[{"id": "1"}, "oops"]"#).unwrap();

        let err = load_documents(&path).unwrap_err();
        assert!(matches!(err, ShardwiseError::BatchItem { index: 1, .. }));
    }
}
