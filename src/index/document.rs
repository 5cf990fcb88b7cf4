use crate::error::{Result, ShardwiseError};
use crate::index::schema::ShardSchema;
use crate::tokenizer::registry::root_key;
use crate::types::{Document, DocumentId, FieldValue, Hit};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};
use tantivy::schema::{Field, OwnedValue};
use tantivy::TantivyDocument;

/// One flattened leaf of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedField {
    /// Flattened name: `a.b` for map keys, `a.[i]` for list elements.
    pub name: String,
    /// Original scalar value.
    pub value: FieldValue,
    /// Text handed to the analyzer.
    pub text: String,
    pub stored: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedDocument {
    pub id: DocumentId,
    pub fields: Vec<ProjectedField>,
}

/// Flattens documents into indexable fields.
#[derive(Debug, Clone)]
pub struct Projector {
    id_field: String,
    store_all: bool,
    store_fields: HashSet<String>,
}

impl Projector {
    pub fn new(id_field: &str, store_fields: &[String]) -> Self {
        Projector {
            id_field: id_field.to_string(),
            store_all: store_fields.iter().any(|f| f == "*"),
            store_fields: store_fields.iter().cloned().collect(),
        }
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    fn is_stored(&self, name: &str) -> bool {
        self.store_all
            || self.store_fields.contains(name)
            || self.store_fields.contains(root_key(name))
    }

    pub fn project(&self, doc: &Document) -> Result<ProjectedDocument> {
        let id = doc.id(&self.id_field)?;
        let mut fields = Vec::new();
        for (key, value) in &doc.fields {
            self.flatten(key.clone(), value, &mut fields);
        }
        Ok(ProjectedDocument { id, fields })
    }

    fn flatten(&self, name: String, value: &FieldValue, out: &mut Vec<ProjectedField>) {
        let text = match value {
            FieldValue::Null => return,
            FieldValue::Text(s) if s.is_empty() => return,
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Object(map) => {
                for (key, nested) in map {
                    self.flatten(format!("{}.{}", name, key), nested, out);
                }
                return;
            }
            FieldValue::Array(items) => {
                for (i, nested) in items.iter().enumerate() {
                    self.flatten(format!("{}.[{}]", name, i), nested, out);
                }
                return;
            }
        };
        let stored = self.is_stored(&name);
        out.push(ProjectedField {
            name,
            value: value.clone(),
            text,
            stored,
        });
    }
}

fn to_owned_value(value: &FieldValue) -> OwnedValue {
    match value {
        FieldValue::Bool(b) => OwnedValue::Bool(*b),
        FieldValue::Integer(i) => OwnedValue::I64(*i),
        FieldValue::Float(f) => OwnedValue::F64(*f),
        FieldValue::Text(s) => OwnedValue::Str(s.clone()),
        FieldValue::Null | FieldValue::Array(_) | FieldValue::Object(_) => OwnedValue::Null,
    }
}

fn owned_to_field_value(value: &OwnedValue) -> FieldValue {
    match value {
        OwnedValue::Str(s) => FieldValue::Text(s.clone()),
        OwnedValue::I64(i) => FieldValue::Integer(*i),
        OwnedValue::U64(u) => i64::try_from(*u)
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Float(*u as f64)),
        OwnedValue::F64(f) => FieldValue::Float(*f),
        OwnedValue::Bool(b) => FieldValue::Bool(*b),
        OwnedValue::Array(items) => FieldValue::Array(items.iter().map(owned_to_field_value).collect()),
        OwnedValue::Object(pairs) => FieldValue::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.clone(), owned_to_field_value(v)))
                .collect(),
        ),
        _ => FieldValue::Null,
    }
}

/// Converts projected documents to tantivy documents and stored fields back
/// into hits.
pub struct DocumentConverter {
    schema: ShardSchema,
    id_field_name: String,
}

impl DocumentConverter {
    pub fn new(schema: ShardSchema, id_field_name: &str) -> Self {
        DocumentConverter {
            schema,
            id_field_name: id_field_name.to_string(),
        }
    }

    pub fn schema(&self) -> &ShardSchema {
        &self.schema
    }

    pub fn to_tantivy(&self, doc: &ProjectedDocument) -> TantivyDocument {
        let mut tantivy_doc = TantivyDocument::new();
        tantivy_doc.add_text(self.schema.id_field(), &doc.id);

        let mut groups: BTreeMap<Field, BTreeMap<String, OwnedValue>> = BTreeMap::new();
        let mut stored: BTreeMap<String, OwnedValue> = BTreeMap::new();

        for field in &doc.fields {
            groups
                .entry(self.schema.text_field_for(&field.name))
                .or_default()
                .insert(field.name.clone(), OwnedValue::Str(field.text.clone()));

            if field.name != self.id_field_name {
                tantivy_doc.add_text(self.schema.all_field(), &field.text);
            }
            if field.stored {
                stored.insert(field.name.clone(), to_owned_value(&field.value));
            }
        }

        for (field, object) in groups {
            tantivy_doc.add_object(field, object);
        }
        if !stored.is_empty() {
            tantivy_doc.add_object(self.schema.stored_field(), stored);
        }
        tantivy_doc
    }

    /// Build a hit from a stored document, keeping the stored fields named in
    /// `return_fields` (by flattened name or root key).
    pub fn hit_from_tantivy(
        &self,
        tantivy_doc: &TantivyDocument,
        score: f32,
        return_fields: &[String],
    ) -> Result<Hit> {
        let id = tantivy_doc
            .get_first(self.schema.id_field())
            .and_then(|v| {
                let owned: OwnedValue = v.into();
                match owned {
                    OwnedValue::Str(s) => Some(s),
                    _ => None,
                }
            })
            .ok_or_else(|| ShardwiseError::MissingField("_id".to_string()))?;

        let mut values = IndexMap::new();
        if !return_fields.is_empty() {
            if let Some(stored) = tantivy_doc.get_first(self.schema.stored_field()) {
                let owned: OwnedValue = stored.into();
                if let OwnedValue::Object(pairs) = owned {
                    for (name, value) in pairs {
                        let wanted = return_fields
                            .iter()
                            .any(|f| *f == name || f == root_key(&name));
                        if wanted {
                            values.insert(name, owned_to_field_value(&value));
                        }
                    }
                }
            }
        }

        Ok(Hit { id, score, values })
    }
}
