use crate::error::{PlannerError, Result};
use jsonschema::{Draft, JSONSchema};
use schemars::schema::{RootSchema, Schema, SchemaObject};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// JSON schema of a request document, compiled once for validation.
#[derive(Clone)]
pub struct SchemaHandle {
    schema_name: &'static str,
    schema_json: Arc<Value>,
    compiled: Arc<std::result::Result<JSONSchema, String>>,
}

impl SchemaHandle {
    pub fn from_root_schema(schema_name: &'static str, root: RootSchema) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_json)
            .map_err(|err| err.to_string());

        Self {
            schema_name,
            schema_json: Arc::new(schema_json),
            compiled: Arc::new(compiled),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    pub fn compiled(&self) -> Result<&JSONSchema> {
        self.compiled.as_ref().as_ref().map_err(|reason| {
            PlannerError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                self.schema_name, reason
            ))
        })
    }
}

impl fmt::Debug for SchemaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaHandle")
            .field("schema_name", &self.schema_name)
            .field("compiled", &self.compiled.is_ok())
            .finish()
    }
}

/// Implemented by `#[request_schema]` for documents accepted at the boundary.
pub trait RequestSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Title the root schema and copy doc comments onto undocumented properties.
pub fn apply_doc_comments(
    root: &mut RootSchema,
    title: &'static str,
    description: Option<&'static str>,
    field_docs: &[(&'static str, &'static str)],
) {
    let root_object: &mut SchemaObject = &mut root.schema;
    let metadata = root_object.metadata();
    metadata.title = Some(title.to_string());
    if metadata.description.is_none() {
        metadata.description = description.map(str::to_string);
    }

    let Some(object) = root_object.object.as_mut() else {
        return;
    };
    for (field, doc) in field_docs {
        if let Some(Schema::Object(property)) = object.properties.get_mut(*field) {
            property.metadata().description.get_or_insert_with(|| doc.to_string());
        }
    }
}
