use crate::{
    error::{PlannerError, Result},
    schemas::{RequestSchema, SchemaHandle},
};
use serde_json::Value;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a request payload against its JSON schema
pub fn validate_payload(schema: &SchemaHandle, payload: &Value) -> Result<()> {
    let validator = schema.compiled()?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "request failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(PlannerError::Validation(format!(
            "Request does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}

/// Deserialize with the failing field path in the error message
pub fn deserialize_with_path<T: RequestSchema>(payload: &Value) -> Result<T> {
    let schema = T::schema();
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err.inner()
        ))
    })
}

/// Parse, schema-check and deserialize a raw JSON request document
pub fn decode_request<T: RequestSchema>(raw: &str) -> Result<T> {
    let payload: Value = serde_json::from_str(raw)?;
    validate_payload(T::schema(), &payload)?;
    deserialize_with_path(&payload)
}
