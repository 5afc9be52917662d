use super::{validation, RequestSchema};
use crate::Result;
use serde_json::Value;

/// Validation strategies for request documents
#[derive(Debug, Clone, Copy, Default)]
pub enum Validator {
    /// Fast validation using serde only
    SerdeFirst,
    /// JSON Schema check before deserializing
    #[default]
    Strict,
}

impl Validator {
    /// Validate and deserialize a raw JSON document into `T`
    pub fn decode<T: RequestSchema>(&self, raw: &str) -> Result<T> {
        match self {
            Validator::SerdeFirst => {
                let payload: Value = serde_json::from_str(raw)?;
                validation::deserialize_with_path(&payload)
            }
            Validator::Strict => validation::decode_request(raw),
        }
    }
}
