pub mod schema;
pub mod validation;
pub mod validator;

pub use schema::{apply_doc_comments, RequestSchema, SchemaHandle};
pub use validation::{decode_request, validate_payload};
pub use validator::Validator;
