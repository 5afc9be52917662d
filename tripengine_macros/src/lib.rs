mod request_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Attaches a cached JSON Schema to a request document struct.
///
/// The annotated struct must derive `schemars::JsonSchema` and
/// `serde::Deserialize`. Struct and field doc comments become the schema
/// title/description metadata, so `trip-engine schema` output stays
/// readable without duplicating text in attributes.
///
/// ```ignore
/// #[request_schema(name = "TripRequest")]
/// #[derive(Deserialize, JsonSchema)]
/// pub struct TripWindow { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn request_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    request_schema::request_schema(attr, item)
}
