//! Structured error types for cellcursor.
//!
//! Retargeting a cursor never fails with an error (it reports visibility as a
//! `bool`), and every classifier is total. Errors only come from loading grid
//! descriptions and from the removed-field compatibility shim.

/// All errors that can occur in cellcursor.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// A coordinate field that no longer exists was requested.
    #[error("The `{field}` property is no longer available. Use the following coordinates instead:\n{replacement}")]
    RemovedField {
        field: &'static str,
        replacement: &'static str,
    },

    /// JSON grid description could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Highlight or URL pattern failed to compile.
    #[error("Regex: {0}")]
    Regex(#[from] regex::Error),

    /// Grid description is structurally invalid.
    #[error("Invalid grid description: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CursorError>;

#[cfg(target_arch = "wasm32")]
impl From<CursorError> for wasm_bindgen::JsValue {
    fn from(e: CursorError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
