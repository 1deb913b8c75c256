use serde::{Deserialize, Serialize};

use super::ColumnProperties;

/// How search text is matched when highlighting a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    #[default]
    None,
    /// Whole words only.
    ExactMatch,
    /// Word prefixes.
    Edge,
    /// Anywhere in the text.
    Full,
}

/// A column definition.
///
/// Reserved columns (row handle, tree) are columns too; their `index` is the
/// behavior's reserved index, which is negative by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    pub index: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_level: Option<u32>,
    /// A pivot's tree column; never movable.
    pub is_tree: bool,
    pub search_type: SearchType,
    pub properties: ColumnProperties,
}

impl Column {
    pub fn new(index: i32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: ColumnProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    /// Header text, falling back to the column name.
    pub fn header_text(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.name)
    }
}
