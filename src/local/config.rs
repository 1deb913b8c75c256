//! JSON description of a reference grid.
//!
//! ```json
//! {
//!   "properties": { "fixedRowCount": 1, "showRowNumbers": true },
//!   "columns": [
//!     { "name": "id", "properties": { "base": { "format": "integer" } } },
//!     { "name": "label", "header": "Label", "width": 140 }
//!   ],
//!   "subgrids": [
//!     { "kind": "header" },
//!     { "kind": "data", "rows": [{ "id": 1, "label": "one" }],
//!       "merges": [{ "startRow": 0, "startCol": 0, "endRow": 0, "endCol": 1 }] }
//!   ],
//!   "viewport": { "width": 640, "height": 480 }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::{GridProperties, DEFAULT_ROW_COLUMN_INDEX, DEFAULT_TREE_COLUMN_INDEX};
use crate::types::{ColumnProperties, GridCellCoord, PropertyBag, SearchType, SubgridKind};

use super::layout::Viewport;
use super::selection::Selection;
use super::subgrid::MergeRange;

/// Default name of the tree column, the one pivot helpers recognize.
pub const TREE_COLUMN_NAME: &str = "$$aggregation";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub properties: GridProperties,
    pub row_column_index: i32,
    pub tree_column_index: i32,
    pub tree_header_row_index: i32,
    /// Properties of the row-number handle column.
    pub handle_column: ColumnProperties,
    /// Present when the grid shows a tree column.
    pub tree_column: Option<ColumnConfig>,
    /// All columns, in data order.
    pub columns: Vec<ColumnConfig>,
    /// Active (displayed) columns as data indices; all columns when absent.
    pub column_order: Option<Vec<usize>>,
    /// Subgrids in render order; a header and a data subgrid when empty.
    pub subgrids: Vec<SubgridConfig>,
    pub viewport: Viewport,
    /// Data row heights by row index.
    pub row_heights: HashMap<usize, f32>,
    pub header_row_height: Option<f32>,
    pub handle_width: Option<f32>,
    pub selections: Vec<Selection>,
    pub hover: Option<GridCellCoord>,
    pub row_properties: Vec<RowPropertiesConfig>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            properties: GridProperties::default(),
            row_column_index: DEFAULT_ROW_COLUMN_INDEX,
            tree_column_index: DEFAULT_TREE_COLUMN_INDEX,
            tree_header_row_index: 0,
            handle_column: ColumnProperties::default(),
            tree_column: None,
            columns: Vec::new(),
            column_order: None,
            subgrids: Vec::new(),
            viewport: Viewport::default(),
            row_heights: HashMap::new(),
            header_row_height: None,
            handle_width: None,
            selections: Vec::new(),
            hover: None,
            row_properties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnConfig {
    pub name: String,
    pub header: Option<String>,
    pub width: Option<f32>,
    pub search_type: SearchType,
    pub tree_level: Option<u32>,
    /// Marks a pivot's tree column, which stays in place.
    pub is_tree: bool,
    pub properties: ColumnProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubgridConfig {
    pub kind: SubgridKind,
    /// Row objects keyed by column name. A header subgrid without rows gets
    /// one row of column headers.
    pub rows: Vec<Map<String, Value>>,
    pub merges: Vec<MergeRange>,
    pub cell_properties: Vec<CellPropertiesConfig>,
}

impl SubgridConfig {
    pub fn new(kind: SubgridKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Properties a data source declares for one cell (data coordinates).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellPropertiesConfig {
    pub x: i32,
    pub y: i32,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowPropertiesConfig {
    pub subgrid: SubgridKind,
    pub row: i32,
    pub properties: PropertyBag,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config: GridConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.row_column_index, -2);
        assert_eq!(config.tree_column_index, -1);
        assert_eq!(config.properties.max_chars, 450);
        assert!(config.properties.show_row_numbers);
        assert!(config.subgrids.is_empty());
        assert_eq!(config.viewport.width, 800.0);
    }

    #[test]
    fn test_full_description() {
        let config: GridConfig = serde_json::from_value(json!({
            "properties": { "fixedRowCount": 1, "MAX_CHARS": 20 },
            "treeColumn": { "name": "$$aggregation", "header": "Tree" },
            "columns": [
                { "name": "a", "searchType": "EXACT_MATCH", "width": 50 },
                { "name": "b", "properties": { "base": { "editable": true } } }
            ],
            "columnOrder": [1, 0],
            "subgrids": [
                { "kind": "header" },
                { "kind": "data", "rows": [{ "a": 1 }],
                  "merges": [{ "startRow": 0, "startCol": 0, "endRow": 1, "endCol": 0 }],
                  "cellProperties": [{ "x": 0, "y": 0, "properties": { "color": "red" } }] }
            ],
            "rowHeights": { "3": 40 },
            "selections": [{ "type": "rowRange", "startRow": 2, "endRow": 4 }],
            "hover": { "x": 0, "y": 1 },
            "rowProperties": [{ "subgrid": "data", "row": 0, "properties": { "headerRow": true } }]
        }))
        .unwrap();

        assert_eq!(config.properties.fixed_row_count, 1);
        assert_eq!(config.properties.max_chars, 20);
        assert_eq!(config.tree_column.as_ref().unwrap().header.as_deref(), Some("Tree"));
        assert_eq!(config.columns[0].search_type, SearchType::ExactMatch);
        assert_eq!(config.columns[0].width, Some(50.0));
        assert!(config.columns[1].properties.base.is_truthy("editable"));
        assert_eq!(config.column_order, Some(vec![1, 0]));
        assert_eq!(config.subgrids[1].merges[0].end_row, 1);
        assert_eq!(config.subgrids[1].cell_properties[0].properties.get_str("color"), Some("red"));
        assert_eq!(config.row_heights.get(&3), Some(&40.0));
        assert_eq!(config.selections[0].end_col, i32::MAX);
        assert_eq!(config.hover, Some(GridCellCoord { x: 0, y: 1 }));
        assert!(config.row_properties[0].properties.is_truthy("headerRow"));
    }
}
