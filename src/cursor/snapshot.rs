//! Owned copies of cursor state.

use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::types::{
    Bounds, Column, DataCellCoord, GridCellCoord, PropertyBag, SubgridKind, ValueCellCoord,
};

use super::CellCursor;

/// What an editor widget receives from the cursor.
///
/// Only the column and the caller's own attributes transfer; caches and
/// bookkeeping stay behind.
#[derive(Debug, Clone)]
pub struct EditorSeed {
    pub column: Option<Rc<Column>>,
    pub attributes: PropertyBag,
    pub grid_cell: GridCellCoord,
    pub data_cell: DataCellCoord,
    pub value_cell: ValueCellCoord,
    pub editor: Option<String>,
}

/// Classification of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFlags {
    pub is_data_row: bool,
    pub is_data_column: bool,
    pub is_data_cell: bool,
    pub is_handle_column: bool,
    pub is_handle_cell: bool,
    pub is_tree_column: bool,
    pub is_header_row: bool,
    pub is_header_cell: bool,
    pub is_filter_row: bool,
    pub is_summary_row: bool,
    pub is_top_totals_row: bool,
    pub is_bottom_totals_row: bool,
    pub is_row_fixed: bool,
    pub is_column_fixed: bool,
    pub is_cell_fixed: bool,
    pub is_row_selected: bool,
    pub is_column_selected: bool,
    pub is_cell_selected: bool,
    pub is_row_hovered: bool,
    pub is_column_hovered: bool,
    pub is_cell_hovered: bool,
    pub is_render_skip_needed: bool,
}

/// Serializable picture of everything observable about a targeted cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub grid_cell: GridCellCoord,
    pub data_cell: DataCellCoord,
    pub value_cell: ValueCellCoord,
    pub subgrid: Option<SubgridKind>,
    pub column: Option<String>,
    pub value: Value,
    pub formatted_value: String,
    pub properties: PropertyBag,
    pub bounds: Bounds,
    pub colspan: u32,
    pub rowspan: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    pub flags: CellFlags,
}

impl CellCursor {
    pub fn flags(&self) -> CellFlags {
        CellFlags {
            is_data_row: self.is_data_row(),
            is_data_column: self.is_data_column(),
            is_data_cell: self.is_data_cell(),
            is_handle_column: self.is_handle_column(),
            is_handle_cell: self.is_handle_cell(),
            is_tree_column: self.is_tree_column(),
            is_header_row: self.is_header_row(),
            is_header_cell: self.is_header_cell(),
            is_filter_row: self.is_filter_row(),
            is_summary_row: self.is_summary_row(),
            is_top_totals_row: self.is_top_totals_row(),
            is_bottom_totals_row: self.is_bottom_totals_row(),
            is_row_fixed: self.is_row_fixed(),
            is_column_fixed: self.is_column_fixed(),
            is_cell_fixed: self.is_cell_fixed(),
            is_row_selected: self.is_row_selected(),
            is_column_selected: self.is_column_selected(),
            is_cell_selected: self.is_cell_selected(),
            is_row_hovered: self.is_row_hovered(),
            is_column_hovered: self.is_column_hovered(),
            is_cell_hovered: self.is_cell_hovered(),
            is_render_skip_needed: self.is_render_skip_needed(),
        }
    }

    /// Owned copy of the cell's observable state.
    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            grid_cell: self.grid_cell,
            data_cell: self.data_cell,
            value_cell: self.value_cell,
            subgrid: self.subgrid_kind(),
            column: self.column().map(|c| c.name.clone()),
            value: self.value(),
            formatted_value: self.formatted_value().to_string(),
            properties: (*self.properties()).clone(),
            bounds: self.bounds(),
            colspan: self.colspan(),
            rowspan: self.rowspan(),
            editor: self.editor(),
            flags: self.flags(),
        }
    }
}
