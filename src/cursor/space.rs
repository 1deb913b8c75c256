//! Cell classification.
//!
//! Every predicate is computed from the cursor's current coordinates and the
//! grid configuration on each call, so it always reflects the latest
//! retarget. An untargeted cursor classifies as nothing.

use serde_json::Value;

use crate::context::{Behavior, Subgrid};
use crate::types::SubgridKind;
use crate::value::is_truthy;

use super::{CellCursor, OFFSCREEN};

impl CellCursor {
    fn kind_is(&self, predicate: impl FnOnce(SubgridKind) -> bool) -> bool {
        self.subgrid_kind().is_some_and(predicate)
    }

    // Visibility ("visible" means scrolled into view)

    pub fn is_row_visible(&self) -> bool {
        self.visible_row.as_ref().is_some_and(|r| r.index != OFFSCREEN)
    }

    pub fn is_column_visible(&self) -> bool {
        self.visible_column.as_ref().is_some_and(|c| c.index != OFFSCREEN)
    }

    pub fn is_cell_visible(&self) -> bool {
        self.is_row_visible() && self.is_column_visible()
    }

    // Rows and columns

    /// Any row of the data subgrid.
    pub fn is_data_row(&self) -> bool {
        self.kind_is(SubgridKind::is_data)
    }

    /// Any column other than the reserved (negative) ones.
    pub fn is_data_column(&self) -> bool {
        self.is_targeted() && self.grid_cell.x >= 0
    }

    pub fn is_data_cell(&self) -> bool {
        self.is_data_row() && self.is_data_column()
    }

    pub fn is_handle_column(&self) -> bool {
        self.is_targeted()
            && self.grid_cell.x == self.ctx.behavior.row_column_index()
            && self.ctx.grid.properties().show_row_numbers
    }

    pub fn is_handle_cell(&self) -> bool {
        self.is_handle_column() && self.is_data_row()
    }

    pub fn is_tree_column(&self) -> bool {
        self.is_targeted() && self.grid_cell.x == self.ctx.behavior.tree_column_index()
    }

    pub fn is_data_tree_cell(&self) -> bool {
        self.is_data_row() && self.is_tree_column()
    }

    pub fn is_header_row(&self) -> bool {
        self.kind_is(SubgridKind::is_header)
    }

    pub fn is_header_handle(&self) -> bool {
        self.is_header_row() && self.is_handle_column()
    }

    pub fn is_header_cell(&self) -> bool {
        self.is_header_row() && self.is_data_column()
    }

    pub fn is_header_tree_cell(&self) -> bool {
        self.is_header_row() && self.is_tree_column()
    }

    pub fn is_filter_row(&self) -> bool {
        self.kind_is(SubgridKind::is_filter)
    }

    pub fn is_filter_handle(&self) -> bool {
        self.is_filter_row() && self.is_handle_column()
    }

    pub fn is_filter_cell(&self) -> bool {
        self.is_filter_row() && self.is_data_column()
    }

    /// Summary rows, including both totals subgrids.
    pub fn is_summary_row(&self) -> bool {
        self.kind_is(SubgridKind::is_summary)
    }

    pub fn is_summary_handle(&self) -> bool {
        self.is_summary_row() && self.is_handle_column()
    }

    pub fn is_summary_cell(&self) -> bool {
        self.is_summary_row() && self.is_data_column()
    }

    pub fn is_top_totals_row(&self) -> bool {
        self.kind_is(|k| k == SubgridKind::TopTotals)
    }

    pub fn is_top_totals_handle(&self) -> bool {
        self.is_top_totals_row() && self.is_handle_column()
    }

    pub fn is_top_totals_cell(&self) -> bool {
        self.is_top_totals_row() && self.is_data_column()
    }

    pub fn is_bottom_totals_row(&self) -> bool {
        self.kind_is(|k| k == SubgridKind::BottomTotals)
    }

    pub fn is_bottom_totals_handle(&self) -> bool {
        self.is_bottom_totals_row() && self.is_handle_column()
    }

    pub fn is_bottom_totals_cell(&self) -> bool {
        self.is_bottom_totals_row() && self.is_data_column()
    }

    // Fixed rows and columns

    pub fn is_row_fixed(&self) -> bool {
        let fixed = self.ctx.grid.properties().fixed_row_count;
        self.is_data_row() && i64::from(self.data_cell.y) < i64::from(fixed)
    }

    pub fn is_column_fixed(&self) -> bool {
        let fixed = self.ctx.grid.properties().fixed_column_count;
        self.is_data_column() && i64::from(self.grid_cell.x) < i64::from(fixed)
    }

    pub fn is_cell_fixed(&self) -> bool {
        self.is_row_fixed() && self.is_column_fixed()
    }

    // Selection

    pub fn is_row_selected(&self) -> bool {
        self.is_data_row() && self.ctx.selection.is_row_selected(self.data_cell.y)
    }

    pub fn is_column_selected(&self) -> bool {
        self.is_data_column() && self.ctx.selection.is_column_selected(self.grid_cell.x)
    }

    pub fn is_cell_selected(&self) -> bool {
        self.is_targeted()
            && self
                .ctx
                .selection
                .is_cell_selected(self.grid_cell.x, self.data_cell.y)
    }

    // Hover

    pub fn is_row_hovered(&self) -> bool {
        let grid = &self.ctx.grid;
        grid.has_pointer()
            && self.is_data_row()
            && grid.hover_cell().is_some_and(|h| h.y == self.grid_cell.y)
    }

    pub fn is_column_hovered(&self) -> bool {
        let grid = &self.ctx.grid;
        grid.has_pointer()
            && self.is_data_column()
            && grid.hover_cell().is_some_and(|h| h.x == self.grid_cell.x)
    }

    pub fn is_cell_hovered(&self) -> bool {
        self.is_row_hovered() && self.is_column_hovered()
    }

    // Pivot helpers

    /// Data columns other than a pivot's tree column.
    pub fn is_column_movable(&self) -> bool {
        self.is_data_column() && !self.column().is_some_and(|c| c.is_tree)
    }

    pub fn is_aggregation_column(&self) -> bool {
        self.column().is_some_and(|c| c.name.starts_with("$$aggregation"))
    }

    pub fn is_aggregation_tree_column(&self) -> bool {
        self.column().is_some_and(|c| c.name == "$$aggregation")
    }

    pub fn is_grand_total_row(&self) -> bool {
        self.data_row()
            .is_some_and(|row| row.get("$$grand_total").is_some_and(is_truthy))
    }

    // Hierarchical rows, answered by the behavior from the data row

    fn row_query<T: Default>(&self, query: impl FnOnce(&dyn Behavior, &Value) -> T) -> T {
        self.data_row()
            .map(|row| query(&*self.ctx.behavior, &row))
            .unwrap_or_default()
    }

    pub fn is_aggregation_row(&self) -> bool {
        self.row_query(|b, row| b.is_aggregation_row(row))
    }

    pub fn child_rows(&self) -> Vec<Value> {
        self.row_query(|b, row| b.child_rows(row))
    }

    pub fn has_child_rows(&self) -> bool {
        self.row_query(|b, row| b.has_child_rows(row))
    }

    pub fn aggregation_child_count(&self) -> usize {
        self.row_query(|b, row| b.aggregation_child_count(row))
    }

    pub fn is_expandable_row(&self) -> bool {
        self.row_query(|b, row| b.is_expandable_row(row))
    }

    pub fn is_row_expanded(&self) -> bool {
        self.row_query(|b, row| b.is_row_expanded(row))
    }

    pub fn tree_level(&self) -> Option<u32> {
        self.row_query(|b, row| b.row_tree_level(row))
    }

    // Column groups, answered by the subgrid from the data cell

    fn group_query<T: Default>(&self, query: impl FnOnce(&dyn Subgrid, i32, i32) -> T) -> T {
        self.subgrid()
            .map(|s| query(&**s, self.data_cell.x, self.data_cell.y))
            .unwrap_or_default()
    }

    pub fn child_columns(&self) -> Vec<Value> {
        self.group_query(|s, x, y| s.child_columns(x, y))
    }

    pub fn is_expandable_column(&self) -> bool {
        !self.child_columns().is_empty()
    }

    pub fn is_column_open_by_default(&self) -> bool {
        self.group_query(|s, x, y| s.is_column_open_by_default(x, y))
    }

    pub fn is_column_expanded(&self) -> bool {
        self.group_query(|s, x, y| s.is_column_expanded(x, y))
    }

    pub fn column_group_id(&self) -> Option<Value> {
        self.group_query(|s, x, y| s.column_group_id(x, y))
    }
}
