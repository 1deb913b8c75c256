//! Merged-cell resolution and span queries.
//!
//! A cell covered by a neighbor's span normally draws nothing: the anchor's
//! own render claims the whole area. Only when the anchor's neighbor has been
//! scrolled out of view does the covered cell become responsible for showing
//! the anchor's value, and only then is its value coordinate redirected.

use crate::context::{CursorContext, Subgrid};
use crate::types::{Bounds, DataCellCoord, ValueCellCoord};

use super::CellCursor;

/// Compute the value coordinate for a data coordinate.
///
/// The anchor lookups are delegated to the selection model and trusted to be
/// final; chains of spans are not followed here.
pub(crate) fn resolve_value_cell(
    ctx: &CursorContext,
    subgrid: &dyn Subgrid,
    data: DataCellCoord,
) -> ValueCellCoord {
    let mut value = ValueCellCoord::from(data);
    if !subgrid.is_render_skip_needed(value.x, value.y) {
        return value;
    }
    if value.x > 1 && !ctx.grid.is_column_visible(value.x - 1) {
        value.x = ctx.selection.check_cell_left(value.x, value.y);
    }
    if value.y > 0 && !ctx.grid.is_data_row_visible(value.y - 1) {
        value.y = ctx.selection.check_cell_top(value.x, value.y);
    }
    if value != ValueCellCoord::from(data) {
        log::trace!("cell {data:?} shows anchor {value:?}");
    }
    value
}

impl CellCursor {
    /// Extra columns spanned by this cell (0 = none).
    pub fn colspan(&self) -> u32 {
        self.subgrid()
            .map_or(0, |s| s.colspan(self.data_cell.x, self.data_cell.y))
    }

    /// Extra rows spanned by this cell (0 = none).
    pub fn rowspan(&self) -> u32 {
        self.subgrid()
            .map_or(0, |s| s.rowspan(self.data_cell.x, self.data_cell.y))
    }

    /// True when the value cell is covered by a neighbor and draws nothing.
    pub fn is_render_skip_needed(&self) -> bool {
        self.subgrid()
            .is_some_and(|s| s.is_render_skip_needed(self.value_cell.x, self.value_cell.y))
    }

    pub fn is_colspaned_by_left_column(&self) -> bool {
        self.subgrid()
            .is_some_and(|s| s.is_colspaned_by_left_column(self.data_cell.x, self.data_cell.y))
    }

    pub fn is_rowspaned_by_row(&self) -> bool {
        self.subgrid()
            .is_some_and(|s| s.is_rowspaned_by_row(self.data_cell.x, self.data_cell.y))
    }

    /// Row whose span covers this cell.
    pub fn rowspan_main_row(&self) -> Option<i32> {
        self.subgrid()
            .and_then(|s| s.rowspan_main_row(self.data_cell.x, self.data_cell.y))
    }

    /// Name of the column whose span covers this cell.
    pub fn colspan_main_column_name(&self) -> Option<String> {
        self.subgrid()
            .and_then(|s| s.colspan_main_column_name(self.data_cell.x, self.data_cell.y))
    }

    pub fn additional_width(&self) -> f32 {
        match self.subgrid_kind() {
            Some(kind) if self.colspan() > 0 => {
                self.ctx
                    .behavior
                    .additional_width(self.data_cell.x, self.data_cell.y, kind)
            }
            _ => 0.0,
        }
    }

    pub fn additional_height(&self) -> f32 {
        match self.subgrid_kind() {
            Some(kind) if self.rowspan() > 0 => {
                self.ctx
                    .behavior
                    .additional_height(self.data_cell.x, self.data_cell.y, kind)
            }
            _ => 0.0,
        }
    }

    /// Pixel bounds, extended over spanned neighbors. Zero when untargeted.
    pub fn bounds(&self) -> Bounds {
        let (Some(column), Some(row)) = (&self.visible_column, &self.visible_row) else {
            return Bounds::default();
        };
        self.cache.bounds.get_or_insert_with(self.generation, || Bounds {
            x: column.left,
            y: row.top,
            width: column.width + self.additional_width(),
            height: row.height + self.additional_height(),
        })
    }
}
