//! The reusable cell cursor.
//!
//! A renderer keeps one [`CellCursor`] per grid and retargets it for every
//! visible cell of every frame. Retargeting copies `Copy` coordinates and `Rc`
//! handles only, and invalidates every lazily computed field by bumping a
//! generation counter.
//!
//! Anything read from the cursor by reference is tied to `&self` and cannot
//! survive the next retarget (`&mut self`). State that must outlive it comes
//! from [`CellCursor::duplicate`], [`CellCursor::snapshot`] or
//! [`CellCursor::editor_seed`].
//!
//! Four entry points locate the cell:
//! - [`CellCursor::retarget_from_grid`] by grid column and grid row
//! - [`CellCursor::retarget_from_grid_xy`] by rendered column slot and grid row
//! - [`CellCursor::retarget_from_data`] by data column and data row
//! - [`CellCursor::retarget_from_grid_column_data_row`] by grid column and data
//!   row, optionally reaching off-screen cells
//!
//! A failed lookup returns `false` and leaves the cursor untouched.

mod memo;
mod merge;
mod props;
mod snapshot;
mod space;

use std::rc::Rc;

use serde_json::Value;

pub use memo::Generation;
pub use props::{BIG_TEXT_EDITOR, TEXT_COLORIZATION_EDITOR};
pub use snapshot::{CellFlags, CellSnapshot, EditorSeed};

use crate::context::{CursorContext, Subgrid, VisibleColumn, VisibleRow};
use crate::error::{CursorError, Result};
use crate::types::{
    Bounds, Column, DataCellCoord, GridCellCoord, Point, PropertyBag, SubgridKind, ValueCellCoord,
};
use memo::Memo;

/// Grid coordinate of a row or column synthesized for an off-screen cell.
pub const OFFSCREEN: i32 = i32::MIN;

const CLICK_RECT: &str = "clickRect";

const EDIT_POINT_REPLACEMENT: &str = "`grid_cell().x` - The active column index. (Adjusted for column scrolling after fixed columns.)\n\
`grid_cell().y` - The vertical grid coordinate. (Unaffected by row scrolling.)\n\
`data_cell().x` - The data model's column index. (Unaffected by column scrolling.)\n\
`data_cell().y` - The data model's row index. (Adjusted for data row scrolling after fixed rows.)";

#[derive(Debug)]
struct CursorCache {
    properties: Memo<Rc<PropertyBag>>,
    bounds: Memo<Bounds>,
    formatted_value: Memo<Rc<str>>,
    requires_full_value: Memo<bool>,
    is_json_value: Memo<bool>,
    is_xml_value: Memo<bool>,
    is_big_string: Memo<bool>,
    full_value: Memo<Rc<Value>>,
}

impl CursorCache {
    const fn new() -> Self {
        Self {
            properties: Memo::new(),
            bounds: Memo::new(),
            formatted_value: Memo::new(),
            requires_full_value: Memo::new(),
            is_json_value: Memo::new(),
            is_xml_value: Memo::new(),
            is_big_string: Memo::new(),
            full_value: Memo::new(),
        }
    }
}

/// Mutable, reusable pointer to one grid cell.
pub struct CellCursor {
    ctx: CursorContext,
    generation: Generation,
    visible_column: Option<VisibleColumn>,
    visible_row: Option<VisibleRow>,
    grid_cell: GridCellCoord,
    data_cell: DataCellCoord,
    value_cell: ValueCellCoord,
    /// Attributes accumulated by the caller (e.g. editor setup); not cleared on retarget.
    own: PropertyBag,
    /// Pointer position relative to the cell; cleared on retarget.
    mouse_point: Option<Point>,
    cache: CursorCache,
}

impl CellCursor {
    /// Create an untargeted cursor bound to a grid's collaborators.
    pub fn new(ctx: CursorContext) -> Self {
        Self {
            ctx,
            generation: Generation::default(),
            visible_column: None,
            visible_row: None,
            grid_cell: GridCellCoord::default(),
            data_cell: DataCellCoord::default(),
            value_cell: ValueCellCoord::default(),
            own: PropertyBag::new(),
            mouse_point: None,
            cache: CursorCache::new(),
        }
    }

    /// Create a cursor already pointed at a rendered grid cell.
    pub fn at_grid(ctx: CursorContext, grid_x: i32, grid_y: i32) -> Option<Self> {
        let mut cursor = Self::new(ctx);
        cursor.retarget_from_grid(grid_x, grid_y).then_some(cursor)
    }

    pub fn context(&self) -> &CursorContext {
        &self.ctx
    }

    // ------------------------------------------------------------------
    // Retargeting
    // ------------------------------------------------------------------

    /// Point the cursor at the cell where `column` and `row` intersect.
    pub fn retarget(&mut self, column: VisibleColumn, row: VisibleRow) {
        self.generation = self.generation.next();

        self.grid_cell = GridCellCoord {
            x: column.column_index,
            y: row.index,
        };
        self.data_cell = DataCellCoord {
            x: column.column.as_ref().map_or(column.column_index, |c| c.index),
            y: row.row_index,
        };
        self.value_cell = merge::resolve_value_cell(&self.ctx, row.subgrid.as_ref(), self.data_cell);
        self.mouse_point = None;

        self.visible_column = Some(column);
        self.visible_row = Some(row);
    }

    /// Retarget by grid column (active column index) and grid row.
    pub fn retarget_from_grid(&mut self, grid_x: i32, grid_y: i32) -> bool {
        let renderer = Rc::clone(&self.ctx.renderer);
        let Some(column) = renderer.visible_column(grid_x) else {
            log::trace!("grid column {grid_x} not rendered");
            return false;
        };
        let Some(row) = renderer.visible_row(grid_y) else {
            log::trace!("grid row {grid_y} not rendered");
            return false;
        };
        self.retarget(column, row);
        true
    }

    /// Retarget by rendered column slot and grid row.
    pub fn retarget_from_grid_xy(&mut self, grid_x: i32, grid_y: i32) -> bool {
        let renderer = Rc::clone(&self.ctx.renderer);
        let Some(column) = renderer.visible_column_at(grid_x) else {
            log::trace!("column slot {grid_x} not rendered");
            return false;
        };
        let Some(row) = renderer.visible_row(grid_y) else {
            log::trace!("grid row {grid_y} not rendered");
            return false;
        };
        self.retarget(column, row);
        true
    }

    /// Retarget by data coordinates within a subgrid (data subgrid by default).
    pub fn retarget_from_data(&mut self, data_x: i32, data_y: i32, kind: Option<SubgridKind>) -> bool {
        let kind = kind.unwrap_or_default();
        let renderer = Rc::clone(&self.ctx.renderer);
        let Some(column) = renderer.visible_data_column(data_x) else {
            log::trace!("data column {data_x} not rendered");
            return false;
        };
        let Some(row) = renderer.visible_data_row(data_y, kind) else {
            log::trace!("{kind:?} row {data_y} not rendered");
            return false;
        };
        self.retarget(column, row);
        true
    }

    /// Retarget by grid column and data row.
    ///
    /// With `use_all_cells`, a column or row that is scrolled out of view is
    /// synthesized from the behavior instead of failing, so selection corners
    /// outside the viewport still resolve. Its grid coordinate and slot are
    /// [`OFFSCREEN`] and its geometry is zero.
    pub fn retarget_from_grid_column_data_row(
        &mut self,
        grid_x: i32,
        data_y: i32,
        kind: Option<SubgridKind>,
        use_all_cells: bool,
    ) -> bool {
        let kind = kind.unwrap_or_default();
        let renderer = Rc::clone(&self.ctx.renderer);
        let column = renderer.visible_column(grid_x);
        let row = renderer.visible_data_row(data_y, kind);

        if !use_all_cells {
            let (Some(column), Some(row)) = (column, row) else {
                log::trace!("cell ({grid_x}, {kind:?} row {data_y}) not rendered");
                return false;
            };
            self.retarget(column, row);
            return true;
        }

        let column = column.unwrap_or_else(|| VisibleColumn {
            column_index: grid_x,
            index: OFFSCREEN,
            column: self.ctx.behavior.column(grid_x),
            left: 0.0,
            width: 0.0,
        });
        let row = match row {
            Some(row) => row,
            None => {
                let Some(subgrid) = self.ctx.behavior.subgrid(kind) else {
                    log::warn!("no {kind:?} subgrid to synthesize row {data_y} from");
                    return false;
                };
                VisibleRow {
                    index: OFFSCREEN,
                    row_index: data_y,
                    subgrid,
                    top: 0.0,
                    height: 0.0,
                }
            }
        };
        self.retarget(column, row);
        true
    }

    // ------------------------------------------------------------------
    // Copies
    // ------------------------------------------------------------------

    /// Independent cursor pointed at the same cell.
    ///
    /// With `copy_own_overrides`, the caller-accumulated own attributes (and a
    /// fetched full value) travel along; otherwise the copy starts clean.
    pub fn duplicate(&self, copy_own_overrides: bool) -> CellCursor {
        let mut copy = CellCursor::new(self.ctx.clone());
        if self.is_targeted() {
            copy.generation = copy.generation.next();
            copy.visible_column.clone_from(&self.visible_column);
            copy.visible_row.clone_from(&self.visible_row);
            copy.grid_cell = self.grid_cell;
            copy.data_cell = self.data_cell;
            copy.value_cell = self.value_cell;
            copy.mouse_point = self.mouse_point;
        }
        if copy_own_overrides {
            copy.own = self.own.clone();
            if let Some(full) = self.cache.full_value.get(self.generation) {
                copy.cache.full_value.set(copy.generation, full);
            }
        }
        copy
    }

    /// The state an editor needs, built explicitly from public getters.
    pub fn editor_seed(&self) -> EditorSeed {
        EditorSeed {
            column: self.column_rc(),
            attributes: self.own.clone(),
            grid_cell: self.grid_cell,
            data_cell: self.data_cell,
            value_cell: self.value_cell,
            editor: self.editor(),
        }
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Debug-build check that the cursor has not been retargeted since
    /// `generation` was observed.
    pub fn assert_generation(&self, generation: Generation) {
        debug_assert_eq!(
            self.generation, generation,
            "cell cursor was retargeted; duplicate() it to keep a cell's state"
        );
    }

    pub fn is_targeted(&self) -> bool {
        self.visible_row.is_some()
    }

    // ------------------------------------------------------------------
    // Coordinates and handles
    // ------------------------------------------------------------------

    pub fn grid_cell(&self) -> GridCellCoord {
        self.grid_cell
    }

    pub fn data_cell(&self) -> DataCellCoord {
        self.data_cell
    }

    pub fn value_cell(&self) -> ValueCellCoord {
        self.value_cell
    }

    /// Removed coordinate field; always fails, naming its replacements.
    pub fn edit_point(&self) -> Result<GridCellCoord> {
        Err(CursorError::RemovedField {
            field: "edit_point",
            replacement: EDIT_POINT_REPLACEMENT,
        })
    }

    pub fn visible_column(&self) -> Option<&VisibleColumn> {
        self.visible_column.as_ref()
    }

    pub fn visible_row(&self) -> Option<&VisibleRow> {
        self.visible_row.as_ref()
    }

    pub fn subgrid(&self) -> Option<&Rc<dyn Subgrid>> {
        self.visible_row.as_ref().map(|r| &r.subgrid)
    }

    pub fn subgrid_kind(&self) -> Option<SubgridKind> {
        self.subgrid().map(|s| s.kind())
    }

    /// The cell's column, reserved columns included.
    pub fn column(&self) -> Option<&Column> {
        self.visible_column.as_ref().and_then(|c| c.column.as_deref())
    }

    fn column_rc(&self) -> Option<Rc<Column>> {
        self.visible_column
            .as_ref()
            .and_then(|c| c.column.as_ref().map(Rc::clone))
    }

    /// The cell's column when grid x is neither the row-handle nor the tree column.
    pub fn data_column(&self) -> Option<&Column> {
        let behavior = &self.ctx.behavior;
        let x = self.grid_cell.x;
        if x == behavior.row_column_index() || x == behavior.tree_column_index() {
            return None;
        }
        self.column()
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Raw value of the value cell.
    pub fn value(&self) -> Value {
        self.subgrid()
            .map_or(Value::Null, |s| s.value(self.value_cell.x, self.value_cell.y))
    }

    /// Write the value cell's raw value.
    pub fn set_value(&mut self, value: Value) {
        if let Some(subgrid) = self.subgrid() {
            subgrid.set_value(self.value_cell.x, self.value_cell.y, value);
        }
        self.cache.formatted_value.invalidate();
        self.cache.requires_full_value.invalidate();
        self.cache.is_json_value.invalidate();
        self.cache.is_xml_value.invalidate();
    }

    // ------------------------------------------------------------------
    // Own attributes
    // ------------------------------------------------------------------

    pub fn own_attributes(&self) -> &PropertyBag {
        &self.own
    }

    pub fn set_own_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.own.insert(key, value);
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    pub fn mouse_point(&self) -> Option<Point> {
        self.mouse_point
    }

    /// Record the pointer position, relative to the cell's top-left corner.
    pub fn set_mouse_point(&mut self, point: Option<Point>) {
        self.mouse_point = point;
    }

    /// Whether the pointer falls inside the cell's click rect.
    ///
    /// The rect is the own `clickRect` attribute when one is set (even to
    /// null), else the `clickRect` property. Without a rect every point
    /// counts as inside; without a pointer none does.
    pub fn mouse_point_in_click_rect(&self) -> bool {
        let rect = if self.own.contains_key(CLICK_RECT) {
            self.own.get(CLICK_RECT).cloned()
        } else {
            self.properties().get(CLICK_RECT).cloned()
        };
        let Some(rect) = rect.filter(|r| !r.is_null()) else {
            return true;
        };
        let rect: Bounds = match serde_json::from_value(rect) {
            Ok(rect) => rect,
            Err(err) => {
                log::warn!("malformed {CLICK_RECT} ignored: {err}");
                return true;
            }
        };
        self.mouse_point.is_some_and(|point| rect.contains(point))
    }
}

impl std::fmt::Debug for CellCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellCursor")
            .field("generation", &self.generation)
            .field("grid_cell", &self.grid_cell)
            .field("data_cell", &self.data_cell)
            .field("value_cell", &self.value_cell)
            .field("subgrid", &self.subgrid_kind())
            .field("column", &self.column().map(|c| c.name.as_str()))
            .finish_non_exhaustive()
    }
}
